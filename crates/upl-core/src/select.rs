//! In-memory staging of packages marked for install or removal.

use upl_engine::{PackageFormat, PackageName, PackageRef};

/// Whether a staged package is to be installed or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Stage for installation.
    Install,
    /// Stage for removal.
    Remove,
}

/// Staged packages: two directions by three formats, six ordered buckets.
///
/// Purely in-memory; consumed by one coordinator run and cleared afterwards.
/// No cross-format validation happens here — staging a native name under
/// the flatpak format is accepted uncritically and is the caller's problem.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    buckets: [[Vec<PackageName>; 3]; 2],
}

fn dir_index(direction: Direction) -> usize {
    match direction {
        Direction::Install => 0,
        Direction::Remove => 1,
    }
}

fn fmt_index(format: PackageFormat) -> usize {
    match format {
        PackageFormat::Native => 0,
        PackageFormat::Snap => 1,
        PackageFormat::Flatpak => 2,
    }
}

impl SelectionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `names` to one bucket. Duplicates are kept.
    pub fn add<I, N>(&mut self, direction: Direction, format: PackageFormat, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<PackageName>,
    {
        let bucket = &mut self.buckets[dir_index(direction)][fmt_index(format)];
        bucket.extend(names.into_iter().map(Into::into));
    }

    /// Drop every occurrence of each of `names` from one bucket.
    ///
    /// Names not present are silently ignored, so removal is idempotent.
    pub fn remove<'a, I>(&mut self, direction: Direction, format: PackageFormat, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let bucket = &mut self.buckets[dir_index(direction)][fmt_index(format)];
        for name in names {
            bucket.retain(|staged| staged != name);
        }
    }

    /// Read one bucket in staging order.
    pub fn bucket(&self, direction: Direction, format: PackageFormat) -> &[PackageName] {
        &self.buckets[dir_index(direction)][fmt_index(format)]
    }

    /// Drain one bucket, leaving it empty.
    pub fn take_bucket(&mut self, direction: Direction, format: PackageFormat) -> Vec<PackageName> {
        std::mem::take(&mut self.buckets[dir_index(direction)][fmt_index(format)])
    }

    /// Total staged names across all buckets.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|row| row.iter())
            .map(Vec::len)
            .sum()
    }

    /// True when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate one direction's staged entries as full refs, native first.
    pub fn refs(&self, direction: Direction) -> impl Iterator<Item = PackageRef> + '_ {
        const FORMATS: [PackageFormat; 3] = [
            PackageFormat::Native,
            PackageFormat::Snap,
            PackageFormat::Flatpak,
        ];
        FORMATS.into_iter().flat_map(move |format| {
            self.bucket(direction, format)
                .iter()
                .map(move |name| PackageRef::new(name.clone(), format))
        })
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for row in &mut self.buckets {
            for bucket in row {
                bucket.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_leaves_bucket_without_the_name() {
        let mut set = SelectionSet::new();
        set.add(Direction::Install, PackageFormat::Native, ["htop", "bash"]);
        set.remove(Direction::Install, PackageFormat::Native, ["htop"]);
        assert_eq!(
            set.bucket(Direction::Install, PackageFormat::Native),
            &[PackageName::new("bash")]
        );
    }

    #[test]
    fn remove_drops_every_occurrence() {
        let mut set = SelectionSet::new();
        set.add(
            Direction::Install,
            PackageFormat::Native,
            ["htop", "htop", "bash"],
        );
        set.remove(Direction::Install, PackageFormat::Native, ["htop"]);
        assert_eq!(
            set.bucket(Direction::Install, PackageFormat::Native),
            &[PackageName::new("bash")]
        );
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let mut set = SelectionSet::new();
        set.add(Direction::Install, PackageFormat::Native, ["htop"]);
        set.remove(Direction::Install, PackageFormat::Native, ["htop"]);
        set.remove(Direction::Install, PackageFormat::Native, ["htop"]);
        assert!(set.is_empty());
    }

    #[test]
    fn buckets_are_independent() {
        let mut set = SelectionSet::new();
        set.add(Direction::Install, PackageFormat::Snap, ["code"]);
        set.add(Direction::Remove, PackageFormat::Snap, ["code"]);
        set.remove(Direction::Install, PackageFormat::Snap, ["code"]);
        assert_eq!(
            set.bucket(Direction::Remove, PackageFormat::Snap),
            &[PackageName::new("code")]
        );
    }

    #[test]
    fn refs_carry_their_bucket_format() {
        let mut set = SelectionSet::new();
        set.add(Direction::Install, PackageFormat::Snap, ["code"]);
        set.add(Direction::Install, PackageFormat::Native, ["htop"]);
        let refs: Vec<_> = set.refs(Direction::Install).collect();
        assert_eq!(refs[0], PackageRef::new("htop", PackageFormat::Native));
        assert_eq!(refs[1], PackageRef::new("code", PackageFormat::Snap));
        assert!(set.refs(Direction::Remove).next().is_none());
    }

    #[test]
    fn take_bucket_drains() {
        let mut set = SelectionSet::new();
        set.add(Direction::Install, PackageFormat::Flatpak, ["org.gimp.GIMP"]);
        let taken = set.take_bucket(Direction::Install, PackageFormat::Flatpak);
        assert_eq!(taken.len(), 1);
        assert!(set.is_empty());
    }
}
