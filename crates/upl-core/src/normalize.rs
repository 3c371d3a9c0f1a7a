//! Result normalizer: raw engine records into uniform details.

use upl_engine::{PackageFormat, PackageRecord};

use crate::detail::{DetailKey, DetailOptions, DetailValue, PackageDetail};
use crate::humanize::format_epoch_date;

/// Convert a fetched record into its descriptive mapping.
///
/// Pure: reads fields off the record, performs no I/O. Only present fields
/// are populated, so a partial record yields a partial detail rather than
/// invented values.
pub fn normalize(record: &PackageRecord, opts: DetailOptions) -> PackageDetail {
    let mut detail = PackageDetail::empty(record.format);

    detail.insert_text(DetailKey::Name, record.name.as_str());
    detail.insert_text(DetailKey::Title, record.display_name());
    detail.insert_opt(DetailKey::AppId, record.app_id.as_ref());
    detail.insert_opt(DetailKey::PackageId, record.id.as_ref());
    detail.insert_opt(DetailKey::Description, record.description.as_ref());
    detail.insert_opt(DetailKey::LongDescription, record.long_description.as_ref());
    detail.insert_opt(DetailKey::Version, record.version.as_ref());
    detail.insert_opt(DetailKey::InstalledVersion, record.installed_version.as_ref());
    detail.insert_opt(DetailKey::Repository, record.repository.as_ref());
    detail.insert_opt(DetailKey::License, record.license.as_ref());
    detail.insert_opt(DetailKey::Url, record.url.as_ref());
    detail.insert_opt(DetailKey::Icon, record.icon.as_ref());
    detail.insert_list(DetailKey::Screenshots, &record.screenshots);
    detail.insert_opt(DetailKey::Launchable, record.launchable.as_ref());

    if let Some(epoch) = record.install_date {
        if let Some(date) = format_epoch_date(epoch) {
            detail.insert_text(DetailKey::InstallDate, date);
        }
    }
    if let Some(bytes) = record.download_size {
        detail.insert(DetailKey::DownloadSize, opts.size_value(bytes));
    }
    if let Some(bytes) = record.installed_size {
        detail.insert(DetailKey::InstalledSize, opts.size_value(bytes));
    }

    match record.format {
        PackageFormat::Native => normalize_native(record, &mut detail),
        PackageFormat::Snap => normalize_snap(record, &mut detail),
        PackageFormat::Flatpak => {}
    }

    detail
}

fn normalize_native(record: &PackageRecord, detail: &mut PackageDetail) {
    detail.insert_list(DetailKey::Depends, &record.depends);
    detail.insert_list(DetailKey::OptDepends, &record.opt_depends);
    detail.insert_list(DetailKey::MakeDepends, &record.make_depends);
    detail.insert_list(DetailKey::CheckDepends, &record.check_depends);
    detail.insert_list(DetailKey::RequiredBy, &record.required_by);
    detail.insert_list(DetailKey::OptionalFor, &record.optional_for);
    detail.insert_list(DetailKey::Conflicts, &record.conflicts);
    detail.insert_list(DetailKey::Provides, &record.provides);
    detail.insert_list(DetailKey::Replaces, &record.replaces);
    detail.insert_list(DetailKey::Groups, &record.groups);
    detail.insert_list(DetailKey::Backups, &record.backups);
    detail.insert_opt(DetailKey::Packager, record.packager.as_ref());
    detail.insert_opt(DetailKey::Reason, record.install_reason.as_ref());
    if let Some(signed) = record.has_signature {
        detail.insert(DetailKey::HasSignature, DetailValue::Flag(signed));
    }
    if let Some(epoch) = record.build_date {
        if let Some(date) = format_epoch_date(epoch) {
            detail.insert_text(DetailKey::BuildDate, date);
        }
    }
}

fn normalize_snap(record: &PackageRecord, detail: &mut PackageDetail) {
    detail.insert_opt(DetailKey::Publisher, record.publisher.as_ref());
    detail.insert_opt(DetailKey::Channel, record.channel.as_ref());
    detail.insert_list(DetailKey::Channels, &record.channels);
    detail.insert_opt(DetailKey::Confined, record.confined.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native_record() -> PackageRecord {
        let mut rec = PackageRecord::new("htop", PackageFormat::Native);
        rec.version = Some("3.3.0".to_string());
        rec.description = Some("Interactive process viewer".to_string());
        rec.depends = vec!["ncurses".to_string(), "libcap".to_string()];
        rec.download_size = Some(1024 * 1024);
        rec.build_date = Some(1_700_000_000);
        rec.has_signature = Some(true);
        rec
    }

    #[test]
    fn native_detail_carries_dependency_keys() {
        let detail = normalize(&native_record(), DetailOptions::default());
        assert_eq!(
            detail.get(DetailKey::Depends),
            Some(&DetailValue::List(vec![
                "ncurses".to_string(),
                "libcap".to_string()
            ]))
        );
        assert_eq!(
            detail.get(DetailKey::HasSignature),
            Some(&DetailValue::Flag(true))
        );
        assert_eq!(
            detail.get(DetailKey::BuildDate),
            Some(&DetailValue::Text("2023-11-14".to_string()))
        );
    }

    #[test]
    fn snap_detail_skips_native_keys() {
        let mut rec = PackageRecord::new("code", PackageFormat::Snap);
        rec.channel = Some("stable".to_string());
        rec.publisher = Some("vscode".to_string());
        // Dependency fields are meaningless for snaps even if present.
        rec.depends = vec!["should-not-appear".to_string()];

        let detail = normalize(&rec, DetailOptions::default());
        assert_eq!(
            detail.get(DetailKey::Channel),
            Some(&DetailValue::Text("stable".to_string()))
        );
        assert!(detail.get(DetailKey::Depends).is_none());
    }

    #[test]
    fn size_rendering_is_an_explicit_option() {
        let human = normalize(&native_record(), DetailOptions::default());
        assert_eq!(
            human.get(DetailKey::DownloadSize),
            Some(&DetailValue::Text("1.0 MB".to_string()))
        );

        let raw = normalize(&native_record(), DetailOptions::raw());
        assert_eq!(
            raw.get(DetailKey::DownloadSize),
            Some(&DetailValue::Bytes(1024 * 1024))
        );
    }

    #[test]
    fn absent_fields_stay_absent() {
        let rec = PackageRecord::new("bare", PackageFormat::Flatpak);
        let detail = normalize(&rec, DetailOptions::default());
        assert!(detail.get(DetailKey::Description).is_none());
        assert!(detail.get(DetailKey::DownloadSize).is_none());
        // Name and title always resolve.
        assert_eq!(
            detail.get(DetailKey::Name),
            Some(&DetailValue::Text("bare".to_string()))
        );
    }
}
