use std::ffi::OsString;

use clap::Parser;
use tempfile::NamedTempFile;

use super::*;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("carplogic").chain(args.iter().copied()))
}

#[test]
fn load_without_disk_returns_defaults() {
    let (settings, path) = load_runtime_settings(&cli(&[]), false);
    assert!(path.is_none());
    assert_eq!(settings, RuntimeSettings::default());
    assert_eq!(settings.water_type, "Baggersee");
}

#[test]
fn cli_flags_override_saved_values() {
    let mut settings = RuntimeSettings {
        trend: TrendMetric::Pressure,
        season: "Herbst".to_string(),
        refresh_interval_secs: 900,
        ..RuntimeSettings::default()
    };
    settings.apply_cli_overrides(&cli(&["--trend", "temperature", "--water-type", "Fluss"]));

    assert_eq!(settings.trend, TrendMetric::Temperature);
    assert_eq!(settings.water_type, "Fluss");
    assert_eq!(settings.season, "Herbst");
    assert_eq!(settings.refresh_interval_secs, 900);

    settings.apply_cli_overrides(&cli(&["--refresh-interval", "120"]));
    assert_eq!(settings.refresh_interval_secs, 120);
}

#[test]
fn roundtrip_through_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("settings.json");
    let settings = RuntimeSettings {
        water_type: "Fluss".to_string(),
        trend: TrendMetric::Temperature,
        ..RuntimeSettings::default()
    };

    save_runtime_settings(&path, &settings).expect("save settings");
    assert_eq!(read_saved_settings(&path), Some(settings));
}

#[test]
fn partial_file_fills_defaults() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(file.path(), r#"{"season": "Winter"}"#).expect("write settings");

    let loaded = read_saved_settings(file.path()).expect("parse settings");
    assert_eq!(loaded.season, "Winter");
    assert_eq!(loaded.water_type, "Baggersee");
}

#[test]
fn retired_keys_are_ignored() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(file.path(), r#"{"user_name": "Jonas", "season": "Herbst"}"#)
        .expect("write settings");

    let loaded = read_saved_settings(file.path()).expect("parse settings");
    let expected = RuntimeSettings {
        season: "Herbst".to_string(),
        ..RuntimeSettings::default()
    };
    assert_eq!(loaded, expected);
}

#[test]
fn corrupt_file_is_ignored() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(file.path(), "not json").expect("write settings");
    assert_eq!(read_saved_settings(file.path()), None);
}

#[test]
fn config_dir_override_wins_over_home() {
    let path = settings_path_from(
        Some(OsString::from("/tmp/carplogic-test")),
        Some(OsString::from("/home/angler")),
    );
    assert_eq!(path, Some(PathBuf::from("/tmp/carplogic-test/settings.json")));

    let path = settings_path_from(None, Some(OsString::from("/home/angler")));
    assert_eq!(
        path,
        Some(PathBuf::from("/home/angler/.config/carplogic/settings.json"))
    );
    assert_eq!(settings_path_from(None, None), None);
}

#[test]
#[cfg(unix)]
fn save_sets_strict_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let file = NamedTempFile::new().expect("create temp settings file");
    let path = file.path();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).expect("chmod");

    save_runtime_settings(path, &RuntimeSettings::default()).expect("save settings");

    let mode = std::fs::metadata(path).expect("get metadata").permissions().mode() & 0o777;
    assert_eq!(mode, 0o600, "Settings file should have 0600 permissions");
}
