use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_parse_empty_config() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.check_options(), CheckOptions::default());
}

#[test]
fn test_parse_full_config() {
    let content = r#"
[check]
redundant_arms = "warn"
max_witnesses = 5
extensions = ["pmxc"]
"#;

    let config = Config::parse(content).unwrap();
    assert_eq!(config.check.redundant_arms, RedundantArms::Warn);
    assert_eq!(config.check.max_witnesses, 5);
    assert_eq!(config.check.extensions, vec!["pmxc"]);

    let options = config.check_options();
    assert_eq!(options.redundant_arms, RedundantArms::Warn);
    assert_eq!(options.max_witnesses, 5);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = Config::parse("[check]\nmax_witnesses = 1\n").unwrap();
    assert_eq!(config.check.redundant_arms, RedundantArms::Allow);
    assert_eq!(config.check.extensions, vec!["pmxc", "pmxclang"]);
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = Config::parse("[check]\nredundant = \"warn\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_bad_redundant_arms_value() {
    let err = Config::parse("[check]\nredundant_arms = \"deny\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("failed to parse pmxc.toml"));
}

#[test]
fn test_invalid_extensions() {
    let err = Config::parse("[check]\nextensions = []\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().starts_with("invalid configuration in pmxc.toml"));

    let err = Config::parse("[check]\nextensions = [\".pmxc\"]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn test_is_source_file() {
    let config = Config::default();
    assert!(config.is_source_file(Path::new("a/b.pmxc")));
    assert!(config.is_source_file(Path::new("b.pmxclang")));
    assert!(!config.is_source_file(Path::new("b.rs")));
    assert!(!config.is_source_file(Path::new("pmxc")));
}

#[test]
fn test_fingerprint_tracks_analysis_settings() {
    let base = Config::default();
    let mut warn = base.clone();
    warn.check.redundant_arms = RedundantArms::Warn;
    let mut exts = base.clone();
    exts.check.extensions = vec!["txt".to_string()];

    assert_ne!(base.fingerprint(), warn.fingerprint());
    // Extensions select files but do not change results
    assert_eq!(base.fingerprint(), exts.fingerprint());
}

#[test]
fn test_discover_walks_up() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::write(root.join(CONFIG_FILE), "[check]\nmax_witnesses = 7\n").unwrap();
    let nested = root.join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();
    let file = nested.join("main.pmxc");
    std::fs::write(&file, "").unwrap();

    let (config, path) = Config::discover(&file).unwrap();
    assert_eq!(config.check.max_witnesses, 7);
    assert_eq!(
        path.unwrap().canonicalize().unwrap(),
        root.join(CONFIG_FILE).canonicalize().unwrap()
    );
}

#[test]
fn test_load_missing_file() {
    let tmp = TempDir::new().unwrap();
    let err = Config::load(&tmp.path().join(CONFIG_FILE)).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_discover_reports_malformed_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(CONFIG_FILE), "[check\n").unwrap();
    let err = Config::discover(tmp.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
