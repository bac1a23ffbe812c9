use fenxing::{FactorError, ScanMode, TransformConfig};
use fenxing::transformer::TransformConfigPatch;

#[test]
fn default_config_matches_the_documented_constants() {
    let config = TransformConfig::default();
    assert_eq!(config.bootstrap_window, 11);
    assert_eq!(config.slope_window, 10);
    assert_eq!(config.scan_mode, ScanMode::MergeOnly);
}

#[test]
fn yaml_patch_overrides_only_the_named_fields() {
    let config = TransformConfig::from_yaml_str("slope_window: 5\nscan_mode: promotion\n").unwrap();
    assert_eq!(config.bootstrap_window, 11);
    assert_eq!(config.slope_window, 5);
    assert_eq!(config.scan_mode, ScanMode::Promotion);
}

#[test]
fn empty_yaml_mapping_keeps_the_defaults() {
    let config = TransformConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config.bootstrap_window, 11);
    assert_eq!(config.slope_window, 10);
    assert_eq!(config.scan_mode, ScanMode::MergeOnly);
}

#[test]
fn patch_application_is_field_wise() {
    let patch = TransformConfigPatch {
        bootstrap_window: Some(7),
        slope_window: None,
        scan_mode: Some(ScanMode::Promotion),
    };
    let config = TransformConfig::default().apply_patch(patch);
    assert_eq!(config.bootstrap_window, 7);
    assert_eq!(config.slope_window, 10);
    assert_eq!(config.scan_mode, ScanMode::Promotion);
}

#[test]
fn scan_mode_labels_round_trip() {
    assert_eq!(ScanMode::parse("merge_only").unwrap(), ScanMode::MergeOnly);
    assert_eq!(ScanMode::parse("Promotion").unwrap(), ScanMode::Promotion);
    assert_eq!(ScanMode::MergeOnly.as_str(), "merge_only");
    assert_eq!(ScanMode::Promotion.as_str(), "promotion");
    assert!(matches!(
        ScanMode::parse("streaming"),
        Err(FactorError::InvalidScanMode(_))
    ));
}
