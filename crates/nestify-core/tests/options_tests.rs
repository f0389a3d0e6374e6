//! Tests for conversion options and their JSON form.

use nestify_core::ConvertOptions;

/// Helper to parse options from JSON
fn parse(json: &str) -> Result<ConvertOptions, serde_json::Error> {
    serde_json::from_str(json)
}

#[test]
fn test_defaults() {
    let options = ConvertOptions::default();
    assert!(options.nest);
    assert_eq!(options.max_depth, None);
    assert!(!options.variables);
    assert_eq!(options.var_threshold, 3);
    assert_eq!(options.var_prefix, "auto-var");
    assert!(!options.group_properties);
    assert_eq!(options.group_min, 2);
    assert!(options.comments);
}

#[test]
fn test_empty_object_gives_defaults() {
    assert_eq!(parse("{}").expect("valid"), ConvertOptions::default());
}

#[test]
fn test_kebab_case_keys() {
    let options = parse(
        r#"{
            "nest": false,
            "max-depth": 3,
            "variables": true,
            "var-threshold": 2,
            "var-prefix": "v",
            "group-properties": true,
            "group-min": 4,
            "comments": false
        }"#,
    )
    .expect("valid");

    assert_eq!(
        options,
        ConvertOptions {
            nest: false,
            max_depth: Some(3),
            variables: true,
            var_threshold: 2,
            var_prefix: "v".to_string(),
            group_properties: true,
            group_min: 4,
            comments: false,
        }
    );
}

#[test]
fn test_partial_object_keeps_other_defaults() {
    let options = parse(r#"{ "variables": true }"#).expect("valid");
    assert!(options.variables);
    assert_eq!(options.var_threshold, 3);
    assert!(options.nest);
}

#[test]
fn test_null_depth_is_unlimited() {
    let options = parse(r#"{ "max-depth": null }"#).expect("valid");
    assert_eq!(options.depth_limit(), None);
}

#[test]
fn test_unknown_keys_are_rejected() {
    assert!(parse(r#"{ "max_depth": 3 }"#).is_err());
    assert!(parse(r#"{ "indent": 4 }"#).is_err());
}

#[test]
fn test_wrong_types_are_rejected() {
    assert!(parse(r#"{ "nest": "yes" }"#).is_err());
    assert!(parse(r#"{ "max-depth": -1 }"#).is_err());
}

#[test]
fn test_thresholds_are_clamped() {
    let options = ConvertOptions {
        max_depth: Some(0),
        var_threshold: 0,
        group_min: 1,
        ..ConvertOptions::default()
    };
    assert_eq!(options.depth_limit(), Some(1));
    assert_eq!(options.variable_threshold(), 1);
    assert_eq!(options.group_threshold(), 2);
}
