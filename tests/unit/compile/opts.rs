use super::*;

#[test]
fn defaults_are_valid() {
    let opts = CompileOpts::default();
    assert_eq!(opts.label_prefix, "l");
    assert_eq!(opts.first_label, 1);
    assert!(opts.escape);
    opts.validate().unwrap();
}

#[test]
fn prefix_must_form_valid_labels() {
    for bad in ["", "a b", "x]", "1", "a-", "0:v", "l."] {
        let opts = CompileOpts {
            label_prefix: bad.to_string(),
            ..CompileOpts::default()
        };
        assert!(
            matches!(opts.validate(), Err(GraphError::Validation(_))),
            "{bad:?}"
        );
    }
}

#[test]
fn plain_token_prefixes_are_accepted() {
    for good in ["l", "_", "tmp_", "V2"] {
        let opts = CompileOpts {
            label_prefix: good.to_string(),
            ..CompileOpts::default()
        };
        assert!(opts.validate().is_ok(), "{good:?}");
    }
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let opts = CompileOpts::from_reader(r#"{"label_prefix":"v"}"#.as_bytes()).unwrap();
    assert_eq!(opts.label_prefix, "v");
    assert_eq!(opts.first_label, 1);
    assert!(opts.escape);
}

#[test]
fn json_rejects_unknown_fields_and_bad_prefixes() {
    assert!(matches!(
        CompileOpts::from_reader(r#"{"prefix":"v"}"#.as_bytes()),
        Err(GraphError::Serde(_))
    ));
    assert!(matches!(
        CompileOpts::from_reader(r#"{"label_prefix":"a;b"}"#.as_bytes()),
        Err(GraphError::Validation(_))
    ));
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = CompileOpts::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
