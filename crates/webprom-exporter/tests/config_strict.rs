#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use webprom_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:9394"
web:
  bucketz: [1, 2] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:9394");
    assert_eq!(cfg.server.prefix, "");
    assert!(cfg.web.enabled);
    assert!(cfg.web.buckets.is_none());
    assert!(!cfg.web.strict_label_keys);
    assert!(cfg.labels.is_empty());
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9100"
  prefix: "app_"
  max_body_bytes: 4096
labels:
  region: eu-west-1
web:
  buckets: [1, 0.5, 0.1]
  strict_label_keys: true
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.prefix, "app_");
    assert_eq!(cfg.labels.get("region").map(String::as_str), Some("eu-west-1"));
    assert_eq!(cfg.web.buckets, Some(vec![1.0, 0.5, 0.1]));
    assert!(cfg.web.strict_label_keys);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        "version: 1\nserver:\n  listen: \"not-an-addr\"\n",
        "version: 1\nserver:\n  prefix: \"9bad\"\n",
        "version: 1\nserver:\n  max_body_bytes: 10\n",
        "version: 1\nlabels:\n  \"bad-name\": x\n",
        "version: 1\nlabels:\n  __reserved: x\n",
        "version: 1\nlabels:\n  le: x\n",
        "version: 1\nweb:\n  buckets: []\n",
        "version: 1\nweb:\n  buckets: [1, 1]\n",
        "version: 1\nweb:\n  buckets: [-1]\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "BAD_REQUEST", "{bad}");
    }
}
