//! Integration tests for emitters and logging built from configuration.

#![cfg(feature = "config")]

use std::io::Write;

use devents::{DuplicatePolicy, Emitter, EmitterOptions};
use devents_config::Config;
use devents_telemetry::LogConfig;
use devents_test::{Recorder, init_test_logging, noop};
use serde_json::json;

#[test]
fn test_emitter_from_config_file() {
    init_test_logging();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [emitter]
        duplicates = "reject"
        listen_id_prefix = "obj"
        all_channel = "*"

        [logging]
        level = "debug"
        directives = ["devents=trace"]
        "#
    )
    .unwrap();

    let config = Config::load_file(file.path()).unwrap();
    let options = EmitterOptions::from(&config.emitter);
    assert_eq!(options.duplicates, DuplicatePolicy::Reject);

    let log_config = LogConfig::from(&config.logging);
    assert_eq!(log_config.level, "debug");
    assert_eq!(log_config.directives, vec!["devents=trace"]);

    let (a, b) = (Emitter::with_options(options), Emitter::new());
    let recorder = Recorder::new();
    a.on("*", &recorder.callback("star"), None).unwrap();
    a.trigger("x", &[]);
    assert_eq!(recorder.args_of("star"), vec![vec![json!("x")]]);

    a.listen_to(Some(&b), "y", &noop()).unwrap();
    assert!(a.listen_id().unwrap().as_str().starts_with("obj"));
}

#[test]
fn test_default_options_match_default_config() {
    let options = EmitterOptions::from(&Config::default().emitter);
    assert_eq!(options, EmitterOptions::default());
}
