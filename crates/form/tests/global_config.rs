//! Exercises the process-wide default. Kept in its own test binary so no
//! other test observes the swapped configuration.

use nebula_form::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn configure_affects_forms_built_afterwards() {
    let before = Form::default().field(field("id").unwrap());

    configure(
        FormConfig::default()
            .with_data_sources(["query", "body"])
            .with_pass_through(true),
    );
    assert_eq!(default_config().data_sources, ["query", "body"]);

    let after = Form::default().field(field("id").unwrap());

    let sources = DataSources::new()
        .with("body", json!({"id": "body"}))
        .with("query", json!({"id": "query", "page": 3}));

    let report = before.run_blocking(&sources).unwrap();
    assert_eq!(report.values, json!({"id": "body"}));

    let report = after.run_blocking(&sources).unwrap();
    assert_eq!(report.values, json!({"id": "query", "page": 3}));
}
