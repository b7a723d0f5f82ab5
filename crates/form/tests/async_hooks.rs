use std::sync::{Arc, Mutex};
use std::time::Duration;

use nebula_form::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn errors_keep_declaration_order_regardless_of_completion() {
    let finished = Arc::new(Mutex::new(Vec::new()));

    let slow = Arc::clone(&finished);
    let a = field("a").unwrap().custom_async(move |_, _| {
        let finished = Arc::clone(&slow);
        async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            finished.lock().unwrap().push("a");
            CustomOutcome::fail("%s failed late")
        }
    });

    let fast = Arc::clone(&finished);
    let b = field("b").unwrap().custom_async(move |_, _| {
        let finished = Arc::clone(&fast);
        async move {
            finished.lock().unwrap().push("b");
            CustomOutcome::fail("%s failed early")
        }
    });

    let sources = DataSources::new().with("body", json!({"a": "1", "b": "2"}));
    let report = Form::new(FormConfig::default())
        .field(a)
        .field(b)
        .run(&sources)
        .await
        .unwrap();

    assert_eq!(*finished.lock().unwrap(), ["b", "a"]);
    let messages: Vec<_> = report.errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["a failed late", "b failed early"]);
}

#[tokio::test]
async fn sync_failure_before_async_failure_in_declaration_order() {
    let a = field("a").unwrap().is_int();
    let b = field("b").unwrap().custom_async(|_, _| async {
        CustomOutcome::fail("%s rejected")
    });

    let sources = DataSources::new().with("body", json!({"a": "x", "b": "y"}));
    let report = Form::new(FormConfig::default())
        .field(a)
        .field(b)
        .run(&sources)
        .await
        .unwrap();

    let codes: Vec<_> = report.errors.iter().map(|e| &*e.code).collect();
    assert_eq!(codes, ["isInt", "customAsync"]);
}

#[tokio::test]
async fn async_hook_replacement_feeds_later_operations() {
    let username = field("username")
        .unwrap()
        .trim()
        .custom_async(|value, _| async move {
            tokio::task::yield_now().await;
            let taken = value.as_str() == Some("admin");
            if taken {
                CustomOutcome::fail("%s is already taken")
            } else {
                CustomOutcome::Replace(json!(format!("@{}", value.as_str().unwrap_or_default())))
            }
        })
        .min_length(4);

    let form = Form::new(FormConfig::default()).field(username);

    let report = form
        .run(&DataSources::new().with("body", json!({"username": " ada "})))
        .await
        .unwrap();
    assert_eq!(report.values["username"], json!("@ada"));
    assert!(report.is_valid());

    let report = form
        .run(&DataSources::new().with("body", json!({"username": "admin"})))
        .await
        .unwrap();
    assert_eq!(report.errors[0].message, "username is already taken");
}

#[tokio::test]
async fn async_hook_sees_merged_raw_source() {
    let city = field("city").unwrap().custom_async(|value, source| async move {
        let country = source["country"].as_str().unwrap_or_default().to_owned();
        if country == "NL" && value == json!("Paris") {
            CustomOutcome::fail("%s is not in the selected country")
        } else {
            CustomOutcome::Unchanged
        }
    });

    let sources = DataSources::new()
        .with("body", json!({"city": "Paris"}))
        .with("query", json!({"country": "NL"}));
    let report = Form::new(FormConfig::default())
        .field(city)
        .run(&sources)
        .await
        .unwrap();

    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn empty_optional_field_skips_async_failure() {
    let nickname = || {
        field("nickname")
            .unwrap()
            .custom_async(|_, _| async { CustomOutcome::fail("%s is banned") })
    };

    let report = Form::new(FormConfig::default())
        .field(nickname())
        .run(&DataSources::new())
        .await
        .unwrap();
    assert!(report.is_valid());

    let report = Form::new(FormConfig::default())
        .field(nickname().validate_custom_if_empty())
        .run(&DataSources::new())
        .await
        .unwrap();
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn broadcast_awaits_each_element() {
    let tags = field("tags")
        .unwrap()
        .array()
        .custom_async(|value, _| async move {
            tokio::task::yield_now().await;
            CustomOutcome::Replace(json!(value.as_str().unwrap_or_default().len()))
        });

    let report = Form::new(FormConfig::default())
        .field(tags)
        .run(&DataSources::new().with("body", json!({"tags": ["a", "bbb", "cc"]})))
        .await
        .unwrap();
    assert_eq!(report.values["tags"], json!([1, 3, 2]));
}
