#![allow(dead_code)]

use mindsetkit_client::{ClientConfig, MskApi};
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn api_for(server: &MockServer) -> MskApi {
    let config = ClientConfig::new(server.uri()).expect("config");
    MskApi::new(config).expect("client")
}

/// Successful `{error, data}` body.
pub fn ok(data: Value) -> Value {
    json!({ "error": false, "data": data })
}

pub fn failed(message: &str) -> Value {
    json!({ "error": true, "data": null, "message": message })
}

pub fn practice(n: usize) -> Value {
    json!({
        "uid": format!("Practice_{n}"),
        "short_uid": format!("p{n}"),
        "name": format!("Practice {n}"),
        "summary": "A practice",
        "listed": true
    })
}

pub fn practices(range: std::ops::Range<usize>) -> Value {
    Value::Array(range.map(practice).collect())
}
