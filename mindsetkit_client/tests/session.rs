mod common;

use std::sync::{Arc, Mutex};

use common::{api_for, ok};
use mindsetkit_client::session::{Analytics, Session};
use mindsetkit_client::{ClientConfig, MskApi};
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(String, Value)>>,
}

impl Recorder {
    fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn last(&self, name: &str) -> Option<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(event, _)| event == name)
            .map(|(_, value)| value.clone())
    }

    fn push(&self, name: &str, value: Value) {
        self.events.lock().unwrap().push((name.to_string(), value));
    }
}

impl Analytics for Recorder {
    fn identify(&self, uid: &str) {
        self.push("identify", json!(uid));
    }

    fn set_once(&self, properties: Map<String, Value>) {
        self.push("set_once", Value::Object(properties));
    }

    fn set(&self, properties: Map<String, Value>) {
        self.push("set", Value::Object(properties));
    }

    fn register(&self, properties: Map<String, Value>) {
        self.push("register", Value::Object(properties));
    }
}

async fn mount_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users/User_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "uid": "User_1",
            "first_name": "Ada",
            "email": "ada@example.com",
            "is_admin": true,
            "facebook_id": "42",
            "_auth_id": "facebook:42"
        }))))
        .mount(server)
        .await;
}

#[tokio::test]
async fn subscribers_see_the_loaded_user() {
    let server = MockServer::start().await;
    mount_user(&server).await;

    let recorder = Arc::new(Recorder::default());
    let session = Session::with_analytics(api_for(&server), recorder.clone());
    let mut rx = session.subscribe();
    assert!(rx.borrow().is_none());

    let watcher = tokio::spawn(async move {
        rx.changed().await.unwrap();
        let user = rx.borrow().clone();
        user
    });

    let loaded = session.set_user(Some("User_1")).await.unwrap().unwrap();
    let seen = watcher.await.unwrap().unwrap();
    assert_eq!(seen.uid, "User_1");
    assert_eq!(
        seen.image_url.as_deref(),
        Some("//graph.facebook.com/42/picture?type=square")
    );
    assert_eq!(loaded, seen);
    assert!(session.is_signed_in());

    assert_eq!(recorder.names(), ["register"]);
    let supers = recorder.last("register").unwrap();
    assert_eq!(supers["Signed In"], json!(true));
    assert_eq!(supers["Admin"], json!(true));
    assert_eq!(supers["Account Type"], json!("facebook"));
}

#[tokio::test]
async fn production_reports_identity() {
    let server = MockServer::start().await;
    mount_user(&server).await;

    let mut config = ClientConfig::new(server.uri()).unwrap();
    config.production = true;
    let recorder = Arc::new(Recorder::default());
    let session = Session::with_analytics(MskApi::new(config).unwrap(), recorder.clone());

    session.set_user(Some("User_1")).await.unwrap();
    assert_eq!(recorder.names(), ["identify", "set_once", "set", "register"]);
    assert_eq!(recorder.last("identify"), Some(json!("User_1")));
}

#[tokio::test]
async fn anonymous_visitor_stays_signed_out() {
    let server = MockServer::start().await;
    let recorder = Arc::new(Recorder::default());
    let session = Session::with_analytics(api_for(&server), recorder.clone());

    assert_eq!(session.set_user(None).await.unwrap(), None);
    assert!(!session.is_signed_in());
    assert_eq!(recorder.last("register"), Some(json!({"Signed In": false})));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_fetch_leaves_session_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/User_1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = Session::new(api_for(&server));
    let rx = session.subscribe();
    assert!(session.set_user(Some("User_1")).await.is_err());
    assert!(!rx.has_changed().unwrap());
    assert!(session.current_user().is_none());
}
