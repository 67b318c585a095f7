//! The signed-in identity for one application run.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::watch;

use crate::api::MskApi;
use crate::error::ApiResult;
use crate::models::User;

/// Receives identity events. The default implementation only logs them.
pub trait Analytics: Send + Sync {
    fn identify(&self, uid: &str);
    /// Profile properties recorded only the first time they are seen.
    fn set_once(&self, properties: Map<String, Value>);
    fn set(&self, properties: Map<String, Value>);
    /// Properties attached to every subsequent event.
    fn register(&self, properties: Map<String, Value>);
}

#[derive(Debug, Default)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn identify(&self, uid: &str) {
        tracing::info!(uid, "analytics identify");
    }

    fn set_once(&self, properties: Map<String, Value>) {
        tracing::debug!(?properties, "analytics set_once");
    }

    fn set(&self, properties: Map<String, Value>) {
        tracing::debug!(?properties, "analytics set");
    }

    fn register(&self, properties: Map<String, Value>) {
        tracing::debug!(?properties, "analytics register");
    }
}

/// Holds the current user and publishes every change to subscribers.
///
/// Cloning shares the same state. Views that depend on the user should
/// [`subscribe`](Session::subscribe) rather than assume it is already known.
#[derive(Clone)]
pub struct Session {
    api: MskApi,
    analytics: Arc<dyn Analytics>,
    current: Arc<watch::Sender<Option<User>>>,
}

impl Session {
    pub fn new(api: MskApi) -> Self {
        Self::with_analytics(api, Arc::new(TracingAnalytics))
    }

    pub fn with_analytics(api: MskApi, analytics: Arc<dyn Analytics>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            api,
            analytics,
            current: Arc::new(tx),
        }
    }

    pub fn api(&self) -> &MskApi {
        &self.api
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    /// Bootstraps the session from the identity seed the server embedded in
    /// the page (a user uid), or `None` for an anonymous visitor.
    ///
    /// Subscribers are notified only after the full record is loaded and
    /// its image resolved. A failed fetch leaves the session anonymous and
    /// is returned to the caller.
    pub async fn set_user(&self, seed: Option<&str>) -> ApiResult<Option<User>> {
        let Some(uid) = seed.filter(|uid| !uid.is_empty()) else {
            self.register_anonymous();
            return Ok(None);
        };

        let production = self.api.config().production;
        if production {
            self.analytics.identify(uid);
        }

        let Some(mut user) = self.api.users().get(uid).await? else {
            self.register_anonymous();
            return Ok(None);
        };

        if production {
            let mut once = Map::new();
            once.insert("$first_name".into(), json!(user.first_name));
            once.insert("$last_name".into(), json!(user.last_name));
            once.insert("$email".into(), json!(user.email));
            once.insert("$created".into(), json!(user.created));
            self.analytics.set_once(once);

            let mut every = Map::new();
            every.insert("$last_login".into(), json!(user.last_login));
            self.analytics.set(every);
        }

        let mut superproperties = Map::new();
        superproperties.insert("Signed In".into(), json!(true));
        superproperties.insert("Email".into(), json!(user.email));
        superproperties.insert("Admin".into(), json!(user.is_admin));
        superproperties.insert("Account Type".into(), json!(user.account_type()));
        self.analytics.register(superproperties);

        if let Some(image) = user.resolve_image() {
            user.image_url = Some(image);
        }

        tracing::info!(uid = %user.uid, admin = user.is_admin, "session user loaded");
        self.current.send_replace(Some(user.clone()));
        Ok(Some(user))
    }

    /// Replaces the held user, e.g. after a profile edit.
    pub fn replace_user(&self, user: Option<User>) {
        self.current.send_replace(user);
    }

    /// Drops the identity. Subscribers see `None`.
    pub fn clear(&self) {
        self.current.send_replace(None);
        self.register_anonymous();
    }

    fn register_anonymous(&self) {
        let mut properties = Map::new();
        properties.insert("Signed In".into(), json!(false));
        self.analytics.register(properties);
    }
}
