use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::http::{ApiRequest, HttpClient};
use crate::models::{AuthType, Params, User};

/// How the user proves who they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Own { email: String, password: String },
    Facebook { access_token: String },
    /// Google sign-in completes through a redirect; the server reads its
    /// own session cookie.
    Google,
}

impl Credentials {
    pub fn own(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Own {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            Credentials::Own { .. } => AuthType::Own,
            Credentials::Facebook { .. } => AuthType::Facebook,
            Credentials::Google => AuthType::Google,
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("auth_type".into(), json!(self.auth_type().as_str()));
        match self {
            Credentials::Own { email, password } => {
                params.insert("email".into(), json!(email));
                params.insert("password".into(), json!(password));
            }
            Credentials::Facebook { access_token } => {
                params.insert("facebook_access_token".into(), json!(access_token));
            }
            Credentials::Google => {}
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub credentials: Credentials,
    pub first_name: String,
    pub last_name: String,
    pub should_subscribe: bool,
}

impl Registration {
    pub fn to_params(&self) -> Params {
        let mut params = self.credentials.to_params();
        if matches!(self.credentials, Credentials::Own { .. }) {
            params.insert("first_name".into(), json!(self.first_name));
            params.insert("last_name".into(), json!(self.last_name));
        }
        if self.should_subscribe {
            params.insert("should_subscribe".into(), json!(true));
        }
        params
    }
}

/// Result of `/api/login` and `/api/register`. The server answers either
/// with the signed-in user or with a sentinel string.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(Box<User>),
    CredentialsMissing,
    CredentialsInvalid,
    EmailNotFound,
    /// The email belongs to an account using another sign-in method.
    EmailExists(AuthType),
    BadPassword,
}

impl AuthOutcome {
    pub fn from_data(data: Value) -> ApiResult<Self> {
        if data.get("uid").is_some() {
            return Ok(AuthOutcome::Authenticated(Box::new(serde_json::from_value(
                data,
            )?)));
        }
        match data {
            Value::String(code) => Self::from_code(&code),
            other => Err(ApiError::contract(format!(
                "unrecognized auth response: {other}"
            ))),
        }
    }

    pub fn from_code(code: &str) -> ApiResult<Self> {
        match code {
            "credentials_missing" => Ok(AuthOutcome::CredentialsMissing),
            "credentials_invalid" => Ok(AuthOutcome::CredentialsInvalid),
            "email_not_found" => Ok(AuthOutcome::EmailNotFound),
            "bad_password" => Ok(AuthOutcome::BadPassword),
            _ => match code.split_once(':') {
                Some(("email_exists", auth_type)) => auth_type
                    .parse()
                    .map(AuthOutcome::EmailExists)
                    .map_err(ApiError::ContractViolation),
                _ => Err(ApiError::contract(format!(
                    "unrecognized auth response: {code:?}"
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Changed,
    InvalidToken,
    BadPassword,
}

pub struct Auth<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Auth<'a> {
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthOutcome> {
        let data: Value = self
            .http
            .send(ApiRequest::post("login").params(credentials.to_params()))
            .await?;
        AuthOutcome::from_data(data)
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthOutcome> {
        let data: Value = self
            .http
            .send(ApiRequest::post("register").params(registration.to_params()))
            .await?;
        AuthOutcome::from_data(data)
    }

    /// Returns whether a reset email went out.
    pub async fn send_password_reset(&self, email: &str) -> ApiResult<bool> {
        let data: Value = self
            .http
            .send(ApiRequest::get("forgot_password").query("email", email))
            .await?;
        Ok(data.as_str() == Some("sent"))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<ResetOutcome> {
        let data: String = self
            .http
            .send(
                ApiRequest::post("reset_password")
                    .body(json!({"token": token, "new_password": new_password}))?,
            )
            .await?;
        match data.as_str() {
            "changed" => Ok(ResetOutcome::Changed),
            "invalid_token" => Ok(ResetOutcome::InvalidToken),
            "bad_password" => Ok(ResetOutcome::BadPassword),
            other => Err(ApiError::contract(format!(
                "unrecognized reset response: {other:?}"
            ))),
        }
    }

    /// Link that starts Google sign-in and comes back to `redirect` with
    /// `google_login=true` as its query.
    pub async fn google_login_link(&self, redirect: &str) -> ApiResult<String> {
        let redirect = google_return_url(redirect);
        self.http
            .send(ApiRequest::get("get_google_login_link").query("redirect", redirect))
            .await
    }
}

fn google_return_url(redirect: &str) -> String {
    let (without_fragment, fragment) = match redirect.split_once('#') {
        Some((head, tail)) => (head, Some(tail)),
        None => (redirect, None),
    };
    let base = without_fragment
        .split_once('?')
        .map(|(head, _)| head)
        .unwrap_or(without_fragment);
    match fragment {
        Some(fragment) => format!("{base}?google_login=true#{fragment}"),
        None => format!("{base}?google_login=true"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_parse() {
        assert_eq!(
            AuthOutcome::from_data(json!("credentials_invalid")).unwrap(),
            AuthOutcome::CredentialsInvalid
        );
        assert_eq!(
            AuthOutcome::from_data(json!("email_exists:google")).unwrap(),
            AuthOutcome::EmailExists(AuthType::Google)
        );
        assert!(AuthOutcome::from_data(json!("email_exists:myspace"))
            .unwrap_err()
            .is_contract_violation());
        assert!(AuthOutcome::from_data(json!("surprise"))
            .unwrap_err()
            .is_contract_violation());
        assert!(AuthOutcome::from_data(json!(42))
            .unwrap_err()
            .is_contract_violation());
    }

    #[test]
    fn user_payload_is_authenticated() {
        let outcome =
            AuthOutcome::from_data(json!({"uid": "User_1", "is_admin": true})).unwrap();
        match outcome {
            AuthOutcome::Authenticated(user) => assert!(user.is_admin),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn registration_params() {
        let registration = Registration {
            credentials: Credentials::own("a@b.com", "hunter22"),
            first_name: "Ada".into(),
            last_name: "L".into(),
            should_subscribe: false,
        };
        let params = registration.to_params();
        assert_eq!(params["auth_type"], json!("own"));
        assert_eq!(params["first_name"], json!("Ada"));
        assert!(!params.contains_key("should_subscribe"));
    }

    #[test]
    fn google_return_url_replaces_query() {
        assert_eq!(
            google_return_url("https://msk.test/practices?x=1#login"),
            "https://msk.test/practices?google_login=true#login"
        );
        assert_eq!(
            google_return_url("/admin"),
            "/admin?google_login=true"
        );
    }
}
