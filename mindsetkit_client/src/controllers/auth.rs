use reqwest::StatusCode;

use crate::api::{AuthOutcome, Credentials, MskApi, Registration, ResetOutcome};
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthType, User};

use super::GENERIC_ERROR;

pub const INVALID_CREDENTIALS: &str = "Unrecognized email or password.";
pub const FACEBOOK_UNUSABLE: &str =
    "We're unable to use your Facebook account to sign you up. Please use another method.";
pub const BAD_PASSWORD: &str = "Password must be at least 8 characters, ASCII only.";
pub const DOMAIN_BLOCKED: &str = "We no longer accept accounts from this domain.";
pub const RESET_SENT: &str = "We have sent you an email to reset your password. If it does \
                              not arrive, please check your spam folder and mark as 'not spam'.";
pub const RESET_UNKNOWN_EMAIL: &str = "We have no record of that email address.";

/// Where to go after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    To(String),
    Reload,
}

/// Advice shown when an email is registered under another method.
pub fn email_exists_message(existing: AuthType) -> String {
    let method = match existing {
        AuthType::Own => "logging in with your email and password",
        AuthType::Google => "using your Google account",
        AuthType::Facebook => "using your Facebook account",
    };
    format!("You already have an account with us. Try {method}.")
}

enum FollowUp {
    Done,
    Login,
    Register,
}

/// Login and sign-up modal state.
pub struct AuthForm {
    api: MskApi,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub should_subscribe: bool,
    /// Where to send the user after signing in, if not the default.
    pub return_to: Option<String>,
    pub auth_type: Option<AuthType>,
    pub error_message: String,
    pub success_message: String,
    pub loading: bool,
    pub oauthing: bool,
    pub redirect: Option<Redirect>,
    pub user: Option<User>,
}

impl AuthForm {
    pub fn new(api: MskApi) -> Self {
        Self {
            api,
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            should_subscribe: true,
            return_to: None,
            auth_type: None,
            error_message: String::new(),
            success_message: String::new(),
            loading: false,
            oauthing: false,
            redirect: None,
            user: None,
        }
    }

    pub async fn login(&mut self) -> ApiResult<()> {
        self.loading = true;
        self.auth_type = Some(AuthType::Own);
        self.error_message.clear();
        let credentials = Credentials::own(self.email.clone(), self.password.clone());
        match self.api.auth().login(&credentials).await {
            Ok(outcome) => self.after_login(outcome).map(|_| ()),
            Err(err) => Err(self.request_failed(err)),
        }
    }

    pub async fn register(&mut self) -> ApiResult<()> {
        self.loading = true;
        self.auth_type = Some(AuthType::Own);
        self.error_message.clear();
        let registration = Registration {
            credentials: Credentials::own(self.email.clone(), self.password.clone()),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            should_subscribe: self.should_subscribe,
        };
        match self.api.auth().register(&registration).await {
            Ok(outcome) => self.after_register(outcome).map(|_| ()),
            Err(err) => self.register_failed(err),
        }
    }

    /// Signs in with a Facebook token, registering if there is no account
    /// yet. Switches between the two at most once.
    pub async fn facebook_login(&mut self, access_token: &str) -> ApiResult<()> {
        self.facebook(access_token, FollowUp::Login).await
    }

    pub async fn facebook_register(&mut self, access_token: &str) -> ApiResult<()> {
        self.facebook(access_token, FollowUp::Register).await
    }

    async fn facebook(&mut self, access_token: &str, first: FollowUp) -> ApiResult<()> {
        self.auth_type = Some(AuthType::Facebook);
        self.error_message.clear();
        self.oauthing = true;
        let credentials = Credentials::Facebook {
            access_token: access_token.to_string(),
        };

        let mut next = first;
        for _ in 0..2 {
            let step = match next {
                FollowUp::Done => return Ok(()),
                FollowUp::Login => match self.api.auth().login(&credentials).await {
                    Ok(outcome) => self.after_login(outcome)?,
                    Err(err) => return Err(self.request_failed(err)),
                },
                FollowUp::Register => {
                    let registration = Registration {
                        credentials: credentials.clone(),
                        first_name: String::new(),
                        last_name: String::new(),
                        should_subscribe: self.should_subscribe,
                    };
                    match self.api.auth().register(&registration).await {
                        Ok(outcome) => self.after_register(outcome)?,
                        Err(err) => {
                            self.register_failed(err)?;
                            FollowUp::Done
                        }
                    }
                }
            };
            next = step;
        }
        if !matches!(next, FollowUp::Done) {
            self.oauthing = false;
            self.loading = false;
            return Err(ApiError::contract(
                "facebook sign-in kept alternating between login and register",
            ));
        }
        Ok(())
    }

    /// Requests a reset email for `self.email`.
    pub async fn send_password_reset(&mut self) -> ApiResult<()> {
        self.error_message.clear();
        self.success_message.clear();
        match self.api.auth().send_password_reset(&self.email).await {
            Ok(true) => {
                self.success_message = RESET_SENT.to_string();
                Ok(())
            }
            Ok(false) => {
                self.error_message = RESET_UNKNOWN_EMAIL.to_string();
                Ok(())
            }
            Err(err) => Err(self.request_failed(err)),
        }
    }

    fn after_login(&mut self, outcome: AuthOutcome) -> ApiResult<FollowUp> {
        match outcome {
            AuthOutcome::Authenticated(user) => {
                self.signed_in(*user);
                Ok(FollowUp::Done)
            }
            AuthOutcome::EmailNotFound => {
                self.fail_with(FACEBOOK_UNUSABLE);
                Ok(FollowUp::Done)
            }
            AuthOutcome::CredentialsMissing => {
                self.oauthing = false;
                Err(ApiError::contract("login answered credentials_missing"))
            }
            AuthOutcome::CredentialsInvalid => match self.auth_type {
                Some(AuthType::Facebook) => Ok(FollowUp::Register),
                _ => {
                    self.fail_with(INVALID_CREDENTIALS);
                    Ok(FollowUp::Done)
                }
            },
            AuthOutcome::EmailExists(existing) => {
                self.fail_with(&email_exists_message(existing));
                Ok(FollowUp::Done)
            }
            AuthOutcome::BadPassword => {
                self.oauthing = false;
                Err(ApiError::contract("login answered bad_password"))
            }
        }
    }

    fn after_register(&mut self, outcome: AuthOutcome) -> ApiResult<FollowUp> {
        match outcome {
            AuthOutcome::Authenticated(user) => {
                self.signed_in(*user);
                Ok(FollowUp::Done)
            }
            AuthOutcome::CredentialsMissing | AuthOutcome::EmailNotFound => {
                if self.auth_type == Some(AuthType::Facebook) {
                    self.fail_with(FACEBOOK_UNUSABLE);
                    Ok(FollowUp::Done)
                } else {
                    self.loading = false;
                    self.oauthing = false;
                    Err(ApiError::contract("register answered credentials_missing"))
                }
            }
            AuthOutcome::BadPassword => {
                self.fail_with(BAD_PASSWORD);
                Ok(FollowUp::Done)
            }
            AuthOutcome::EmailExists(existing) => {
                self.loading = false;
                match (existing, self.auth_type) {
                    (AuthType::Facebook, Some(AuthType::Facebook)) => Ok(FollowUp::Login),
                    (AuthType::Google, Some(AuthType::Google)) => {
                        self.oauthing = false;
                        Err(ApiError::contract(
                            "google registration reported an existing google account",
                        ))
                    }
                    _ => {
                        self.fail_with(&email_exists_message(existing));
                        Ok(FollowUp::Done)
                    }
                }
            }
            AuthOutcome::CredentialsInvalid => {
                self.loading = false;
                self.oauthing = false;
                Err(ApiError::contract("register answered credentials_invalid"))
            }
        }
    }

    fn register_failed(&mut self, err: ApiError) -> ApiResult<()> {
        if err.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
            self.fail_with(DOMAIN_BLOCKED);
            return Ok(());
        }
        Err(self.request_failed(err))
    }

    fn signed_in(&mut self, user: User) {
        let redirect = match &self.return_to {
            Some(target) => Redirect::To(target.clone()),
            None if user.is_admin => Redirect::To("/admin".to_string()),
            None => Redirect::Reload,
        };
        tracing::info!(uid = %user.uid, ?redirect, "signed in");
        self.redirect = Some(redirect);
        self.user = Some(user);
    }

    fn fail_with(&mut self, message: &str) {
        self.loading = false;
        self.oauthing = false;
        self.error_message = message.to_string();
    }

    fn request_failed(&mut self, err: ApiError) -> ApiError {
        self.fail_with(GENERIC_ERROR);
        err
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    ValidToken,
    InvalidToken,
    PasswordChanged,
}

/// Page reached from a password reset email.
pub struct ResetPasswordForm {
    api: MskApi,
    token: String,
    pub mode: ResetMode,
    pub new_password: String,
    pub repeat_password: String,
    pub password_mismatch: bool,
    pub bad_password: bool,
}

impl ResetPasswordForm {
    pub fn new(api: MskApi, token: impl Into<String>, valid_token: bool) -> Self {
        Self {
            api,
            token: token.into(),
            mode: if valid_token {
                ResetMode::ValidToken
            } else {
                ResetMode::InvalidToken
            },
            new_password: String::new(),
            repeat_password: String::new(),
            password_mismatch: false,
            bad_password: false,
        }
    }

    pub fn passwords_match(&self) -> bool {
        !self.new_password.is_empty() && self.new_password == self.repeat_password
    }

    pub async fn reset_password(&mut self) -> ApiResult<()> {
        self.password_mismatch = false;
        self.bad_password = false;
        if !self.passwords_match() {
            self.password_mismatch = true;
            return Ok(());
        }
        match self
            .api
            .auth()
            .reset_password(&self.token, &self.new_password)
            .await?
        {
            ResetOutcome::Changed => self.mode = ResetMode::PasswordChanged,
            ResetOutcome::InvalidToken => self.mode = ResetMode::InvalidToken,
            ResetOutcome::BadPassword => self.bad_password = true,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_exists_copy() {
        assert_eq!(
            email_exists_message(AuthType::Google),
            "You already have an account with us. Try using your Google account."
        );
    }
}
