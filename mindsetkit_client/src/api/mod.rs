mod auth;
mod community;
mod content;
mod mindsetmeter;
mod practices;
mod users;

pub use auth::{Auth, AuthOutcome, Credentials, Registration, ResetOutcome};
pub use community::{Comments, Email, FeedbackClient, Votes};
pub use content::{Content, ContentResource};
pub use mindsetmeter::{code_path, Assessments, Surveys};
pub use practices::Practices;
pub use users::Users;

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::ContentKind;

/// Entry point to every resource client. Cheap to clone.
#[derive(Clone)]
pub struct MskApi {
    http: HttpClient,
}

impl MskApi {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth { http: &self.http }
    }

    pub fn users(&self) -> Users<'_> {
        Users { http: &self.http }
    }

    pub fn content(&self) -> Content<'_> {
        Content { http: &self.http }
    }

    pub fn resource(&self, kind: ContentKind) -> ContentResource<'_> {
        ContentResource {
            content: self.content(),
            kind,
        }
    }

    pub fn themes(&self) -> ContentResource<'_> {
        self.resource(ContentKind::Theme)
    }

    pub fn topics(&self) -> ContentResource<'_> {
        self.resource(ContentKind::Topic)
    }

    pub fn lessons(&self) -> ContentResource<'_> {
        self.resource(ContentKind::Lesson)
    }

    pub fn practices(&self) -> Practices<'_> {
        Practices { http: &self.http }
    }

    pub fn comments(&self) -> Comments<'_> {
        Comments { http: &self.http }
    }

    pub fn votes(&self) -> Votes<'_> {
        Votes { http: &self.http }
    }

    pub fn feedback(&self) -> FeedbackClient<'_> {
        FeedbackClient { http: &self.http }
    }

    pub fn email(&self) -> Email<'_> {
        Email { http: &self.http }
    }

    pub fn assessments(&self) -> Assessments<'_> {
        Assessments { http: &self.http }
    }

    pub fn surveys(&self) -> Surveys<'_> {
        Surveys { http: &self.http }
    }
}
