use serde_json::Value;

use crate::error::ApiResult;
use crate::http::{ApiRequest, HttpClient};
use crate::models::{Comment, Feedback, Params, Subject, Vote};

pub struct Comments<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Comments<'a> {
    pub async fn fetch(&self, params: Params) -> ApiResult<Vec<Comment>> {
        let list: Option<Vec<Comment>> = self
            .http
            .send(ApiRequest::get("comments").query_params(params))
            .await?;
        Ok(list.unwrap_or_default())
    }

    /// Comments on a lesson or practice.
    pub async fn fetch_for(&self, subject: &Subject) -> ApiResult<Vec<Comment>> {
        self.fetch(subject.to_params()).await
    }

    pub async fn create(&self, subject: &Subject, body: &str) -> ApiResult<Comment> {
        let mut params = subject.to_params();
        params.insert("body".into(), Value::String(body.to_string()));
        self.http
            .send(ApiRequest::post("comments").params(params))
            .await
    }

    pub async fn delete(&self, uid: &str) -> ApiResult<()> {
        self.http
            .send::<Value>(ApiRequest::delete(format!("comments/{uid}")))
            .await?;
        Ok(())
    }
}

pub struct Votes<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Votes<'a> {
    /// The signed-in user's votes on `subject`.
    pub async fn fetch(&self, subject: &Subject) -> ApiResult<Vec<Vote>> {
        let list: Option<Vec<Vote>> = self
            .http
            .send(ApiRequest::get("votes").query_params(subject.to_params()))
            .await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn create(&self, subject: &Subject) -> ApiResult<Vote> {
        self.http
            .send(ApiRequest::post("votes").params(subject.to_params()))
            .await
    }

    pub async fn delete(&self, uid: &str) -> ApiResult<()> {
        self.http
            .send::<Value>(ApiRequest::delete(format!("votes/{uid}")))
            .await?;
        Ok(())
    }
}

pub struct FeedbackClient<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> FeedbackClient<'a> {
    pub async fn fetch(&self, params: Params) -> ApiResult<Vec<Feedback>> {
        let list: Option<Vec<Feedback>> = self
            .http
            .send(ApiRequest::get("feedback").query_params(params))
            .await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn create(&self, params: Params) -> ApiResult<Feedback> {
        self.http
            .send(ApiRequest::post("feedback").params(params))
            .await
    }
}

pub struct Email<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Email<'a> {
    /// Queues an email. Admin only on the server side.
    pub async fn create(&self, params: Params) -> ApiResult<Value> {
        self.http
            .send(ApiRequest::post("email").params(params))
            .await
    }

    pub async fn send_reflection(&self, params: Params) -> ApiResult<Value> {
        self.http
            .send(ApiRequest::post("send_reflection_email").params(params))
            .await
    }
}
