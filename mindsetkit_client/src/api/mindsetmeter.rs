use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::http::{ApiRequest, HttpClient};
use crate::models::{Assessment, NewAssessment, NewSurvey, Params, Survey};

pub struct Assessments<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Assessments<'a> {
    /// The server caps this at 20 unless `n` is given.
    pub async fn fetch_all(&self) -> ApiResult<Vec<Assessment>> {
        let list: Option<Vec<Assessment>> =
            self.http.send(ApiRequest::get("assessments")).await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn create(&self, assessment: &NewAssessment) -> ApiResult<Assessment> {
        self.http
            .send(ApiRequest::post("assessments").body(assessment)?)
            .await
    }

    pub async fn update(&self, uid: &str, params: Params) -> ApiResult<Assessment> {
        self.http
            .send(ApiRequest::put(format!("assessments/{uid}")).params(params))
            .await
    }

    pub async fn update_description(&self, uid: &str, description: &str) -> ApiResult<Assessment> {
        let mut params = Params::new();
        params.insert("description".into(), json!(description));
        self.update(uid, params).await
    }
}

pub struct Surveys<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Surveys<'a> {
    /// Surveys owned by the signed-in user, optionally filtered.
    pub async fn fetch(&self, params: Params) -> ApiResult<Vec<Survey>> {
        let list: Option<Vec<Survey>> = self
            .http
            .send(ApiRequest::get("surveys").query_params(params))
            .await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn create(&self, survey: &NewSurvey) -> ApiResult<Survey> {
        self.http
            .send(ApiRequest::post("surveys").body(survey)?)
            .await
    }

    pub async fn update(&self, uid: &str, params: Params) -> ApiResult<Survey> {
        self.http
            .send(ApiRequest::put(format!("surveys/{uid}")).params(params))
            .await
    }

    /// Saves free-form properties. The server stores them as a JSON string.
    pub async fn update_json_properties(&self, uid: &str, properties: &Params) -> ApiResult<Survey> {
        let mut params = Params::new();
        params.insert(
            "json_properties".into(),
            Value::String(serde_json::to_string(properties)?),
        );
        self.update(uid, params).await
    }

    pub async fn delete(&self, uid: &str) -> ApiResult<()> {
        self.http
            .send::<Value>(ApiRequest::delete(format!("surveys/{uid}")))
            .await?;
        Ok(())
    }

    /// Looks a survey up by entry code such as `"epic shark"`.
    pub async fn fetch_by_code(&self, code: &str) -> ApiResult<Option<Survey>> {
        self.http
            .send(ApiRequest::get(format!("survey_codes/{}", code_path(code))))
            .await
    }

    /// Hashes a participant identifier before it leaves for the survey site.
    pub async fn hash_mm_id(&self, id: &str) -> ApiResult<String> {
        self.http
            .send(ApiRequest::post("hash_mm_id").body(json!({ "id": id }))?)
            .await
    }
}

/// Entry codes travel with hyphens in place of spaces.
pub fn code_path(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join("-")
}
