use serde_json::Value;

use crate::error::ApiResult;
use crate::filters;
use crate::http::{ApiRequest, HttpClient};
use crate::models::{ContentItem, ContentKind, Params};
use crate::upload::{self, UploadFile};

pub struct Practices<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Practices<'a> {
    /// Lists practices. `params` goes out as the query string, e.g.
    /// `{pending, listed, promoted, order, page, mindset_tags}`.
    pub async fn find(&self, params: &Params) -> ApiResult<Vec<ContentItem>> {
        let list: Option<Vec<ContentItem>> = self
            .http
            .send(ApiRequest::get("practices").query_params(params.clone()))
            .await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn find_by_id(&self, uid: &str) -> ApiResult<ContentItem> {
        self.http
            .send(ApiRequest::get(format!("practices/{uid}")))
            .await
    }

    pub async fn fetch_popular(&self) -> ApiResult<Vec<ContentItem>> {
        self.http.send(ApiRequest::get("practices/popular")).await
    }

    pub async fn create(&self, params: Params) -> ApiResult<ContentItem> {
        self.http
            .send(ApiRequest::post("practices").params(params))
            .await
    }

    /// PUT restricted to the practice allow-list.
    pub async fn update(&self, uid: &str, params: &Params) -> ApiResult<ContentItem> {
        ContentKind::Practice.expect_uid(uid)?;
        let fields = filters::update_fields(ContentKind::Practice, params);
        self.http
            .send(ApiRequest::put(format!("practices/{uid}")).params(fields))
            .await
    }

    pub async fn delete(&self, uid: &str) -> ApiResult<()> {
        ContentKind::Practice.expect_uid(uid)?;
        self.http
            .send::<Value>(ApiRequest::delete(format!("practices/{uid}")))
            .await?;
        Ok(())
    }

    /// Links a practice to a theme, topic or lesson.
    pub async fn associate_content(&self, practice: &str, content: &str) -> ApiResult<ContentItem> {
        ContentKind::from_uid(content)?;
        let mut params = Params::new();
        params.insert(
            "associated_content".to_string(),
            Value::String(content.to_string()),
        );
        self.update(practice, &params).await
    }

    pub async fn upload_url(&self) -> ApiResult<String> {
        self.http.send(ApiRequest::get("practices/upload_url")).await
    }

    /// Uploads one file and returns the practice with its updated file list.
    pub async fn upload_file(
        &self,
        practice: &str,
        file: &UploadFile,
        fields: Params,
    ) -> ApiResult<ContentItem> {
        ContentKind::Practice.expect_uid(practice)?;
        let mut fields = fields;
        fields.insert(
            "practice_id".to_string(),
            Value::String(practice.to_string()),
        );
        let url = self.upload_url().await?;
        upload::upload_to(self.http, &url, file, &fields).await
    }

    /// Uploads files one at a time. Every upload rewrites the practice's file
    /// list, so they must not overlap.
    pub async fn upload_files(
        &self,
        practice: &str,
        files: &[UploadFile],
    ) -> ApiResult<Option<ContentItem>> {
        let updated = upload::upload_sequentially(files, |file| {
            self.upload_file(practice, file, Params::new())
        })
        .await?;
        Ok(updated.into_iter().last())
    }

    /// Deletes a stored file. The object name is encoded once here and again
    /// by the query string; the server decodes both.
    pub async fn remove_file(&self, practice: &str, gs_object_name: &str) -> ApiResult<ContentItem> {
        let encoded = urlencoding::encode(gs_object_name).into_owned();
        self.http
            .send(ApiRequest::get(format!("practices/{practice}/remove_file")).query("file", encoded))
            .await
    }
}
