use crate::error::ApiResult;
use crate::http::{ApiRequest, HttpClient};
use crate::models::{ContentItem, Params, User, Vote};
use crate::upload::{self, UploadFile};

pub struct Users<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Users<'a> {
    pub async fn get(&self, uid: &str) -> ApiResult<Option<User>> {
        self.http
            .send(ApiRequest::get(format!("users/{uid}")))
            .await
    }

    pub async fn update(&self, uid: &str, params: Params) -> ApiResult<User> {
        self.http
            .send(ApiRequest::put(format!("users/{uid}")).params(params))
            .await
    }

    pub async fn fetch_practices(&self, uid: &str, page: u32) -> ApiResult<Vec<ContentItem>> {
        let list: Option<Vec<ContentItem>> = self
            .http
            .send(ApiRequest::get(format!("users/{uid}/practices")).query("page", page))
            .await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn fetch_votes(&self, uid: &str, page: u32) -> ApiResult<Vec<Vote>> {
        let list: Option<Vec<Vote>> = self
            .http
            .send(ApiRequest::get(format!("users/{uid}/votes")).query("page", page))
            .await?;
        Ok(list.unwrap_or_default())
    }

    pub async fn upload_image_url(&self) -> ApiResult<String> {
        self.http
            .send(ApiRequest::get("users/upload_image_url"))
            .await
    }

    /// Uploads a profile image for the signed-in user.
    pub async fn upload_image(&self, file: &UploadFile) -> ApiResult<User> {
        let url = self.upload_image_url().await?;
        upload::upload_to(self.http, &url, file, &Params::new()).await
    }
}
