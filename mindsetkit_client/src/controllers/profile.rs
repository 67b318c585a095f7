use serde_json::json;

use crate::api::MskApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{ContentItem, Params, User, Vote};
use crate::pagination::PageList;
use crate::upload::UploadFile;

pub const DUPLICATE_EMAIL: &str = "Email already in use.";
pub const INVALID_USERNAME: &str = "Username can only contain letters, numbers, _'s and -'s.";
pub const DUPLICATE_USERNAME: &str = "Username already in use.";
pub const BAD_DATA: &str = "Error with data. Try again.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const WEAK_PASSWORD: &str = "At least 8 characters, ASCII only.";
pub const IMAGE_UPLOAD_FAILED: &str = "Error uploading image, try another.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    Practices,
    Likes,
}

/// Maps a rejected profile update to the message shown on the form.
pub fn profile_error_message(server_message: &str) -> &'static str {
    if server_message.contains("DuplicateEmail") {
        DUPLICATE_EMAIL
    } else if server_message.contains("InvalidUsername") {
        INVALID_USERNAME
    } else if server_message.contains("DuplicateUsername") {
        DUPLICATE_USERNAME
    } else if server_message.contains("BadPassword") {
        WEAK_PASSWORD
    } else {
        BAD_DATA
    }
}

/// A user's profile page: their practices or likes, and the edit form
/// when it is their own.
pub struct Profile {
    api: MskApi,
    user: User,
    pub result_type: ResultType,
    pub loading: bool,
    pub updating: bool,
    pub error_message: String,
    practices: PageList<ContentItem>,
    likes: PageList<Vote>,
}

impl Profile {
    pub fn new(api: MskApi, user: User) -> Self {
        let page_size = api.config().page_size;
        Self {
            api,
            user,
            result_type: ResultType::Practices,
            loading: false,
            updating: false,
            error_message: String::new(),
            practices: PageList::new(page_size),
            likes: PageList::new(page_size),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn practices(&self) -> &PageList<ContentItem> {
        &self.practices
    }

    pub fn likes(&self) -> &PageList<Vote> {
        &self.likes
    }

    pub fn should_paginate(&self) -> bool {
        match self.result_type {
            ResultType::Practices => self.practices.should_paginate(),
            ResultType::Likes => self.likes.should_paginate(),
        }
    }

    pub async fn set_result_type(&mut self, result_type: ResultType) -> ApiResult<()> {
        self.result_type = result_type;
        self.practices.reset();
        self.likes.reset();
        self.fetch_page(0).await
    }

    pub async fn load_more(&mut self) -> ApiResult<()> {
        let page = match self.result_type {
            ResultType::Practices => self.practices.advance(),
            ResultType::Likes => self.likes.advance(),
        };
        self.fetch_page(page).await
    }

    async fn fetch_page(&mut self, page: u32) -> ApiResult<()> {
        self.loading = true;
        let users = self.api.users();
        let result = match self.result_type {
            ResultType::Practices => users
                .fetch_practices(&self.user.uid, page)
                .await
                .map(|batch| self.practices.receive(page, batch)),
            ResultType::Likes => users
                .fetch_votes(&self.user.uid, page)
                .await
                .map(|batch| self.likes.receive(page, batch)),
        };
        self.loading = false;
        result
    }

    pub async fn delete_practice(&mut self, uid: &str) -> ApiResult<()> {
        self.api.practices().delete(uid).await?;
        self.practices.items_mut().retain(|practice| practice.uid != uid);
        Ok(())
    }

    /// Saves the editable profile fields. Known server rejections become
    /// `error_message`; returns whether the save went through.
    pub async fn update_info(&mut self, receives_updates: bool) -> ApiResult<bool> {
        let mut params = Params::new();
        params.insert("first_name".into(), json!(self.user.first_name));
        params.insert("last_name".into(), json!(self.user.last_name));
        params.insert("email".into(), json!(self.user.email));
        params.insert("username".into(), json!(self.user.username));
        params.insert("short_bio".into(), json!(self.user.short_bio));
        params.insert("receives_updates".into(), json!(receives_updates));
        self.save(params).await
    }

    pub async fn update_password(&mut self, password: &str, repeat: &str) -> ApiResult<bool> {
        self.error_message.clear();
        if password != repeat {
            self.error_message = PASSWORD_MISMATCH.to_string();
            return Ok(false);
        }
        let mut params = Params::new();
        if !password.is_empty() {
            params.insert("password".into(), json!(password));
        }
        self.save(params).await
    }

    async fn save(&mut self, params: Params) -> ApiResult<bool> {
        self.error_message.clear();
        self.updating = true;
        let result = self.api.users().update(&self.user.uid, params).await;
        self.updating = false;
        match result {
            Ok(user) => {
                self.user = user;
                Ok(true)
            }
            Err(ApiError::Application { message }) => {
                self.error_message = profile_error_message(&message).to_string();
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn upload_image(&mut self, file: &UploadFile) -> ApiResult<bool> {
        match self.api.users().upload_image(file).await {
            Ok(user) => {
                self.user = user;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile image upload failed");
                self.error_message = IMAGE_UPLOAD_FAILED.to_string();
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages() {
        assert_eq!(profile_error_message("DuplicateEmail: a@b.c"), DUPLICATE_EMAIL);
        assert_eq!(profile_error_message("InvalidUsername"), INVALID_USERNAME);
        assert_eq!(profile_error_message("DuplicateUsername"), DUPLICATE_USERNAME);
        assert_eq!(profile_error_message("BadPassword"), WEAK_PASSWORD);
        assert_eq!(profile_error_message("boom"), BAD_DATA);
    }
}
