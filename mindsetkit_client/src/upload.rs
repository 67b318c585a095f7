//! Two-step file upload: ask the API for a one-time upload URL, then send the
//! bytes straight to it.

use std::future::Future;
use std::path::Path;

use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::http::{settle, HttpClient};
use crate::models::Params;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, sniffing its type from the leading bytes.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_MIME.to_string());
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={};", self.name)
    }
}

/// Sends `file` as multipart form data to an upload URL handed out by the
/// server, with `fields` as extra form fields.
pub async fn upload_to<T: DeserializeOwned>(
    http: &HttpClient,
    upload_url: &str,
    file: &UploadFile,
    fields: &Params,
) -> ApiResult<T> {
    let url = resolve_upload_url(http, upload_url)?;

    let part = Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.content_type)
        .map_err(|err| {
            ApiError::contract(format!("invalid content type {:?}: {err}", file.content_type))
        })?;
    let mut form = Form::new();
    for (key, value) in fields {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        form = form.text(key.clone(), text);
    }
    form = form.part("file", part);

    tracing::debug!(%url, file = %file.name, size = file.bytes.len(), "uploading file");
    let result = match http
        .client()
        .post(url.clone())
        .header(CONTENT_DISPOSITION, file.content_disposition())
        .multipart(form)
        .send()
        .await
    {
        Ok(response) => settle(response).await,
        Err(err) => Err(ApiError::Network(err)),
    };
    if let Err(err) = &result {
        http.report(&Method::POST, url.as_str(), err);
    }
    result
}

/// Runs `upload` over `files` strictly one after another. The next upload
/// starts only after the previous one succeeded; the first failure stops
/// the sequence and is returned.
pub async fn upload_sequentially<'a, T, F, Fut>(
    files: &'a [UploadFile],
    mut upload: F,
) -> ApiResult<Vec<T>>
where
    F: FnMut(&'a UploadFile) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut results = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        match upload(file).await {
            Ok(result) => results.push(result),
            Err(err) => {
                tracing::warn!(index, file = %file.name, error = %err, "upload failed, stopping");
                return Err(err);
            }
        }
    }
    Ok(results)
}

fn resolve_upload_url(http: &HttpClient, upload_url: &str) -> ApiResult<reqwest::Url> {
    let absolute = if upload_url.starts_with('/') {
        format!("{}{}", http.config().base_url, upload_url)
    } else {
        upload_url.to_string()
    };
    reqwest::Url::parse(&absolute)
        .map_err(|err| ApiError::contract(format!("server sent bad upload URL {upload_url:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn files(n: usize) -> Vec<UploadFile> {
        (0..n)
            .map(|i| UploadFile::new(format!("f{i}.txt"), "text/plain", vec![i as u8]))
            .collect()
    }

    #[tokio::test]
    async fn uploads_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let files = files(4);
        let results = upload_sequentially(&files, |file| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(format!("start {}", file.name));
                tokio::task::yield_now().await;
                log.lock().unwrap().push(format!("end {}", file.name));
                Ok(file.bytes[0])
            }
        })
        .await
        .unwrap();

        assert_eq!(results, vec![0, 1, 2, 3]);
        let log = log.lock().unwrap();
        for pair in log.chunks(2) {
            assert!(pair[0].starts_with("start"));
            assert_eq!(pair[0].replace("start", ""), pair[1].replace("end", ""));
        }
    }

    #[tokio::test]
    async fn failure_stops_the_sequence() {
        let attempted = Arc::new(Mutex::new(Vec::new()));
        let files = files(5);
        let result: ApiResult<Vec<()>> = upload_sequentially(&files, |file| {
            let attempted = attempted.clone();
            async move {
                attempted.lock().unwrap().push(file.name.clone());
                if file.name == "f1.txt" {
                    Err(ApiError::Application {
                        message: "quota".into(),
                    })
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Application { .. })));
        assert_eq!(*attempted.lock().unwrap(), vec!["f0.txt", "f1.txt"]);
    }

    #[test]
    fn disposition_names_the_file() {
        let file = UploadFile::new("IMG_2237.JPG", "image/jpeg", Vec::new());
        assert_eq!(file.content_disposition(), "attachment; filename=IMG_2237.JPG;");
    }
}
