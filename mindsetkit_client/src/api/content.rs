use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::filters;
use crate::http::{ApiRequest, HttpClient};
use crate::models::{ContentItem, ContentKind, Params};

/// Kind-generic content operations.
pub struct Content<'a> {
    pub(crate) http: &'a HttpClient,
}

impl<'a> Content<'a> {
    /// Searches with the allow-listed subset of `params`.
    pub async fn search(&self, params: &Params) -> ApiResult<Vec<ContentItem>> {
        let request = ApiRequest::get("search").query_params(filters::search_params(params));
        self.http.send(request).await
    }

    pub async fn fetch_all(&self, kind: ContentKind, page: u32) -> ApiResult<Vec<ContentItem>> {
        let request = ApiRequest::get(kind.model()).query("page", page);
        self.http.send(request).await
    }

    pub async fn find_by_id(&self, kind: ContentKind, uid: &str) -> ApiResult<ContentItem> {
        kind.expect_uid(uid)?;
        self.http
            .send(ApiRequest::get(format!("{}/{uid}", kind.model())))
            .await
    }

    pub async fn create(&self, kind: ContentKind, params: Params) -> ApiResult<ContentItem> {
        self.http
            .send(ApiRequest::post(kind.model()).params(params))
            .await
    }

    /// PUT with only the fields updatable for `kind`; everything else is
    /// dropped before the request is built.
    pub async fn update(
        &self,
        kind: ContentKind,
        uid: &str,
        params: &Params,
    ) -> ApiResult<ContentItem> {
        kind.expect_uid(uid)?;
        let fields = filters::update_fields(kind, params);
        self.http
            .send(ApiRequest::put(format!("{}/{uid}", kind.model())).params(fields))
            .await
    }

    pub async fn delete(&self, kind: ContentKind, uid: &str) -> ApiResult<()> {
        kind.expect_uid(uid)?;
        self.http
            .send::<Value>(ApiRequest::delete(format!("{}/{uid}", kind.model())))
            .await?;
        Ok(())
    }

    pub async fn add_child(&self, kind: ContentKind, parent: &str, child: &str) -> ApiResult<()> {
        self.child_request(kind, parent, child, "add-child", None)
            .await
    }

    pub async fn remove_child(&self, kind: ContentKind, parent: &str, child: &str) -> ApiResult<()> {
        self.child_request(kind, parent, child, "remove-child", None)
            .await
    }

    /// Swaps `child` with its neighbour above (`move_up`) or below.
    pub async fn reorder_child(
        &self,
        kind: ContentKind,
        parent: &str,
        child: &str,
        move_up: bool,
    ) -> ApiResult<()> {
        self.child_request(kind, parent, child, "reorder-child", Some(move_up))
            .await
    }

    pub async fn fetch_children(&self, kind: ContentKind, parent: &str) -> ApiResult<Vec<ContentItem>> {
        let child_kind = hierarchy(kind)?;
        kind.expect_uid(parent)?;
        let children: Value = self
            .http
            .send(ApiRequest::get(format!(
                "{}/{parent}/{}",
                kind.model(),
                child_kind.model()
            )))
            .await?;
        lenient_list(children)
    }

    async fn child_request(
        &self,
        kind: ContentKind,
        parent: &str,
        child: &str,
        action: &str,
        move_up: Option<bool>,
    ) -> ApiResult<()> {
        hierarchy(kind)?;
        kind.expect_uid(parent)?;
        let child_kind = ContentKind::from_uid(child)?;
        if !kind.accepts_child(child_kind) {
            return Err(ApiError::contract(format!(
                "{child} cannot be linked under a {kind}"
            )));
        }
        let mut request = ApiRequest::get(format!("{}/{parent}/{action}/{child}", kind.model()));
        if let Some(move_up) = move_up {
            request = request.query("move_up", move_up);
        }
        self.http.send::<Value>(request).await?;
        Ok(())
    }
}

/// Child listings answer with an empty string or null when there is
/// nothing to list.
fn lenient_list(value: Value) -> ApiResult<Vec<ContentItem>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        other => Err(ApiError::Decode(format!("expected a list, got {other}"))),
    }
}

fn hierarchy(kind: ContentKind) -> ApiResult<ContentKind> {
    kind.child_kind().ok_or_else(|| {
        ApiError::contract(format!("{kind} records have no children"))
    })
}

/// Operations bound to one hierarchical kind.
pub struct ContentResource<'a> {
    pub(crate) content: Content<'a>,
    pub(crate) kind: ContentKind,
}

impl<'a> ContentResource<'a> {
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub async fn fetch_all(&self, page: u32) -> ApiResult<Vec<ContentItem>> {
        self.content.fetch_all(self.kind, page).await
    }

    pub async fn find_by_id(&self, uid: &str) -> ApiResult<ContentItem> {
        self.content.find_by_id(self.kind, uid).await
    }

    pub async fn create(&self, params: Params) -> ApiResult<ContentItem> {
        self.content.create(self.kind, params).await
    }

    pub async fn update(&self, uid: &str, params: &Params) -> ApiResult<ContentItem> {
        self.content.update(self.kind, uid, params).await
    }

    pub async fn delete(&self, uid: &str) -> ApiResult<()> {
        self.content.delete(self.kind, uid).await
    }

    pub async fn fetch_children(&self, parent: &str) -> ApiResult<Vec<ContentItem>> {
        self.content.fetch_children(self.kind, parent).await
    }

    pub async fn add_child(&self, parent: &str, child: &str) -> ApiResult<()> {
        self.content.add_child(self.kind, parent, child).await
    }

    pub async fn remove_child(&self, parent: &str, child: &str) -> ApiResult<()> {
        self.content.remove_child(self.kind, parent, child).await
    }

    pub async fn reorder_child(&self, parent: &str, child: &str, move_up: bool) -> ApiResult<()> {
        self.content
            .reorder_child(self.kind, parent, child, move_up)
            .await
    }

    /// Every lesson below a theme, across its topics.
    pub async fn fetch_lessons(&self, theme: &str) -> ApiResult<Vec<ContentItem>> {
        ContentKind::Theme.expect_uid(theme)?;
        let lessons: Value = self
            .content
            .http
            .send(ApiRequest::get(format!("themes/{theme}/lessons")))
            .await?;
        lenient_list(lessons)
    }

    /// Themes a lesson appears in.
    pub async fn get_themes(&self, lesson: &str) -> ApiResult<Vec<ContentItem>> {
        ContentKind::Lesson.expect_uid(lesson)?;
        self.content
            .http
            .send(ApiRequest::get(format!("lessons/{lesson}/themes")))
            .await
    }
}
