use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::api::MskApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{ContentItem, ContentKind, Feedback, Params};
use crate::pagination::{PageList, RequestGeneration};
use crate::tags::{self, TagOption};

/// Theme whose topics are offered for association instead of the theme.
pub const TEACHER_THEME: &str = "Growth Mindset for Teachers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeStatus {
    Pending,
    Approved,
    Promoted,
    Rejected,
}

impl PracticeStatus {
    /// Filter sent to the practice listing for this tab.
    pub fn filter(self) -> Params {
        let mut params = Params::new();
        let (pending, listed) = match self {
            PracticeStatus::Pending => (true, false),
            PracticeStatus::Approved | PracticeStatus::Promoted => (false, true),
            PracticeStatus::Rejected => (false, false),
        };
        params.insert("pending".into(), json!(pending));
        params.insert("listed".into(), json!(listed));
        if self == PracticeStatus::Promoted {
            params.insert("promoted".into(), json!(true));
        }
        params.insert("order".into(), json!("-created"));
        params
    }
}

/// Review queue for submitted practices.
pub struct PracticeModeration {
    api: MskApi,
    pub status: PracticeStatus,
    pub loading: bool,
    practices: PageList<ContentItem>,
    generation: RequestGeneration,
}

impl PracticeModeration {
    pub fn new(api: MskApi) -> Self {
        let page_size = api.config().page_size;
        Self {
            api,
            status: PracticeStatus::Pending,
            loading: false,
            practices: PageList::new(page_size),
            generation: RequestGeneration::new(),
        }
    }

    pub fn practices(&self) -> &[ContentItem] {
        self.practices.items()
    }

    pub fn should_paginate(&self) -> bool {
        self.practices.should_paginate()
    }

    /// Switches tab and loads its first page.
    pub async fn set_status(&mut self, status: PracticeStatus) -> ApiResult<()> {
        self.status = status;
        self.practices.reset();
        self.fetch_page(0).await
    }

    pub async fn load_more(&mut self) -> ApiResult<()> {
        let page = self.practices.advance();
        self.fetch_page(page).await
    }

    async fn fetch_page(&mut self, page: u32) -> ApiResult<()> {
        let ticket = self.generation.issue();
        let mut params = self.status.filter();
        params.insert("page".into(), json!(page));
        self.loading = true;
        let result = self.api.practices().find(&params).await;
        if !self.generation.is_current(ticket) {
            return result.map(|_| ());
        }
        self.loading = false;
        self.practices.receive(page, result?);
        Ok(())
    }

    fn position(&self, uid: &str) -> ApiResult<usize> {
        self.practices
            .items()
            .iter()
            .position(|practice| practice.uid == uid)
            .ok_or_else(|| ApiError::contract(format!("{uid} is not in the moderation list")))
    }

    /// Toggles promotion. A promoted practice is always listed.
    pub async fn promote(&mut self, uid: &str) -> ApiResult<()> {
        let index = self.position(uid)?;
        let promoted = !self.practices.items()[index].promoted;
        let mut params = Params::new();
        params.insert("listed".into(), json!(true));
        params.insert("pending".into(), json!(false));
        params.insert("promoted".into(), json!(promoted));
        self.api.practices().update(uid, &params).await?;

        let practice = &mut self.practices.items_mut()[index];
        practice.listed = true;
        practice.pending = false;
        practice.promoted = promoted;
        Ok(())
    }

    /// Approving lists the practice; rejecting unlists and unpromotes it.
    pub async fn approve(&mut self, uid: &str, approved: bool) -> ApiResult<()> {
        let index = self.position(uid)?;
        let mut params = Params::new();
        params.insert("listed".into(), json!(approved));
        params.insert("pending".into(), json!(false));
        if !approved {
            params.insert("promoted".into(), json!(false));
        }
        self.api.practices().update(uid, &params).await?;

        let practice = &mut self.practices.items_mut()[index];
        practice.pending = false;
        practice.listed = approved;
        if !approved {
            practice.promoted = false;
        }
        Ok(())
    }

    /// Soft-deletes and drops the practice from the list.
    pub async fn destroy(&mut self, uid: &str) -> ApiResult<()> {
        let index = self.position(uid)?;
        let mut params = Params::new();
        params.insert("deleted".into(), json!(true));
        self.api.practices().update(uid, &params).await?;
        self.practices.items_mut().remove(index);
        Ok(())
    }

    /// Content a practice may be associated with: every theme except the
    /// teacher theme, plus that theme's topics.
    pub async fn association_options(&self) -> ApiResult<Vec<ContentItem>> {
        let themes = self.api.themes().fetch_all(0).await?;
        let mut options = Vec::with_capacity(themes.len());
        let mut teacher = None;
        for theme in themes {
            if theme.name == TEACHER_THEME {
                teacher = Some(theme.uid);
            } else {
                options.push(theme);
            }
        }
        if let Some(uid) = teacher {
            options.extend(self.api.themes().fetch_children(&uid).await?);
        }
        Ok(options)
    }

    pub async fn associate_content(&mut self, practice: &str, content: &str) -> ApiResult<()> {
        let index = self.position(practice)?;
        self.api.practices().associate_content(practice, content).await?;
        self.practices.items_mut()[index].associated_content = Some(content.to_string());
        Ok(())
    }
}

pub const SAVE_FAILED: &str = "Error saving data...";
pub const CHECK_FIELDS: &str = "Error saving, please check fields";

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap();
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Fields of a theme, topic or lesson being created. `id` becomes the
/// readable part of the new uid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDraft {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub color: String,
}

impl ContentDraft {
    /// Name, id and summary longer than five characters; themes and topics
    /// also need a hex color.
    pub fn is_valid_for(&self, kind: ContentKind) -> bool {
        self.name.chars().count() > 5
            && self.id.chars().count() > 5
            && (kind == ContentKind::Lesson || is_hex_color(&self.color))
            && self.summary.chars().count() > 5
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("id".into(), json!(self.id));
        params.insert("name".into(), json!(self.name));
        params.insert("summary".into(), json!(self.summary));
        if !self.color.is_empty() {
            params.insert("color".into(), json!(self.color));
        }
        params
    }
}

/// Back-office editor for the theme, topic and lesson catalog.
pub struct ContentEditor {
    api: MskApi,
    pub model: ContentKind,
    pub draft: ContentDraft,
    pub child_draft: ContentDraft,
    pub error: String,
    pub saving: bool,
    /// Set after the viewed record was saved.
    pub updated: bool,
    pub mindset_tags: Vec<TagOption>,
    pub practice_tags: Vec<TagOption>,
    pub subject_tags: Vec<TagOption>,
    objects: Vec<ContentItem>,
    object: Option<ContentItem>,
    children: Option<ChildList>,
    theme_lessons: Vec<ContentItem>,
    popular_lessons: Vec<ContentItem>,
}

impl ContentEditor {
    pub fn new(api: MskApi) -> Self {
        Self {
            api,
            model: ContentKind::Theme,
            draft: ContentDraft::default(),
            child_draft: ContentDraft::default(),
            error: String::new(),
            saving: false,
            updated: false,
            mindset_tags: tags::mindset_tags(),
            practice_tags: tags::practice_tags(),
            subject_tags: tags::school_subjects(),
            objects: Vec::new(),
            object: None,
            children: None,
            theme_lessons: Vec::new(),
            popular_lessons: Vec::new(),
        }
    }

    pub fn objects(&self) -> &[ContentItem] {
        &self.objects
    }

    /// The record open in the editor.
    pub fn object(&self) -> Option<&ContentItem> {
        self.object.as_ref()
    }

    pub fn children(&self) -> Option<&ChildList> {
        self.children.as_ref()
    }

    pub fn children_mut(&mut self) -> Option<&mut ChildList> {
        self.children.as_mut()
    }

    pub fn theme_lessons(&self) -> &[ContentItem] {
        &self.theme_lessons
    }

    pub fn popular_lessons(&self) -> &[ContentItem] {
        &self.popular_lessons
    }

    /// Switches the listing to another kind and loads its first page.
    pub async fn set_model(&mut self, kind: ContentKind) -> ApiResult<()> {
        if kind == ContentKind::Practice {
            return Err(ApiError::contract("practices are moderated, not edited"));
        }
        self.model = kind;
        self.object = None;
        self.children = None;
        self.objects.clear();
        self.fetch_model(0).await
    }

    pub async fn fetch_model(&mut self, page: u32) -> ApiResult<()> {
        self.objects = self.api.resource(self.model).fetch_all(page).await?;
        Ok(())
    }

    /// Creates a record of the current kind from `draft`. Returns false
    /// with `error` set when the draft is incomplete or the server refuses.
    pub async fn create_object(&mut self) -> ApiResult<bool> {
        self.error.clear();
        if !self.draft.is_valid_for(self.model) {
            self.error = CHECK_FIELDS.to_string();
            return Ok(false);
        }
        self.saving = true;
        let result = self
            .api
            .resource(self.model)
            .create(self.draft.to_params())
            .await;
        self.saving = false;
        match result {
            Ok(created) => {
                tracing::info!(uid = %created.uid, "content created");
                self.objects.push(created);
                self.draft = ContentDraft::default();
                Ok(true)
            }
            Err(ApiError::Application { .. }) => {
                self.error = SAVE_FAILED.to_string();
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes a record and reloads the first page of the listing.
    pub async fn delete_object(&mut self, uid: &str) -> ApiResult<()> {
        self.api.resource(self.model).delete(uid).await?;
        if self.object.as_ref().is_some_and(|object| object.uid == uid) {
            self.object = None;
            self.children = None;
        }
        self.fetch_model(0).await
    }

    /// Opens a record: children for themes and topics, popular lessons
    /// for themes, tag checkboxes for lessons.
    pub async fn view_object(&mut self, object: ContentItem) -> ApiResult<()> {
        let kind = object.kind()?;
        if kind == ContentKind::Practice {
            return Err(ApiError::contract("practices are moderated, not edited"));
        }
        self.model = kind;
        self.updated = false;
        self.theme_lessons.clear();
        self.popular_lessons.clear();
        self.children = None;
        self.object = Some(object.clone());

        if kind == ContentKind::Lesson {
            self.load_tags();
            return Ok(());
        }

        let mut children = ChildList::new(self.api.clone(), object)?;
        children.fetch_children().await?;
        children.load_candidates(0).await?;
        self.children = Some(children);
        if kind == ContentKind::Theme {
            self.load_popular_lessons().await?;
        }
        Ok(())
    }

    /// Checks the boxes of the open lesson's tags and subjects.
    pub fn load_tags(&mut self) {
        let Some(lesson) = self.object.as_ref().filter(|o| o.kind() == Ok(ContentKind::Lesson))
        else {
            return;
        };
        for group in [&mut self.mindset_tags, &mut self.practice_tags, &mut self.subject_tags] {
            tags::clear(group);
        }
        tags::apply_wire_format(&mut self.mindset_tags, &lesson.tags);
        tags::apply_wire_format(&mut self.practice_tags, &lesson.tags);
        tags::apply_wire_format(&mut self.subject_tags, &lesson.subjects);
    }

    /// `tags` and `subjects` as the checkboxes currently stand.
    pub fn tag_data(&self) -> Params {
        let mut names = tags::to_wire_format(&self.mindset_tags);
        names.extend(tags::to_wire_format(&self.practice_tags));
        let mut data = Params::new();
        data.insert("tags".into(), json!(names));
        data.insert("subjects".into(), json!(tags::to_wire_format(&self.subject_tags)));
        data
    }

    pub async fn save_tags(&mut self) -> ApiResult<bool> {
        let data = self.tag_data();
        self.save(data).await
    }

    /// Saves edits to the open record. Lessons carry the checkbox tags;
    /// themes and topics never send tags or subjects.
    pub async fn update_object(&mut self, changes: &Params) -> ApiResult<bool> {
        let mut params = changes.clone();
        if self.model == ContentKind::Lesson {
            params.extend(self.tag_data());
        } else {
            params.remove("tags");
            params.remove("subjects");
        }
        let saved = self.save(params).await?;
        self.updated = saved;
        Ok(saved)
    }

    async fn save(&mut self, params: Params) -> ApiResult<bool> {
        let Some(uid) = self.object.as_ref().map(|object| object.uid.clone()) else {
            return Err(ApiError::contract("no record is open"));
        };
        self.error.clear();
        self.saving = true;
        let result = self.api.resource(self.model).update(&uid, &params).await;
        self.saving = false;
        match result {
            Ok(saved) => {
                if let Some(listed) = self.objects.iter_mut().find(|o| o.uid == saved.uid) {
                    *listed = saved.clone();
                }
                self.object = Some(saved);
                Ok(true)
            }
            Err(ApiError::Application { .. }) => {
                self.error = SAVE_FAILED.to_string();
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Adds a new child under the open theme or topic.
    pub async fn create_child(&mut self) -> ApiResult<bool> {
        self.error.clear();
        let Some(children) = self.children.as_mut() else {
            return Err(ApiError::contract("no theme or topic is open"));
        };
        if !self.child_draft.is_valid_for(children.child_kind()) {
            self.error = CHECK_FIELDS.to_string();
            return Ok(false);
        }
        match children.create_child(self.child_draft.to_params()).await {
            Ok(()) => {
                self.child_draft = ContentDraft::default();
                Ok(true)
            }
            Err(ApiError::Application { .. }) => {
                self.error = SAVE_FAILED.to_string();
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Lessons under the open theme, and the featured ones among them in
    /// the theme's order.
    pub async fn load_popular_lessons(&mut self) -> ApiResult<()> {
        let Some(theme) = self.open_theme() else {
            return Err(ApiError::contract("no theme is open"));
        };
        let lessons = self.api.themes().fetch_lessons(&theme.uid).await?;
        self.popular_lessons = theme
            .popular_lessons
            .iter()
            .filter_map(|uid| lessons.iter().find(|lesson| &lesson.uid == uid).cloned())
            .collect();
        self.theme_lessons = lessons;
        Ok(())
    }

    pub async fn add_popular_lesson(&mut self, lesson: ContentItem) -> ApiResult<()> {
        let Some(theme) = self.open_theme() else {
            return Err(ApiError::contract("no theme is open"));
        };
        self.saving = true;
        let result = self.api.themes().add_child(&theme.uid, &lesson.uid).await;
        self.saving = false;
        result?;
        if let Some(object) = self.object.as_mut() {
            object.popular_lessons.push(lesson.uid.clone());
        }
        self.popular_lessons.push(lesson);
        Ok(())
    }

    pub async fn remove_popular_lesson(&mut self, lesson: &str) -> ApiResult<()> {
        let Some(theme) = self.open_theme() else {
            return Err(ApiError::contract("no theme is open"));
        };
        self.api.themes().remove_child(&theme.uid, lesson).await?;
        self.popular_lessons.retain(|l| l.uid != lesson);
        if let Some(object) = self.object.as_mut() {
            object.popular_lessons.retain(|uid| uid != lesson);
        }
        Ok(())
    }

    pub async fn reorder_popular(&mut self, lesson: &str, move_up: bool) -> ApiResult<()> {
        let Some(theme) = self.open_theme() else {
            return Err(ApiError::contract("no theme is open"));
        };
        self.api
            .themes()
            .reorder_child(&theme.uid, lesson, move_up)
            .await?;
        if let Some(index) = self.popular_lessons.iter().position(|l| l.uid == lesson) {
            move_adjacent(self.popular_lessons.as_mut_slice(), index, move_up);
        }
        if let Some(object) = self.object.as_mut() {
            if let Some(index) = object.popular_lessons.iter().position(|uid| uid == lesson) {
                move_adjacent(object.popular_lessons.as_mut_slice(), index, move_up);
            }
        }
        Ok(())
    }

    fn open_theme(&self) -> Option<ContentItem> {
        self.object
            .as_ref()
            .filter(|object| object.kind() == Ok(ContentKind::Theme))
            .cloned()
    }
}

/// Site feedback, newest first.
pub struct FeedbackList {
    api: MskApi,
    pub loading: bool,
    feedback: PageList<Feedback>,
}

impl FeedbackList {
    pub fn new(api: MskApi) -> Self {
        let page_size = api.config().page_size;
        Self {
            api,
            loading: false,
            feedback: PageList::new(page_size),
        }
    }

    pub fn feedback(&self) -> &[Feedback] {
        self.feedback.items()
    }

    pub fn should_paginate(&self) -> bool {
        self.feedback.should_paginate()
    }

    pub async fn fetch(&mut self) -> ApiResult<()> {
        self.feedback.reset();
        self.fetch_page(0).await
    }

    pub async fn load_more(&mut self) -> ApiResult<()> {
        let page = self.feedback.advance();
        self.fetch_page(page).await
    }

    async fn fetch_page(&mut self, page: u32) -> ApiResult<()> {
        let mut params = Params::new();
        params.insert("order".into(), json!("-created"));
        params.insert("page".into(), json!(page));
        self.loading = true;
        let result = self.api.feedback().fetch(params).await;
        self.loading = false;
        self.feedback.receive(page, result?);
        Ok(())
    }
}

/// Moves the entry at `index` one slot up or down. Out of range moves are
/// ignored, matching the server's swap-with-adjacent rule.
pub fn move_adjacent<T>(list: &mut [T], index: usize, move_up: bool) -> bool {
    let target = if move_up {
        index.checked_sub(1)
    } else {
        Some(index + 1)
    };
    match target {
        Some(target) if index < list.len() && target < list.len() => {
            list.swap(index, target);
            true
        }
        _ => false,
    }
}

/// Ordered children of a theme or topic, plus the pool of records that
/// could be added.
pub struct ChildList {
    api: MskApi,
    parent_kind: ContentKind,
    child_kind: ContentKind,
    parent: ContentItem,
    children: Vec<ContentItem>,
    candidates: PageList<ContentItem>,
    pub saving: bool,
}

impl ChildList {
    pub fn new(api: MskApi, parent: ContentItem) -> ApiResult<Self> {
        let parent_kind = parent.kind()?;
        let child_kind = parent_kind.child_kind().ok_or_else(|| {
            ApiError::contract(format!("{parent_kind} records have no children"))
        })?;
        let page_size = api.config().page_size;
        Ok(Self {
            api,
            parent_kind,
            child_kind,
            parent,
            children: Vec::new(),
            candidates: PageList::new(page_size),
            saving: false,
        })
    }

    pub fn parent(&self) -> &ContentItem {
        &self.parent
    }

    pub fn child_kind(&self) -> ContentKind {
        self.child_kind
    }

    pub fn children(&self) -> &[ContentItem] {
        &self.children
    }

    pub fn candidates(&self) -> &[ContentItem] {
        self.candidates.items()
    }

    pub fn can_load_more_candidates(&self) -> bool {
        self.candidates.should_paginate()
    }

    pub async fn fetch_children(&mut self) -> ApiResult<()> {
        self.children = self
            .api
            .resource(self.parent_kind)
            .fetch_children(&self.parent.uid)
            .await?;
        Ok(())
    }

    /// Loads a page of child-kind records, leaving out those already
    /// attached (matched by name).
    pub async fn load_candidates(&mut self, page: u32) -> ApiResult<()> {
        let batch = self.api.resource(self.child_kind).fetch_all(page).await?;
        if page == 0 {
            self.candidates.reset();
        }
        self.candidates.receive(page, batch);
        let attached: Vec<&str> = self.children.iter().map(|c| c.name.as_str()).collect();
        self.candidates
            .items_mut()
            .retain(|candidate| !attached.contains(&candidate.name.as_str()));
        Ok(())
    }

    pub async fn load_more_candidates(&mut self) -> ApiResult<()> {
        let page = self.candidates.page() + 1;
        self.load_candidates(page).await
    }

    /// Attaches an existing record at the end of the list.
    pub async fn add_existing(&mut self, child: ContentItem) -> ApiResult<()> {
        self.saving = true;
        let result = self
            .api
            .resource(self.parent_kind)
            .add_child(&self.parent.uid, &child.uid)
            .await;
        self.saving = false;
        result?;
        self.candidates
            .items_mut()
            .retain(|candidate| candidate.uid != child.uid);
        if let Some(ids) = self.parent.children_mut() {
            ids.push(child.uid.clone());
        }
        self.children.push(child);
        Ok(())
    }

    /// Creates a new child record under the parent.
    pub async fn create_child(&mut self, mut params: Params) -> ApiResult<()> {
        params.insert("parent_uid".into(), json!(self.parent.uid));
        self.saving = true;
        let result = self.api.resource(self.child_kind).create(params).await;
        self.saving = false;
        let child = result?;
        if let Some(ids) = self.parent.children_mut() {
            ids.push(child.uid.clone());
        }
        self.children.push(child);
        Ok(())
    }

    pub async fn remove(&mut self, child: &str) -> ApiResult<()> {
        self.api
            .resource(self.parent_kind)
            .remove_child(&self.parent.uid, child)
            .await?;
        self.children.retain(|c| c.uid != child);
        if let Some(ids) = self.parent.children_mut() {
            ids.retain(|id| id != child);
        }
        Ok(())
    }

    /// Swaps `child` with its neighbour on the server, then locally.
    pub async fn reorder(&mut self, child: &str, move_up: bool) -> ApiResult<()> {
        self.api
            .resource(self.parent_kind)
            .reorder_child(&self.parent.uid, child, move_up)
            .await?;
        if let Some(index) = self.children.iter().position(|c| c.uid == child) {
            move_adjacent(self.children.as_mut_slice(), index, move_up);
        }
        if let Some(ids) = self.parent.children_mut() {
            if let Some(index) = ids.iter().position(|id| id == child) {
                move_adjacent(ids.as_mut_slice(), index, move_up);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filters() {
        let pending = PracticeStatus::Pending.filter();
        assert_eq!(pending["pending"], json!(true));
        assert_eq!(pending["listed"], json!(false));
        assert!(pending.get("promoted").is_none());

        let promoted = PracticeStatus::Promoted.filter();
        assert_eq!(promoted["listed"], json!(true));
        assert_eq!(promoted["promoted"], json!(true));

        let rejected = PracticeStatus::Rejected.filter();
        assert_eq!(rejected["listed"], json!(false));
        assert_eq!(rejected["order"], json!("-created"));
    }

    #[test]
    fn draft_validation() {
        let mut draft = ContentDraft {
            id: "growth-basics".into(),
            name: "Growth basics".into(),
            summary: "What a growth mindset is".into(),
            color: "#1a2B3c".into(),
        };
        assert!(draft.is_valid_for(ContentKind::Theme));

        draft.color = "teal".into();
        assert!(!draft.is_valid_for(ContentKind::Topic));
        assert!(draft.is_valid_for(ContentKind::Lesson));

        draft.id = "short".into();
        assert!(!draft.is_valid_for(ContentKind::Lesson));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("#ffff"));
    }

    #[test]
    fn lesson_tags_load_into_checkboxes() {
        let config = crate::config::ClientConfig::new("http://localhost:9").unwrap();
        let mut editor = ContentEditor::new(MskApi::new(config).unwrap());
        editor.model = ContentKind::Lesson;
        editor.object = Some(
            serde_json::from_value(json!({
                "uid": "Lesson_1",
                "tags": ["Belonging", "Feedback", "Retired tag"],
                "subjects": "Math"
            }))
            .unwrap(),
        );
        editor.mindset_tags[0].active = true;
        editor.load_tags();

        assert_eq!(tags::to_wire_format(&editor.mindset_tags), ["Belonging"]);
        assert_eq!(tags::to_wire_format(&editor.practice_tags), ["Feedback"]);
        assert_eq!(tags::to_wire_format(&editor.subject_tags), ["Math"]);
        let data = editor.tag_data();
        assert_eq!(data["tags"], json!(["Belonging", "Feedback"]));
        assert_eq!(data["subjects"], json!(["Math"]));
    }

    #[test]
    fn adjacent_moves_stay_in_bounds() {
        let mut list = vec!["a", "b", "c"];
        assert!(move_adjacent(&mut list, 1, true));
        assert_eq!(list, ["b", "a", "c"]);
        assert!(move_adjacent(&mut list, 1, false));
        assert_eq!(list, ["b", "c", "a"]);
        assert!(!move_adjacent(&mut list, 0, true));
        assert!(!move_adjacent(&mut list, 2, false));
        assert_eq!(list, ["b", "c", "a"]);
    }
}
