use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{AttachedFile, ContentItem, Params};
use crate::session::Session;
use crate::tags::{self, TagOption};
use crate::upload::UploadFile;

pub const NAME_TOO_SHORT: &str = "Practice name is too short";
pub const SUMMARY_TOO_SHORT: &str = "Practice summary is too short";
pub const SUMMARY_TOO_LONG: &str = "Practice summary is too long";
pub const BODY_TOO_SHORT: &str = "Practice text is too short";
pub const UPLOAD_FAILED: &str = "Error uploading file, try another.";

const MIN_NAME_LEN: usize = 5;
const MIN_SUMMARY_LEN: usize = 10;
const MAX_SUMMARY_LEN: usize = 250;
const MIN_BODY_LEN: usize = 10;
const FINAL_STEP: u8 = 3;

lazy_static! {
    static ref YOUTUBE_LINK: Regex =
        Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").unwrap();
    static ref IFRAME_SRC: Regex =
        Regex::new(r#"<iframe[\S\s]*src=['"](\S*)['"][\s>]"#).unwrap();
}

/// Eleven-character video id from any of the usual YouTube link shapes.
pub fn youtube_id(link: &str) -> Option<String> {
    let captures = YOUTUBE_LINK.captures(link)?;
    let id = captures.get(2)?.as_str();
    (id.len() == 11).then(|| id.to_string())
}

/// `src` of a pasted `<iframe>` embed code.
pub fn iframe_src(embed: &str) -> Option<String> {
    let captures = IFRAME_SRC.captures(embed)?;
    let src = captures.get(1)?.as_str();
    (src.len() >= 6).then(|| src.to_string())
}

/// Multi-step practice submission: describe, tag, then publish with
/// attachments.
pub struct PracticeUpload {
    session: Session,
    pub step: u8,
    pub name: String,
    pub summary: String,
    pub body: String,
    pub youtube_link: String,
    pub embed_code: String,
    pub time_of_year: String,
    pub class_period: String,
    pub grades: (i64, i64),
    pub mindset_tags: Vec<TagOption>,
    pub practice_tags: Vec<TagOption>,
    pub school_subjects: Vec<TagOption>,
    /// New files, uploaded after the practice is saved.
    pub files: Vec<UploadFile>,
    /// Files already stored on the practice being edited.
    pub stored_files: Vec<AttachedFile>,
    pub error: String,
    pub creating: bool,
    editing: Option<ContentItem>,
    practice: Option<ContentItem>,
    share_url: Option<String>,
}

impl PracticeUpload {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            step: 1,
            name: String::new(),
            summary: String::new(),
            body: String::new(),
            youtube_link: String::new(),
            embed_code: String::new(),
            time_of_year: String::new(),
            class_period: String::new(),
            grades: (0, (tags::GRADE_LEVELS.len() - 1) as i64),
            mindset_tags: tags::mindset_tags(),
            practice_tags: tags::practice_tags(),
            school_subjects: tags::school_subjects(),
            files: Vec::new(),
            stored_files: Vec::new(),
            error: String::new(),
            creating: false,
            editing: None,
            practice: None,
            share_url: None,
        }
    }

    /// Loads an existing practice into the form.
    pub async fn edit(&mut self, uid: &str) -> ApiResult<()> {
        let practice = self.session.api().practices().find_by_id(uid).await?;
        self.fill_from(practice);
        Ok(())
    }

    pub fn fill_from(&mut self, practice: ContentItem) {
        self.name = practice.name.clone();
        self.summary = practice.summary.clone();
        self.body = string_field(&practice, "body");
        self.time_of_year = string_field(&practice, "time_of_year");
        self.class_period = string_field(&practice, "class_period");

        let youtube = string_field(&practice, "youtube_id");
        if !youtube.is_empty() {
            self.youtube_link = format!("http://youtu.be/{youtube}");
        }
        let iframe = string_field(&practice, "iframe_src");
        if !iframe.is_empty() {
            self.embed_code = format!(r#"<iframe src="{iframe}"></iframe>"#);
        }
        if let (Some(min), Some(max)) = (practice.min_grade, practice.max_grade) {
            self.grades = (min, max);
        }
        tags::apply_wire_format(&mut self.mindset_tags, &practice.tags);
        tags::apply_wire_format(&mut self.practice_tags, &practice.tags);
        tags::apply_wire_format(&mut self.school_subjects, &practice.subjects);
        self.stored_files = practice.files();
        self.editing = Some(practice);
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn youtube_id(&self) -> Option<String> {
        youtube_id(&self.youtube_link)
    }

    pub fn iframe_src(&self) -> Option<String> {
        iframe_src(&self.embed_code)
    }

    /// Checks the current step, setting `error` to the first problem found.
    pub fn check_validation(&mut self) -> bool {
        self.error.clear();
        if self.step == 1 {
            let problem = if self.name.chars().count() < MIN_NAME_LEN {
                Some(NAME_TOO_SHORT)
            } else if self.summary.chars().count() < MIN_SUMMARY_LEN {
                Some(SUMMARY_TOO_SHORT)
            } else if self.summary.chars().count() > MAX_SUMMARY_LEN {
                Some(SUMMARY_TOO_LONG)
            } else if self.youtube_id().is_none() && self.body.chars().count() < MIN_BODY_LEN {
                Some(BODY_TOO_SHORT)
            } else {
                None
            };
            if let Some(problem) = problem {
                self.error = problem.to_string();
                return false;
            }
        }
        self.session.is_signed_in()
    }

    pub fn next_step(&mut self) -> bool {
        if self.step < FINAL_STEP && self.check_validation() {
            self.step += 1;
            return true;
        }
        false
    }

    pub fn previous_step(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
        self.check_validation();
    }

    /// Fields sent on create and update.
    pub fn practice_data(&self) -> Params {
        let mut tag_names = tags::to_wire_format(&self.mindset_tags);
        tag_names.extend(tags::to_wire_format(&self.practice_tags));

        let mut data = Params::new();
        data.insert("name".into(), json!(self.name));
        data.insert("summary".into(), json!(self.summary));
        data.insert("tags".into(), json!(tag_names));
        data.insert("subjects".into(), json!(tags::to_wire_format(&self.school_subjects)));
        data.insert("min_grade".into(), json!(self.grades.0));
        data.insert("max_grade".into(), json!(self.grades.1));
        data.insert("time_of_year".into(), json!(self.time_of_year));
        data.insert("class_period".into(), json!(self.class_period));
        data.insert("body".into(), json!(self.body));
        data.insert("youtube_id".into(), json!(self.youtube_id().unwrap_or_default()));
        data.insert("iframe_src".into(), json!(self.iframe_src().unwrap_or_default()));
        data
    }

    /// Saves the practice, then uploads queued files one after another.
    ///
    /// A failed upload leaves the practice saved; calling again updates it
    /// instead of creating a second one.
    pub async fn submit(&mut self) -> ApiResult<bool> {
        if self.creating || !self.check_validation() {
            return Ok(false);
        }
        self.creating = true;
        let data = self.practice_data();
        let api = self.session.api().clone();

        let saved = match &self.editing {
            Some(existing) => api.practices().update(&existing.uid, &data).await,
            None => api.practices().create(data).await,
        };
        let practice = match saved {
            Ok(practice) => practice,
            Err(err) => {
                self.creating = false;
                return Err(err);
            }
        };
        self.editing = Some(practice.clone());
        self.practice = Some(practice);

        if !self.files.is_empty() {
            let uid = self.practice_uid()?;
            match api.practices().upload_files(&uid, &self.files).await {
                Ok(Some(updated)) => {
                    self.files.clear();
                    self.practice = Some(updated);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, practice = %uid, "file upload failed");
                    self.error = UPLOAD_FAILED.to_string();
                    self.creating = false;
                    return Ok(false);
                }
            }
        }
        self.show_finished();
        Ok(true)
    }

    fn practice_uid(&self) -> ApiResult<String> {
        self.practice
            .as_ref()
            .map(|practice| practice.uid.clone())
            .ok_or_else(|| ApiError::contract("no saved practice to attach files to"))
    }

    fn show_finished(&mut self) {
        self.step = FINAL_STEP;
        self.creating = false;
        let domain = &self.session.api().config().hosting_domain;
        self.share_url = self
            .practice
            .as_ref()
            .and_then(|practice| practice.short_uid.as_deref())
            .map(|short| format!("https://{domain}/practices/{short}"));
    }

    pub fn practice(&self) -> Option<&ContentItem> {
        self.practice.as_ref()
    }

    pub fn share_url(&self) -> Option<&str> {
        self.share_url.as_deref()
    }

    /// Drops a queued file, or deletes a stored one from the server.
    pub async fn remove_file(&mut self, name: &str) -> ApiResult<()> {
        if let Some(index) = self.files.iter().position(|file| file.name == name) {
            self.files.remove(index);
            return Ok(());
        }
        let Some(index) = self
            .stored_files
            .iter()
            .position(|file| file.gs_object_name == name)
        else {
            return Ok(());
        };
        let uid = self
            .editing
            .as_ref()
            .map(|practice| practice.uid.clone())
            .ok_or_else(|| ApiError::contract("stored file without a practice"))?;
        self.session
            .api()
            .practices()
            .remove_file(&uid, &self.stored_files[index].gs_object_name)
            .await?;
        self.stored_files.remove(index);
        Ok(())
    }
}

fn string_field(item: &ContentItem, key: &str) -> String {
    match item.extra.get(key) {
        Some(Value::String(value)) => value.clone(),
        _ => String::new(),
    }
}
