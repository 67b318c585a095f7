use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::UidError;
use crate::wire;

/// Loose JSON object used for create/update/query parameters.
pub type Params = Map<String, Value>;

/// Content subtype. The server encodes it as the identifier prefix
/// (`Theme_abc`, `Lesson_xyz`), so it is recovered by parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Theme,
    Topic,
    Lesson,
    Practice,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Theme,
        ContentKind::Topic,
        ContentKind::Lesson,
        ContentKind::Practice,
    ];

    /// Identifier prefix, without the trailing underscore.
    pub fn prefix(self) -> &'static str {
        match self {
            ContentKind::Theme => "Theme",
            ContentKind::Topic => "Topic",
            ContentKind::Lesson => "Lesson",
            ContentKind::Practice => "Practice",
        }
    }

    /// Collection name used in URLs.
    pub fn model(self) -> &'static str {
        match self {
            ContentKind::Theme => "themes",
            ContentKind::Topic => "topics",
            ContentKind::Lesson => "lessons",
            ContentKind::Practice => "practices",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Theme => "theme",
            ContentKind::Topic => "topic",
            ContentKind::Lesson => "lesson",
            ContentKind::Practice => "practice",
        }
    }

    /// Kind of the ordered children, for hierarchical kinds.
    pub fn child_kind(self) -> Option<ContentKind> {
        match self {
            ContentKind::Theme => Some(ContentKind::Topic),
            ContentKind::Topic => Some(ContentKind::Lesson),
            ContentKind::Lesson | ContentKind::Practice => None,
        }
    }

    /// Whether the server links `child` records under this kind. Themes
    /// also hold lessons, as their popular-lesson list.
    pub fn accepts_child(self, child: ContentKind) -> bool {
        matches!(
            (self, child),
            (ContentKind::Theme, ContentKind::Topic)
                | (ContentKind::Theme, ContentKind::Lesson)
                | (ContentKind::Topic, ContentKind::Lesson)
        )
    }

    pub fn from_prefix(prefix: &str) -> Option<ContentKind> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }

    pub fn from_model(model: &str) -> Option<ContentKind> {
        Self::ALL.into_iter().find(|kind| kind.model() == model)
    }

    /// Derives the kind of a content identifier.
    pub fn from_uid(uid: &str) -> Result<ContentKind, UidError> {
        let prefix = uid_prefix(uid)?;
        Self::from_prefix(prefix).ok_or_else(|| UidError::UnknownKind {
            uid: uid.to_string(),
            prefix: prefix.to_string(),
        })
    }

    /// Checks that `uid` belongs to this kind.
    pub fn expect_uid(self, uid: &str) -> Result<(), UidError> {
        let found = Self::from_uid(uid)?;
        if found == self {
            Ok(())
        } else {
            Err(UidError::WrongKind {
                uid: uid.to_string(),
                expected: self.label(),
                found: found.label(),
            })
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The part of an identifier before the first underscore.
pub fn uid_prefix(uid: &str) -> Result<&str, UidError> {
    match uid.split_once('_') {
        Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => Ok(prefix),
        _ => Err(UidError::MissingPrefix(uid.to_string())),
    }
}

/// A theme, topic, lesson or practice as returned by the server, either
/// as a stored record or as a full-text search document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub uid: String,
    #[serde(default)]
    pub short_uid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: String,
    /// Ordered children of a theme.
    #[serde(default, deserialize_with = "wire::string_list")]
    pub topics: Vec<String>,
    /// Ordered children of a topic.
    #[serde(default, deserialize_with = "wire::string_list")]
    pub lessons: Vec<String>,
    /// Lessons featured on a theme, in display order.
    #[serde(default, deserialize_with = "wire::string_list")]
    pub popular_lessons: Vec<String>,
    #[serde(default, deserialize_with = "wire::string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "wire::string_list")]
    pub mindset_tags: Vec<String>,
    #[serde(default, deserialize_with = "wire::string_list")]
    pub practice_tags: Vec<String>,
    #[serde(default, deserialize_with = "wire::string_list")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "wire::grade")]
    pub min_grade: Option<i64>,
    #[serde(default, deserialize_with = "wire::grade")]
    pub max_grade: Option<i64>,
    #[serde(default, deserialize_with = "wire::flag")]
    pub pending: bool,
    #[serde(default, deserialize_with = "wire::flag")]
    pub listed: bool,
    #[serde(default, deserialize_with = "wire::flag")]
    pub promoted: bool,
    #[serde(default, deserialize_with = "wire::flag")]
    pub deleted: bool,
    #[serde(default)]
    pub associated_content: Option<String>,
    #[serde(default)]
    pub json_properties: Params,
    /// Remaining server fields, kept so records survive a round trip.
    #[serde(flatten)]
    pub extra: Params,
}

impl ContentItem {
    pub fn kind(&self) -> Result<ContentKind, UidError> {
        ContentKind::from_uid(&self.uid)
    }

    /// Ordered child identifiers for hierarchical kinds, empty otherwise.
    pub fn children(&self) -> &[String] {
        match self.kind() {
            Ok(ContentKind::Theme) => &self.topics,
            Ok(ContentKind::Topic) => &self.lessons,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<String>> {
        match self.kind() {
            Ok(ContentKind::Theme) => Some(&mut self.topics),
            Ok(ContentKind::Topic) => Some(&mut self.lessons),
            _ => None,
        }
    }

    /// Files attached through the upload flow.
    pub fn files(&self) -> Vec<AttachedFile> {
        self.json_properties
            .get("files")
            .cloned()
            .and_then(|files| serde_json::from_value(files).ok())
            .unwrap_or_default()
    }
}

/// Metadata stored on a practice after an upload completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub gs_object_name: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Own,
    Google,
    Facebook,
}

impl AuthType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::Own => "own",
            AuthType::Google => "google",
            AuthType::Facebook => "facebook",
        }
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "own" => Ok(AuthType::Own),
            "google" => Ok(AuthType::Google),
            "facebook" => Ok(AuthType::Facebook),
            other => Err(format!("unknown auth type {other:?}")),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `provider:external_id`, e.g. `google:1234` or `own:a@b.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthId {
    pub provider: String,
    pub external_id: String,
}

impl AuthId {
    pub fn parse(raw: &str) -> Option<AuthId> {
        let (provider, external_id) = raw.split_once(':')?;
        if provider.is_empty() {
            return None;
        }
        Some(AuthId {
            provider: provider.to_string(),
            external_id: external_id.to_string(),
        })
    }

    pub fn auth_type(&self) -> Option<AuthType> {
        self.provider.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub short_uid: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub facebook_id: Option<String>,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub short_bio: Option<String>,
    #[serde(default, rename = "_auth_id", alias = "auth_id")]
    pub auth_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn auth_id(&self) -> Option<AuthId> {
        self.auth_id.as_deref().and_then(AuthId::parse)
    }

    /// Provider half of the compound auth identifier, `"unknown"` if absent.
    pub fn account_type(&self) -> String {
        self.auth_id()
            .map(|id| id.provider)
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Profile image: explicit URL first, then the provider avatar.
    pub fn resolve_image(&self) -> Option<String> {
        if let Some(url) = self.image_url.as_deref().filter(|url| !url.is_empty()) {
            return Some(url.replacen("http:", "", 1));
        }
        match self.facebook_id.as_deref() {
            Some(id) if !id.is_empty() && id != "None" => Some(format!(
                "//graph.facebook.com/{id}/picture?type=square"
            )),
            _ => None,
        }
    }
}

/// What a vote or comment is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Lesson(String),
    Practice(String),
}

impl Subject {
    pub fn from_uid(uid: &str) -> Result<Subject, UidError> {
        match ContentKind::from_uid(uid)? {
            ContentKind::Lesson => Ok(Subject::Lesson(uid.to_string())),
            ContentKind::Practice => Ok(Subject::Practice(uid.to_string())),
            other => Err(UidError::WrongKind {
                uid: uid.to_string(),
                expected: "lesson or practice",
                found: other.label(),
            }),
        }
    }

    pub fn uid(&self) -> &str {
        match self {
            Subject::Lesson(uid) | Subject::Practice(uid) => uid,
        }
    }

    /// Parameter name the server expects for this subject.
    pub fn field(&self) -> &'static str {
        match self {
            Subject::Lesson(_) => "lesson_id",
            Subject::Practice(_) => "practice_id",
        }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert(self.field().to_string(), Value::String(self.uid().to_string()));
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub uid: String,
    #[serde(default = "default_true")]
    pub vote_for: bool,
    #[serde(default)]
    pub practice_id: Option<String>,
    #[serde(default)]
    pub lesson_id: Option<String>,
}

impl Vote {
    pub fn subject(&self) -> Option<Subject> {
        match (&self.lesson_id, &self.practice_id) {
            (Some(id), _) => Some(Subject::Lesson(id.clone())),
            (None, Some(id)) => Some(Subject::Practice(id.clone())),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub uid: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub practice_id: Option<String>,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default = "default_true")]
    pub listed: bool,
    #[serde(default)]
    pub created: Option<String>,
    /// Author at the time the comment was fetched.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub uid: String,
    pub body: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub uid: String,
    pub name: String,
    pub url_name: String,
    #[serde(default)]
    pub description: String,
    pub num_phases: u32,
    #[serde(default = "default_true")]
    pub listed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessment {
    pub name: String,
    pub url_name: String,
    #[serde(default)]
    pub description: String,
    pub num_phases: u32,
}

impl NewAssessment {
    pub fn new(name: impl Into<String>, num_phases: u32) -> Self {
        let name = name.into();
        Self {
            url_name: url_name(&name),
            name,
            description: String::new(),
            num_phases,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyAuthMode {
    Initials,
    Ids,
    Msk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub uid: String,
    /// Uid of the assessment this survey distributes.
    pub assessment: String,
    #[serde(default)]
    pub url_name: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub entry_code: String,
    #[serde(default)]
    pub public_keys: Vec<String>,
    #[serde(default)]
    pub num_responses: Vec<u32>,
    pub auth_type: SurveyAuthMode,
    #[serde(default)]
    pub json_properties: Params,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSurvey {
    pub assessment: String,
    pub auth_type: SurveyAuthMode,
    pub group_name: String,
}

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_URL_CHARS: Regex = Regex::new(r"[^a-z0-9\-]").unwrap();
}

/// URL-safe assessment name: lowercase, whitespace runs become one hyphen,
/// everything outside `[a-z0-9-]` is dropped.
pub fn url_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lower, "-");
    NON_URL_CHARS.replace_all(&hyphenated, "").into_owned()
}

fn default_true() -> bool {
    true
}
