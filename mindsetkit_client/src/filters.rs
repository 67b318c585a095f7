//! Field allow-lists applied before parameters leave the client.

use crate::models::{ContentKind, Params};

/// Updatable fields shared by themes, topics and lessons.
pub const CONTENT_UPDATABLE: &[&str] = &[
    "color",
    "estimated_duration",
    "lesson_count",
    "listed",
    "name",
    "promoted",
    "subjects",
    "summary",
    "tags",
    "target_audience",
    "type",
    "youtube_id",
    "wistia_id",
    "locale",
    "iframe_src",
];

/// Updatable fields for practices: the upload form plus moderation flags.
pub const PRACTICE_UPDATABLE: &[&str] = &[
    "name",
    "summary",
    "body",
    "tags",
    "subjects",
    "min_grade",
    "max_grade",
    "time_of_year",
    "class_period",
    "youtube_id",
    "iframe_src",
    "listed",
    "pending",
    "promoted",
    "deleted",
    "associated_content",
];

/// Only these keys may reach the search endpoint.
pub const SEARCHABLE: &[&str] = &[
    "q",
    "tags",
    "min_grade",
    "max_grade",
    "subjects",
    "page",
    "content_type",
];

pub fn updatable_fields(kind: ContentKind) -> &'static [&'static str] {
    match kind {
        ContentKind::Practice => PRACTICE_UPDATABLE,
        ContentKind::Theme | ContentKind::Topic | ContentKind::Lesson => CONTENT_UPDATABLE,
    }
}

/// Copies the allowed keys of `params`, values untouched.
pub fn allow_list(params: &Params, allowed: &[&str]) -> Params {
    params
        .iter()
        .filter(|(key, _)| allowed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub fn update_fields(kind: ContentKind, params: &Params) -> Params {
    let filtered = allow_list(params, updatable_fields(kind));
    if filtered.len() != params.len() {
        let dropped: Vec<&str> = params
            .keys()
            .filter(|key| !filtered.contains_key(*key))
            .map(String::as_str)
            .collect();
        tracing::debug!(kind = %kind, ?dropped, "dropping non-updatable fields");
    }
    filtered
}

pub fn search_params(params: &Params) -> Params {
    allow_list(params, SEARCHABLE)
}
