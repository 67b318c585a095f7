//! Checkbox-style tag groups and their wire representation.
//!
//! A group is a list of `{name, active}` options. On the wire only the
//! names of active options travel, as a JSON array string.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOption {
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

impl TagOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }
}

pub fn group<I, S>(names: I) -> Vec<TagOption>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(TagOption::new).collect()
}

/// Names of the active options, in group order.
pub fn to_wire_format(tags: &[TagOption]) -> Vec<String> {
    tags.iter()
        .filter(|tag| tag.active)
        .map(|tag| tag.name.clone())
        .collect()
}

/// Activates every option whose name is listed. Options not listed keep
/// their current state; unknown names are ignored.
pub fn apply_wire_format<S: AsRef<str>>(tags: &mut [TagOption], names: &[S]) {
    for tag in tags.iter_mut() {
        if names.iter().any(|name| name.as_ref() == tag.name) {
            tag.active = true;
        }
    }
}

/// [`to_wire_format`] serialized the way the server reads tag parameters.
pub fn serialize(tags: &[TagOption]) -> String {
    serde_json::to_string(&to_wire_format(tags)).unwrap_or_else(|_| "[]".to_string())
}

pub fn clear(tags: &mut [TagOption]) {
    for tag in tags.iter_mut() {
        tag.active = false;
    }
}

pub fn active_count(tags: &[TagOption]) -> usize {
    tags.iter().filter(|tag| tag.active).count()
}

pub fn mindset_tags() -> Vec<TagOption> {
    group(["Growth Mindset", "Belonging", "Purpose & Relevance", "Self-efficacy"])
}

pub fn practice_tags() -> Vec<TagOption> {
    group([
        "Participation",
        "Attendance",
        "Messaging/framing",
        "Classroom Mgmt",
        "Feedback",
        "Assessment",
        "Lesson Plans",
        "Discussions",
        "Collaboration",
        "Professional Dev.",
    ])
}

pub fn school_subjects() -> Vec<TagOption> {
    group(["Math", "English / Lit.", "Science", "Social Studies", "Other"])
}

/// Grade labels indexed by grade number; 0 is kindergarten, 13 postsecondary.
pub const GRADE_LEVELS: [&str; 14] = [
    "Kindergarten",
    "1st",
    "2nd",
    "3rd",
    "4th",
    "5th",
    "6th",
    "7th",
    "8th",
    "9th",
    "10th",
    "11th",
    "12th",
    "Postsecondary",
];

pub fn grade_levels() -> Vec<TagOption> {
    group(GRADE_LEVELS)
}
