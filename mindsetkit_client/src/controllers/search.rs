use serde_json::{json, Value};

use crate::api::MskApi;
use crate::error::ApiResult;
use crate::models::{ContentItem, ContentKind, Params};
use crate::pagination::{PageList, RequestGeneration, Ticket};
use crate::tags::{self, TagOption, GRADE_LEVELS};

/// Lowest and highest grade numbers. A bound at either end is not sent.
pub const MIN_GRADE: u8 = 0;
pub const MAX_GRADE: u8 = (GRADE_LEVELS.len() - 1) as u8;

const POPULAR_TAGS: [&str; 4] = ["Growth Mindset", "Lesson Plans", "Assessment", "Belonging"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroup {
    /// Every mindset and practice tag.
    Topics,
    Popular,
    Mindset,
    Subjects,
}

impl FilterGroup {
    pub const ALL: [FilterGroup; 4] = [
        FilterGroup::Topics,
        FilterGroup::Popular,
        FilterGroup::Mindset,
        FilterGroup::Subjects,
    ];
}

/// One search call, stamped so a late answer to an older query is dropped.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub ticket: Ticket,
    pub page: u32,
    pub params: Params,
}

/// Site-wide search over themes, lessons and practices.
pub struct ContentSearch {
    api: MskApi,
    pub query: String,
    /// `theme`, `lesson`, `practice`, or empty for everything.
    pub content_type: String,
    pub topic_tags: Vec<TagOption>,
    pub popular_tags: Vec<TagOption>,
    pub mindset_tags: Vec<TagOption>,
    pub school_subjects: Vec<TagOption>,
    /// Tags arriving in a query that match no known option.
    pub extra_tags: Vec<TagOption>,
    pub grades: (u8, u8),
    pub filter_count: usize,
    pub loading: bool,
    pub themes: Vec<ContentItem>,
    results: PageList<ContentItem>,
    generation: RequestGeneration,
}

impl ContentSearch {
    pub fn new(api: MskApi) -> Self {
        let page_size = api.config().page_size;
        let mut topic_tags = tags::mindset_tags();
        topic_tags.extend(tags::practice_tags());
        Self {
            api,
            query: String::new(),
            content_type: String::new(),
            topic_tags,
            popular_tags: tags::group(POPULAR_TAGS),
            mindset_tags: tags::mindset_tags(),
            school_subjects: tags::school_subjects(),
            extra_tags: Vec::new(),
            grades: (MIN_GRADE, MAX_GRADE),
            filter_count: 0,
            loading: false,
            themes: Vec::new(),
            results: PageList::new(page_size),
            generation: RequestGeneration::new(),
        }
    }

    pub fn group(&self, group: FilterGroup) -> &[TagOption] {
        match group {
            FilterGroup::Topics => &self.topic_tags,
            FilterGroup::Popular => &self.popular_tags,
            FilterGroup::Mindset => &self.mindset_tags,
            FilterGroup::Subjects => &self.school_subjects,
        }
    }

    fn group_mut(&mut self, group: FilterGroup) -> &mut Vec<TagOption> {
        match group {
            FilterGroup::Topics => &mut self.topic_tags,
            FilterGroup::Popular => &mut self.popular_tags,
            FilterGroup::Mindset => &mut self.mindset_tags,
            FilterGroup::Subjects => &mut self.school_subjects,
        }
    }

    /// Flips one option. Subjects do not count toward the filter badge.
    pub fn toggle_filter(&mut self, group: FilterGroup, name: &str) -> Option<bool> {
        let option = self
            .group_mut(group)
            .iter_mut()
            .find(|option| option.name == name)?;
        option.active = !option.active;
        let active = option.active;
        if group != FilterGroup::Subjects {
            if active {
                self.filter_count += 1;
            } else {
                self.filter_count = self.filter_count.saturating_sub(1);
            }
        }
        Some(active)
    }

    pub fn remove_filters(&mut self) {
        self.filter_count = 0;
        for group in FilterGroup::ALL {
            tags::clear(self.group_mut(group));
        }
        self.extra_tags.clear();
        self.grades = (MIN_GRADE, MAX_GRADE);
    }

    pub fn set_content_type(&mut self, kind: Option<ContentKind>) {
        self.content_type = kind.map(|kind| kind.label().to_string()).unwrap_or_default();
    }

    /// Sets the grade slider, clamped to the known range and kept ordered.
    pub fn set_grades(&mut self, min: u8, max: u8) {
        let min = min.min(MAX_GRADE);
        let max = max.clamp(min, MAX_GRADE);
        self.grades = (min, max);
    }

    pub fn grade_labels(&self) -> (&'static str, &'static str) {
        (
            GRADE_LEVELS[self.grades.0 as usize],
            GRADE_LEVELS[self.grades.1 as usize],
        )
    }

    /// Active tag names across the tag groups, first occurrence kept.
    fn active_tags(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let groups = [
            &self.topic_tags,
            &self.popular_tags,
            &self.mindset_tags,
            &self.extra_tags,
        ];
        for name in groups.into_iter().flat_map(|group| tags::to_wire_format(group)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Query for `page`. Grade bounds at the ends of the range, an empty
    /// content type and page zero are left out.
    pub fn query_params(&self, page: u32) -> Params {
        let mut params = Params::new();
        params.insert("q".into(), json!(self.query));
        params.insert("tags".into(), json!(self.active_tags()));
        params.insert(
            "subjects".into(),
            json!(tags::to_wire_format(&self.school_subjects)),
        );
        if self.grades.0 > MIN_GRADE {
            params.insert("min_grade".into(), json!(self.grades.0));
        }
        if self.grades.1 < MAX_GRADE {
            params.insert("max_grade".into(), json!(self.grades.1));
        }
        if !self.content_type.is_empty() {
            params.insert("content_type".into(), json!(self.content_type));
        }
        if page > 0 {
            params.insert("page".into(), json!(page));
        }
        params
    }

    /// Restores filter state from a query such as one read back from a
    /// shared link. Tags matching no option are kept in `extra_tags`.
    pub fn apply_query(&mut self, params: &Params) {
        if let Some(q) = params.get("q").and_then(Value::as_str) {
            self.query = q.to_string();
        }
        self.content_type = params
            .get("content_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let names = string_list(params.get("tags"));
        for group in [FilterGroup::Topics, FilterGroup::Popular, FilterGroup::Mindset] {
            tags::apply_wire_format(self.group_mut(group), &names);
        }
        for name in &names {
            let known = [&self.topic_tags, &self.popular_tags, &self.mindset_tags]
                .iter()
                .any(|group| group.iter().any(|option| &option.name == name));
            let seen = self.extra_tags.iter().any(|option| &option.name == name);
            if !known && !seen {
                let mut option = TagOption::new(name.clone());
                option.active = true;
                self.extra_tags.push(option);
            }
        }
        let subjects = string_list(params.get("subjects"));
        tags::apply_wire_format(&mut self.school_subjects, &subjects);

        let min = grade(params.get("min_grade")).unwrap_or(MIN_GRADE);
        let max = grade(params.get("max_grade")).unwrap_or(MAX_GRADE);
        self.set_grades(min, max);
        self.filter_count = [&self.topic_tags, &self.popular_tags, &self.mindset_tags]
            .iter()
            .map(|group| tags::active_count(group))
            .sum::<usize>()
            + self.extra_tags.len();
    }

    pub fn results(&self) -> &PageList<ContentItem> {
        &self.results
    }

    pub fn items(&self) -> &[ContentItem] {
        self.results.items()
    }

    pub fn should_paginate(&self) -> bool {
        self.results.should_paginate()
    }

    pub fn begin_update(&mut self) -> ContentRequest {
        self.results.reset();
        self.loading = true;
        ContentRequest {
            ticket: self.generation.issue(),
            page: 0,
            params: self.query_params(0),
        }
    }

    pub fn begin_load_more(&mut self) -> ContentRequest {
        let page = self.results.advance();
        self.loading = true;
        ContentRequest {
            ticket: self.generation.issue(),
            page,
            params: self.query_params(page),
        }
    }

    /// Applies a response. Returns false when a newer query superseded it.
    pub fn finish(&mut self, request: &ContentRequest, batch: Vec<ContentItem>) -> bool {
        if !self.generation.is_current(request.ticket) {
            tracing::debug!(page = request.page, "dropping stale search page");
            return false;
        }
        self.results.receive(request.page, batch);
        self.loading = false;
        true
    }

    /// Runs the current filters from page zero.
    pub async fn update_search(&mut self) -> ApiResult<()> {
        let request = self.begin_update();
        self.run(request).await
    }

    pub async fn load_more(&mut self) -> ApiResult<()> {
        let request = self.begin_load_more();
        self.run(request).await
    }

    /// Themes offered as browse links beside the results.
    pub async fn load_themes(&mut self) -> ApiResult<()> {
        self.themes = self.api.themes().fetch_all(0).await?;
        Ok(())
    }

    async fn run(&mut self, request: ContentRequest) -> ApiResult<()> {
        tracing::debug!(page = request.page, query = %self.query, "searching content");
        match self.api.content().search(&request.params).await {
            Ok(batch) => {
                self.finish(&request, batch);
                Ok(())
            }
            Err(err) => {
                if self.generation.is_current(request.ticket) {
                    self.loading = false;
                }
                Err(err)
            }
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn grade(value: Option<&Value>) -> Option<u8> {
    let value = value?;
    let n = value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))?;
    u8::try_from(n).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use pretty_assertions::assert_eq;

    fn search() -> ContentSearch {
        let config = ClientConfig::new("http://localhost:9").unwrap();
        ContentSearch::new(MskApi::new(config).unwrap())
    }

    fn item(n: usize) -> ContentItem {
        serde_json::from_value(json!({ "uid": format!("Lesson_{n}") })).unwrap()
    }

    #[test]
    fn grade_bounds_at_the_ends_are_omitted() {
        let mut search = search();
        let params = search.query_params(0);
        assert!(params.get("min_grade").is_none());
        assert!(params.get("max_grade").is_none());
        assert!(params.get("page").is_none());
        assert!(params.get("content_type").is_none());
        assert_eq!(params["q"], json!(""));

        search.set_grades(3, 13);
        let params = search.query_params(2);
        assert_eq!(params["min_grade"], json!(3));
        assert!(params.get("max_grade").is_none());
        assert_eq!(params["page"], json!(2));

        search.set_grades(0, 8);
        let params = search.query_params(0);
        assert!(params.get("min_grade").is_none());
        assert_eq!(params["max_grade"], json!(8));
        assert_eq!(search.grade_labels(), ("Kindergarten", "8th"));
    }

    #[test]
    fn grades_are_clamped_and_ordered() {
        let mut search = search();
        search.set_grades(9, 4);
        assert_eq!(search.grades, (9, 9));
        search.set_grades(40, 50);
        assert_eq!(search.grades, (MAX_GRADE, MAX_GRADE));
    }

    #[test]
    fn shared_tag_is_sent_once() {
        let mut search = search();
        search.toggle_filter(FilterGroup::Popular, "Growth Mindset");
        search.toggle_filter(FilterGroup::Mindset, "Growth Mindset");
        search.toggle_filter(FilterGroup::Topics, "Feedback");
        search.toggle_filter(FilterGroup::Subjects, "Math");
        search.set_content_type(Some(ContentKind::Practice));

        let params = search.query_params(0);
        assert_eq!(params["tags"], json!(["Feedback", "Growth Mindset"]));
        assert_eq!(params["subjects"], json!(["Math"]));
        assert_eq!(params["content_type"], json!("practice"));
        assert_eq!(search.filter_count, 3);
    }

    #[test]
    fn query_restores_filters() {
        let mut search = search();
        let mut query = Params::new();
        query.insert("q".into(), json!("praise"));
        query.insert("tags".into(), json!(["Belonging", "Homework"]));
        query.insert("subjects".into(), json!("Science"));
        query.insert("min_grade".into(), json!("6"));
        query.insert("content_type".into(), json!("lesson"));
        search.apply_query(&query);

        assert_eq!(search.query, "praise");
        assert_eq!(tags::to_wire_format(&search.mindset_tags), ["Belonging"]);
        assert_eq!(tags::to_wire_format(&search.popular_tags), ["Belonging"]);
        assert_eq!(tags::to_wire_format(&search.extra_tags), ["Homework"]);
        assert_eq!(tags::to_wire_format(&search.school_subjects), ["Science"]);
        assert_eq!(search.grades, (6, MAX_GRADE));

        let params = search.query_params(0);
        assert_eq!(params["tags"], json!(["Belonging", "Homework"]));
        assert_eq!(params["content_type"], json!("lesson"));

        search.remove_filters();
        assert_eq!(search.query_params(0)["tags"], json!([]));
        assert_eq!(search.filter_count, 0);
    }

    #[test]
    fn pages_accumulate_until_short() {
        let mut search = search();
        let first = search.begin_update();
        assert!(search.finish(&first, (0..20).map(item).collect()));
        assert!(search.should_paginate());

        let second = search.begin_load_more();
        assert_eq!(second.page, 1);
        assert_eq!(second.params["page"], json!(1));
        assert!(search.finish(&second, (20..23).map(item).collect()));
        assert_eq!(search.items().len(), 23);
        assert!(!search.should_paginate());
    }

    #[test]
    fn stale_answer_is_dropped() {
        let mut search = search();
        let old = search.begin_update();
        search.query = "new".into();
        let new = search.begin_update();
        assert!(search.finish(&new, vec![item(1)]));
        assert!(!search.finish(&old, (0..20).map(item).collect()));
        assert_eq!(search.items().len(), 1);
    }
}
