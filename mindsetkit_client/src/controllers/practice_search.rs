use serde_json::{json, Value};

use crate::api::MskApi;
use crate::error::ApiResult;
use crate::models::{ContentItem, Params};
use crate::pagination::{PageList, RequestGeneration, Ticket};
use crate::tags::{self, TagOption};

/// Full-page length checked after `load_more`. Page zero uses the
/// configured page size instead; the server pages by that size in both
/// cases.
pub const LOAD_MORE_PAGE_END: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagGroup {
    Mindset,
    Practice,
    Subjects,
    Grades,
}

impl TagGroup {
    pub const ALL: [TagGroup; 4] = [
        TagGroup::Mindset,
        TagGroup::Practice,
        TagGroup::Subjects,
        TagGroup::Grades,
    ];

    /// Query parameter the group is sent as.
    pub fn param(self) -> &'static str {
        match self {
            TagGroup::Mindset => "mindset_tags",
            TagGroup::Practice => "practice_tags",
            TagGroup::Subjects => "subjects",
            TagGroup::Grades => "grade_levels",
        }
    }
}

/// A list request captured before it is sent, so its response can be
/// matched against later queries.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub page: u32,
    pub params: Params,
}

/// Practice browsing with tag filters and "load more".
pub struct PracticeSearch {
    api: MskApi,
    pub mindset_tags: Vec<TagOption>,
    pub practice_tags: Vec<TagOption>,
    pub school_subjects: Vec<TagOption>,
    pub grade_levels: Vec<TagOption>,
    pub filter_count: usize,
    pub loading: bool,
    results: PageList<ContentItem>,
    generation: RequestGeneration,
}

impl PracticeSearch {
    pub fn new(api: MskApi) -> Self {
        let page_size = api.config().page_size;
        Self {
            api,
            mindset_tags: tags::mindset_tags(),
            practice_tags: tags::practice_tags(),
            school_subjects: tags::school_subjects(),
            grade_levels: tags::group(["K-2nd", "3rd-5th", "6th-8th", "High School", "Postsecondary"]),
            filter_count: 0,
            loading: false,
            results: PageList::new(page_size),
            generation: RequestGeneration::new(),
        }
    }

    pub fn group(&self, group: TagGroup) -> &[TagOption] {
        match group {
            TagGroup::Mindset => &self.mindset_tags,
            TagGroup::Practice => &self.practice_tags,
            TagGroup::Subjects => &self.school_subjects,
            TagGroup::Grades => &self.grade_levels,
        }
    }

    fn group_mut(&mut self, group: TagGroup) -> &mut Vec<TagOption> {
        match group {
            TagGroup::Mindset => &mut self.mindset_tags,
            TagGroup::Practice => &mut self.practice_tags,
            TagGroup::Subjects => &mut self.school_subjects,
            TagGroup::Grades => &mut self.grade_levels,
        }
    }

    /// Flips one option and keeps the filter count in step. Returns the new
    /// state, or `None` for an unknown name.
    pub fn toggle_filter(&mut self, group: TagGroup, name: &str) -> Option<bool> {
        let option = self
            .group_mut(group)
            .iter_mut()
            .find(|option| option.name == name)?;
        option.active = !option.active;
        let active = option.active;
        if active {
            self.filter_count += 1;
        } else {
            self.filter_count = self.filter_count.saturating_sub(1);
        }
        Some(active)
    }

    pub fn remove_filters(&mut self) {
        self.filter_count = 0;
        for group in TagGroup::ALL {
            tags::clear(self.group_mut(group));
        }
    }

    pub fn practices(&self) -> &[ContentItem] {
        self.results.items()
    }

    pub fn results(&self) -> &PageList<ContentItem> {
        &self.results
    }

    pub fn should_paginate(&self) -> bool {
        self.results.should_paginate()
    }

    pub fn no_data(&self) -> bool {
        self.results.no_data()
    }

    /// Query sent for `page`: active tag groups as JSON array strings,
    /// listed practices only, newest first.
    pub fn query_options(&self, page: u32) -> Params {
        let mut options = Params::new();
        for group in TagGroup::ALL {
            let active = self.group(group);
            if tags::active_count(active) > 0 {
                options.insert(group.param().to_string(), Value::String(tags::serialize(active)));
            }
        }
        options.insert("listed".into(), json!(true));
        options.insert("order".into(), json!("-created"));
        options.insert("page".into(), json!(page));
        options
    }

    /// Starts a fresh query at page zero and clears the shown results.
    pub fn begin_update(&mut self) -> SearchRequest {
        self.results.reset();
        self.loading = true;
        SearchRequest {
            ticket: self.generation.issue(),
            page: 0,
            params: self.query_options(0),
        }
    }

    /// Asks for the page after the last one received.
    pub fn begin_load_more(&mut self) -> SearchRequest {
        let page = self.results.advance();
        self.loading = true;
        SearchRequest {
            ticket: self.generation.issue(),
            page,
            params: self.query_options(page),
        }
    }

    /// Applies a response. Returns false when a newer request superseded it.
    pub fn finish(&mut self, request: &SearchRequest, batch: Vec<ContentItem>) -> bool {
        if !self.generation.is_current(request.ticket) {
            tracing::debug!(page = request.page, "dropping stale practice page");
            return false;
        }
        if request.page == 0 {
            self.results.receive(0, batch);
        } else {
            self.results
                .receive_with_page_end(request.page, batch, LOAD_MORE_PAGE_END);
        }
        self.loading = false;
        true
    }

    fn fail(&mut self, request: &SearchRequest) {
        if self.generation.is_current(request.ticket) {
            self.loading = false;
        }
    }

    pub async fn update_search(&mut self) -> ApiResult<()> {
        let request = self.begin_update();
        self.run(request).await
    }

    pub async fn load_more(&mut self) -> ApiResult<()> {
        let request = self.begin_load_more();
        self.run(request).await
    }

    async fn run(&mut self, request: SearchRequest) -> ApiResult<()> {
        match self.api.practices().find(&request.params).await {
            Ok(batch) => {
                self.finish(&request, batch);
                Ok(())
            }
            Err(err) => {
                self.fail(&request);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn search() -> PracticeSearch {
        let config = ClientConfig::new("http://localhost:9").unwrap();
        PracticeSearch::new(MskApi::new(config).unwrap())
    }

    fn practice(n: usize) -> ContentItem {
        serde_json::from_value(json!({ "uid": format!("Practice_{n}") })).unwrap()
    }

    #[test]
    fn toggles_track_filter_count() {
        let mut search = search();
        assert_eq!(search.toggle_filter(TagGroup::Mindset, "Belonging"), Some(true));
        assert_eq!(search.toggle_filter(TagGroup::Subjects, "Math"), Some(true));
        assert_eq!(search.filter_count, 2);
        assert_eq!(search.toggle_filter(TagGroup::Mindset, "Belonging"), Some(false));
        assert_eq!(search.filter_count, 1);
        assert_eq!(search.toggle_filter(TagGroup::Mindset, "Nope"), None);

        search.remove_filters();
        assert_eq!(search.filter_count, 0);
        assert!(search.query_options(0).get("subjects").is_none());
    }

    #[test]
    fn query_options_carry_tags_as_json_strings() {
        let mut search = search();
        search.toggle_filter(TagGroup::Practice, "Feedback");
        search.toggle_filter(TagGroup::Practice, "Attendance");
        let options = search.query_options(3);
        assert_eq!(options["practice_tags"], json!(r#"["Attendance","Feedback"]"#));
        assert_eq!(options["listed"], json!(true));
        assert_eq!(options["order"], json!("-created"));
        assert_eq!(options["page"], json!(3));
        assert!(options.get("mindset_tags").is_none());
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut search = search();
        let first = search.begin_update();
        let second = search.begin_update();

        assert!(search.finish(&second, vec![practice(1)]));
        assert!(!search.finish(&first, vec![practice(7), practice(8)]));
        assert_eq!(search.practices().len(), 1);
        assert!(!search.loading);
    }

    #[test]
    fn load_more_appends_and_uses_short_page_end() {
        let mut search = search();
        let first = search.begin_update();
        search.finish(&first, (0..20).map(practice).collect());
        assert!(search.should_paginate());

        let more = search.begin_load_more();
        assert_eq!(more.page, 1);
        assert!(!search.should_paginate());
        search.finish(&more, (20..30).map(practice).collect());
        assert_eq!(search.practices().len(), 30);
        assert!(search.should_paginate());
    }
}
