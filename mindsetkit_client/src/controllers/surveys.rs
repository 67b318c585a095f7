use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::api::MskApi;
use crate::debounce::Debouncer;
use crate::error::{ApiError, ApiResult};
use crate::models::{url_name, Assessment, NewAssessment, NewSurvey, Params, Survey, SurveyAuthMode};

/// Progress of the most recent background save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving(String),
    Saved(String),
    Failed { uid: String, message: String },
}

/// Case-insensitive substring matches of `partial` among `options`.
/// An empty input offers everything.
pub fn suggest(partial: &str, options: &[String]) -> Vec<String> {
    let needle = partial.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for option in options {
        if option.to_lowercase().contains(&needle) && !found.contains(option) {
            found.push(option.clone());
        }
    }
    found
}

/// Survey distribution panel: assessments on offer and the signed-in
/// user's surveys of them.
pub struct SurveyDistributor {
    api: MskApi,
    assessments: Vec<Assessment>,
    surveys: Vec<Survey>,
    groups: Vec<String>,
    pub suggestions: Vec<String>,
    pub new_assessment: NewAssessment,
    pub new_survey: NewSurvey,
    pub updating: bool,
    pub error_message: String,
    description_saves: HashMap<String, Debouncer>,
    note_saves: HashMap<String, Debouncer>,
    save_state: Arc<watch::Sender<SaveState>>,
}

impl SurveyDistributor {
    pub fn new(api: MskApi) -> Self {
        let (tx, _rx) = watch::channel(SaveState::Idle);
        Self {
            api,
            assessments: Vec::new(),
            surveys: Vec::new(),
            groups: Vec::new(),
            suggestions: Vec::new(),
            new_assessment: NewAssessment::new("", 1),
            new_survey: blank_survey(),
            updating: false,
            error_message: String::new(),
            description_saves: HashMap::new(),
            note_saves: HashMap::new(),
            save_state: Arc::new(tx),
        }
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    /// Distinct group names across the user's surveys, first seen first.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn assessment(&self, uid: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|assessment| assessment.uid == uid)
    }

    pub fn assessment_name(&self, survey: &Survey) -> Option<&str> {
        self.assessment(&survey.assessment)
            .map(|assessment| assessment.name.as_str())
    }

    pub fn subscribe_saves(&self) -> watch::Receiver<SaveState> {
        self.save_state.subscribe()
    }

    /// Loads assessments, then the user's surveys.
    pub async fn load(&mut self) -> ApiResult<()> {
        self.assessments = self.api.assessments().fetch_all().await?;
        self.surveys = self.api.surveys().fetch(Params::new()).await?;
        self.refresh_groups();
        Ok(())
    }

    fn refresh_groups(&mut self) {
        let mut groups: Vec<String> = Vec::new();
        for survey in &self.surveys {
            if !groups.contains(&survey.group_name) {
                groups.push(survey.group_name.clone());
            }
        }
        self.groups = groups;
    }

    /// Renames the draft assessment, keeping its URL name in step.
    pub fn set_assessment_name(&mut self, name: &str) {
        self.new_assessment.name = name.to_string();
        self.new_assessment.url_name = url_name(name);
    }

    pub async fn create_assessment(&mut self) -> ApiResult<bool> {
        self.updating = true;
        self.error_message.clear();
        let result = self.api.assessments().create(&self.new_assessment).await;
        self.updating = false;
        match result {
            Ok(assessment) => {
                tracing::info!(uid = %assessment.uid, url_name = %assessment.url_name, "assessment created");
                self.assessments.push(assessment);
                self.new_assessment = NewAssessment::new("", 1);
                Ok(true)
            }
            Err(err) => self.rejected(err),
        }
    }

    /// Saves an edited description once typing pauses.
    pub fn description_changed(&mut self, uid: &str, description: &str) {
        if let Some(assessment) = self.assessments.iter_mut().find(|a| a.uid == uid) {
            assessment.description = description.to_string();
        }
        let api = self.api.clone();
        let state = self.save_state.clone();
        let uid = uid.to_string();
        let description = description.to_string();
        self.description_saves
            .entry(uid.clone())
            .or_default()
            .schedule(async move {
                state.send_replace(SaveState::Saving(uid.clone()));
                let saved = api
                    .assessments()
                    .update_description(&uid, &description)
                    .await;
                publish(&state, uid, saved.map(|_| ()));
            });
    }

    /// Prepares the draft survey for an assessment.
    pub fn set_current_assessment(&mut self, uid: &str) -> ApiResult<()> {
        if self.assessment(uid).is_none() {
            return Err(ApiError::contract(format!("unknown assessment {uid}")));
        }
        self.new_survey.assessment = uid.to_string();
        Ok(())
    }

    pub fn show_group_suggestions(&mut self) {
        self.suggestions = suggest(&self.new_survey.group_name, &self.groups);
    }

    pub fn hide_group_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn select_group(&mut self, group: &str) {
        self.new_survey.group_name = group.to_string();
        self.hide_group_suggestions();
    }

    pub async fn create_survey(&mut self) -> ApiResult<bool> {
        if self.new_survey.assessment.is_empty() {
            return Err(ApiError::contract("survey draft has no assessment"));
        }
        self.updating = true;
        self.error_message.clear();
        let result = self.api.surveys().create(&self.new_survey).await;
        self.updating = false;
        match result {
            Ok(survey) => {
                tracing::info!(uid = %survey.uid, code = %survey.entry_code, "survey created");
                self.surveys.push(survey);
                self.refresh_groups();
                self.new_survey = blank_survey();
                Ok(true)
            }
            Err(err) => self.rejected(err),
        }
    }

    /// Deletes a survey along with its collected responses.
    pub async fn delete_survey(&mut self, uid: &str) -> ApiResult<()> {
        self.api.surveys().delete(uid).await?;
        self.surveys.retain(|survey| survey.uid != uid);
        if let Some(mut pending) = self.note_saves.remove(uid) {
            pending.cancel();
        }
        self.refresh_groups();
        Ok(())
    }

    /// Records the note for one phase of a survey and saves the survey's
    /// properties once typing pauses. `notes` holds one entry per phase of
    /// the survey's assessment.
    pub fn note_changed(&mut self, uid: &str, phase: usize, note: &str) -> ApiResult<()> {
        let survey = self
            .surveys
            .iter()
            .find(|survey| survey.uid == uid)
            .ok_or_else(|| ApiError::contract(format!("unknown survey {uid}")))?;
        let mut notes = match survey.json_properties.get("notes") {
            Some(Value::Array(notes)) => notes.clone(),
            _ => Vec::new(),
        };
        let phases = self
            .assessment(&survey.assessment)
            .map(|assessment| assessment.num_phases as usize)
            .unwrap_or(notes.len());
        if phase >= phases {
            return Err(ApiError::contract(format!(
                "survey {uid} has no phase {}",
                phase + 1
            )));
        }
        if notes.len() < phases {
            notes.resize(phases, Value::String(String::new()));
        }
        notes[phase] = Value::String(note.to_string());

        let Some(survey) = self.surveys.iter_mut().find(|survey| survey.uid == uid) else {
            return Err(ApiError::contract(format!("unknown survey {uid}")));
        };
        survey
            .json_properties
            .insert("notes".to_string(), Value::Array(notes));
        let properties = survey.json_properties.clone();

        let api = self.api.clone();
        let state = self.save_state.clone();
        let uid = uid.to_string();
        self.note_saves
            .entry(uid.clone())
            .or_default()
            .schedule(async move {
                state.send_replace(SaveState::Saving(uid.clone()));
                let saved = api
                    .surveys()
                    .update_json_properties(&uid, &properties)
                    .await;
                publish(&state, uid, saved.map(|_| ()));
            });
        Ok(())
    }

    /// Server-side rejections become the form's message; anything else is
    /// returned.
    fn rejected(&mut self, err: ApiError) -> ApiResult<bool> {
        if let ApiError::Application { message } = &err {
            self.error_message = message.clone();
            return Ok(false);
        }
        self.error_message = err.message().unwrap_or(super::GENERIC_ERROR).to_string();
        Err(err)
    }
}

fn blank_survey() -> NewSurvey {
    NewSurvey {
        assessment: String::new(),
        auth_type: SurveyAuthMode::Initials,
        group_name: String::new(),
    }
}

fn publish(state: &watch::Sender<SaveState>, uid: String, saved: ApiResult<()>) {
    match saved {
        Ok(()) => {
            state.send_replace(SaveState::Saved(uid));
        }
        Err(err) => {
            tracing::warn!(error = %err, %uid, "autosave failed");
            state.send_replace(SaveState::Failed {
                uid,
                message: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_match_anywhere_ignoring_case() {
        let groups = vec![
            "Period 1".to_string(),
            "period 2".to_string(),
            "Homeroom".to_string(),
        ];
        assert_eq!(suggest("PERIOD", &groups), ["Period 1", "period 2"]);
        assert_eq!(suggest("room", &groups), ["Homeroom"]);
        assert_eq!(suggest("", &groups).len(), 3);
        assert!(suggest("zzz", &groups).is_empty());
    }
}
