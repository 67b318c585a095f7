mod common;

use std::time::Duration;

use common::{api_for, ok};
use mindsetkit_client::controllers::surveys::{SaveState, SurveyDistributor};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn assessment() -> serde_json::Value {
    json!({
        "uid": "Assessment_1",
        "name": "Growth Survey",
        "url_name": "growth-survey",
        "description": "",
        "num_phases": 2
    })
}

async fn loaded(server: &MockServer) -> SurveyDistributor {
    Mock::given(method("GET"))
        .and(path("/api/assessments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([assessment()]))))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/surveys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"uid": "Survey_1", "assessment": "Assessment_1", "group_name": "Period 1", "auth_type": "ids"},
            {"uid": "Survey_2", "assessment": "Assessment_1", "group_name": "Period 2", "auth_type": "ids"},
            {"uid": "Survey_3", "assessment": "Assessment_1", "group_name": "Period 1", "auth_type": "msk"}
        ]))))
        .mount(server)
        .await;

    let mut distributor = SurveyDistributor::new(api_for(server));
    distributor.load().await.unwrap();
    distributor
}

#[tokio::test]
async fn load_builds_group_list() {
    let server = MockServer::start().await;
    let mut distributor = loaded(&server).await;

    assert_eq!(distributor.groups(), ["Period 1", "Period 2"]);
    let first = distributor.surveys()[0].clone();
    assert_eq!(distributor.assessment_name(&first), Some("Growth Survey"));

    distributor.new_survey.group_name = "2".into();
    distributor.show_group_suggestions();
    assert_eq!(distributor.suggestions, ["Period 2"]);
    distributor.select_group("Period 2");
    assert!(distributor.suggestions.is_empty());
}

#[tokio::test]
async fn description_edits_are_saved_once_typing_stops() {
    let server = MockServer::start().await;
    let mut distributor = loaded(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/assessments/Assessment_1"))
        .and(body_json(json!({"description": "Third draft"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(assessment())))
        .expect(1)
        .mount(&server)
        .await;

    let mut saves = distributor.subscribe_saves();
    for draft in ["First", "Second", "Third draft"] {
        distributor.description_changed("Assessment_1", draft);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(distributor.assessments()[0].description, "Third draft");

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            saves.changed().await.unwrap();
            if matches!(*saves.borrow(), SaveState::Saved(_)) {
                break;
            }
        }
    })
    .await
    .expect("autosave finished");

    let puts = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.as_str() == "PUT")
        .count();
    assert_eq!(puts, 1);
}

#[tokio::test]
async fn rejected_assessment_shows_server_message() {
    let server = MockServer::start().await;
    let mut distributor = loaded(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/assessments"))
        .and(body_json(json!({
            "name": "Growth Survey",
            "url_name": "growth-survey",
            "description": "",
            "num_phases": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::failed("url_name taken")))
        .expect(1)
        .mount(&server)
        .await;

    distributor.set_assessment_name("Growth Survey");
    assert!(!distributor.create_assessment().await.unwrap());
    assert_eq!(distributor.error_message, "url_name taken");
    assert_eq!(distributor.assessments().len(), 1);
}

#[tokio::test]
async fn deleting_a_survey_refreshes_groups() {
    let server = MockServer::start().await;
    let mut distributor = loaded(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/surveys/Survey_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    distributor.delete_survey("Survey_2").await.unwrap();
    assert_eq!(distributor.surveys().len(), 2);
    assert_eq!(distributor.groups(), ["Period 1"]);
}

#[tokio::test]
async fn phase_notes_are_saved_by_index() {
    let server = MockServer::start().await;
    let mut distributor = loaded(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/surveys/Survey_1"))
        .and(body_json(json!({
            "json_properties": r#"{"notes":["","Week two went well"]}"#
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "uid": "Survey_1",
            "assessment": "Assessment_1",
            "auth_type": "ids",
            "json_properties": {"notes": ["", "Week two went well"]}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut saves = distributor.subscribe_saves();
    distributor.note_changed("Survey_1", 1, "Week two").unwrap();
    distributor
        .note_changed("Survey_1", 1, "Week two went well")
        .unwrap();
    assert!(distributor.note_changed("Survey_1", 2, "No such phase").is_err());
    assert_eq!(
        distributor.surveys()[0].json_properties["notes"],
        json!(["", "Week two went well"])
    );

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            saves.changed().await.unwrap();
            if matches!(*saves.borrow(), SaveState::Saved(_)) {
                break;
            }
        }
    })
    .await
    .expect("autosave finished");
}
