mod common;

use common::{api_for, failed, ok};
use mindsetkit_client::controllers::admin::{ContentEditor, CHECK_FIELDS, SAVE_FAILED};
use mindsetkit_client::{ContentItem, ContentKind, Params};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn item(value: Value) -> ContentItem {
    serde_json::from_value(value).unwrap()
}

fn uids(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|item| item.uid.as_str()).collect()
}

#[tokio::test]
async fn incomplete_draft_is_not_sent() {
    let server = MockServer::start().await;
    let mut editor = ContentEditor::new(api_for(&server));
    editor.draft.name = "Growth basics".into();
    editor.draft.id = "growth-basics".into();
    editor.draft.summary = "What a growth mindset is".into();

    assert!(!editor.create_object().await.unwrap());
    assert_eq!(editor.error, CHECK_FIELDS);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn created_theme_joins_the_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/themes"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"uid": "Theme_1", "name": "Belonging"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/themes"))
        .and(body_json(json!({
            "id": "growth-basics",
            "name": "Growth basics",
            "summary": "What a growth mindset is",
            "color": "#336699"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "uid": "Theme_growth-basics",
            "name": "Growth basics"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = ContentEditor::new(api_for(&server));
    editor.set_model(ContentKind::Theme).await.unwrap();
    editor.draft.id = "growth-basics".into();
    editor.draft.name = "Growth basics".into();
    editor.draft.summary = "What a growth mindset is".into();
    editor.draft.color = "#336699".into();

    assert!(editor.create_object().await.unwrap());
    assert_eq!(uids(editor.objects()), ["Theme_1", "Theme_growth-basics"]);
    assert!(editor.draft.name.is_empty());
    assert!(editor.error.is_empty());
}

#[tokio::test]
async fn lesson_tag_edits_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/lessons/Lesson_1"))
        .and(body_json(json!({
            "tags": ["Growth Mindset", "Belonging", "Feedback"],
            "subjects": ["Math", "Science"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "uid": "Lesson_1",
            "tags": ["Growth Mindset", "Belonging", "Feedback"],
            "subjects": ["Math", "Science"]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = ContentEditor::new(api_for(&server));
    editor
        .view_object(item(json!({
            "uid": "Lesson_1",
            "name": "Praise the process",
            "tags": ["Belonging", "Feedback"],
            "subjects": ["Math"]
        })))
        .await
        .unwrap();
    assert!(editor.children().is_none());

    editor.mindset_tags[0].active = true;
    editor.subject_tags[2].active = true;
    assert!(editor.save_tags().await.unwrap());
    assert_eq!(editor.object().unwrap().subjects, ["Math", "Science"]);
}

#[tokio::test]
async fn theme_update_never_sends_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/themes/Theme_1/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(""))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/themes/Theme_1/lessons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/themes/Theme_1"))
        .and(body_json(json!({"name": "Belonging at school"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed("read only")))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = ContentEditor::new(api_for(&server));
    editor
        .view_object(item(json!({"uid": "Theme_1", "name": "Belonging"})))
        .await
        .unwrap();

    let mut changes = Params::new();
    changes.insert("name".into(), json!("Belonging at school"));
    changes.insert("tags".into(), json!(["Belonging"]));
    changes.insert("subjects".into(), json!(["Math"]));
    assert!(!editor.update_object(&changes).await.unwrap());
    assert_eq!(editor.error, SAVE_FAILED);
    assert!(!editor.updated);
}

#[tokio::test]
async fn popular_lessons_follow_theme_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/themes/Theme_1/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"uid": "Topic_1", "name": "Why it matters"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/topics"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"uid": "Topic_1", "name": "Why it matters"},
            {"uid": "Topic_2", "name": "In the classroom"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/themes/Theme_1/lessons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"uid": "Lesson_1", "name": "One"},
            {"uid": "Lesson_2", "name": "Two"},
            {"uid": "Lesson_3", "name": "Three"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/themes/Theme_1/add-child/Lesson_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!("Added"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/themes/Theme_1/reorder-child/Lesson_1"))
        .and(query_param("move_up", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let mut editor = ContentEditor::new(api_for(&server));
    editor
        .view_object(item(json!({
            "uid": "Theme_1",
            "name": "Belonging",
            "topics": ["Topic_1"],
            "popular_lessons": ["Lesson_3", "Lesson_2"]
        })))
        .await
        .unwrap();

    let children = editor.children().unwrap();
    assert_eq!(uids(children.children()), ["Topic_1"]);
    assert_eq!(uids(children.candidates()), ["Topic_2"]);
    assert_eq!(editor.theme_lessons().len(), 3);
    assert_eq!(uids(editor.popular_lessons()), ["Lesson_3", "Lesson_2"]);

    let first = editor.theme_lessons()[0].clone();
    editor.add_popular_lesson(first).await.unwrap();
    editor.reorder_popular("Lesson_1", true).await.unwrap();
    assert_eq!(
        uids(editor.popular_lessons()),
        ["Lesson_3", "Lesson_1", "Lesson_2"]
    );
    assert_eq!(
        editor.object().unwrap().popular_lessons,
        ["Lesson_3", "Lesson_1", "Lesson_2"]
    );
}

#[tokio::test]
async fn delete_reloads_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/topics/Topic_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/topics"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"uid": "Topic_1", "name": "Why it matters"}
        ]))))
        .mount(&server)
        .await;

    let mut editor = ContentEditor::new(api_for(&server));
    editor.model = ContentKind::Topic;
    editor.delete_object("Topic_2").await.unwrap();
    assert_eq!(uids(editor.objects()), ["Topic_1"]);
}
