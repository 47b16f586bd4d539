use crate::helpers::{signup, TestApp};
use job_market::ErrorResponse;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_new_room(app: &mut TestApp) {
    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "name": { "type": "string", "minLength": 1, "maxLength": 256 },
        "id": { "type": "string", "minLength": 36, "maxLength": 36 }
      },
      "required": ["name", "id"]
    });

    let room_names = ["Night shift", "  Weekend gigs  "];

    for room_name in room_names.iter() {
        let response = app.post_chat_room(&json!({"name": room_name})).await;
        assert_eq!(
            response.status().as_u16(),
            201,
            "Failed to create room for name: {}",
            room_name
        );

        let response_body: serde_json::Value =
            response.json().await.expect("Failed to parse JSON");
        assert!(
            jsonschema::is_valid(&schema, &response_body),
            "response does not match schema"
        );
        assert_eq!(response_body["name"], room_name.trim());
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_room_name(app: &mut TestApp) {
    let test_cases = [
        (json!({"name": ""}), "Room name cannot be empty"),
        (json!({"name": "   "}), "Room name cannot be empty"),
        (
            json!({"name": "r".repeat(257)}),
            "Max room name length is 256 characters",
        ),
    ];

    for (test_case, expected) in test_cases.iter() {
        let response = app.post_chat_room(test_case).await;
        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(
            response.json::<ErrorResponse>().await.unwrap().error,
            *expected
        );
    }

    let response = app.post_chat_room(&json!({"title": "lobby"})).await;
    assert_eq!(response.status().as_u16(), 422);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_send_and_list_messages(app: &mut TestApp) {
    let performer = signup(app, 1).await;
    let employer = signup(app, 2).await;

    let response = app
        .post_chat_message(&json!({
            "sender": employer.id,
            "receiver": performer.id,
            "body": "Are you free on Friday?"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let message: serde_json::Value = response.json().await.unwrap();
    assert_eq!(message["sender"], employer.id);
    assert_eq!(message["receiver"], performer.id);
    assert_eq!(message["body"], "Are you free on Friday?");

    let response = app.get_chat_messages(&employer.id, &performer.id).await;
    assert_eq!(response.status().as_u16(), 200);
    let messages: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(messages, vec![message]);

    let response = app.get_chat_messages(&performer.id, &employer.id).await;
    assert_eq!(response.status().as_u16(), 200);
    let messages: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(messages.is_empty(), "Messages are keyed by direction");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_for_second_message_to_same_receiver(
    app: &mut TestApp,
) {
    let performer = signup(app, 1).await;
    let employer = signup(app, 2).await;
    let body = json!({
        "sender": employer.id,
        "receiver": performer.id,
        "body": "Hello"
    });

    assert_eq!(app.post_chat_message(&body).await.status().as_u16(), 201);
    assert_eq!(app.post_chat_message(&body).await.status().as_u16(), 409);

    let reply = json!({
        "sender": performer.id,
        "receiver": employer.id,
        "body": "Hi"
    });
    assert_eq!(app.post_chat_message(&reply).await.status().as_u16(), 201);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_account(app: &mut TestApp) {
    let performer = signup(app, 1).await;
    let unknown = Uuid::new_v4().to_string();

    let test_cases = [
        json!({"sender": unknown, "receiver": performer.id, "body": "Hello"}),
        json!({"sender": performer.id, "receiver": unknown, "body": "Hello"}),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_chat_message(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            404,
            "Failed for input: {}",
            test_case
        );
        assert_eq!(
            response.json::<ErrorResponse>().await.unwrap().error,
            format!("Account not found: {unknown}")
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_message(app: &mut TestApp) {
    let performer = signup(app, 1).await;
    let employer = signup(app, 2).await;

    let test_cases = [
        json!({"sender": "not-a-uuid", "receiver": performer.id, "body": "Hello"}),
        json!({"sender": employer.id, "receiver": "", "body": "Hello"}),
        json!({"sender": employer.id, "receiver": performer.id, "body": "  "}),
        json!({
            "sender": employer.id,
            "receiver": performer.id,
            "body": "b".repeat(4097)
        }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_chat_message(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Should fail with HTTP400 for input: {}",
            test_case
        );
    }

    let response = app.get_chat_messages("nope", &performer.id).await;
    assert_eq!(response.status().as_u16(), 400);
}
