use sqlconsole::api::{ConsoleClient, Role, SqlBackend, SqlStatus, TxStatus, User};
use sqlconsole::ConsoleError;
use std::time::Duration;

mod common;
use common::mock_server::{MockServer, Reply};

const UNCOMMITTED: &str = r#"{"status":"SUCCESS","txStatus":"UNCOMMIT","message":"1 row updated"}"#;
const COMMITTED: &str = r#"{"status":"SUCCESS","txStatus":"COMMITTED","message":"Committed"}"#;
const AMY: &str = r#"{"id":3,"username":"amy","role":"ROLE_USER","accessibleDatabases":[{"id":1,"name":"main"}]}"#;

fn client(server: &MockServer) -> ConsoleClient {
    ConsoleClient::new(&server.url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_session_cookie_carries_transaction() {
    let server = MockServer::start(vec![
        Reply::json(200, UNCOMMITTED).with_header("Set-Cookie", "JSESSIONID=abc; Path=/; HttpOnly"),
        Reply::json(200, COMMITTED),
    ])
    .await;
    let client = client(&server);

    let first = client.execute(1, "UPDATE t SET a = 1").await.unwrap();
    let second = client.execute(1, "COMMIT").await.unwrap();

    assert_eq!(first.tx_status, Some(TxStatus::Uncommit));
    assert_eq!(second.tx_status, Some(TxStatus::Committed));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("cookie"), None);
    assert!(requests[1]
        .header("cookie")
        .is_some_and(|c| c.contains("JSESSIONID=abc")));
}

#[tokio::test]
async fn test_execute_posts_form() {
    let server = MockServer::start(vec![Reply::json(200, COMMITTED)]).await;

    let result = client(&server).execute(7, "COMMIT").await.unwrap();

    assert_eq!(result.status, SqlStatus::Success);
    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/execute");
    assert_eq!(request.body, "dbId=7&sql=COMMIT");
    assert!(request
        .header("content-type")
        .is_some_and(|c| c.starts_with("application/x-www-form-urlencoded")));
}

#[tokio::test]
async fn test_tables_query() {
    let server = MockServer::start(vec![Reply::json(200, r#"["orders","users"]"#)]).await;

    let tables = client(&server).tables(3).await.unwrap();

    assert_eq!(tables, vec!["orders".to_string(), "users".to_string()]);
    let request = &server.requests()[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/tables?dbId=3");
}

#[tokio::test]
async fn test_error_bodies_are_decoded() {
    let server = MockServer::start(vec![
        Reply::json(403, r#"{"message":"Access Denied to DB: 2","status":403}"#),
        Reply::json(500, "boom"),
        Reply::json(502, ""),
    ])
    .await;
    let client = client(&server);

    match client.execute(2, "SELECT 1").await {
        Err(ConsoleError::Api { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "Access Denied to DB: 2");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    match client.tables(2).await {
        Err(ConsoleError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    match client.tables(2).await {
        Err(ConsoleError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_list_and_get_users() {
    let server = MockServer::start(vec![
        Reply::json(200, &format!("[{}]", AMY)),
        Reply::json(200, AMY),
    ])
    .await;
    let client = client(&server);

    let users = client.users().list().await.unwrap();
    let amy = client.users().get(3).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0], amy);
    assert_eq!(amy.role, Role::User);
    assert_eq!(amy.accessible_databases[0].id, 1);

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/users");
    assert_eq!(requests[1].path, "/api/users/3");
}

#[tokio::test]
async fn test_create_taken_username_is_conflict() {
    let server = MockServer::start(vec![Reply::json(400, "")]).await;

    let result = client(&server)
        .users()
        .create(&User::new("amy", "secret", Role::User))
        .await;

    match result {
        Err(ConsoleError::Conflict(message)) => assert!(message.contains("amy")),
        other => panic!("unexpected result: {:?}", other),
    }
    let body = server.requests()[0].json();
    assert_eq!(body["username"], "amy");
    assert_eq!(body["password"], "secret");
    assert_eq!(body["role"], "ROLE_USER");
}

#[tokio::test]
async fn test_update_with_blank_password_keeps_current() {
    let server = MockServer::start(vec![Reply::json(200, AMY)]).await;

    let updated = client(&server)
        .users()
        .update(3, &User::new("amy", "", Role::User))
        .await
        .unwrap();

    assert_eq!(updated.id, Some(3));
    let request = &server.requests()[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/users/3");
    let body = request.json();
    assert_eq!(body["username"], "amy");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_assign_databases_sorted_and_deduped() {
    let server = MockServer::start(vec![Reply::json(200, "")]).await;

    client(&server)
        .users()
        .assign_databases(3, &[5, 1, 2, 5])
        .await
        .unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/users/3/databases");
    assert_eq!(request.json(), serde_json::json!([1, 2, 5]));
}

#[tokio::test]
async fn test_delete_user() {
    let server = MockServer::start(vec![Reply::json(200, "")]).await;

    client(&server).users().delete(7).await.unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/api/users/7");
}
