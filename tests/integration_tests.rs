//! Integration tests for the access-console backend.
//!
//! These tests require a running backend HTTP server with a seeded database.
//! Set the TEST_BASE_URL environment variable to specify the server URL.
//!
//! Example:
//! ```sh
//! export TEST_BASE_URL="http://127.0.0.1:5000"
//! cargo test --test integration_tests -- --ignored
//! ```
//!
//! Note: These tests are marked with #[ignore] because they require
//! a running HTTP server. In CI, run them separately with a service container.

use std::env;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Test server configuration
struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    fn new() -> Self {
        let base_url =
            env::var("TEST_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".into());
        Self {
            base_url,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_permission(&self, name: &str, description: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/permissions"))
            .json(&json!({ "permissionName": name, "description": description }))
            .send()
            .await
            .expect("create permission request");
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("create permission body")
    }

    async fn create_role(&self, name: &str, permission_ids: &[i64]) -> Value {
        let resp = self
            .client
            .post(self.url("/roles"))
            .json(&json!({ "roleName": name, "permissionIds": permission_ids }))
            .send()
            .await
            .expect("create role request");
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.expect("create role body")
    }

    async fn list(&self, path: &str) -> Vec<Value> {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("list request")
            .json()
            .await
            .expect("list body")
    }

    async fn delete(&self, path: &str) -> StatusCode {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request")
            .status()
    }

    /// Look up a seeded permission id by name.
    async fn permission_id(&self, name: &str) -> i64 {
        self.list("/permissions")
            .await
            .iter()
            .find(|p| p["permission_name"] == name)
            .and_then(|p| p["id"].as_i64())
            .unwrap_or_else(|| panic!("seeded permission '{}' missing", name))
    }
}

#[tokio::test]
#[ignore]
async fn test_default_permissions_seeded_exactly_once() {
    let server = TestServer::new();
    let permissions = server.list("/permissions").await;

    for name in ["Create", "Read", "Update", "Delete"] {
        let count = permissions
            .iter()
            .filter(|p| p["permission_name"] == name)
            .count();
        assert_eq!(count, 1, "permission '{}' should appear exactly once", name);
    }
}

#[tokio::test]
#[ignore]
async fn test_permission_create_appears_in_list_once() {
    let server = TestServer::new();
    let name = format!("it-perm-{}", std::process::id());

    let body = server.create_permission(&name, "integration test permission").await;
    let id = body["permission"]["id"].as_i64().expect("created id");

    let permissions = server.list("/permissions").await;
    let matches: Vec<_> = permissions.iter().filter(|p| p["id"] == id).collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["permission_name"], name.as_str());

    assert_eq!(
        server.delete(&format!("/permissions/{}", id)).await,
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore]
async fn test_permission_validation_and_not_found() {
    let server = TestServer::new();

    let resp = server
        .client
        .post(server.url("/permissions"))
        .json(&json!({ "permissionName": "", "description": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .client
        .put(server.url("/permissions/999999"))
        .json(&json!({ "permissionName": "Ghost", "description": "missing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(
        server.delete("/permissions/999999").await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
#[ignore]
async fn test_duplicate_permission_name_conflicts() {
    let server = TestServer::new();

    let resp = server
        .client
        .post(server.url("/permissions"))
        .json(&json!({ "permissionName": "Read", "description": "dup" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_role_lists_comma_joined_permission_names() {
    let server = TestServer::new();
    let create_id = server.permission_id("Create").await;
    let update_id = server.permission_id("Update").await;

    let body = server
        .create_role("it-editor", &[create_id, update_id])
        .await;
    let role_id = body["roleId"].as_i64().expect("roleId");
    assert_eq!(body["roleName"], "it-editor");

    let roles = server.list("/roles").await;
    let role = roles
        .iter()
        .find(|r| r["id"] == role_id)
        .expect("created role listed");
    let names: Vec<&str> = role["permissions"].as_str().unwrap().split(',').collect();
    assert_eq!(names, vec!["Create", "Update"]);

    assert_eq!(
        server.delete(&format!("/roles/{}", role_id)).await,
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore]
async fn test_role_delete_removes_role_and_assignments() {
    let server = TestServer::new();
    let read_id = server.permission_id("Read").await;

    let body = server.create_role("it-doomed", &[read_id]).await;
    let role_id = body["roleId"].as_i64().unwrap();

    assert_eq!(
        server.delete(&format!("/roles/{}", role_id)).await,
        StatusCode::OK
    );

    let roles = server.list("/roles").await;
    assert!(roles.iter().all(|r| r["id"] != role_id));

    // Deleting an already-absent role still reports success.
    assert_eq!(
        server.delete(&format!("/roles/{}", role_id)).await,
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore]
async fn test_role_update_replaces_permission_set() {
    let server = TestServer::new();
    let create_id = server.permission_id("Create").await;
    let delete_id = server.permission_id("Delete").await;

    let body = server.create_role("it-mutable", &[create_id]).await;
    let role_id = body["roleId"].as_i64().unwrap();

    let resp = server
        .client
        .put(server.url(&format!("/roles/{}", role_id)))
        .json(&json!({ "roleName": "it-mutable", "permissionIds": [delete_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let roles = server.list("/roles").await;
    let role = roles.iter().find(|r| r["id"] == role_id).unwrap();
    assert_eq!(role["permissions"], "Delete");

    server.delete(&format!("/roles/{}", role_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_user_with_unknown_role_is_rejected() {
    let server = TestServer::new();

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "username": "it-ghost", "roleId": 999999, "status": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let users = server.list("/users").await;
    assert!(users.iter().all(|u| u["username"] != "it-ghost"));
}

#[tokio::test]
#[ignore]
async fn test_user_status_false_round_trips() {
    let server = TestServer::new();
    let read_id = server.permission_id("Read").await;
    let role = server.create_role("it-user-role", &[read_id]).await;
    let role_id = role["roleId"].as_i64().unwrap();

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "username": "it-inactive", "roleId": role_id, "status": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let user_id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], false);

    let users = server.list("/users").await;
    let user = users.iter().find(|u| u["id"] == user_id).unwrap();
    assert_eq!(user["status"], false);
    assert_eq!(user["role"], "it-user-role");

    server.delete(&format!("/users/{}", user_id)).await;
    server.delete(&format!("/roles/{}", role_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_role_leaves_user_with_null_role_name() {
    let server = TestServer::new();
    let read_id = server.permission_id("Read").await;
    let role = server.create_role("it-vanishing", &[read_id]).await;
    let role_id = role["roleId"].as_i64().unwrap();

    let resp = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "username": "it-dangling", "roleId": role_id, "status": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    server.delete(&format!("/roles/{}", role_id)).await;

    let users = server.list("/users").await;
    let user = users.iter().find(|u| u["id"] == user_id).unwrap();
    assert!(user["role"].is_null());

    server.delete(&format!("/users/{}", user_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_user_delete_is_unconditional() {
    let server = TestServer::new();
    assert_eq!(server.delete("/users/999999").await, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_health_endpoint() {
    let server = TestServer::new();
    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "healthy");
}
