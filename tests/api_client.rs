//! ApiClient against a mock admin API.

mod common;

use auction_admin::api::{ListQuery, Resource, StatsRange};
use common::mock_backend::{MockBackend, MockResponse};
use common::{client_for, credential, login_body};
use serde_json::json;
use std::collections::BTreeMap;

fn query(keyword: &str, per_page: u32, page: u32) -> ListQuery {
    ListQuery {
        keyword: keyword.to_string(),
        result_per_page: per_page,
        current_page: page,
        filters: BTreeMap::new(),
    }
}

/// List sends the bearer header and the query in a fixed order.
#[tokio::test]
async fn test_list_sends_query_and_bearer() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({
        "cars": [{"_id": "c1", "make": "Toyota"}],
        "carCount": 12,
        "filteredCarCount": 1,
    }))
    .await;
    let client = client_for(&mock.base_url());

    let mut q = query("Toyota Corolla", 5, 2);
    q.filters.insert("vehicle_type".to_string(), "Car".to_string());
    let page = client
        .list(&credential(), Resource::Vehicle, &q)
        .await
        .expect("list");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_count, 12);
    assert_eq!(page.filtered_count, 1);

    let request = mock.last_request().await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/admin/getallcars/");
    assert_eq!(
        request.query.as_deref(),
        Some("keyword=Toyota+Corolla&resultPerPage=5&currentPage=2&vehicle_type=Car")
    );
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
    assert!(request.header("x-request-id").is_some());
}

/// Missing counts fall back to the number of items seen.
#[tokio::test]
async fn test_list_tolerates_missing_counts() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"bids": [{"_id": "b1"}, {"_id": "b2"}]})).await;
    let client = client_for(&mock.base_url());

    let page = client
        .list(&credential(), Resource::Bid, &query("", 10, 1))
        .await
        .expect("list");
    assert_eq!(page.total_count, 2);
    assert_eq!(page.filtered_count, 2);
}

/// The server's own message is what the user sees.
#[tokio::test]
async fn test_status_error_carries_server_message() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::error(404, "User not found"))
        .await;
    let client = client_for(&mock.base_url());

    let err = client
        .get(&credential(), Resource::User, "missing")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "status");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "User not found");
}

#[tokio::test]
async fn test_unauthorized_without_body_gets_session_message() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::raw(401, "")).await;
    let client = client_for(&mock.base_url());

    let err = client
        .statistics(&credential(), StatsRange::All)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Session expired. Please sign in again.");
}

/// Get splits the entity from its sibling fields.
#[tokio::test]
async fn test_get_returns_entity_and_extras() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({
        "auction": {"_id": "a1", "status": "confirmed"},
        "bids": [{"_id": "b1", "amount": 1200}],
    }))
    .await;
    let client = client_for(&mock.base_url());

    let payload = client
        .get(&credential(), Resource::Auction, "a1")
        .await
        .expect("get");
    assert_eq!(payload.entity["status"], "confirmed");
    assert_eq!(payload.extra["bids"][0]["amount"], 1200);
    assert_eq!(mock.last_request().await.path, "/api/admin/getauction/a1");
}

#[tokio::test]
async fn test_get_without_entity_is_decode_error() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"success": true})).await;
    let client = client_for(&mock.base_url());

    let err = client
        .get(&credential(), Resource::Bid, "b1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_update_puts_json_body() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"success": true})).await;
    let client = client_for(&mock.base_url());

    client
        .update(
            &credential(),
            Resource::User,
            "u1",
            &json!({"name": "Grace", "is_locked": false}),
        )
        .await
        .expect("update");

    let request = mock.last_request().await;
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/admin/updateuser/u1");
    assert_eq!(request.json(), json!({"name": "Grace", "is_locked": false}));
}

#[tokio::test]
async fn test_delete_uses_resource_path() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock.base_url());

    client
        .delete(&credential(), Resource::Query, "q9")
        .await
        .expect("delete");
    let request = mock.last_request().await;
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/api/admin/deletequery/q9");
}

/// Transactions have no delete endpoint; nothing goes over the wire.
#[tokio::test]
async fn test_delete_of_transaction_is_rejected_locally() {
    let mock = MockBackend::start().await;
    let client = client_for(&mock.base_url());

    let err = client
        .delete(&credential(), Resource::Transaction, "t1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_request");
    assert!(mock.captured_requests().await.is_empty());
}

#[tokio::test]
async fn test_unlock_and_refund() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"message": "Account unlocked"})).await;
    mock.enqueue_json(json!({"message": "Refund queued"})).await;
    let client = client_for(&mock.base_url());

    let message = client
        .unlock_user(&credential(), "u7")
        .await
        .expect("unlock");
    assert_eq!(message, "Account unlocked");

    let body = client
        .refund_payment(&credential(), "a3")
        .await
        .expect("refund");
    assert_eq!(body["message"], "Refund queued");

    let requests = mock.captured_requests().await;
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path, "/api/admin/unlock-user/u7");
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/api/admin/refund-payment");
    assert_eq!(requests[1].json(), json!({"auctionId": "a3"}));
}

#[tokio::test]
async fn test_statistics_path_follows_range() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"users": [{"total": 4}]})).await;
    let client = client_for(&mock.base_url());

    let range = StatsRange::parse("all").expect("range");
    let stats = client
        .statistics(&credential(), range)
        .await
        .expect("stats");
    assert_eq!(stats["users"][0]["total"], 4);
    assert_eq!(
        mock.last_request().await.path,
        format!("/api/admin/statistics/{}", range.as_str())
    );
}

#[tokio::test]
async fn test_intermediary_endpoints_unwrap_their_arrays() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"intermediaries": [{"_id": "i1"}, {"_id": "i2"}]}))
        .await;
    mock.enqueue_json(json!({"intermediaryClients": {"user": [{"_id": "c1"}]}}))
        .await;
    mock.enqueue_json(json!({"quote": [{"user": "i1", "quoteStatus": "new"}]}))
        .await;
    let client = client_for(&mock.base_url());

    let intermediaries = client
        .intermediaries(&credential())
        .await
        .expect("intermediaries");
    assert_eq!(intermediaries.len(), 2);
    let clients = client
        .intermediary_clients(&credential(), "i1")
        .await
        .expect("clients");
    assert_eq!(clients[0]["_id"], "c1");
    let quotes = client.client_quotes(&credential(), "i1").await.expect("quotes");
    assert_eq!(quotes[0]["quoteStatus"], "new");

    let paths: Vec<String> = mock
        .captured_requests()
        .await
        .into_iter()
        .map(|request| request.path)
        .collect();
    assert_eq!(
        paths,
        [
            "/api/admin/intermediariesInfo",
            "/api/admin/get-intermediary/i1",
            "/api/admin/get-clientQuotes/i1",
        ]
    );
}

#[tokio::test]
async fn test_missing_intermediary_arrays_read_as_empty() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"success": true})).await;
    let client = client_for(&mock.base_url());

    let clients = client
        .intermediary_clients(&credential(), "i9")
        .await
        .expect("clients");
    assert!(clients.is_empty());
}

#[tokio::test]
async fn test_my_profile_reads_user_key() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"user": {"_id": "u-admin", "name": "Ada Admin"}}))
        .await;
    let client = client_for(&mock.base_url());

    let profile = client.my_profile(&credential()).await.expect("profile");
    assert_eq!(profile.entity["name"], "Ada Admin");
    assert_eq!(mock.last_request().await.path, "/api/user/myprofile");
}

/// Login is the one call without an Authorization header.
#[tokio::test]
async fn test_login_builds_session() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(login_body("admin")).await;
    let client = client_for(&mock.base_url());

    let session = client
        .login(" ada@example.com ", "hunter2")
        .await
        .expect("login");
    assert_eq!(session.token.expose(), "fresh-token");
    assert!(session.user.is_admin());

    let request = mock.last_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/admin/login");
    assert!(request.header("authorization").is_none());
    assert_eq!(
        request.json(),
        json!({"email": "ada@example.com", "password": "hunter2"})
    );
}

#[tokio::test]
async fn test_login_without_token_is_decode_error() {
    let mock = MockBackend::start().await;
    mock.enqueue_json(json!({"user": {"_id": "u1"}})).await;
    let client = client_for(&mock.base_url());

    let err = client.login("a@b.c", "pw").await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = client_for("http://127.0.0.1:9");
    let err = client
        .list(&credential(), Resource::User, &query("", 10, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network");
}

/// The configured request timeout turns a hung backend into a network error.
#[tokio::test]
async fn test_request_timeout_is_network_error() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(json!({"users": []})).with_delay(2_500))
        .await;
    let client = auction_admin::api::ApiClient::new(&auction_admin::config::ApiConfig {
        base_url: mock.base_url(),
        timeout_seconds: 1,
        connect_timeout_seconds: 1,
    })
    .expect("client");

    let err = client
        .list(&credential(), Resource::User, &query("", 10, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network");
    assert!(err.to_string().contains("timed out"));
}
