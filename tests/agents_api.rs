use serde_json::json;

mod common;

use crate::common::*;

#[tokio::test]
async fn health_reports_ok() {
    let pool = test_pool().await;
    let app = test_router(pool);

    let (status, body) = send(&app, api_request("GET", "/health", None, None, None)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn agent_without_default_workflow() {
    let (pool, app) = setup_orgs().await;

    let (status, body) = send(
        &app,
        api_request(
            "POST",
            "/api/v1/agents",
            Some(OWNER.0),
            Some(ORG_ID),
            Some(json!({ "name": "Bare", "create_default_workflow": false, "preview_enabled": true })),
        ),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED, "{}", body);
    assert!(body["default_workflow_id"].is_null());
    assert_eq!(body["preview_enabled"], true);
    assert_eq!(body["enabled"], true);
    assert_eq!(count_rows(&pool, "workflows").await, 0);
}

#[tokio::test]
async fn duplicate_agent_name_conflicts_within_organization_only() {
    let (_pool, app) = setup_orgs().await;
    let body = json!({ "name": "Helper" });

    let (status, _) = send(&app, api_request("POST", "/api/v1/agents", Some(OWNER.0), Some(ORG_ID), Some(body.clone()))).await;
    assert_eq!(status, http::StatusCode::CREATED);

    let (status, response) = send(&app, api_request("POST", "/api/v1/agents", Some(ADMIN.0), Some(ORG_ID), Some(body.clone()))).await;
    assert_eq!(status, http::StatusCode::CONFLICT);
    assert_eq!(response["error"], "Agent with name 'Helper' already exists");

    // Same name in another organization is fine.
    let (status, _) = send(&app, api_request("POST", "/api/v1/agents", Some(VIEWER.0), Some(OTHER_ORG_ID), Some(body))).await;
    assert_eq!(status, http::StatusCode::CREATED);
}

#[tokio::test]
async fn agents_are_scoped_to_their_organization() {
    let (_pool, app) = setup_orgs().await;

    let (_, created) = send(
        &app,
        api_request("POST", "/api/v1/agents", Some(OWNER.0), Some(ORG_ID), Some(json!({ "name": "Private" }))),
    )
    .await;
    let agent_uri = format!("/api/v1/agents/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, api_request("GET", "/api/v1/agents", Some(VIEWER.0), Some(ORG_ID), None)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, api_request("GET", "/api/v1/agents", Some(VIEWER.0), Some(OTHER_ORG_ID), None)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, api_request("GET", &agent_uri, Some(VIEWER.0), Some(OTHER_ORG_ID), None)).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn member_may_read_but_not_delete_agents() {
    let (_pool, app) = setup_orgs().await;

    let (_, created) = send(
        &app,
        api_request("POST", "/api/v1/agents", Some(OWNER.0), Some(ORG_ID), Some(json!({ "name": "Kept" }))),
    )
    .await;
    let agent_uri = format!("/api/v1/agents/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, api_request("GET", &agent_uri, Some(MEMBER.0), Some(ORG_ID), None)).await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, body) = send(&app, api_request("DELETE", &agent_uri, Some(MEMBER.0), Some(ORG_ID), None)).await;
    assert_eq!(status, http::StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "User with role 'member' does not have 'delete' permission for 'agents'"
    );
}

#[tokio::test]
async fn overlong_agent_name_is_invalid() {
    let (_pool, app) = setup_orgs().await;

    let (status, body) = send(
        &app,
        api_request(
            "POST",
            "/api/v1/agents",
            Some(OWNER.0),
            Some(ORG_ID),
            Some(json!({ "name": "x".repeat(256) })),
        ),
    )
    .await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_data");
}

#[tokio::test]
async fn workflow_without_graph_gets_start_and_end() {
    let (_pool, app) = setup_orgs().await;

    let (status, body) = send(
        &app,
        api_request(
            "POST",
            "/api/v1/workflows",
            Some(OWNER.0),
            Some(ORG_ID),
            Some(json!({ "name": "Onboarding" })),
        ),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "draft");
    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(body["edges"][0]["source"], body["nodes"][0]["id"]);
    assert_eq!(body["edges"][0]["target"], body["nodes"][1]["id"]);
}

#[tokio::test]
async fn workflow_keeps_supplied_graph() {
    let (_pool, app) = setup_orgs().await;
    let nodes = json!([{ "id": "a", "type": "start" }, { "id": "b", "type": "llm" }]);
    let edges = json!([{ "source": "a", "target": "b" }]);

    let (status, body) = send(
        &app,
        api_request(
            "POST",
            "/api/v1/workflows",
            Some(OWNER.0),
            Some(ORG_ID),
            Some(json!({ "name": "Custom", "nodes": nodes, "edges": edges })),
        ),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(body["nodes"], nodes);
    assert_eq!(body["edges"], edges);
}

#[tokio::test]
async fn workflow_for_agent_of_another_organization_is_not_found() {
    let (_pool, app) = setup_orgs().await;

    let (_, created) = send(
        &app,
        api_request("POST", "/api/v1/agents", Some(VIEWER.0), Some(OTHER_ORG_ID), Some(json!({ "name": "Theirs" }))),
    )
    .await;

    let (status, _) = send(
        &app,
        api_request(
            "POST",
            "/api/v1/workflows",
            Some(OWNER.0),
            Some(ORG_ID),
            Some(json!({ "name": "Hijack", "agent_id": created["id"] })),
        ),
    )
    .await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_workflow_name_conflicts() {
    let (pool, app) = setup_orgs().await;
    let body = json!({ "name": "Twice" });

    let (status, _) = send(&app, api_request("POST", "/api/v1/workflows", Some(OWNER.0), Some(ORG_ID), Some(body.clone()))).await;
    assert_eq!(status, http::StatusCode::CREATED);
    let (status, _) = send(&app, api_request("POST", "/api/v1/workflows", Some(OWNER.0), Some(ORG_ID), Some(body))).await;
    assert_eq!(status, http::StatusCode::CONFLICT);
    assert_eq!(count_rows(&pool, "workflows").await, 1);
}
