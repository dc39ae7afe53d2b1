mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn root_banner_uses_the_success_envelope() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["name"], "Market API");

    Ok(())
}

#[tokio::test]
async fn health_reports_database_state() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // OK with a live database, 503 degraded without one
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected health status {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("status").is_some());

    Ok(())
}

#[tokio::test]
async fn product_mutations_require_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let patch = client
        .patch(format!("{}/products/5", server.base_url))
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await?;
    assert_eq!(patch.status(), StatusCode::UNAUTHORIZED);

    let delete = client
        .delete(format!("{}/products/5", server.base_url))
        .send()
        .await?;
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn category_routes_require_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let list = client
        .get(format!("{}/products/categories", server.base_url))
        .send()
        .await?;
    assert_eq!(list.status(), StatusCode::UNAUTHORIZED);

    let create = client
        .post(format!("{}/products/categories", server.base_url))
        .json(&json!({ "name": "Electronics" }))
        .send()
        .await?;
    assert_eq!(create.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn unauthenticated_create_never_reaches_the_multipart_stage() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No session token: the request must bounce at the session check even
    // though the body is not valid multipart
    let res = client
        .post(format!("{}/products", server.base_url))
        .body("not multipart")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "error");

    Ok(())
}
