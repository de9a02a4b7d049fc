mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, OWNER_A};
use tracklytic_api::auth::{generate_jwt, Claims};
use tracklytic_api::config::AppConfig;

#[tokio::test]
async fn binary_serves_over_http() -> Result<()> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "ok");

    let res = client.get(format!("{}/api/habit", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let secret = AppConfig::development().security.jwt_secret;
    let token = generate_jwt(&Claims::new(&OWNER_A.into(), "a@example.com", None, 1), &secret)?;

    let res = client
        .post(format!("{}/api/habit", server.base_url))
        .bearer_auth(&token)
        .json(&json!({"action": "create", "title": "Read", "goal": 10}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = client
        .get(format!("{}/api/habit", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"][0]["title"], "Read");
    Ok(())
}
