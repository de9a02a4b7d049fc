mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, OWNER_A, OWNER_B};
use tracklytic_api::database::models::UserProfile;

#[tokio::test]
async fn owners_never_see_each_other() -> Result<()> {
    let app = TestApp::new();
    let habit = app.create("/api/habit", OWNER_A, json!({"action": "create", "title": "Read", "goal": 10})).await?;
    let class = app
        .create("/api/attendance", OWNER_A, json!({"action": "create", "title": "Math", "totalClass": 10}))
        .await?;
    let budget = app.create("/api/budget", OWNER_A, json!({"action": "create", "title": "Trip", "goal": 1000})).await?;
    let expense = app
        .create("/api/expense", OWNER_A, json!({"action": "create", "title": "Groceries", "amount": 50}))
        .await?;

    for uri in ["/api/habit", "/api/attendance", "/api/budget", "/api/expense"] {
        assert_eq!(app.get(uri, OWNER_B).await?.data(), &json!([]), "{uri}");
    }

    let attempts = [
        ("/api/habit", json!({"action": "updateAchieved", "habitId": habit, "achievedIncrementValue": 1})),
        ("/api/habit", json!({"action": "updateGoal", "habitId": habit, "updateGoalValue": 3})),
        ("/api/habit", json!({"action": "startPeriod", "habitId": habit, "goal": 3})),
        ("/api/attendance", json!({"action": "updateClassAttended", "habitId": class, "incrementClassAttended": 1})),
        ("/api/attendance", json!({"action": "completed", "habitId": class})),
        ("/api/budget", json!({"action": "updateSavings", "budgetId": budget, "updatedSavingsValue": 10})),
        ("/api/expense", json!({"action": "update", "expenseId": expense, "title": "Groceries", "amount": 1})),
    ];
    for (uri, body) in attempts {
        let res = app.post(uri, OWNER_B, body.clone()).await?;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{uri} {body}");
        assert_eq!(res.envelope_status(), 404);
    }

    let deletes = [
        ("/api/habit", json!({"habitId": habit})),
        ("/api/attendance", json!({"habitId": class})),
        ("/api/budget", json!({"budgetId": budget})),
        ("/api/expense", json!({"expenseId": expense})),
    ];
    for (uri, body) in deletes {
        let res = app.delete(uri, OWNER_B, body).await?;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{uri}");
    }

    // Owner A's records are exactly as created
    let res = app.get("/api/habit", OWNER_A).await?;
    assert_eq!(res.data()[0]["currentTracker"]["achieved"], 0);
    assert_eq!(res.data()[0]["currentTracker"]["goal"], 10);
    let res = app.get("/api/attendance", OWNER_A).await?;
    assert_eq!(res.data()[0]["completed"], false);
    let res = app.get("/api/budget", OWNER_A).await?;
    assert_eq!(res.data()[0]["saving"], 0.0);
    let res = app.get("/api/expense", OWNER_A).await?;
    assert_eq!(res.data()[0]["amount"], 50.0);
    assert_eq!(app.store.record_count().await, 5);
    Ok(())
}

#[tokio::test]
async fn reads_are_repeatable() -> Result<()> {
    let app = TestApp::new();
    let habit = app.create("/api/habit", OWNER_A, json!({"action": "create", "title": "Read", "goal": 10})).await?;
    app.post(
        "/api/habit",
        OWNER_A,
        json!({"action": "updateAchieved", "habitId": habit, "achievedIncrementValue": 3}),
    )
    .await?;
    app.create("/api/attendance", OWNER_A, json!({"action": "create", "title": "Math", "totalClass": 10}))
        .await?;
    app.create("/api/budget", OWNER_A, json!({"action": "create", "title": "Trip", "goal": 1000})).await?;
    app.create("/api/expense", OWNER_A, json!({"action": "create", "title": "Groceries", "amount": 50}))
        .await?;

    for uri in ["/api/habit", "/api/attendance", "/api/budget", "/api/expense", "/api/expense/summary"] {
        let first = app.get(uri, OWNER_A).await?;
        let second = app.get(uri, OWNER_A).await?;
        assert_eq!(first.status, StatusCode::OK, "{uri}");
        assert_ne!(first.data(), &json!([]), "{uri}");
        assert_eq!(first.body, second.body, "{uri}");
    }
    assert_eq!(app.store.record_count().await, 5);
    Ok(())
}

#[tokio::test]
async fn owner_in_body_is_ignored() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post("/api/habit", OWNER_A, json!({"action": "create", "title": "Read", "goal": 10, "ownerId": OWNER_B}))
        .await?;
    assert_eq!(res.data()["ownerId"], OWNER_A);
    assert_eq!(app.get("/api/habit", OWNER_B).await?.data(), &json!([]));
    Ok(())
}

#[tokio::test]
async fn unknown_action_changes_nothing() -> Result<()> {
    let app = TestApp::new();
    let habit = app.create("/api/habit", OWNER_A, json!({"action": "create", "title": "Read", "goal": 10})).await?;
    let before = app.get("/api/habit", OWNER_A).await?.body;

    for uri in ["/api/habit", "/api/attendance", "/api/budget", "/api/expense"] {
        let res = app.post(uri, OWNER_A, json!({"action": "frobnicate", "habitId": habit})).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(res.message(), "Invalid action");

        let res = app.post(uri, OWNER_A, json!({"habitId": habit})).await?;
        assert_eq!(res.message(), "Invalid action");
    }

    assert_eq!(app.get("/api/habit", OWNER_A).await?.body, before);
    assert_eq!(app.store.record_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() -> Result<()> {
    let app = TestApp::new();

    let res = app.request_raw(Method::POST, "/api/budget", Some(OWNER_A), "{\"action\": ").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_JSON");

    let res = app.request_raw(Method::DELETE, "/api/budget", Some(OWNER_A), "[]").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn settings_return_own_profile() -> Result<()> {
    let app = TestApp::new();
    app.store
        .insert_user(UserProfile {
            id: OWNER_A.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            email_verified: true,
        })
        .await;

    let res = app.get("/api/settings", OWNER_A).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.data(),
        &json!({"id": OWNER_A, "name": "Ada", "email": "ada@example.com", "emailVerified": true})
    );

    let res = app.get("/api/settings", OWNER_B).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "User not found");
    Ok(())
}
