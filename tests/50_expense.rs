mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{instant, TestApp, OWNER_A};

#[tokio::test]
async fn expenses_belong_to_their_month() -> Result<()> {
    let app = TestApp::new();

    let res = app.post("/api/expense", OWNER_A, json!({"action": "create", "title": "Groceries", "amount": 50})).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    // March, zero-based
    assert_eq!(res.data()["month"], 2);
    assert_eq!(res.data()["year"], 2025);

    let res = app.get("/api/expense", OWNER_A).await?;
    assert_eq!(res.data().as_array().map(Vec::len), Some(1));
    assert_eq!(res.data()[0]["amount"], 50.0);

    let res = app.get("/api/expense?month=1&year=2025", OWNER_A).await?;
    assert_eq!(res.data(), &json!([]));

    // Next month starts empty; March is still reachable by query
    app.set_now(instant(2025, 4, 2));
    assert_eq!(app.get("/api/expense", OWNER_A).await?.data(), &json!([]));

    let res = app.get("/api/expense?month=2&year=2025", OWNER_A).await?;
    assert_eq!(res.data()[0]["title"], "Groceries");
    Ok(())
}

#[tokio::test]
async fn update_replaces_amount_only() -> Result<()> {
    let app = TestApp::new();
    let id = app
        .create("/api/expense", OWNER_A, json!({"action": "create", "title": "Groceries", "amount": 50}))
        .await?;

    let res = app
        .post("/api/expense", OWNER_A, json!({"action": "update", "expenseId": id, "title": "Rent", "amount": 75.5}))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Expense updated successfully");
    assert_eq!(res.data()["amount"], 75.5);
    assert_eq!(res.data()["title"], "Groceries");

    let res = app
        .post("/api/expense", OWNER_A, json!({"action": "update", "expenseId": id, "title": "Rent", "amount": 0}))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_requires_title() -> Result<()> {
    let app = TestApp::new();
    let id = app
        .create("/api/expense", OWNER_A, json!({"action": "create", "title": "Groceries", "amount": 50}))
        .await?;

    let res = app
        .post("/api/expense", OWNER_A, json!({"action": "update", "expenseId": id, "amount": 75}))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Missing required field: title");

    let res = app.get("/api/expense", OWNER_A).await?;
    assert_eq!(res.data()[0]["amount"], 50.0);
    Ok(())
}

#[tokio::test]
async fn summary_totals_the_period() -> Result<()> {
    let app = TestApp::new();
    for (title, amount) in [("Groceries", 50.0), ("Bus", 12.5), ("Books", 37.5)] {
        app.create("/api/expense", OWNER_A, json!({"action": "create", "title": title, "amount": amount})).await?;
    }

    let res = app.get("/api/expense/summary", OWNER_A).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data(), &json!({"month": 2, "year": 2025, "count": 3, "total": 100.0}));

    let res = app.get("/api/expense/summary?month=0&year=2025", OWNER_A).await?;
    assert_eq!(res.data()["count"], 0);
    assert_eq!(res.data()["total"], 0.0);
    Ok(())
}

#[tokio::test]
async fn period_query_is_validated() -> Result<()> {
    let app = TestApp::new();

    for uri in [
        "/api/expense?month=3",
        "/api/expense?month=12&year=2025",
        "/api/expense?month=-1&year=2025",
        "/api/expense?month=march&year=2025",
    ] {
        let res = app.get(uri, OWNER_A).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(res.envelope_status(), 400);
    }
    Ok(())
}

#[tokio::test]
async fn delete_expense() -> Result<()> {
    let app = TestApp::new();
    let id = app
        .create("/api/expense", OWNER_A, json!({"action": "create", "title": "Groceries", "amount": 50}))
        .await?;

    let res = app.delete("/api/expense", OWNER_A, json!({"expenseId": id})).await?;
    assert_eq!(res.envelope_status(), 204);
    assert_eq!(app.get("/api/expense", OWNER_A).await?.data(), &json!([]));
    Ok(())
}
