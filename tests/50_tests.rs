mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct Session {
    base_url: String,
    client: reqwest::Client,
    token: String,
}

impl Session {
    async fn new(prefix: &str) -> Result<Self> {
        let server = common::ensure_server().await?;
        let client = reqwest::Client::new();
        let identity = common::fresh_identity(prefix);
        common::provision_user(server, &client, &identity).await?;
        let token = common::bearer_token(&identity)?;
        Ok(Self {
            base_url: server.base_url.clone(),
            client,
            token,
        })
    }

    async fn create_test(&self, name: &str, status: &str, score: Option<f64>) -> Result<String> {
        let res = self
            .client
            .post(format!("{}/api/tests", self.base_url))
            .bearer_auth(&self.token)
            .json(&json!({
                "name": name,
                "test_type": "Full Length",
                "status": status,
                "score": score,
                "accuracy": score,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "test create failed");
        common::data_id(&res.json::<Value>().await?)
    }

    async fn trends(&self) -> Result<Value> {
        Ok(self
            .client
            .get(format!("{}/api/tests/trends", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?
            .json::<Value>()
            .await?)
    }
}

#[tokio::test]
async fn logging_a_result_marks_the_test_attempted() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("test_log").await?;
    let id = session.create_test("Mock 1", "not_attempted", None).await?;

    let res = session
        .client
        .put(format!("{}/api/tests/{}/result", session.base_url, id))
        .bearer_auth(&session.token)
        .json(&json!({ "score": 71.5, "accuracy": 83.0, "status": "attempted" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = session
        .client
        .get(format!("{}/api/tests/{}", session.base_url, id))
        .bearer_auth(&session.token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["status"], "attempted");
    assert_eq!(body["data"]["score"], 71.5);
    assert_eq!(body["data"]["accuracy"], 83.0);

    // Re-logging overwrites the result, the test stays attempted
    let res = session
        .client
        .put(format!("{}/api/tests/{}/result", session.base_url, id))
        .bearer_auth(&session.token)
        .json(&json!({ "score": 74.0, "accuracy": 85.0, "status": "attempted" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = session
        .client
        .get(format!("{}/api/tests/{}", session.base_url, id))
        .bearer_auth(&session.token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["score"], 74.0);
    Ok(())
}

#[tokio::test]
async fn status_filter_returns_only_attempted_tests() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("test_filter").await?;
    session.create_test("Attempted one", "attempted", Some(60.0)).await?;
    session.create_test("Planned one", "not_attempted", None).await?;

    let body = session
        .client
        .get(format!("{}/api/tests?status=attempted", session.base_url))
        .bearer_auth(&session.token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let tests = body["data"].as_array().unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0]["name"], "Attempted one");
    Ok(())
}

#[tokio::test]
async fn single_attempt_shows_zero_improvement() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("trend_single").await?;
    session.create_test("Mock 1", "attempted", Some(65.0)).await?;

    let trends = session.trends().await?;
    assert_eq!(trends["data"]["total_tests"], 1);
    assert_eq!(trends["data"]["improvement"], 0.0);
    assert_eq!(trends["data"]["average_score"], 65.0);
    Ok(())
}

#[tokio::test]
async fn improvement_is_last_score_minus_first() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("trend_improve").await?;
    for score in [65.0, 72.0, 78.0] {
        session.create_test("Mock", "attempted", Some(score)).await?;
    }
    // Unattempted tests do not participate
    session.create_test("Future mock", "not_attempted", None).await?;

    let trends = session.trends().await?;
    assert_eq!(trends["data"]["total_tests"], 3);
    assert_eq!(trends["data"]["improvement"], 13.0);

    let points = trends["data"]["score_trend"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["score"], 65.0);
    assert_eq!(points[2]["score"], 78.0);
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_recorded_scores() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("test_patch").await?;
    let id = session.create_test("Mock 3", "attempted", Some(55.0)).await?;

    let res = session
        .client
        .patch(format!("{}/api/tests/{}", session.base_url, id))
        .bearer_auth(&session.token)
        .json(&json!({ "name": "Mock 3 (rescored)" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = session
        .client
        .get(format!("{}/api/tests/{}", session.base_url, id))
        .bearer_auth(&session.token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["name"], "Mock 3 (rescored)");
    assert_eq!(body["data"]["score"], 55.0);
    Ok(())
}

#[tokio::test]
async fn other_users_cannot_log_results() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let owner = Session::new("test_owner").await?;
    let intruder = Session::new("test_intruder").await?;
    let id = owner.create_test("Private mock", "not_attempted", None).await?;

    let res = intruder
        .client
        .put(format!("{}/api/tests/{}/result", intruder.base_url, id))
        .bearer_auth(&intruder.token)
        .json(&json!({ "score": 1.0, "accuracy": 1.0, "status": "attempted" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = owner
        .client
        .get(format!("{}/api/tests/{}", owner.base_url, id))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["status"], "not_attempted");
    Ok(())
}
