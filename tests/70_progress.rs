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

    async fn seed_task(&self, subject_id: &str, status: &str) -> Result<()> {
        let res = self
            .client
            .post(format!("{}/api/tasks", self.base_url))
            .bearer_auth(&self.token)
            .json(&json!({
                "title": "Seed task",
                "subject_id": subject_id,
                "task_type": "Revision",
                "status": status,
                "priority": "medium",
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "task create failed");
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Value> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .await?
            .json::<Value>()
            .await?)
    }
}

#[tokio::test]
async fn progress_is_zero_with_no_tasks() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("prog_empty").await?;
    let body = session.get("/api/progress").await?;
    assert_eq!(body["data"]["overall_progress"], 0.0);
    assert_eq!(body["data"]["total_tasks"], 0);
    Ok(())
}

#[tokio::test]
async fn progress_counts_completed_share_of_tasks() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("prog_half").await?;
    let res = session
        .client
        .post(format!("{}/api/subjects", session.base_url))
        .bearer_auth(&session.token)
        .json(&json!({
            "name": "Electronics",
            "progress": 0,
            "status": "pending",
            "weightage": 25,
        }))
        .send()
        .await?;
    let subject = common::data_id(&res.json::<Value>().await?)?;

    for status in ["completed", "completed", "pending", "revise-again"] {
        session.seed_task(&subject, status).await?;
    }

    let body = session.get("/api/progress").await?;
    assert_eq!(body["data"]["overall_progress"], 50.0);
    assert_eq!(body["data"]["total_tasks"], 4);
    assert_eq!(body["data"]["completed_tasks"], 2);
    Ok(())
}

#[tokio::test]
async fn revision_views_return_the_documented_shape() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let session = Session::new("revision").await?;

    let topics = session.get("/api/revision/weak-topics").await?;
    let topics = topics["data"].as_array().unwrap();
    assert!(!topics.is_empty());
    for topic in topics {
        assert!(topic["topic"].is_string());
        assert!(topic["subject"].is_string());
        assert!(topic["accuracy"].is_number());
        assert!(topic["recommended_actions"].is_array());
    }

    let recs = session.get("/api/revision/recommendations").await?;
    let recs = recs["data"].as_array().unwrap();
    assert_eq!(recs.len(), topics.len());
    for rec in recs {
        assert!(["high", "medium", "low"].contains(&rec["priority"].as_str().unwrap()));
        assert!(rec["deadline"].is_string());
    }
    Ok(())
}
