use axum::http::StatusCode;
use serde_json::{json, Value};

mod support;
use support::*;

fn todo(name: &str, description: &str) -> Value {
    json!({"name": name, "description": description, "deadline": "2030-06-01T12:00:00Z"})
}

async fn create_todo(app: &axum::Router, token: &str, name: &str, description: &str) -> anyhow::Result<Value> {
    let (status, body) = send(app, request("POST", "/api/todo", Some(token), Some(todo(name, description)))?).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create failed: {status} {body}");
    Ok(body["data"].clone())
}

#[tokio::test]
async fn test_todo_crud_round_trip() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;

    let (status, body) = send(&app, request("POST", "/api/todo", Some(&token), Some(todo("ship", "release v1")))?).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["is_success"], true);
    let created = &body["data"];
    assert_eq!(created["complete"], false);
    assert_eq!(created["is_deleted"], false);
    assert_eq!(created["created_by"], "admin");
    let id = created["todo_id"].as_i64().unwrap();

    let (status, body) = send(&app, request("GET", &format!("/api/todo/{id}"), Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "ship");
    assert_eq!(body["data"]["description"], "release v1");

    let patch = json!({"complete": true});
    let (status, body) = send(&app, request("PUT", &format!("/api/todo/{id}"), Some(&token), Some(patch))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["complete"], true);
    assert_eq!(body["data"]["name"], "ship");
    assert_eq!(body["data"]["updated_by"], "admin");

    let (status, body) = send(&app, request("DELETE", &format!("/api/todo/{id}"), Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "deleted");
    assert!(body["data"].is_null());

    let (status, body) = send(&app, request("GET", &format!("/api/todo/{id}"), Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");
    Ok(())
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;

    let (status, _) = send(&app, request("PUT", "/api/todo/999", Some(&token), Some(json!({"complete": true})))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, request("DELETE", "/api/todo/999", Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 404);
    Ok(())
}

#[tokio::test]
async fn test_soft_deleted_rows_leave_listings() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    create_todo(&app, &token, "alpha", "first").await?;
    let beta = create_todo(&app, &token, "beta", "second").await?;

    let uri = format!("/api/todo/{}", beta["todo_id"]);
    send(&app, request("DELETE", &uri, Some(&token), None)?).await?;

    for uri in ["/api/todo", "/api/todo/search?q=a", "/api/todo/page"] {
        let (status, body) = send(&app, request("GET", uri, Some(&token), None)?).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
        let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["alpha"], "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_search_is_case_insensitive() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    create_todo(&app, &token, "Call MOM", "sunday").await?;
    create_todo(&app, &token, "groceries", "momentary lapse").await?;
    create_todo(&app, &token, "gym", "legs").await?;

    let (status, body) = send(&app, request("GET", "/api/todo/search?q=Mom", Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, request("GET", "/api/todo/search?q=zzz", Some(&token), None)?).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_page_window_and_clamp() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    for i in 0..12 {
        create_todo(&app, &token, &format!("task-{i:02}"), "").await?;
    }

    let (_, body) = send(&app, request("GET", "/api/todo/page", Some(&token), None)?).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let (_, body) = send(&app, request("GET", "/api/todo/page?skip=10&limit=5", Some(&token), None)?).await?;
    let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["task-10", "task-11"]);

    let (_, body) = send(&app, request("GET", "/api/todo/page?skip=0&limit=0", Some(&token), None)?).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_page_huge_skip_is_empty() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    create_todo(&app, &token, "only", "").await?;

    let uri = format!("/api/todo/page?skip={}&limit=5", u64::MAX);
    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_search_matches_wildcards_literally() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    create_todo(&app, &token, "save 20%", "").await?;
    create_todo(&app, &token, "groceries", "").await?;

    let (status, body) = send(&app, request("GET", "/api/todo/search?q=%25", Some(&token), None)?).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["save 20%"]);

    let (_, body) = send(&app, request("GET", "/api/todo/search?q=_", Some(&token), None)?).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_validation_is_unprocessable() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;

    let (status, body) = send(&app, request("POST", "/api/todo", Some(&token), Some(todo("   ", "blank")))?).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status_code"], 422);
    assert_eq!(body["is_success"], false);
    Ok(())
}

#[tokio::test]
async fn test_users_hide_hash_and_reject_duplicates() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    let created = create_user(&app, &token, "nora", "nora-pass", "manager").await?;
    assert_eq!(created["role"], "manager");
    assert!(created.get("password_hash").is_none());

    let dup = json!({"username": "nora", "password": "other-pass"});
    let (status, body) = send(&app, request("POST", "/api/users", Some(&token), Some(dup))?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status_code"], 409);

    let (_, body) = send(&app, request("GET", "/api/users/search?q=NOR", Some(&token), None)?).await?;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!body.to_string().contains("argon2"));

    // password change is re-hashed and takes effect
    let uri = format!("/api/users/{}", created["user_id"]);
    let (status, _) = send(&app, request("PUT", &uri, Some(&token), Some(json!({"password": "new-secret"})))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(login(&app, "nora", "nora-pass").await.is_err());
    login(&app, "nora", "new-secret").await?;
    Ok(())
}

#[tokio::test]
async fn test_user_email_is_unique_and_clearable() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = login(&app, ADMIN, ADMIN_PASSWORD).await?;
    let first = json!({"username": "olga", "password": "olga-pass", "email": "team@example.com"});
    let (status, body) = send(&app, request("POST", "/api/users", Some(&token), Some(first))?).await?;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/users/{}", body["data"]["user_id"]);

    let second = json!({"username": "pete", "password": "pete-pass", "email": "team@example.com"});
    let (status, _) = send(&app, request("POST", "/api/users", Some(&token), Some(second))?).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, request("PUT", &uri, Some(&token), Some(json!({"role": "manager"})))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "team@example.com");

    let (status, body) = send(&app, request("PUT", &uri, Some(&token), Some(json!({"email": null})))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["email"].is_null());
    Ok(())
}
