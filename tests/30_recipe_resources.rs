mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

const PATHS: [&str; 2] = ["/recipe/tags", "/recipe/ingredients"];

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .map(|rows| rows.iter().filter_map(|r| r["name"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn login_required() -> Result<()> {
    let server = TestServer::spawn().await?;

    for path in PATHS {
        let res = server.client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "GET {path}");

        let res = server
            .client
            .post(server.url(path))
            .json(&json!({ "name": "Sneaky" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "POST {path}");

        let body: Value = res.json().await?;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn retrieve_list_ordered_by_name_descending() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.login_new_user("mohammad@gmail.com", "somepassword123").await?;

    for (path, first, second) in [
        ("/recipe/tags", "Dessert", "Vegan"),
        ("/recipe/ingredients", "Kale", "Salt"),
    ] {
        server.create_resource(&token, path, first).await?;
        server.create_resource(&token, path, second).await?;

        let (status, body) = server.list(&token, path).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec![second, first]);

        let row = &body[0];
        assert!(row["id"].is_string());
        assert!(row.get("user_id").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn resources_limited_to_user() -> Result<()> {
    let server = TestServer::spawn().await?;
    let other = server.login_new_user("someone@gmail.com", "somepassword123").await?;
    let mine = server.login_new_user("mohammad@gmail.com", "somepassword123").await?;

    for (path, theirs, ours) in [
        ("/recipe/tags", "Fruity", "Comfort Food"),
        ("/recipe/ingredients", "Vinegar", "Tumeric"),
    ] {
        server.create_resource(&other, path, theirs).await?;
        server.create_resource(&mine, path, ours).await?;

        let (status, body) = server.list(&mine, path).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec![ours]);

        let (_, body) = server.list(&other, path).await?;
        assert_eq!(names(&body), vec![theirs]);
    }
    Ok(())
}

#[tokio::test]
async fn tags_and_ingredients_are_separate() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.login_new_user("mohammad@gmail.com", "somepassword123").await?;

    server.create_resource(&token, "/recipe/tags", "Vegan").await?;

    let (_, body) = server.list(&token, "/recipe/ingredients").await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn create_successful() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.login_new_user("mohammad@gmail.com", "somepassword123").await?;

    for path in PATHS {
        let res = server.create_resource(&token, path, "Test item").await?;
        assert_eq!(res.status(), StatusCode::CREATED);

        let created: Value = res.json().await?;
        assert_eq!(created["name"], "Test item");

        let (_, body) = server.list(&token, path).await?;
        assert_eq!(body, json!([created]));
    }
    Ok(())
}

#[tokio::test]
async fn create_invalid() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.login_new_user("mohammad@gmail.com", "somepassword123").await?;

    for path in PATHS {
        for payload in [json!({ "name": "" }), json!({ "name": "   " }), json!({})] {
            let res = server
                .client
                .post(server.url(path))
                .bearer_auth(&token)
                .json(&payload)
                .send()
                .await?;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path} {payload}");

            let body: Value = res.json().await?;
            assert!(body["field_errors"]["name"].is_string());
        }

        let (_, body) = server.list(&token, path).await?;
        assert_eq!(body, json!([]), "nothing persisted at {path}");
    }
    Ok(())
}

#[tokio::test]
async fn unsupported_verb_is_405_for_authenticated_caller() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.login_new_user("mohammad@gmail.com", "somepassword123").await?;

    let res = server.client.delete(server.url("/recipe/tags")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
