mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

const INGREDIENTS: &str = "/api/recipe/ingredients";

#[tokio::test]
async fn list_is_ordered_by_name_descending() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    client.create(INGREDIENTS, &json!({ "name": "Kale" })).await?;
    client.create(INGREDIENTS, &json!({ "name": "Salt" })).await?;

    let res = client.get(INGREDIENTS).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(common::names(&body), vec!["Salt", "Kale"]);

    // Reads are idempotent
    let again: Value = client.get(INGREDIENTS).send().await?.json().await?;
    assert_eq!(body, again);
    Ok(())
}

#[tokio::test]
async fn list_is_limited_to_the_caller() -> Result<()> {
    let server = common::start_server().await?;
    let mine = server.login("user@example.com").await?;
    let theirs = server.login("other@example.com").await?;

    theirs.create(INGREDIENTS, &json!({ "name": "Vinegar" })).await?;
    let id = mine.create(INGREDIENTS, &json!({ "name": "Tumeric" })).await?;

    let body: Value = mine.get(INGREDIENTS).send().await?.json().await?;
    assert_eq!(body, json!([{ "id": id, "name": "Tumeric" }]));
    Ok(())
}

#[tokio::test]
async fn create_returns_the_new_entry() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let res = client.post(INGREDIENTS, &json!({ "name": "Cabbage" })).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["name"], "Cabbage");

    let body: Value = client.get(INGREDIENTS).send().await?.json().await?;
    assert_eq!(common::names(&body), vec!["Cabbage"]);
    Ok(())
}

#[tokio::test]
async fn empty_name_is_rejected() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let res = client.post(INGREDIENTS, &json!({ "name": "" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["name"].is_string());

    let res = client.post(INGREDIENTS, &json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = client.get(INGREDIENTS).send().await?.json().await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let res = server
        .anonymous()
        .post(server.url(INGREDIENTS))
        .bearer_auth(&client.token)
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn assigned_only_limits_to_linked_entries() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let breakfast = client.create(INGREDIENTS, &json!({ "name": "Breakfast" })).await?;
    client.create(INGREDIENTS, &json!({ "name": "Lunch" })).await?;
    client
        .create(
            "/api/recipe/recipes",
            &json!({
                "title": "Eggs on toast",
                "time_minutes": 10,
                "price": "5.00",
                "ingredients": [breakfast],
            }),
        )
        .await?;

    let body: Value = client
        .get(&format!("{INGREDIENTS}?assigned_only=1"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(common::names(&body), vec!["Breakfast"]);

    let body: Value = client.get(INGREDIENTS).send().await?.json().await?;
    assert_eq!(common::names(&body), vec!["Lunch", "Breakfast"]);

    let body: Value = client
        .get(&format!("{INGREDIENTS}?assigned_only=0"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(common::names(&body).len(), 2);
    Ok(())
}

#[tokio::test]
async fn assigned_only_lists_each_entry_once() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let eggs = client.create(INGREDIENTS, &json!({ "name": "Eggs" })).await?;
    client.create(INGREDIENTS, &json!({ "name": "Lentils" })).await?;
    for title in ["Eggs benedict", "Herb eggs"] {
        client
            .create(
                "/api/recipe/recipes",
                &json!({ "title": title, "time_minutes": 20, "price": "4", "ingredients": [eggs] }),
            )
            .await?;
    }

    let body: Value = client
        .get(&format!("{INGREDIENTS}?assigned_only=1"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body, json!([{ "id": eggs, "name": "Eggs" }]));
    Ok(())
}

#[tokio::test]
async fn invalid_assigned_only_is_rejected() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let res = client
        .get(&format!("{INGREDIENTS}?assigned_only=maybe"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["assigned_only"].is_string());
    Ok(())
}

#[tokio::test]
async fn detail_update_and_delete() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;
    let other = server.login("other@example.com").await?;

    let id = client.create(INGREDIENTS, &json!({ "name": "Cilantro" })).await?;
    let path = format!("{INGREDIENTS}/{id}");

    let body: Value = client.get(&path).send().await?.json().await?;
    assert_eq!(body, json!({ "id": id, "name": "Cilantro" }));

    let res = client.patch(&path, &json!({ "name": "Coriander" })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["name"], "Coriander");

    let res = client.put(&path, &json!({ "name": " " })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Someone else's entry does not exist for this caller
    assert_eq!(other.get(&path).send().await?.status(), StatusCode::NOT_FOUND);
    assert_eq!(other.delete(&path).send().await?.status(), StatusCode::NOT_FOUND);

    assert_eq!(client.delete(&path).send().await?.status(), StatusCode::NO_CONTENT);
    assert_eq!(client.get(&path).send().await?.status(), StatusCode::NOT_FOUND);

    let res = client.get(&format!("{INGREDIENTS}/abc")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
