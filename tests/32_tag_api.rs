mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

const TAGS: &str = "/api/recipe/tags";

#[tokio::test]
async fn tags_are_scoped_and_ordered() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;
    let other = server.login("other@example.com").await?;

    client.create(TAGS, &json!({ "name": "Dessert" })).await?;
    client.create(TAGS, &json!({ "name": "Vegan" })).await?;
    other.create(TAGS, &json!({ "name": "Fruity" })).await?;

    let body: Value = client.get(TAGS).send().await?.json().await?;
    assert_eq!(common::names(&body), vec!["Vegan", "Dessert"]);
    Ok(())
}

#[tokio::test]
async fn tags_support_assigned_only() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let quick = client.create(TAGS, &json!({ "name": "Quick" })).await?;
    client.create(TAGS, &json!({ "name": "Slow" })).await?;
    client
        .create(
            "/api/recipe/recipes",
            &json!({ "title": "Salad", "time_minutes": 5, "price": "3.20", "tags": [quick] }),
        )
        .await?;

    let body: Value = client
        .get(&format!("{TAGS}?assigned_only=true"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(common::names(&body), vec!["Quick"]);
    Ok(())
}

#[tokio::test]
async fn deleting_a_tag_unlinks_it_from_recipes() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.login("user@example.com").await?;

    let tag = client.create(TAGS, &json!({ "name": "Spicy" })).await?;
    let recipe = client
        .create(
            "/api/recipe/recipes",
            &json!({ "title": "Curry", "time_minutes": 40, "price": "9.99", "tags": [tag] }),
        )
        .await?;

    let res = client.delete(&format!("{TAGS}/{tag}")).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: Value = client
        .get(&format!("/api/recipe/recipes/{recipe}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["tags"], json!([]));
    Ok(())
}
