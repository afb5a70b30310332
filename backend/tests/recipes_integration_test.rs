//! Integration tests for the recipe catalog and fridge endpoints

mod common;

use axum::http::StatusCode;
use common::parse;
use serde_json::{json, Value};

fn ids(page: &Value) -> Vec<i64> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_ingredients_list() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/recipes/ingredients", &token).await;

    assert_eq!(status, StatusCode::OK);
    let ingredients = parse(&response);
    let ingredients = ingredients.as_array().unwrap();
    assert_eq!(ingredients.len(), 10);
    assert_eq!(ingredients[0], "chicken");
    assert!(ingredients.contains(&json!("garlic")));
}

#[tokio::test]
async fn test_propose_with_selection() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let body = json!({ "ingredients": ["Chicken", "tomato", " onion "] });
    let (status, response) = app
        .post_auth("/api/v1/recipes/propose", &body.to_string(), &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let page = parse(&response);
    assert_eq!(ids(&page), vec![2, 4, 1]);
    assert_eq!(page["total"], 3);
    assert_eq!(page["data"][0]["grade"], "A");
}

#[tokio::test]
async fn test_propose_paginates() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let body = json!({ "ingredients": ["chicken", "tomato", "onion"], "page": 2, "per_page": 2 });
    let (status, response) = app
        .post_auth("/api/v1/recipes/propose", &body.to_string(), &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let page = parse(&response);
    assert_eq!(ids(&page), vec![1]);
    assert_eq!(page["total_pages"], 2);
}

#[tokio::test]
async fn test_propose_uses_fridge_when_no_selection() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app
        .post_auth("/api/v1/recipes/propose", &json!({}).to_string(), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&response)["error"]["field"], "ingredients");

    let fridge = json!({ "ingredients": ["egg", "Milk", "flour"] });
    let (status, response) = app.put_auth("/api/v1/fridge", &fridge.to_string(), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&response)["ingredients"], json!(["egg", "milk", "flour"]));

    let (status, response) = app
        .post_auth("/api/v1/recipes/propose", &json!({}).to_string(), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&parse(&response)), vec![3]);
}

#[tokio::test]
async fn test_best_recipe_for_default_profile() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let body = json!({ "ingredients": ["chicken", "tomato", "onion"] });
    let (status, response) = app.post_auth("/api/v1/recipes/best", &body.to_string(), &token).await;

    assert_eq!(status, StatusCode::OK);
    let best = parse(&response);
    assert_eq!(best["recipe"]["id"], 2);
    assert_eq!(best["burned_calories"], 300.0);
    assert_eq!(best["candidates"], 3);
    assert!((best["targets"]["calories"].as_f64().unwrap() - 602.625).abs() < 1e-9);
    assert!((best["targets"]["protein_g"].as_f64().unwrap() - 28.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_get_recipe() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/recipes/3", &token).await;
    assert_eq!(status, StatusCode::OK);
    let recipe = parse(&response);
    assert_eq!(recipe["name"], "crepes");
    assert_eq!(recipe["grade"], "D");
    assert_eq!(recipe["amounts"]["protein_g"], 5.0);

    let (status, response) = app.get_auth("/api/v1/recipes/99", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&response)["error"]["message"], "Recipe 99 not found");
}

#[tokio::test]
async fn test_recipe_image() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/recipes/1/image", &token).await;
    assert_eq!(status, StatusCode::OK);
    let image = parse(&response);
    assert_eq!(image["recipe_id"], 1);
    assert!(image["image_url"].as_str().unwrap().starts_with("https://"));

    let (status, response) = app.get_auth("/api/v1/recipes/2/image", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&response)["error"]["message"], "No image found for this recipe");
}

#[tokio::test]
async fn test_catalog_analysis() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/recipes/analysis", &token).await;

    assert_eq!(status, StatusCode::OK);
    let analysis = parse(&response);
    assert_eq!(analysis["total_recipes"], 4);
    assert_eq!(analysis["statistics"]["min"], -1);
    assert_eq!(analysis["statistics"]["max"], 12);
}

#[tokio::test]
async fn test_detect_ingredients() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app
        .upload_auth("/api/v1/fridge/detect", "image", b"jpeg-bytes", &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let detection = parse(&response);
    assert_eq!(detection["ingredients"], json!(["tomato", "egg"]));
    assert_eq!(detection["fallback"], false);

    let (_, fridge) = app.get_auth("/api/v1/fridge", &token).await;
    assert_eq!(parse(&fridge)["ingredients"], json!([]));
}

#[tokio::test]
async fn test_detect_falls_back_when_detector_fails() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app
        .upload_auth("/api/v1/fridge/detect", "image", b"broken", &token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let detection = parse(&response);
    assert_eq!(detection["ingredients"], json!(["chicken", "tomato", "lettuce"]));
    assert_eq!(detection["fallback"], true);
}

#[tokio::test]
async fn test_detect_without_image_part() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, response) = app
        .upload_auth("/api/v1/fridge/detect", "photo", b"jpeg-bytes", &token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&response)["error"]["field"], "image");
}

#[tokio::test]
async fn test_detect_and_store_fills_fridge() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (status, _) = app
        .upload_auth("/api/v1/fridge/detect-and-store", "image", b"jpeg-bytes", &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fridge) = app.get_auth("/api/v1/fridge", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&fridge)["ingredients"], json!(["tomato", "egg"]));
}

#[tokio::test]
async fn test_makeable_recipes_from_fridge() {
    let app = common::TestApp::new().await;
    let (_, token) = app.create_test_user().await;

    let (_, response) = app.get_auth("/api/v1/recipes/makeable", &token).await;
    assert_eq!(parse(&response), json!([]));

    let fridge = json!({ "ingredients": ["flour", "egg", "milk", "tomato"] });
    app.put_auth("/api/v1/fridge", &fridge.to_string(), &token).await;

    let (status, response) = app.get_auth("/api/v1/recipes/makeable", &token).await;
    assert_eq!(status, StatusCode::OK);
    let recipes = parse(&response);
    let recipes = recipes.as_array().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["id"], 3);
}
