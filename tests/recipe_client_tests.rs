mod common;

use meal_planner::recipe_provider::{RecipeClient, SearchOptions};
use std::time::Duration;

const SEARCH_BODY: &str = r#"{
    "results": [
        {
            "id": 101,
            "title": "Lemon Chicken",
            "servings": 2,
            "readyInMinutes": 30,
            "nutrition": {"nutrients": [{"name": "Calories", "amount": 900, "unit": "kcal"}]},
            "extendedIngredients": [{"name": "lemon", "amount": 1, "unit": "", "original": "1 lemon"}]
        }
    ],
    "offset": 0,
    "number": 1,
    "totalResults": 57
}"#;

fn client(url: &str) -> RecipeClient {
    RecipeClient::new(Some("recipe-key".to_string()), url)
}

#[tokio::test]
async fn search_sends_filters_and_parses_results() {
    let (url, request_rx) = common::serve_once("200 OK", SEARCH_BODY).await;
    let options = SearchOptions {
        meal_type: Some("dinner".to_string()),
        exclude_ingredients: Some("nuts, shellfish".to_string()),
        ..SearchOptions::default()
    };

    let response = client(&url).search_recipes("chicken", &options).await;
    assert_eq!(response.total_results, 57);
    assert_eq!(response.results[0].title, "Lemon Chicken");
    assert_eq!(response.results[0].extended_ingredients[0].original.as_deref(), Some("1 lemon"));

    let request = request_rx.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with("GET /recipes/complexSearch?"));
    assert!(request_line.contains("apiKey=recipe-key"));
    assert!(request_line.contains("query=chicken"));
    assert!(request_line.contains("addRecipeNutrition=true"));
    assert!(request_line.contains("type=dinner"));
    assert!(request_line.contains("excludeIngredients=nuts%2C+shellfish"));
}

#[tokio::test]
async fn healthy_search_applies_fixed_filters() {
    let (url, request_rx) = common::serve_once("200 OK", SEARCH_BODY).await;
    client(&url).get_healthy_recipes(0, 6, None).await;

    let request = request_rx.await.unwrap();
    let request_line = request.lines().next().unwrap();
    for pair in ["maxCalories=600", "minProtein=15", "maxSugar=20", "maxFat=30", "minFiber=5", "number=6"] {
        assert!(request_line.contains(pair), "missing {} in {}", pair, request_line);
    }
}

#[tokio::test]
async fn error_status_degrades_to_empty_search() {
    let (url, _rx) = common::serve_once("402 Payment Required", r#"{"message":"quota"}"#).await;
    let response = client(&url).search_recipes("pasta", &SearchOptions::default()).await;
    assert!(response.results.is_empty());
    assert_eq!(response.total_results, 0);
}

#[tokio::test]
async fn malformed_details_degrade_to_none() {
    let (url, _rx) = common::serve_once("200 OK", "<html>oops</html>").await;
    assert!(client(&url).get_recipe_details(101).await.is_none());
}

#[tokio::test]
async fn details_are_fetched_by_id() {
    let (url, request_rx) = common::serve_once(
        "200 OK",
        r#"{"id": 101, "title": "Lemon Chicken", "servings": 2, "readyInMinutes": 30}"#,
    )
    .await;
    let recipe = client(&url).get_recipe_details(101).await.unwrap();
    assert_eq!(recipe.title, "Lemon Chicken");

    let request = request_rx.await.unwrap();
    assert!(request.starts_with("GET /recipes/101/information?"));
}

#[tokio::test]
async fn random_recipe_takes_first() {
    let (url, _rx) = common::serve_once("200 OK", r#"{"recipes": [{"id": 7, "title": "Toast"}, {"id": 8}]}"#).await;
    let recipe = client(&url).get_random_recipe().await.unwrap();
    assert_eq!(recipe.id, 7);
}

#[tokio::test]
async fn by_ingredients_joins_names() {
    let (url, request_rx) = common::serve_once("200 OK", r#"[{"id": 3, "title": "Omelette"}]"#).await;
    let recipes = client(&url)
        .find_recipes_by_ingredients(&["eggs".to_string(), "cheese".to_string()], 5)
        .await;
    assert_eq!(recipes.len(), 1);

    let request = request_rx.await.unwrap();
    assert!(request.lines().next().unwrap().contains("ingredients=eggs%2Ccheese"));
}

#[tokio::test]
async fn unreachable_provider_degrades_to_empty() {
    let url = common::closed_port_url().await;
    let client = client(&url);
    assert!(client.find_recipes_by_ingredients(&["egg".to_string()], 5).await.is_empty());
    assert!(client.get_random_recipe().await.is_none());
}

#[tokio::test]
async fn hanging_server_times_out_to_nothing() {
    let url = common::serve_silently().await;
    let client = client(&url).with_timeout(Duration::from_millis(300));

    let recipe = tokio::time::timeout(Duration::from_secs(10), client.get_recipe_details(7))
        .await
        .expect("lookup should give up on its own");
    assert!(recipe.is_none());
}
