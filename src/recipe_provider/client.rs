use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::models::{
    DietaryFilters, RandomRecipesResponse, Recipe, SearchOptions, SearchRecipesResponse,
};
use crate::api_connection::endpoints::DEFAULT_REQUEST_TIMEOUT;
use crate::config::AppConfig;

pub const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

/// Image size presets served by the recipe image CDN.
pub mod image_sizes {
    pub const THUMBNAIL: &str = "90x90";
    pub const SMALL: &str = "240x240";
    pub const MEDIUM: &str = "312x312";
    pub const LARGE: &str = "480x480";
    pub const EXTRA_LARGE: &str = "636x636";
}

pub fn recipe_image_url(id: i64, size: &str) -> String {
    format!("https://spoonacular.com/recipeImages/{}-{}.jpg", id, size)
}

fn http_client(timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build recipe HTTP client, using defaults: {}", e);
            Client::new()
        }
    }
}

#[derive(Debug, Error)]
pub enum RecipeClientError {
    #[error("recipe API key is not set")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("recipe API request failed with status {0}")]
    Status(reqwest::StatusCode),
}

/// Recipe lookups. Every public method fails closed: errors are logged and
/// turned into an empty collection or `None`.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl RecipeClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http_client(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.spoonacular_api_key.clone(), config.recipe_base_url.clone())
            .with_timeout(config.request_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = http_client(timeout);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RecipeClientError> {
        let api_key = self.api_key.as_deref().ok_or(RecipeClientError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "recipe API request");

        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", api_key)])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecipeClientError::Status(response.status()));
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn search_recipes(&self, query: &str, options: &SearchOptions) -> SearchRecipesResponse {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("addRecipeNutrition", "true".to_string()),
            ("number", options.limit.to_string()),
            ("offset", options.offset.to_string()),
            ("sort", "random".to_string()),
        ];
        if let Some(meal_type) = &options.meal_type {
            params.push(("type", meal_type.clone()));
        }
        if let Some(diet) = &options.diet {
            params.push(("diet", diet.clone()));
        }
        if let Some(exclude) = &options.exclude_ingredients {
            params.push(("excludeIngredients", exclude.clone()));
        }
        params.extend(options.filters.query_pairs());

        match self.get_json("/recipes/complexSearch", &params).await {
            Ok(response) => response,
            Err(e) => {
                log_failure("searching recipes", &e);
                SearchRecipesResponse::default()
            }
        }
    }

    pub async fn get_healthy_recipes(
        &self,
        offset: u32,
        limit: u32,
        meal_type: Option<String>,
    ) -> SearchRecipesResponse {
        let options = SearchOptions {
            offset,
            limit,
            meal_type,
            filters: DietaryFilters::healthy(),
            ..SearchOptions::default()
        };
        self.search_recipes("", &options).await
    }

    pub async fn get_recipe_details(&self, id: i64) -> Option<Recipe> {
        let path = format!("/recipes/{}/information", id);
        let params = [("addRecipeNutrition", "true".to_string())];
        match self.get_json::<Recipe>(&path, &params).await {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                log_failure("fetching recipe details", &e);
                None
            }
        }
    }

    pub async fn get_random_recipe(&self) -> Option<Recipe> {
        let params = [
            ("number", "1".to_string()),
            ("addRecipeNutrition", "true".to_string()),
        ];
        match self.get_json::<RandomRecipesResponse>("/recipes/random", &params).await {
            Ok(response) => response.recipes.into_iter().next(),
            Err(e) => {
                log_failure("fetching random recipe", &e);
                None
            }
        }
    }

    pub async fn find_recipes_by_ingredients(&self, ingredients: &[String], number: u32) -> Vec<Recipe> {
        let params = [
            ("ingredients", ingredients.join(",")),
            ("number", number.to_string()),
            ("addRecipeNutrition", "true".to_string()),
        ];
        match self.get_json::<Vec<Recipe>>("/recipes/findByIngredients", &params).await {
            Ok(recipes) => recipes,
            Err(e) => {
                log_failure("finding recipes by ingredients", &e);
                Vec::new()
            }
        }
    }
}

fn log_failure(action: &str, err: &RecipeClientError) {
    match err {
        RecipeClientError::MissingApiKey => error!("Recipe API key is not set; {} skipped", action),
        other => warn!("Error {}: {}", action, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_uses_size_preset() {
        assert_eq!(
            recipe_image_url(42, image_sizes::LARGE),
            "https://spoonacular.com/recipeImages/42-480x480.jpg"
        );
    }

    #[tokio::test]
    async fn missing_key_degrades_to_empty_results() {
        let client = RecipeClient::new(None, SPOONACULAR_BASE_URL);
        assert!(!client.has_api_key());

        let search = client.search_recipes("pasta", &SearchOptions::default()).await;
        assert!(search.results.is_empty());
        assert_eq!(search.total_results, 0);
        assert!(client.get_recipe_details(1).await.is_none());
        assert!(client.get_random_recipe().await.is_none());
        assert!(client
            .find_recipes_by_ingredients(&["egg".to_string()], 5)
            .await
            .is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RecipeClient::new(None, "http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
