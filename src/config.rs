use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api_connection::endpoints::{DEFAULT_REQUEST_TIMEOUT, OPENROUTER_BASE_URL, OPENROUTER_MODELS};
use crate::recipe_provider::client::SPOONACULAR_BASE_URL;

pub const SPOONACULAR_API_KEY_ENV_VAR: &str = "SPOONACULAR_API_KEY";
pub const OPENROUTER_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_PLAN_PATH: &str = "meal_plan.json";

/// Runtime settings, read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spoonacular_api_key: Option<String>,
    pub recipe_base_url: String,
    /// Name of the variable holding the text-generation key; resolved per call.
    pub llm_api_key_env_var: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub plan_path: PathBuf,
    pub site_url: String,
    pub app_name: String,
    /// Applied to every outbound HTTP request.
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spoonacular_api_key: None,
            recipe_base_url: SPOONACULAR_BASE_URL.to_string(),
            llm_api_key_env_var: OPENROUTER_API_KEY_ENV_VAR.to_string(),
            llm_base_url: OPENROUTER_BASE_URL.to_string(),
            llm_model: OPENROUTER_MODELS[0].model_name.to_string(),
            plan_path: PathBuf::from(DEFAULT_PLAN_PATH),
            site_url: "http://localhost:3000".to_string(),
            app_name: "MealPlanner".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            spoonacular_api_key: get(SPOONACULAR_API_KEY_ENV_VAR),
            recipe_base_url: get("SPOONACULAR_BASE_URL").unwrap_or(defaults.recipe_base_url),
            llm_api_key_env_var: defaults.llm_api_key_env_var,
            llm_base_url: get("OPENROUTER_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: get("MEAL_PLANNER_MODEL").unwrap_or(defaults.llm_model),
            plan_path: get("MEAL_PLAN_PATH").map(PathBuf::from).unwrap_or(defaults.plan_path),
            site_url: get("SITE_URL").unwrap_or(defaults.site_url),
            app_name: get("APP_NAME").unwrap_or(defaults.app_name),
            request_timeout: get("MEAL_PLANNER_TIMEOUT_SECS")
                .and_then(|secs| secs.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}
