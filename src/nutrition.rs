use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api_connection::{strip_code_fences, TextGenerator};
use crate::recipe_provider::Recipe;

pub const CALORIES: &str = "Calories";
pub const PROTEIN: &str = "Protein";
pub const CARBOHYDRATES: &str = "Carbohydrates";
pub const FAT: &str = "Fat";

/// Upper bounds for a single estimated serving. Anything above is treated as a bad reply.
const MAX_ESTIMATED_CALORIES: f64 = 10_000.0;
const MAX_ESTIMATED_GRAMS: f64 = 1_000.0;

/// Per-serving macros, rounded to whole units (kcal, grams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacroSummary {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl MacroSummary {
    pub fn scaled(self, servings: u32) -> Self {
        let s = i64::from(servings);
        Self {
            calories: self.calories.saturating_mul(s),
            protein: self.protein.saturating_mul(s),
            carbs: self.carbs.saturating_mul(s),
            fat: self.fat.saturating_mul(s),
        }
    }
}

pub fn nutrient_amount(recipe: &Recipe, name: &str) -> f64 {
    recipe
        .nutrition
        .as_ref()
        .and_then(|n| n.nutrients.iter().find(|nutrient| nutrient.name == name))
        .map(|nutrient| nutrient.amount)
        .unwrap_or(0.0)
}

/// Recipe total divided by servings, scaled to `desired_servings` and rounded.
pub fn nutrient_per_serving(recipe: &Recipe, name: &str, desired_servings: u32) -> i64 {
    if recipe.servings == 0 {
        return 0;
    }
    let per_serving = nutrient_amount(recipe, name) / f64::from(recipe.servings);
    (per_serving * f64::from(desired_servings)).round() as i64
}

pub fn per_serving_macros(recipe: &Recipe) -> MacroSummary {
    MacroSummary {
        calories: nutrient_per_serving(recipe, CALORIES, 1),
        protein: nutrient_per_serving(recipe, PROTEIN, 1),
        carbs: nutrient_per_serving(recipe, CARBOHYDRATES, 1),
        fat: nutrient_per_serving(recipe, FAT, 1),
    }
}

/// True when the provider sent no nutrition, or only zeros.
pub fn needs_macro_estimate(recipe: &Recipe) -> bool {
    match &recipe.nutrition {
        None => true,
        Some(nutrition) => nutrition.nutrients.iter().all(|n| n.amount == 0.0),
    }
}

#[derive(Debug, Deserialize)]
struct EstimatedMacros {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl EstimatedMacros {
    fn is_plausible(&self) -> bool {
        let in_range = |value: f64, max: f64| value.is_finite() && (0.0..=max).contains(&value);
        in_range(self.calories, MAX_ESTIMATED_CALORIES)
            && [self.protein, self.carbs, self.fat].iter().all(|g| in_range(*g, MAX_ESTIMATED_GRAMS))
    }
}

pub fn build_macro_prompt(recipe: &Recipe) -> String {
    let ingredients = recipe
        .extended_ingredients
        .iter()
        .filter_map(|i| i.original.clone().or_else(|| i.name.clone()))
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "/no_thinking
You are a nutrition assistant. Estimate the macronutrients for ONE serving of the recipe below.
Recipe: \"{}\"
Servings: {}
Ingredients:
{}

Respond ONLY with a JSON object of the form {{ \"calories\": number, \"protein\": number, \"carbs\": number, \"fat\": number }}, where calories are kcal and the rest are grams.",
        recipe.title,
        recipe.servings.max(1),
        ingredients
    )
}

/// Asks the text-generation provider for per-serving macros. Any failure
/// (transport, empty reply, unparsable JSON, negative or absurd values) yields `None`.
pub async fn estimate_macros<G: TextGenerator + ?Sized>(generator: &G, recipe: &Recipe) -> Option<MacroSummary> {
    let prompt = build_macro_prompt(recipe);
    let content = match generator.generate(&prompt).await {
        Ok(content) => content,
        Err(e) => {
            warn!(recipe = recipe.id, "Macro estimation failed: {}", e);
            return None;
        }
    };

    let json = strip_code_fences(&content);
    match serde_json::from_str::<EstimatedMacros>(json) {
        Ok(m) if m.is_plausible() => {
            Some(MacroSummary {
                calories: m.calories.round() as i64,
                protein: m.protein.round() as i64,
                carbs: m.carbs.round() as i64,
                fat: m.fat.round() as i64,
            })
        }
        Ok(_) => {
            warn!(recipe = recipe.id, "Macro estimate contained invalid values");
            None
        }
        Err(e) => {
            debug!(recipe = recipe.id, "Failed to parse macro estimate: {}. Raw: {}", e, json);
            None
        }
    }
}
