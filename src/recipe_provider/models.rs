use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Nutrient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

/// Ingredient as the recipe provider reports it. Every field is optional on
/// the wire; malformed entries are filtered out during aggregation.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ExtendedIngredient {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Display string, e.g. "2 cups baby spinach, washed".
    #[serde(default)]
    pub original: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstructionStep {
    pub number: u32,
    pub step: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AnalyzedInstruction {
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub ready_in_minutes: u32,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub analyzed_instructions: Vec<AnalyzedInstruction>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl Recipe {
    /// Instruction steps, falling back to splitting the free-text
    /// instructions on line breaks, periods and semicolons.
    pub fn steps(&self) -> Vec<String> {
        let split = |text: &str| -> Vec<String> {
            text.split(&['\n', '\r', '.', ';'][..])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        match self.analyzed_instructions.first() {
            Some(instruction) if !instruction.steps.is_empty() => instruction
                .steps
                .iter()
                .flat_map(|s| split(&s.step))
                .collect(),
            _ => self.instructions.as_deref().map(split).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecipesResponse {
    #[serde(default)]
    pub results: Vec<Recipe>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RandomRecipesResponse {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

/// Health-related search filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietaryFilters {
    pub max_calories: Option<u32>,
    pub min_protein: Option<u32>,
    pub max_sugar: Option<u32>,
    pub max_fat: Option<u32>,
    pub min_fiber: Option<u32>,
}

impl DietaryFilters {
    pub fn healthy() -> Self {
        Self {
            max_calories: Some(600),
            min_protein: Some(15),
            max_sugar: Some(20),
            max_fat: Some(30),
            min_fiber: Some(5),
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("maxCalories", self.max_calories),
            ("minProtein", self.min_protein),
            ("maxSugar", self.max_sugar),
            ("maxFat", self.max_fat),
            ("minFiber", self.min_fiber),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v.to_string())))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub offset: u32,
    pub limit: u32,
    pub meal_type: Option<String>,
    pub diet: Option<String>,
    pub exclude_ingredients: Option<String>,
    pub filters: DietaryFilters,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 12,
            meal_type: None,
            diet: None,
            exclude_ingredients: None,
            filters: DietaryFilters::default(),
        }
    }
}
