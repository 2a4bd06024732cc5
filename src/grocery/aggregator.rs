use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::plan::WeeklyPlan;
use crate::recipe_provider::ExtendedIngredient;

/// Ingredient normalized from a recipe: name, non-negative amount, unit (maybe empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl Ingredient {
    /// `None` for entries with no name or an unusable amount.
    pub fn from_extended(raw: &ExtendedIngredient) -> Option<Self> {
        let name = raw.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        // `abs` folds -0.0 into 0.0.
        let amount = raw.amount.filter(|a| a.is_finite() && *a >= 0.0)?.abs();
        Some(Self {
            name: name.to_string(),
            amount,
            unit: raw.unit.clone().unwrap_or_default(),
        })
    }
}

/// One line of the merged shopping multiset. `name` keeps the casing of
/// its first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl AggregatedIngredient {
    /// "2 cups flour", or "3 eggs" when there is no unit.
    pub fn display_line(&self) -> String {
        if self.unit.trim().is_empty() {
            format!("{} {}", format_amount(self.amount), self.name)
        } else {
            format!("{} {} {}", format_amount(self.amount), self.unit, self.name)
        }
    }
}

/// Up to two decimals, trailing zeros dropped.
pub fn format_amount(amount: f64) -> String {
    let rounded = format!("{:.2}", amount);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sums every ingredient of every planned recipe. Identity is
/// `(lower-cased name, unit)`; output keeps first-seen order.
pub fn aggregate(plan: &WeeklyPlan) -> Vec<AggregatedIngredient> {
    aggregate_ingredients(
        plan.slots()
            .flat_map(|(_, _, recipe)| recipe.extended_ingredients.iter())
            .filter_map(Ingredient::from_extended),
    )
}

pub fn aggregate_ingredients(ingredients: impl IntoIterator<Item = Ingredient>) -> Vec<AggregatedIngredient> {
    let mut merged: Vec<AggregatedIngredient> = Vec::new();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for ingredient in ingredients {
        let key = (ingredient.name.to_lowercase(), ingredient.unit.clone());
        match positions.get(&key).copied() {
            Some(index) => merged[index].amount += ingredient.amount,
            None => {
                positions.insert(key, merged.len());
                merged.push(AggregatedIngredient {
                    name: ingredient.name,
                    amount: ingredient.amount,
                    unit: ingredient.unit,
                });
            }
        }
    }

    merged
}
