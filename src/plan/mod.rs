pub mod store;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::recipe_provider::Recipe;

pub use store::PlanStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day x meal grid of recipes. Empty slots are simply absent.
///
/// Iteration is always Monday..Sunday, then Breakfast..Snack within a day,
/// which fixes the first-seen order used by aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    #[serde(default)]
    days: BTreeMap<DayOfWeek, BTreeMap<MealType, Recipe>>,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_meal(&mut self, day: DayOfWeek, meal: MealType, recipe: Recipe) {
        self.days.entry(day).or_default().insert(meal, recipe);
    }

    /// Clears a slot, returning the recipe it held.
    pub fn remove_meal(&mut self, day: DayOfWeek, meal: MealType) -> Option<Recipe> {
        let meals = self.days.get_mut(&day)?;
        let removed = meals.remove(&meal);
        if meals.is_empty() {
            self.days.remove(&day);
        }
        removed
    }

    pub fn meal(&self, day: DayOfWeek, meal: MealType) -> Option<&Recipe> {
        self.days.get(&day).and_then(|meals| meals.get(&meal))
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(BTreeMap::is_empty)
    }

    /// Every occupied slot in plan order.
    pub fn slots(&self) -> impl Iterator<Item = (DayOfWeek, MealType, &Recipe)> + '_ {
        self.days
            .iter()
            .flat_map(|(day, meals)| meals.iter().map(move |(meal, recipe)| (*day, *meal, recipe)))
    }
}
