use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::plan::{DayOfWeek, MealType};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a week of meals and build the grocery list", long_about = None)]
pub struct Cli {
    /// Path to the saved weekly plan (overrides MEAL_PLAN_PATH)
    #[arg(long, global = true)]
    pub plan_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the recipe database
    Search {
        query: String,
        #[arg(long)]
        meal_type: Option<String>,
        #[arg(long)]
        diet: Option<String>,
        /// Comma-separated ingredients to leave out
        #[arg(long)]
        exclude: Option<String>,
        #[arg(long, default_value_t = 12)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Recipes matching the built-in healthy filters
    Healthy {
        #[arg(long)]
        meal_type: Option<String>,
        #[arg(long, default_value_t = 12)]
        limit: u32,
    },
    /// A random recipe
    Random,
    /// Recipes that use the given ingredients
    ByIngredients {
        #[arg(required = true)]
        ingredients: Vec<String>,
        #[arg(long, default_value_t = 5)]
        number: u32,
    },
    /// Full details for one recipe
    ShowRecipe { id: i64 },
    /// Put a recipe into a plan slot
    Add {
        #[arg(value_enum)]
        day: DayOfWeek,
        #[arg(value_enum)]
        meal: MealType,
        recipe_id: i64,
    },
    /// Empty a plan slot
    Remove {
        #[arg(value_enum)]
        day: DayOfWeek,
        #[arg(value_enum)]
        meal: MealType,
    },
    /// Empty the whole plan
    Clear,
    /// Print the weekly plan
    Show,
    /// Per-serving macros for a recipe, estimated when the provider has none
    Macros {
        recipe_id: i64,
        #[arg(long, default_value_t = 1)]
        servings: u32,
    },
    /// Build the grocery list from the weekly plan
    Grocery {
        /// Group locally instead of calling the text-generation provider
        #[arg(long)]
        offline: bool,
        /// Replace a line of the list, as INDEX=TEXT (repeatable)
        #[arg(long = "edit", value_parser = parse_line_edit)]
        edits: Vec<(usize, String)>,
        /// Also write the list to this file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the aggregated ingredients as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parses `INDEX=TEXT`.
pub fn parse_line_edit(raw: &str) -> Result<(usize, String), String> {
    let (index, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TEXT, got '{}'", raw))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid line index '{}': {}", index, e))?;
    Ok((index, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_edit_parses() {
        assert_eq!(parse_line_edit("1=2 lemons"), Ok((1, "2 lemons".to_string())));
        assert_eq!(parse_line_edit("0=a=b"), Ok((0, "a=b".to_string())));
        assert!(parse_line_edit("two=lemons").is_err());
        assert!(parse_line_edit("3").is_err());
    }

    #[test]
    fn grocery_command_accepts_edits() {
        let cli = Cli::try_parse_from([
            "meal-planner",
            "grocery",
            "--offline",
            "--edit",
            "2=- 3 limes",
            "--plan-file",
            "plan.json",
        ])
        .unwrap();
        assert_eq!(cli.plan_file, Some(PathBuf::from("plan.json")));
        match cli.command {
            Command::Grocery { offline, edits, .. } => {
                assert!(offline);
                assert_eq!(edits, vec![(2, "- 3 limes".to_string())]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn add_command_parses_slot() {
        let cli = Cli::try_parse_from(["meal-planner", "add", "monday", "dinner", "715538"]).unwrap();
        match cli.command {
            Command::Add { day, meal, recipe_id } => {
                assert_eq!(day, DayOfWeek::Monday);
                assert_eq!(meal, MealType::Dinner);
                assert_eq!(recipe_id, 715538);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
