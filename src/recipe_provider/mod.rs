pub mod client;
pub mod models;

pub use client::{recipe_image_url, RecipeClient};
pub use models::{
    DietaryFilters, ExtendedIngredient, Nutrient, Nutrition, Recipe, SearchOptions,
    SearchRecipesResponse,
};
