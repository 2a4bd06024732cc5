pub mod api_connection;
pub mod cli;
pub mod config;
pub mod grocery;
pub mod nutrition;
pub mod plan;
pub mod recipe_provider;
