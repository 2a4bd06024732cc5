//! Grocery list pipeline: weekly plan -> aggregation -> (local sections) ->
//! text-generation refinement -> editable list.

pub mod aggregator;
pub mod classifier;
pub mod controller;
pub mod export;
pub mod refinement;
pub mod view_model;

pub use aggregator::{aggregate, AggregatedIngredient, Ingredient};
pub use classifier::{classify, Section};
pub use controller::{GroceryListController, RefinementState, RefinementTicket};
pub use refinement::{RefinementGateway, REFINEMENT_ERROR_TEXT};
pub use view_model::{split_lines, EditableGroceryList};
