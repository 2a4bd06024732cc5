use tracing::{debug, info, warn};

use super::aggregator::{aggregate, AggregatedIngredient};
use super::refinement::{RefinementGateway, REFINEMENT_ERROR_TEXT};
use super::view_model::EditableGroceryList;
use crate::api_connection::{ApiConnectionError, TextGenerator};
use crate::plan::WeeklyPlan;

pub const EMPTY_PLAN_MESSAGE: &str =
    "Your grocery list will be generated based on your meal plan. Add some meals to your planner to get started!";
pub const LOADING_MESSAGE: &str = "Generating your grocery list...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementState {
    /// Nothing to refine: the plan has no ingredients.
    Idle,
    Loading,
    Ready,
    ReadyWithError,
}

/// A refinement request for one aggregation snapshot. Only the ticket with
/// the latest token may commit its result.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementTicket {
    token: u64,
    ingredients: Vec<AggregatedIngredient>,
}

impl RefinementTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn ingredients(&self) -> &[AggregatedIngredient] {
        &self.ingredients
    }
}

/// Owns everything derived from the weekly plan: the aggregation, the
/// refinement cycle, and the editable list. The plan itself is passed in.
#[derive(Debug, Clone)]
pub struct GroceryListController {
    aggregated: Vec<AggregatedIngredient>,
    latest_token: u64,
    state: RefinementState,
    list: EditableGroceryList,
}

impl Default for GroceryListController {
    fn default() -> Self {
        Self::new()
    }
}

impl GroceryListController {
    pub fn new() -> Self {
        Self {
            aggregated: Vec::new(),
            latest_token: 0,
            state: RefinementState::Idle,
            list: EditableGroceryList::default(),
        }
    }

    pub fn state(&self) -> RefinementState {
        self.state
    }

    pub fn aggregated(&self) -> &[AggregatedIngredient] {
        &self.aggregated
    }

    pub fn list(&self) -> &EditableGroceryList {
        &self.list
    }

    /// Re-aggregates synchronously and supersedes any in-flight refinement.
    /// Returns a ticket to refine, or `None` when the plan has no ingredients
    /// (the provider must not be called then).
    pub fn plan_changed(&mut self, plan: &WeeklyPlan) -> Option<RefinementTicket> {
        self.aggregated = aggregate(plan);
        self.latest_token += 1;

        if self.aggregated.is_empty() {
            debug!("plan has no ingredients, grocery list idle");
            self.state = RefinementState::Idle;
            self.list.replace_source("");
            return None;
        }

        self.state = RefinementState::Loading;
        debug!(token = self.latest_token, items = self.aggregated.len(), "grocery list loading");
        Some(RefinementTicket {
            token: self.latest_token,
            ingredients: self.aggregated.clone(),
        })
    }

    /// Commits a refinement outcome if it belongs to the latest request.
    /// Stale outcomes are dropped and `false` is returned. A failed outcome
    /// shows [`REFINEMENT_ERROR_TEXT`] in place of the list.
    pub fn apply_refinement(&mut self, token: u64, outcome: Result<String, ApiConnectionError>) -> bool {
        if token != self.latest_token || self.state != RefinementState::Loading {
            debug!(token, latest = self.latest_token, "discarding stale refinement result");
            return false;
        }

        match outcome {
            Ok(text) => {
                self.state = RefinementState::Ready;
                self.list.replace_source(text);
            }
            Err(e) => {
                warn!("Grocery list refinement failed: {}", e);
                self.state = RefinementState::ReadyWithError;
                self.list.replace_source(REFINEMENT_ERROR_TEXT);
            }
        }
        info!(lines = self.list.len(), state = ?self.state, "grocery list updated");
        true
    }

    /// Aggregate, refine and apply in one go.
    pub async fn refresh<G: TextGenerator>(
        &mut self,
        plan: &WeeklyPlan,
        gateway: &RefinementGateway<G>,
    ) -> RefinementState {
        if let Some(ticket) = self.plan_changed(plan) {
            let outcome = gateway.try_refine(ticket.ingredients()).await;
            self.apply_refinement(ticket.token(), outcome);
        }
        self.state
    }

    /// Edits only apply once a list is showing.
    pub fn set_override(&mut self, line_index: usize, new_text: impl Into<String>) -> bool {
        match self.state {
            RefinementState::Ready | RefinementState::ReadyWithError => {
                self.list.set_override(line_index, new_text)
            }
            RefinementState::Idle | RefinementState::Loading => false,
        }
    }

    pub fn effective_line(&self, line_index: usize) -> Option<&str> {
        self.list.effective_line(line_index)
    }

    pub fn display_text(&self) -> String {
        match self.state {
            RefinementState::Idle => EMPTY_PLAN_MESSAGE.to_string(),
            RefinementState::Loading => LOADING_MESSAGE.to_string(),
            RefinementState::Ready | RefinementState::ReadyWithError => self.list.to_display_text(),
        }
    }
}
