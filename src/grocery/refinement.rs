use tracing::{debug, warn};

use super::aggregator::AggregatedIngredient;
use super::classifier::Section;
use crate::api_connection::{strip_code_fences, ApiConnectionError, TextGenerator};

/// Shown in place of the list when the text-generation call fails.
pub const REFINEMENT_ERROR_TEXT: &str = "Error generating cleaned list.";

pub fn build_refinement_prompt(ingredients: &[AggregatedIngredient]) -> String {
    let sections = Section::ALL
        .iter()
        .map(Section::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let items = ingredients
        .iter()
        .map(|item| format!("- {}", item.display_line()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "/no_thinking
You are a grocery list assistant. Clean up the following grocery list, which was combined from every recipe in a weekly meal plan.

Rules:
1. Merge ingredients that are the same item under different names (for example \"salt\" and \"sea salt\"), adding their amounts together.
2. Standardize ingredient names and amounts into practical shopping quantities.
3. Group the items into exactly these six sections, in this order: {sections}.
4. Output every section header as a markdown heading (\"## Section\"), even when the section has no items.
5. Put any item that does not clearly belong to a section under Other.
6. List each item as a markdown bullet (\"- amount unit name\").

Respond with the grocery list only, without any introduction or closing remarks.

Ingredients:
{items}"
    )
}

/// Sends the aggregated multiset to the text-generation provider and hands
/// back its markdown verbatim. Structure is not validated here.
pub struct RefinementGateway<G> {
    generator: G,
}

impl<G: TextGenerator> RefinementGateway<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn try_refine(&self, ingredients: &[AggregatedIngredient]) -> Result<String, ApiConnectionError> {
        let prompt = build_refinement_prompt(ingredients);
        debug!(items = ingredients.len(), "requesting grocery list refinement");
        let content = self.generator.generate(&prompt).await?;
        let cleaned = strip_code_fences(&content);
        if cleaned.is_empty() {
            return Err(ApiConnectionError::EmptyResponse);
        }
        Ok(cleaned.to_string())
    }

    /// Never fails: provider errors become [`REFINEMENT_ERROR_TEXT`].
    /// Callers skip this entirely for an empty ingredient list.
    pub async fn refine(&self, ingredients: &[AggregatedIngredient]) -> String {
        match self.try_refine(ingredients).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Grocery list refinement failed: {}", e);
                REFINEMENT_ERROR_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, ApiConnectionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|_| ApiConnectionError::EmptyResponse)
        }
    }

    fn items() -> Vec<AggregatedIngredient> {
        vec![
            AggregatedIngredient { name: "salt".to_string(), amount: 1.0, unit: "tsp".to_string() },
            AggregatedIngredient { name: "sea salt".to_string(), amount: 0.5, unit: "tsp".to_string() },
            AggregatedIngredient { name: "lemons".to_string(), amount: 2.0, unit: String::new() },
        ]
    }

    #[test]
    fn prompt_embeds_every_ingredient_and_section() {
        let prompt = build_refinement_prompt(&items());
        assert!(prompt.contains("- 1 tsp salt"));
        assert!(prompt.contains("- 0.5 tsp sea salt"));
        assert!(prompt.contains("- 2 lemons"));
        assert!(prompt.contains("Produce, Dairy, Meat/Poultry, Bakery, Pantry, Other"));
        assert!(prompt.contains("even when the section has no items"));
    }

    #[tokio::test]
    async fn returns_provider_text_without_fences() {
        let gateway = RefinementGateway::new(Canned {
            reply: Ok("```markdown\n## Produce\n- 2 lemons\n```".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        assert_eq!(gateway.refine(&items()).await, "## Produce\n- 2 lemons");
        assert_eq!(gateway.generator().prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failure_becomes_sentinel_text() {
        let gateway = RefinementGateway::new(Canned { reply: Err(()), prompts: Mutex::new(Vec::new()) });
        assert_eq!(gateway.refine(&items()).await, REFINEMENT_ERROR_TEXT);
    }

    #[tokio::test]
    async fn blank_reply_is_treated_as_failure() {
        let gateway = RefinementGateway::new(Canned {
            reply: Ok("```\n```".to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        assert_eq!(gateway.refine(&items()).await, REFINEMENT_ERROR_TEXT);
    }
}
