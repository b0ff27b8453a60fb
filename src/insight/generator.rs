//! Prompt construction and the insight fallback policy.

use crate::insight::LanguageModel;
use crate::models::{Insight, ProductStats};
use tracing::{debug, error, info};

/// Render one line per product, in map order.
pub fn render_product_list(stats: &ProductStats) -> String {
    stats
        .iter()
        .map(|(name, qty)| format!("{}: {} sales", name, qty))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the recommendation prompt for the given product statistics.
pub fn build_prompt(stats: &ProductStats, language: &str) -> String {
    format!(
        "You are an e-commerce AI assistant.\n\
         Briefly review the products sold in recent orders:\n\
         {}\n\
         \n\
         Give 2-3 practical recommendations in {}.\n",
        render_product_list(stats),
        language
    )
}

/// Turns product statistics into recommendations using a language model.
///
/// Every model failure is logged and replaced with [`Insight::Fallback`].
pub struct InsightGenerator<M> {
    model: M,
    language: String,
}

impl<M: LanguageModel> InsightGenerator<M> {
    pub fn new(model: M, language: impl Into<String>) -> Self {
        Self {
            model,
            language: language.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Ask the model for recommendations. Never fails.
    pub async fn generate(&self, stats: &ProductStats) -> Insight {
        let prompt = build_prompt(stats, &self.language);
        debug!("Insight prompt:\n{}", prompt);

        match self.model.complete(&prompt).await {
            Ok(text) => {
                info!("Received insight from {}", self.model.model_name());
                Insight::Generated(text.trim().to_string())
            }
            Err(e) => {
                error!("Insight generation failed: {}", e);
                debug!("Insight error details: {:?}", e);
                Insight::Fallback
            }
        }
    }
}
