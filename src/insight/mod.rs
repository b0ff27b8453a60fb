//! Language-model insights.
//!
//! [`InsightGenerator`] owns the prompt and the fallback policy;
//! [`LanguageModel`] is the transport seam, implemented by [`OpenAiClient`].

pub mod generator;
pub mod openai;

pub use generator::InsightGenerator;
pub use openai::OpenAiClient;

use crate::error::InsightError;
use async_trait::async_trait;

/// A service that completes a single user prompt.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier sent with each request.
    fn model_name(&self) -> &str;

    /// Return the text of the first completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, InsightError>;
}

#[async_trait]
impl<'a, T: LanguageModel + ?Sized> LanguageModel for &'a T {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn complete(&self, prompt: &str) -> Result<String, InsightError> {
        (**self).complete(prompt).await
    }
}
