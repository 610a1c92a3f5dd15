/*!
 * Provider implementations for chat-completion services.
 *
 * This module contains the client used to reach the translation model:
 * - OpenAI: any OpenAI-compatible `/chat/completions` endpoint
 * - Mock: scripted in-process provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

pub use self::openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Common trait for all LLM providers
///
/// The translation service only talks to this trait, so the HTTP client and
/// the test doubles are interchangeable.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a chat request
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<ChatCompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError>;

    /// Short provider name used in log output
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
