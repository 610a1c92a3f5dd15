/*!
 * Core translation service implementation.
 *
 * This module contains the `DocumentTranslator` seam used by the pipeline and
 * `TranslationService`, its implementation on top of a chat-completion
 * provider with retry and backoff.
 */

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::language_utils::TargetLanguage;
use crate::providers::openai::{ChatCompletionRequest, OpenAI};
use crate::providers::Provider;

use super::prompts::TranslationPromptBuilder;
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};

/// Translates whole documents
///
/// Translation is atomic: either the full translated text or an error.
#[async_trait]
pub trait DocumentTranslator: Send + Sync {
    /// Translate `content` into `target`
    async fn translate(&self, content: &str, target: &TargetLanguage) -> Result<String, TranslationError>;
}

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Retry policy for failed requests
    pub retry: RetryPolicy,
}

impl TranslationOptions {
    /// Options described by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            retry: RetryPolicy::from_config(&config.retry),
        }
    }
}

/// Main translation service for documentation pages
pub struct TranslationService {
    /// Chat-completion provider
    provider: Arc<dyn Provider>,

    /// Prompt construction for the source language
    prompts: TranslationPromptBuilder,

    /// Translation options
    pub options: TranslationOptions,

    /// Waits between retries
    sleeper: Arc<dyn Sleeper>,
}

impl TranslationService {
    /// Create a service around an arbitrary provider
    pub fn new(provider: Arc<dyn Provider>, prompts: TranslationPromptBuilder, options: TranslationOptions) -> Self {
        Self {
            provider,
            prompts,
            options,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Create a service talking to the configured OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> Self {
        let provider = OpenAI::new(
            config.provider.api_key.clone(),
            config.provider.endpoint.clone(),
            config.provider.timeout_secs,
        );
        Self::new(
            Arc::new(provider),
            TranslationPromptBuilder::new(&config.source_language, &config.source_language_name()),
            TranslationOptions::from_config(config),
        )
    }

    /// Replace the sleeper used between retries
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Build the request for one document and language
    pub fn build_request(&self, content: &str, target: &TargetLanguage) -> ChatCompletionRequest {
        ChatCompletionRequest::new(&self.options.model)
            .add_message("system", self.prompts.build_system_prompt())
            .add_message("user", self.prompts.build_user_prompt(target, content))
            .temperature(self.options.temperature)
    }
}

#[async_trait]
impl DocumentTranslator for TranslationService {
    async fn translate(&self, content: &str, target: &TargetLanguage) -> Result<String, TranslationError> {
        let request = self.build_request(content, target);
        let label = format!("{} translation", target.native_name);

        self.options
            .retry
            .execute(self.sleeper.as_ref(), &label, |attempt| {
                let request = request.clone();
                let provider = Arc::clone(&self.provider);
                async move {
                    let start = Instant::now();
                    let response = provider.complete(request).await?;
                    if let Some(usage) = &response.usage {
                        debug!(
                            "{} attempt {}: {} prompt + {} completion tokens in {:.2}s",
                            provider.name(),
                            attempt,
                            usage.prompt_tokens,
                            usage.completion_tokens,
                            start.elapsed().as_secs_f64()
                        );
                    }
                    response.first_text()
                }
            })
            .await
            .map_err(|exhausted| TranslationError::RetriesExhausted {
                attempts: exhausted.attempts,
                last_error: exhausted.last_error,
            })
    }
}
