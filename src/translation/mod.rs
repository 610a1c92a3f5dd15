/*!
 * Translation of documentation pages using an OpenAI-compatible provider.
 *
 * This module contains the whole run, split into several submodules:
 *
 * - `core`: Document translator seam and the provider-backed service
 * - `retry`: Retry policy with exponential backoff
 * - `prompts`: Prompt templates, preserved terms and glossary
 * - `decision`: Per-task translate/skip decisions
 * - `batch`: Chunked concurrent execution of tasks
 * - `pipeline`: Input selection, planning, execution and statistics
 */

// Re-export main types for easier usage
pub use self::batch::BatchScheduler;
pub use self::core::{DocumentTranslator, TranslationOptions, TranslationService};
pub use self::decision::{decide, DecisionOptions, TaskDecision, TaskFacts};
pub use self::pipeline::{Pipeline, PreparedRun, RunStats, TaskOutcome, TranslationPlan, TranslationTask};
pub use self::retry::{RetryPolicy, Sleeper, TokioSleeper};

// Re-export prompt types
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};

// Submodules
pub mod batch;
pub mod core;
pub mod decision;
pub mod pipeline;
pub mod prompts;
pub mod retry;
