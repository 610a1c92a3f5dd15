/*!
 * Prompt engineering for documentation translation.
 *
 * This module provides:
 * - The system prompt and the rules template
 * - The static glossary and the list of preserved proper nouns
 * - Per-language user prompt construction
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, TranslationPromptBuilder, GLOSSARY, PRESERVED_TERMS};
