/*!
 * Prompt construction for subtitle block translation.
 */

pub mod templates;

// Re-export main types
pub use templates::{build_translation_prompt, PromptTemplate, CHUNK_PLACEHOLDER, DICTIONARY_DIRECTIVE};
