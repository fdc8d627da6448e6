/*!
 * Subtitle translation through an external language model.
 *
 * - `prompts`: Prompt templates and deterministic prompt construction
 * - `chunk`: Translation of a single block
 * - `events`: Records streamed to the client
 * - `pipeline`: Sequential, streaming translation of a whole file
 * - `retry`: Standalone re-translation of one block
 * - `core`: Service facade over the pieces above
 */

// Re-export main types for easier usage
pub use self::chunk::{ChunkTranslator, TranslationRequestContext};
pub use self::core::TranslationService;
pub use self::events::TranslationEvent;
pub use self::pipeline::{PipelineReport, PipelineSettings, PipelineState, TranslationPipeline};
pub use self::prompts::PromptTemplate;

// Submodules
pub mod chunk;
pub mod core;
pub mod events;
pub mod pipeline;
pub mod prompts;
pub mod retry;
