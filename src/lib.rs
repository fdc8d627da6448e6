/*!
 * # srtstream - Streaming SRT subtitle translation
 *
 * A Rust library that translates SRT subtitle files block by block through
 * a large language model and streams progress while it works.
 *
 * ## Features
 *
 * - Lenient SRT block parsing; malformed blocks are skipped, not fatal
 * - Deterministic prompts built from a template and a terminology dictionary
 * - Sequential, paced translation with one event per translated block
 * - Exactly one terminal event per job (`done` or `error`)
 * - Atomic output and dictionary writes
 * - Standalone re-translation of a single block
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT block parsing and reassembly
 * - `dictionary`: Terminology dictionary store
 * - `translation`: Streaming translation:
 *   - `translation::prompts`: Prompt construction
 *   - `translation::chunk`: Single-block translation
 *   - `translation::pipeline`: Streaming job state machine
 *   - `translation::retry`: Standalone retry
 *   - `translation::core`: Service facade
 * - `file_utils`: File system operations
 * - `app_controller`: Command-line consumer of the event stream
 * - `language_utils`: ISO language code utilities
 * - `providers`: Model capability trait and clients:
 *   - `providers::gemini`: Google Gemini REST client
 *   - `providers::mock`: Scriptable provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dictionary;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use dictionary::Dictionary;
pub use subtitle_processor::{parse_srt_string, SubtitleBlock};
pub use translation::{TranslationEvent, TranslationService};
pub use language_utils::{normalize_to_part2t, get_language_name};
pub use errors::{InputError, PipelineError, ProviderError, RetryError, TranslationError};
