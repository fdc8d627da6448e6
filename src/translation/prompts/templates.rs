/*!
 * Prompt templates for subtitle block translation.
 *
 * A user-supplied template carries a `{chunk}` placeholder. The final prompt
 * is the rendered template followed by a fixed directive embedding the
 * terminology dictionary. Rendering is pure: identical inputs always give a
 * byte-identical prompt.
 */

use crate::dictionary::Dictionary;

/// Placeholder replaced by the block text
pub const CHUNK_PLACEHOLDER: &str = "{chunk}";

/// Directive introducing the dictionary at the end of every prompt
pub const DICTIONARY_DIRECTIVE: &str = "\n\nCRITICAL: Use this specialized dictionary:\n";

/// User prompt template for block translation.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default prompt: English to Persian, dictionary terms enforced.
    pub const SUBTITLE_TRANSLATOR: &'static str = r#"**ROLE:** You are a professional subtitle translator.

**TASK:** Translate the provided English SRT subtitle chunk into fluent, natural Persian.

**RULES:**
1. The output MUST be in Persian only, except for terms taken from the specialized dictionary.
2. Keep the tone natural for the audience of the original video.
3. Adhere strictly to the provided specialized dictionary for key terms.
4. Output ONLY the translated text, without introductions or explanations.

**CONTENT TO TRANSLATE:**
{chunk}"#;

    /// Create a new prompt template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Create the default subtitle translator template.
    pub fn subtitle_translator() -> Self {
        Self::new(Self::SUBTITLE_TRANSLATOR)
    }

    /// Whether the template mentions the chunk placeholder at all
    pub fn has_placeholder(&self) -> bool {
        self.template.contains(CHUNK_PLACEHOLDER)
    }

    /// Substitute every placeholder occurrence with the block text.
    pub fn render(&self, chunk: &str) -> String {
        self.template.replace(CHUNK_PLACEHOLDER, chunk)
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::subtitle_translator()
    }
}

/// Build the prompt sent to the model for one block
pub fn build_translation_prompt(template: &PromptTemplate, chunk: &str, dictionary: &Dictionary) -> String {
    let mut prompt = template.render(chunk);
    prompt.push_str(DICTIONARY_DIRECTIVE);
    prompt.push_str(&dictionary.to_compact_json());
    prompt
}
