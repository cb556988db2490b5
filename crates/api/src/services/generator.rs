//! Story generation abstraction wrapping a chat completion API.

use anyhow::Result;
use async_trait::async_trait;

use super::openai::{self, ChatCompletionRequest, ChatMessage};

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.8;

/// Writes a short children's story from a list of words.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, words: &[String]) -> Result<String>;
}

/// Prompt sent to the model for a word list.
pub fn story_prompt(words: &[String]) -> String {
    format!(
        "Create a short children's story that only uses CVC (Consonant-Vowel-Consonant) words \
         like \"cat\", \"bat\", \"hat\", etc. Use the following CVC words in the story: {}. \
         Keep the story simple, fun, and engaging for young kids learning phonics. \
         Keep the length of the story to 4 sentences.",
        words.join(", ")
    )
}

/// OpenAI implementation of StoryGenerator.
pub struct OpenAiStoryGenerator {
    client: openai::Client,
    model: String,
}

impl OpenAiStoryGenerator {
    pub fn new(client: openai::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl StoryGenerator for OpenAiStoryGenerator {
    async fn generate(&self, words: &[String]) -> Result<String> {
        let prompt = story_prompt(words);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .chat_completion(&request)
            .await
            .map_err(|e| anyhow::anyhow!("OpenAI request failed: {}", e))?;

        let story = response
            .first_content()
            .ok_or_else(|| anyhow::anyhow!("OpenAI returned no story text"))?;

        tracing::debug!(model = %self.model, word_count = words.len(), "story generated");

        Ok(story.to_string())
    }
}
