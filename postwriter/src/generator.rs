use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use common::{ApiKeys, Config};

use crate::error::ContentError;
use crate::llm::remote::RemoteLlmProvider;
use crate::llm::{LlmProvider, LlmRequest};
use crate::news::{CurrentsNewsClient, NewsSource};

/// Sampling temperature shared by all three generation steps.
const TEMPERATURE: f32 = 0.5;

const TITLE_MAX_TOKENS: usize = 60;
const META_MAX_TOKENS: usize = 120;
const POST_MAX_TOKENS: usize = 1500;
const POST_REPETITION_PENALTY: f32 = 0.6;

/// A fully populated draft; never returned partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedContent {
    pub title: String,
    pub meta_description: String,
    pub post_content: String,
}

/// Runs news lookup followed by title, meta-description and body generation.
pub struct ContentGenerator {
    news: Arc<dyn NewsSource>,
    llm: Arc<dyn LlmProvider>,
}

impl ContentGenerator {
    pub fn new(news: Arc<dyn NewsSource>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { news, llm }
    }

    /// Wire the real news and LLM clients from configuration.
    pub fn from_config(config: &Config, keys: &ApiKeys) -> anyhow::Result<Self> {
        let news = CurrentsNewsClient::new(
            config.news.api_url(),
            keys.news.clone(),
            config.news.timeout_seconds(),
        )?
        .with_language(config.news.language())
        .with_max_headlines(config.news.max_headlines());

        let llm = RemoteLlmProvider::new(config.llm.api_url(), keys.llm.clone(), config.llm.model())
            .with_timeout(config.llm.timeout_seconds());
        info!(
            model = llm.model(),
            news_api = config.news.api_url(),
            "content generator initialized"
        );

        Ok(Self::new(Arc::new(news), Arc::new(llm)))
    }

    pub async fn generate_content(&self, topic: &str) -> Result<GeneratedContent, ContentError> {
        // News failures keep their own kind; only generation failures are normalized.
        let recent_news = self.news.fetch_news(topic).await?;
        debug!(headlines = recent_news.lines().count(), "fetched recent news");

        self.generate_from_news(topic, &recent_news)
            .await
            .map_err(|e| {
                warn!("content generation failed: {:#}", e);
                ContentError::Generation(format!("{:#}", e))
            })
    }

    async fn generate_from_news(
        &self,
        topic: &str,
        recent_news: &str,
    ) -> anyhow::Result<GeneratedContent> {
        let title = self
            .complete(LlmRequest {
                prompt: title_prompt(topic, recent_news),
                max_tokens: Some(TITLE_MAX_TOKENS),
                temperature: Some(TEMPERATURE),
                stop: vec!["\n".to_string()],
                ..Default::default()
            })
            .await?;
        info!(%title, "title generated");

        let meta_description = self
            .complete(LlmRequest {
                prompt: meta_description_prompt(&title),
                max_tokens: Some(META_MAX_TOKENS),
                temperature: Some(TEMPERATURE),
                stop: vec![".".to_string()],
                ..Default::default()
            })
            .await?;
        info!(chars = meta_description.len(), "meta description generated");

        let post_content = self
            .complete(LlmRequest {
                prompt: post_prompt(topic, recent_news),
                max_tokens: Some(POST_MAX_TOKENS),
                temperature: Some(TEMPERATURE),
                presence_penalty: Some(POST_REPETITION_PENALTY),
                frequency_penalty: Some(POST_REPETITION_PENALTY),
                ..Default::default()
            })
            .await?;
        info!(chars = post_content.len(), "post content generated");

        Ok(GeneratedContent {
            title,
            meta_description,
            post_content,
        })
    }

    async fn complete(&self, request: LlmRequest) -> anyhow::Result<String> {
        let response = self.llm.generate(request).await?;
        debug!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "generation call completed"
        );
        Ok(response.content.trim().to_string())
    }
}

fn title_prompt(topic: &str, recent_news: &str) -> String {
    format!(
        "Come up with an engaging and accurate headline for an article on the topic '{}', \
         taking into account the latest news:\n{}. \
         The headline should be interesting and clearly convey the essence of the topic.",
        topic, recent_news
    )
}

fn meta_description_prompt(title: &str) -> String {
    format!(
        "Write a meta description for an article titled: '{}'. \
         It should be complete, informative and contain the main keywords.",
        title
    )
}

fn post_prompt(topic: &str, recent_news: &str) -> String {
    format!(
        "Write a detailed article on the topic '{}', using the latest news:\n{}.\n\
         The article must:\n\
         1. Be informative and logically structured\n\
         2. Contain at least 1500 characters\n\
         3. Have a clear structure with subheadings\n\
         4. Include an analysis of current trends\n\
         5. Have an introduction, a main body and a conclusion\n\
         6. Include examples from the current news\n\
         7. Have paragraphs of at least 3-4 sentences each\n\
         8. Be easy to read and substantive",
        topic, recent_news
    )
}
