//! In-process fakes for the news and LLM collaborators.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use postwriter::generator::ContentGenerator;
use postwriter::llm::{LlmProvider, LlmRequest, LlmResponse, UsageMetadata};
use postwriter::news::{NewsError, NewsSource};

pub enum FakeNews {
    Headlines(String),
    Upstream(u16, String),
    Unreachable,
}

#[async_trait::async_trait]
impl NewsSource for FakeNews {
    async fn fetch_news(&self, _topic: &str) -> Result<String, NewsError> {
        match self {
            FakeNews::Headlines(h) => Ok(h.clone()),
            FakeNews::Upstream(status, body) => Err(NewsError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            FakeNews::Unreachable => Err(NewsError::Transport(anyhow::anyhow!(
                "news HTTP request failed: connection refused"
            ))),
        }
    }
}

/// Replays scripted completions in order and records every request it receives.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));
        match reply {
            Ok(content) => Ok(LlmResponse {
                content,
                usage: UsageMetadata::default(),
                model: "fake-model".to_string(),
            }),
            Err(e) => Err(anyhow::anyhow!(e)),
        }
    }
}

pub fn generator(news: FakeNews, llm: Arc<ScriptedLlm>) -> ContentGenerator {
    ContentGenerator::new(Arc::new(news), llm)
}
