use parking_lot::Mutex;

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};
use crate::domain::Message;

/// How a [`MockLlmClient`] answers.
#[derive(Debug, Clone)]
pub enum MockLlmScript {
    Reply(Vec<String>),
    RejectRequest(String),
    FailAfter(Vec<String>, String),
}

/// Scripted stand-in for the upstream model. Records every history it is
/// asked to complete.
pub struct MockLlmClient {
    script: MockLlmScript,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlmClient {
    pub fn new(script: MockLlmScript) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying<I, T>(fragments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(MockLlmScript::Reply(
            fragments.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete_stream(&self, history: &[Message]) -> Result<LlmTokenStream, LlmClientError> {
        self.calls.lock().push(history.to_vec());

        match &self.script {
            MockLlmScript::Reply(fragments) => {
                let items: Vec<Result<String, LlmClientError>> =
                    fragments.iter().cloned().map(Ok).collect();
                Ok(Box::pin(futures::stream::iter(items)))
            }
            MockLlmScript::RejectRequest(reason) => {
                Err(LlmClientError::ApiRequestFailed(reason.clone()))
            }
            MockLlmScript::FailAfter(fragments, reason) => {
                let mut items: Vec<Result<String, LlmClientError>> =
                    fragments.iter().cloned().map(Ok).collect();
                items.push(Err(LlmClientError::StreamInterrupted(reason.clone())));
                Ok(Box::pin(futures::stream::iter(items)))
            }
        }
    }
}
