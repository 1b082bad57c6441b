//! REST implementation of the agent-service facade.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::tools::ToolRegistry;
use crate::types::{RequiredAction, Role, Run, RunStatus, ThreadMessage};

use super::http::{bearer_headers, extend_headers, shared_client, status_to_error};
use super::{AgentClient, AgentDefinition};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// HTTP client for an Assistants-style agent service.
///
/// Holds the tool registry so that `create_and_process_run` can service
/// the function-calling callback mid-run; the session core itself never
/// touches tool dispatch.
pub struct RestAgentClient {
    config: Config,
    tools: Arc<ToolRegistry>,
    poll_interval: Duration,
}

impl RestAgentClient {
    pub fn new(config: Config, tools: Arc<ToolRegistry>) -> Self {
        Self {
            config,
            tools,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the run polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            path,
            self.config.api_version
        )
    }

    async fn parse<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let resp = shared_client()
            .get(self.url(&format!("threads/{thread_id}/runs/{run_id}")))
            .headers(bearer_headers(&self.config.api_key))
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<serde_json::Value>,
    ) -> Result<Run> {
        let resp = shared_client()
            .post(self.url(&format!(
                "threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
            )))
            .headers(bearer_headers(&self.config.api_key))
            .json(&serde_json::json!({"tool_outputs": outputs}))
            .send()
            .await?;
        Self::parse(resp).await
    }
}

#[async_trait]
impl AgentClient for RestAgentClient {
    async fn create_agent(&self, definition: &AgentDefinition) -> Result<String> {
        let body = serde_json::json!({
            "model": definition.model,
            "name": definition.name,
            "instructions": definition.instructions,
            "tools": definition.tools,
        });
        let mut headers = bearer_headers(&self.config.api_key);
        extend_headers(&mut headers, &definition.headers);

        debug!(model = %definition.model, name = %definition.name, "create agent");

        let resp = shared_client()
            .post(self.url("assistants"))
            .headers(headers)
            .json(&body)
            .send()
            .await?;
        let created: CreatedObject = Self::parse(resp).await?;
        Ok(created.id)
    }

    async fn create_thread(&self) -> Result<String> {
        debug!("create thread");
        let resp = shared_client()
            .post(self.url("threads"))
            .headers(bearer_headers(&self.config.api_key))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let created: CreatedObject = Self::parse(resp).await?;
        Ok(created.id)
    }

    async fn create_message(&self, thread_id: &str, role: Role, content: &str) -> Result<String> {
        debug!(thread_id, role = role.as_str(), "create message");
        let resp = shared_client()
            .post(self.url(&format!("threads/{thread_id}/messages")))
            .headers(bearer_headers(&self.config.api_key))
            .json(&serde_json::json!({"role": role, "content": content}))
            .send()
            .await?;
        let created: CreatedObject = Self::parse(resp).await?;
        Ok(created.id)
    }

    async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        debug!(thread_id, agent_id, "create run");
        let resp = shared_client()
            .post(self.url(&format!("threads/{thread_id}/runs")))
            .headers(bearer_headers(&self.config.api_key))
            .json(&serde_json::json!({"assistant_id": agent_id}))
            .send()
            .await?;
        let mut run: Run = Self::parse(resp).await?;

        loop {
            if run.status.is_terminal() {
                debug!(run_id = %run.id, status = ?run.status, "run reached terminal status");
                return Ok(run);
            }

            if run.status == RunStatus::RequiresAction {
                let calls = match run.required_action.take() {
                    Some(RequiredAction::SubmitToolOutputs {
                        submit_tool_outputs,
                    }) => submit_tool_outputs.tool_calls,
                    None => Vec::new(),
                };
                let outputs: Vec<serde_json::Value> = calls
                    .iter()
                    .map(|call| {
                        debug!(tool = %call.function.name, "dispatch required tool call");
                        serde_json::json!({
                            "tool_call_id": call.id,
                            "output": self.tools.dispatch(
                                &call.function.name,
                                &call.function.arguments,
                            ),
                        })
                    })
                    .collect();
                run = self.submit_tool_outputs(thread_id, &run.id, outputs).await?;
                continue;
            }

            tokio::time::sleep(self.poll_interval).await;
            run = self.get_run(thread_id, &run.id).await?;
        }
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        debug!(thread_id, "list messages");
        let url = format!("{}&order=asc", self.url(&format!("threads/{thread_id}/messages")));
        let resp = shared_client()
            .get(url)
            .headers(bearer_headers(&self.config.api_key))
            .send()
            .await?;
        let list: MessageList = Self::parse(resp).await?;
        Ok(list.data)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        debug!(thread_id, "delete thread");
        let resp = shared_client()
            .delete(self.url(&format!("threads/{thread_id}")))
            .headers(bearer_headers(&self.config.api_key))
            .send()
            .await?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        debug!(agent_id, "delete agent");
        let resp = shared_client()
            .delete(self.url(&format!("assistants/{agent_id}")))
            .headers(bearer_headers(&self.config.api_key))
            .send()
            .await?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }
}

// Service response shapes (internal)

#[derive(Deserialize)]
struct CreatedObject {
    id: String,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}
