//! Session lifecycle tests using a scripted in-memory client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use kaiwa::client::{AgentClient, AgentDefinition};
use kaiwa::error::{KaiwaError, Result};
use kaiwa::session::{SessionManager, INTERNAL_ERROR_REPLY, NO_RESPONSE_REPLY};
use kaiwa::types::{MessageContent, Role, Run, RunError, RunStatus, ThreadMessage};

/// Fake client that records every remote call and serves scripted
/// thread contents and run outcomes.
#[derive(Default)]
struct FakeAgentClient {
    calls: Mutex<Vec<String>>,
    thread_messages: Mutex<Vec<ThreadMessage>>,
    run_status: Mutex<Option<RunStatus>>,
    fail_create_thread: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeAgentClient {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn push_assistant_text(&self, text: &str) {
        let mut messages = self.thread_messages.lock().unwrap();
        let id = format!("msg_{}", messages.len() + 1);
        messages.push(ThreadMessage {
            id,
            role: Role::Assistant,
            content: vec![MessageContent::text(text)],
            created_at: None,
        });
    }

    fn set_run_status(&self, status: RunStatus) {
        *self.run_status.lock().unwrap() = Some(status);
    }
}

#[async_trait]
impl AgentClient for FakeAgentClient {
    async fn create_agent(&self, _definition: &AgentDefinition) -> Result<String> {
        self.record("create_agent");
        Ok("agent-1".to_string())
    }

    async fn create_thread(&self) -> Result<String> {
        self.record("create_thread");
        if self.fail_create_thread.load(Ordering::SeqCst) {
            return Err(KaiwaError::api(500, "thread creation exploded"));
        }
        Ok("thread-1".to_string())
    }

    async fn create_message(&self, thread_id: &str, role: Role, content: &str) -> Result<String> {
        self.record(format!("create_message:{thread_id}:{}:{content}", role.as_str()));
        Ok("msg_user".to_string())
    }

    async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        self.record(format!("create_and_process_run:{thread_id}:{agent_id}"));
        let status = self
            .run_status
            .lock()
            .unwrap()
            .unwrap_or(RunStatus::Completed);
        let last_error = (status == RunStatus::Failed).then(|| RunError {
            code: "server_error".to_string(),
            message: "model blew up".to_string(),
        });
        Ok(Run {
            id: "run-1".to_string(),
            status,
            last_error,
            required_action: None,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.record(format!("list_messages:{thread_id}"));
        Ok(self.thread_messages.lock().unwrap().clone())
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.record(format!("delete_thread:{thread_id}"));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(KaiwaError::api(500, "delete failed"));
        }
        Ok(())
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.record(format!("delete_agent:{agent_id}"));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(KaiwaError::api(500, "delete failed"));
        }
        Ok(())
    }
}

fn manager_with(client: Arc<FakeAgentClient>) -> SessionManager {
    let definition = AgentDefinition::new("gpt-4o-mini", "Simple Chat Agent", "be helpful");
    SessionManager::new(client, definition)
}

#[tokio::test]
async fn started_session_produces_exactly_one_reply_per_message() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    assert!(manager.is_ready("s1"));

    client.push_assistant_text("hello");
    let reply = manager.handle_message("s1", "hi").await.unwrap();

    assert_eq!(reply, "hello");
    assert_eq!(client.count("create_message"), 1);
    assert_eq!(client.count("create_and_process_run"), 1);
    assert_eq!(client.count("list_messages"), 1);
}

#[tokio::test]
async fn message_before_start_yields_internal_error_without_remote_calls() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    let reply = manager.handle_message("s1", "hi").await.unwrap();

    assert_eq!(reply, INTERNAL_ERROR_REPLY);
    assert_eq!(client.calls(), Vec::<String>::new());
}

#[tokio::test]
async fn message_after_end_yields_internal_error() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    manager.end_session("s1").await;

    let reply = manager.handle_message("s1", "still there?").await.unwrap();
    assert_eq!(reply, INTERNAL_ERROR_REPLY);
    assert_eq!(client.count("create_message"), 0);
}

#[tokio::test]
async fn ending_twice_deletes_each_resource_at_most_once() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    manager.end_session("s1").await;
    manager.end_session("s1").await;

    assert_eq!(client.count("delete_thread"), 1);
    assert_eq!(client.count("delete_agent"), 1);
}

#[tokio::test]
async fn ending_unknown_session_is_a_noop() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.end_session("never-started").await;

    assert_eq!(client.count("delete_thread"), 0);
    assert_eq!(client.count("delete_agent"), 0);
}

#[tokio::test]
async fn cleanup_errors_are_swallowed() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    client.fail_deletes.store(true, Ordering::SeqCst);
    manager.end_session("s1").await;

    // both deletions were still attempted independently
    assert_eq!(client.count("delete_thread"), 1);
    assert_eq!(client.count("delete_agent"), 1);
}

#[tokio::test]
async fn failed_run_still_surfaces_last_available_text() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    client.push_assistant_text("partial answer");
    client.set_run_status(RunStatus::Failed);

    let reply = manager.handle_message("s1", "hi").await.unwrap();
    assert_eq!(reply, "partial answer");
}

#[tokio::test]
async fn failed_run_with_no_text_falls_back_to_fixed_reply() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    client.set_run_status(RunStatus::Failed);

    let reply = manager.handle_message("s1", "hi").await.unwrap();
    assert_eq!(reply, NO_RESPONSE_REPLY);
}

#[tokio::test]
async fn empty_content_messages_fall_back_to_fixed_reply() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    client.thread_messages.lock().unwrap().push(ThreadMessage {
        id: "msg_1".to_string(),
        role: Role::Assistant,
        content: vec![],
        created_at: None,
    });

    let reply = manager.handle_message("s1", "hi").await.unwrap();
    assert_eq!(reply, NO_RESPONSE_REPLY);
}

#[tokio::test]
async fn user_message_is_relayed_verbatim() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    client.push_assistant_text("ok");
    manager.handle_message("s1", "what time is it?").await.unwrap();

    assert!(client
        .calls()
        .contains(&"create_message:thread-1:user:what time is it?".to_string()));
}

#[tokio::test]
async fn thread_creation_failure_leaves_agent_recorded_for_cleanup() {
    let client = Arc::new(FakeAgentClient::default());
    client.fail_create_thread.store(true, Ordering::SeqCst);
    let manager = manager_with(client.clone());

    let err = manager.start_session("s1").await.unwrap_err();
    assert!(matches!(err, KaiwaError::Api { status: 500, .. }));
    assert!(!manager.is_ready("s1"));

    // the half-created agent is not orphaned: teardown still deletes it
    manager.end_session("s1").await;
    assert_eq!(client.count("delete_agent:agent-1"), 1);
    assert_eq!(client.count("delete_thread"), 0);
}

#[tokio::test]
async fn sessions_are_isolated_from_each_other() {
    let client = Arc::new(FakeAgentClient::default());
    let manager = manager_with(client.clone());

    manager.start_session("s1").await.unwrap();
    manager.start_session("s2").await.unwrap();
    manager.end_session("s1").await;

    assert!(!manager.is_ready("s1"));
    assert!(manager.is_ready("s2"));
}
