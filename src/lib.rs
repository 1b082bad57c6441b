//! Kaiwa — session-scoped bridge between chat front-ends and a remote
//! agent service.
//!
//! Each chat session gets its own remote agent and conversation thread.
//! Inbound messages are appended to the thread, the agent is run to a
//! terminal status, and the latest assistant text is extracted for
//! display; ending the session deletes both remote resources.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kaiwa::prelude::*;
//!
//! # async fn example() -> kaiwa::error::Result<()> {
//! let config = Config::from_env()?;
//! let tools = Arc::new(kaiwa::tools::default_registry());
//! let definition = kaiwa::session::default_agent_definition(&config, &tools);
//! let client = Arc::new(RestAgentClient::new(config, tools));
//! let sessions = SessionManager::new(client, definition);
//!
//! sessions.start_session("session-1").await?;
//! let reply = sessions.handle_message("session-1", "What's the weather in Tokyo?").await?;
//! println!("{reply}");
//! sessions.end_session("session-1").await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod session;
pub mod tools;
pub mod types;
