//! Table Presence Server
//!
//! Real-time table presence and topic fan-out for live event hosting.
//! Participants are seated at breakout tables and may switch at any time;
//! every client watching a table, its chat or a live survey gets the new
//! state pushed as soon as it changes.
//!
//! # Modules
//!
//! - `types`: Presence records and durable entities
//! - `cache`: Key-value backend with list and scalar operations
//! - `presence`: Presence Store (table lists and participant locations)
//! - `pubsub`: Topic Bus with per-subscriber queues
//! - `coordinator`: Table-switch protocol with per-participant ordering
//! - `relay`: Chat and survey relay
//! - `hosting`: Event and table creation
//! - `gateway`: Client subscriptions mapped onto bus topics
//! - `durable`: Boundary to the relational store
//! - `api`: HTTP and SSE endpoints
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use table_presence::{AppState, ServerConfig, SwitchTableRequest};
//!
//! # async fn run() -> table_presence::PresenceResult<()> {
//! let state = Arc::new(AppState::in_memory(&ServerConfig::default()));
//! let mut updates = state.gateway.table_updates(5);
//!
//! state.coordinator.switch_table(SwitchTableRequest::join(1, "Ada", 5)).await?;
//! let _members = updates.recv().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod durable;
pub mod error;
pub mod gateway;
pub mod hosting;
pub mod presence;
pub mod pubsub;
pub mod relay;
pub mod topics;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::AppState;
pub use config::ServerConfig;
pub use coordinator::PresenceCoordinator;
pub use error::{PresenceError, PresenceResult};
pub use gateway::SubscriptionGateway;
pub use pubsub::{Notification, Subscription, TopicBus};
pub use types::{ChatMessage, Participant, Survey, SwitchTableRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
