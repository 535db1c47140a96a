//! # chatdesk
//!
//! Terminal client for a group chat backend.
//!
//! ## Features
//! - Group list and group creation (multipart upload with avatar)
//! - Friend search by tag name
//! - Conversations with attachments, reactions and soft deletes
//! - Per-contact nicknames, group renames, color themes
//! - Tabbed navigation with a per-tab route stack
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod dialogs;
pub mod messages;
pub mod models;
pub mod navigation;
pub mod network;
pub mod services;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use dialogs::DialogHandle;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{ChatMessage, CreateGroupRequest, Group, Recipient, Theme, UserProfile};
pub use navigation::{AppTab, Navigator, Route};
pub use network::{ApiClient, NetworkActor};
pub use services::{FetchOutcome, GroupService, UserService};
pub use storage::LocalStore;
