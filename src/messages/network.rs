//! Network messages - communication between App and Network layers

use crate::models::{CreateGroupRequest, Group, UserProfile};
use crate::services::FetchOutcome;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Fetch the stored user's groups with details
    LoadGroups { id: u64 },
    /// Create a group chat
    CreateGroup { id: u64, request: CreateGroupRequest },
    /// Look users up by tag name
    SearchUsers { id: u64, query: String },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Groups {
        id: u64,
        outcome: FetchOutcome<Vec<Group>>,
    },
    /// `None` when creation failed for any reason
    GroupCreated {
        id: u64,
        group: Option<Group>,
    },
    SearchResults {
        id: u64,
        query: String,
        outcome: FetchOutcome<Vec<UserProfile>>,
    },
}
