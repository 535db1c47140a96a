//! Render state - data structure sent from App layer to UI for rendering

use crate::dialogs::DialogView;
use crate::messages::ui_events::KeyContext;
use crate::models::{ChatMessage, Group, Theme, UserProfile};
use crate::navigation::{AppTab, Route};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Navigation
    pub tab: AppTab,
    pub route: Route,
    pub key_context: KeyContext,
    pub theme: Theme,

    // Identity
    pub user_id: Option<String>,
    pub api_base_url: String,

    // Chats
    pub groups: Vec<Group>,
    pub selected_group: usize,
    pub groups_loading: bool,

    // Search
    pub search_query: String,
    pub search_cursor: usize,
    pub search_results: Vec<UserProfile>,
    pub selected_result: usize,
    pub search_loading: bool,
    pub search_notice: Option<String>,

    // Settings
    pub settings_selected: usize,

    // Conversation
    pub messages: Vec<ChatMessage>,
    pub composer: String,
    pub composer_cursor: usize,

    // Popups
    pub dialog: Option<DialogView>,
    pub show_help: bool,

    pub status: String,
}
