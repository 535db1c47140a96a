//! App state - pure data structure, I/O only through the local store

use std::collections::HashMap;
use std::sync::Arc;

use crate::dialogs::{
    AttachmentPreviewDialog, DialogHandle, DialogView, MessageInput, NicknameDialog,
    RenameGroupDialog, TextInput, ThemeSelectorDialog,
};
use crate::messages::ui_events::{DialogKind, InputMode, KeyContext, ScreenKind};
use crate::messages::RenderState;
use crate::models::{Attachment, ChatMessage, Group, MessageTarget, Recipient, Theme, UserProfile};
use crate::navigation::{Navigator, Route};
use crate::storage::LocalStore;

/// The dialog on top of the screen together with the handle it resolves
#[derive(Debug)]
pub enum ActiveDialog {
    Nickname(NicknameDialog, DialogHandle<String>),
    GroupName(RenameGroupDialog, DialogHandle<String>),
    Theme(ThemeSelectorDialog, DialogHandle<Theme>),
    /// Path entry that leads into the attachment preview
    AttachPath(TextInput),
    Preview(AttachmentPreviewDialog, DialogHandle<Attachment>),
}

impl ActiveDialog {
    pub fn kind(&self) -> DialogKind {
        match self {
            ActiveDialog::Nickname(..) | ActiveDialog::GroupName(..) | ActiveDialog::AttachPath(_) => {
                DialogKind::TextPrompt
            }
            ActiveDialog::Theme(..) => DialogKind::Choice,
            ActiveDialog::Preview(..) => DialogKind::Preview,
        }
    }

    pub fn view(&self) -> DialogView {
        match self {
            ActiveDialog::Nickname(dialog, _) => dialog.view(),
            ActiveDialog::GroupName(dialog, _) => dialog.view(),
            ActiveDialog::Theme(dialog, _) => dialog.view(),
            ActiveDialog::AttachPath(input) => DialogView::TextPrompt {
                title: String::from(" Attach file "),
                label: String::from("Path"),
                value: input.value().to_string(),
                cursor: input.cursor(),
            },
            ActiveDialog::Preview(dialog, _) => dialog.view(),
        }
    }

    /// Text field being edited, if this dialog has one
    pub fn text_input_mut(&mut self) -> Option<&mut TextInput> {
        match self {
            ActiveDialog::Nickname(dialog, _) => Some(&mut dialog.input),
            ActiveDialog::GroupName(dialog, _) => Some(&mut dialog.input),
            ActiveDialog::AttachPath(input) => Some(input),
            ActiveDialog::Theme(..) | ActiveDialog::Preview(..) => None,
        }
    }
}

/// Main application state
pub struct AppState {
    pub nav: Navigator,
    pub store: Arc<LocalStore>,
    pub api_base_url: String,
    pub theme: Theme,

    // UI state
    pub input_mode: InputMode,
    pub show_help: bool,
    pub status: String,

    // Chats
    pub groups: Vec<Group>,
    pub selected_group: usize,
    pub groups_loading: bool,

    // Search
    pub search_input: TextInput,
    pub search_results: Vec<UserProfile>,
    pub selected_result: usize,
    pub search_notice: Option<String>,

    // Settings
    pub settings_selected: usize,

    // Conversations are kept in memory per addressed party
    pub conversations: HashMap<MessageTarget, Vec<ChatMessage>>,
    pub composer: MessageInput,

    pub dialog: Option<ActiveDialog>,

    next_request_id: u64,
    pub pending_groups: Option<u64>,
    pub pending_search: Option<u64>,
    pub pending_create: Option<u64>,
}

impl AppState {
    pub fn new(store: Arc<LocalStore>, api_base_url: impl Into<String>) -> Self {
        let theme = store.theme();
        AppState {
            nav: Navigator::new(),
            store,
            api_base_url: api_base_url.into(),
            theme,
            input_mode: InputMode::Normal,
            show_help: false,
            status: String::from("Press ? for help"),
            groups: Vec::new(),
            selected_group: 0,
            groups_loading: false,
            search_input: TextInput::default(),
            search_results: Vec::new(),
            selected_result: 0,
            search_notice: None,
            settings_selected: 0,
            conversations: HashMap::new(),
            composer: MessageInput::default(),
            dialog: None,
            next_request_id: 1,
            pending_groups: None,
            pending_search: None,
            pending_create: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.user_id()
    }

    /// Recipient of the open conversation, if the current screen is one
    pub fn current_recipient(&self) -> Option<&Recipient> {
        match self.nav.current() {
            Route::Conversation(recipient) => Some(recipient),
            _ => None,
        }
    }

    pub fn screen_kind(&self) -> ScreenKind {
        match self.nav.current() {
            Route::ChatList => ScreenKind::ChatList,
            Route::Conversation(recipient) => ScreenKind::Conversation {
                is_group: recipient.is_group(),
            },
            Route::Search => ScreenKind::Search,
            Route::SettingsList => ScreenKind::SettingsList,
            Route::Account | Route::About => ScreenKind::Detail,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let messages = self
            .current_recipient()
            .and_then(|r| self.conversations.get(&r.target()))
            .cloned()
            .unwrap_or_default();

        RenderState {
            tab: self.nav.active_tab(),
            route: self.nav.current().clone(),
            key_context: KeyContext {
                screen: self.screen_kind(),
                input_mode: self.input_mode,
                dialog: self.dialog.as_ref().map(ActiveDialog::kind),
                show_help: self.show_help,
            },
            theme: self.theme,
            user_id: self.user_id(),
            api_base_url: self.api_base_url.clone(),
            groups: self.groups.clone(),
            selected_group: self.selected_group,
            groups_loading: self.groups_loading,
            search_query: self.search_input.value().to_string(),
            search_cursor: self.search_input.cursor(),
            search_results: self.search_results.clone(),
            selected_result: self.selected_result,
            search_loading: self.pending_search.is_some(),
            search_notice: self.search_notice.clone(),
            settings_selected: self.settings_selected,
            messages,
            composer: self.composer.input.value().to_string(),
            composer_cursor: self.composer.input.cursor(),
            dialog: self.dialog.as_ref().map(ActiveDialog::view),
            show_help: self.show_help,
            status: self.status.clone(),
        }
    }
}
