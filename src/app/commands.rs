//! Command handlers - business logic for processing UI events

use std::path::PathBuf;

use crate::app::state::ActiveDialog;
use crate::app::AppState;
use crate::dialogs::{
    AttachmentPreviewDialog, NicknameDialog, RenameGroupDialog, TextInput, ThemeSelectorDialog,
};
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Attachment, ChatMessage, CreateGroupRequest, Recipient, RecipientKind};
use crate::navigation::{AppTab, Route, SettingsItem};
use crate::services::FetchOutcome;

const QUICK_REACTION: &str = "👍";

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.input_mode = InputMode::Normal;
        self.nav.switch(tab);
    }

    pub fn back(&mut self) {
        self.input_mode = InputMode::Normal;
        self.nav.pop();
    }

    pub fn select_next(&mut self) {
        match self.nav.current() {
            Route::ChatList => step(&mut self.selected_group, self.groups.len(), true),
            Route::Search => step(&mut self.selected_result, self.search_results.len(), true),
            Route::SettingsList => step(&mut self.settings_selected, SettingsItem::ALL.len(), true),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.nav.current() {
            Route::ChatList => step(&mut self.selected_group, self.groups.len(), false),
            Route::Search => step(&mut self.selected_result, self.search_results.len(), false),
            Route::SettingsList => step(&mut self.settings_selected, SettingsItem::ALL.len(), false),
            _ => {}
        }
    }

    /// Enter on a list item
    pub fn activate(&mut self) {
        match self.nav.current() {
            Route::ChatList => {
                if let Some(group) = self.groups.get(self.selected_group) {
                    let recipient = Recipient::from_group(group);
                    self.nav.open_conversation(recipient);
                }
            }
            Route::Search => {
                if let Some(user) = self.search_results.get(self.selected_result) {
                    let mut recipient = Recipient::from_user(user);
                    recipient.nickname = self.store.nickname(&recipient.id);
                    self.nav.open_conversation(recipient);
                }
            }
            Route::SettingsList => {
                if let Some(item) = SettingsItem::ALL.get(self.settings_selected).copied() {
                    self.open_setting(item);
                }
            }
            _ => {}
        }
    }

    fn open_setting(&mut self, item: SettingsItem) {
        match item {
            SettingsItem::Theme => {
                let (dialog, handle) = ThemeSelectorDialog::open(self.theme);
                self.dialog = Some(ActiveDialog::Theme(dialog, handle));
            }
            SettingsItem::Nickname => match self.user_id() {
                Some(user_id) => {
                    let current = self.store.nickname(&user_id).unwrap_or_default();
                    let (dialog, handle) = NicknameDialog::open(user_id, &current);
                    self.dialog = Some(ActiveDialog::Nickname(dialog, handle));
                }
                None => self.status = String::from("Not signed in: no user id stored"),
            },
            SettingsItem::Account => self.nav.push(Route::Account),
            SettingsItem::About => self.nav.push(Route::About),
            SettingsItem::LogOut => self.log_out(),
        }
    }

    pub fn log_out(&mut self) {
        match self.store.remove(crate::constants::USER_ID_KEY) {
            Ok(_) => {
                self.groups.clear();
                self.selected_group = 0;
                self.groups_loading = false;
                self.search_results.clear();
                self.selected_result = 0;
                self.search_notice = None;
                self.conversations.clear();
                // Responses still in flight belong to the previous user
                self.pending_groups = None;
                self.pending_search = None;
                self.pending_create = None;
                self.nav = crate::navigation::Navigator::new();
                self.nav.switch(AppTab::Settings);
                self.status = String::from("Logged out");
            }
            Err(err) => {
                tracing::error!("Failed to clear user id: {:#}", err);
                self.status = format!("Log out failed: {}", err);
            }
        }
    }

    // ========================
    // Chats
    // ========================

    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        self.pending_groups = Some(id);
        self.groups_loading = true;
        Some(NetworkCommand::LoadGroups { id })
    }

    pub fn new_group(&mut self) {
        let (dialog, handle) = RenameGroupDialog::open(None, "");
        self.dialog = Some(ActiveDialog::GroupName(dialog, handle));
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if matches!(self.nav.current(), Route::Conversation(_) | Route::Search) {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// The text field keystrokes currently go to
    fn active_input(&mut self) -> Option<&mut TextInput> {
        if let Some(dialog) = self.dialog.as_mut() {
            return dialog.text_input_mut();
        }
        if self.input_mode != InputMode::Editing {
            return None;
        }
        match self.nav.current() {
            Route::Search => Some(&mut self.search_input),
            Route::Conversation(_) => Some(&mut self.composer.input),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(input) = self.active_input() {
            input.insert(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.active_input() {
            input.backspace();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(input) = self.active_input() {
            input.move_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(input) = self.active_input() {
            input.move_right();
        }
    }

    /// Enter while editing: run the search or send the composed message
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        match self.nav.current() {
            Route::Search => {
                self.input_mode = InputMode::Normal;
                let query = self.search_input.value().trim().to_string();
                if query.is_empty() {
                    return None;
                }
                let id = self.next_id();
                self.pending_search = Some(id);
                self.search_notice = None;
                Some(NetworkCommand::SearchUsers { id, query })
            }
            Route::Conversation(_) => {
                let Some(sender) = self.user_id() else {
                    self.status = String::from("Not signed in: no user id stored");
                    return None;
                };
                if let Some(text) = self.composer.submit() {
                    self.append_message(ChatMessage::new(sender, self.current_target()?, text));
                }
                None
            }
            _ => None,
        }
    }

    // ========================
    // Conversation
    // ========================

    fn current_target(&self) -> Option<crate::models::MessageTarget> {
        self.current_recipient().map(Recipient::target)
    }

    fn append_message(&mut self, message: ChatMessage) {
        self.conversations
            .entry(message.target.clone())
            .or_default()
            .push(message);
    }

    pub fn attach(&mut self) {
        if self.current_recipient().is_some() {
            self.dialog = Some(ActiveDialog::AttachPath(TextInput::default()));
        }
    }

    /// Soft-delete the newest message sent by the current user
    pub fn delete_last(&mut self) {
        let (Some(user_id), Some(target)) = (self.user_id(), self.current_target()) else {
            return;
        };
        let Some(messages) = self.conversations.get_mut(&target) else {
            return;
        };
        match messages
            .iter_mut()
            .rev()
            .find(|m| m.sender_id == user_id && !m.is_deleted)
        {
            Some(message) => {
                message.mark_deleted();
                self.status = String::from("Message deleted");
            }
            None => self.status = String::from("Nothing to delete"),
        }
    }

    /// Toggle the quick reaction on the newest message
    pub fn react_last(&mut self) {
        let (Some(user_id), Some(target)) = (self.user_id(), self.current_target()) else {
            return;
        };
        if let Some(message) = self
            .conversations
            .get_mut(&target)
            .and_then(|messages| messages.iter_mut().rev().find(|m| !m.is_deleted))
        {
            message.toggle_reaction(&user_id, QUICK_REACTION);
        }
    }

    pub fn edit_nickname(&mut self) {
        let Some(recipient) = self.current_recipient() else {
            return;
        };
        if recipient.kind != RecipientKind::Private {
            return;
        }
        let (dialog, handle) = NicknameDialog::open(recipient.id.clone(), recipient.title());
        self.dialog = Some(ActiveDialog::Nickname(dialog, handle));
    }

    pub fn rename_group(&mut self) {
        let Some(recipient) = self.current_recipient() else {
            return;
        };
        if recipient.kind != RecipientKind::Group {
            return;
        }
        let (dialog, handle) =
            RenameGroupDialog::open(Some(recipient.id.clone()), &recipient.display_name);
        self.dialog = Some(ActiveDialog::GroupName(dialog, handle));
    }

    // ========================
    // Dialogs
    // ========================

    pub fn dialog_next(&mut self) {
        if let Some(ActiveDialog::Theme(dialog, _)) = self.dialog.as_mut() {
            dialog.next();
        }
    }

    pub fn dialog_prev(&mut self) {
        if let Some(ActiveDialog::Theme(dialog, _)) = self.dialog.as_mut() {
            dialog.prev();
        }
    }

    pub fn dialog_confirm(&mut self) -> Option<NetworkCommand> {
        match self.dialog.as_mut()? {
            ActiveDialog::Nickname(dialog, _) => {
                dialog.confirm();
            }
            ActiveDialog::GroupName(dialog, _) => {
                if !dialog.confirm() {
                    self.status = String::from("Group name cannot be empty");
                }
            }
            ActiveDialog::Theme(dialog, _) => {
                dialog.confirm();
            }
            ActiveDialog::AttachPath(input) => {
                let path = expand_home(input.value().trim());
                self.dialog = None;
                match AttachmentPreviewDialog::open(&path) {
                    Ok((dialog, handle)) => self.dialog = Some(ActiveDialog::Preview(dialog, handle)),
                    Err(err) => self.status = format!("{:#}", err),
                }
                return None;
            }
            ActiveDialog::Preview(dialog, _) => {
                dialog.confirm();
            }
        }
        self.collect_dialog_result()
    }

    pub fn dialog_cancel(&mut self) {
        match self.dialog.as_mut() {
            Some(ActiveDialog::Nickname(dialog, _)) => {
                dialog.cancel();
            }
            Some(ActiveDialog::GroupName(dialog, _)) => {
                dialog.cancel();
            }
            Some(ActiveDialog::Theme(dialog, _)) => {
                dialog.cancel();
            }
            Some(ActiveDialog::Preview(dialog, _)) => {
                dialog.cancel();
            }
            Some(ActiveDialog::AttachPath(_)) => self.dialog = None,
            None => {}
        }
        // Cancelled dialogs resolve with nothing; this only closes them
        let _ = self.collect_dialog_result();
    }

    /// Close the dialog once its handle has resolved and apply the value
    fn collect_dialog_result(&mut self) -> Option<NetworkCommand> {
        let dialog = self.dialog.take()?;
        match dialog {
            ActiveDialog::Nickname(dialog, mut handle) => match handle.try_result() {
                None => self.dialog = Some(ActiveDialog::Nickname(dialog, handle)),
                Some(Some(nickname)) => self.apply_nickname(&dialog.recipient_id, nickname),
                Some(None) => {}
            },
            ActiveDialog::GroupName(dialog, mut handle) => match handle.try_result() {
                None => self.dialog = Some(ActiveDialog::GroupName(dialog, handle)),
                Some(Some(name)) => match dialog.group_id {
                    Some(group_id) => self.apply_group_name(&group_id, name),
                    None => return self.create_group(name),
                },
                Some(None) => {}
            },
            ActiveDialog::Theme(dialog, mut handle) => match handle.try_result() {
                None => self.dialog = Some(ActiveDialog::Theme(dialog, handle)),
                Some(Some(theme)) => {
                    self.theme = theme;
                    if let Err(err) = self.store.set_theme(theme) {
                        tracing::error!("Failed to persist theme: {:#}", err);
                    }
                    self.status = format!("Theme set to {}", theme);
                }
                Some(None) => {}
            },
            ActiveDialog::Preview(dialog, mut handle) => match handle.try_result() {
                None => self.dialog = Some(ActiveDialog::Preview(dialog, handle)),
                Some(Some(attachment)) => self.send_attachment(attachment),
                Some(None) => {}
            },
            open @ ActiveDialog::AttachPath(_) => self.dialog = Some(open),
        }
        None
    }

    fn apply_nickname(&mut self, recipient_id: &str, nickname: String) {
        if let Err(err) = self.store.set_nickname(recipient_id, &nickname) {
            tracing::error!("Failed to persist nickname: {:#}", err);
        }
        let value = if nickname.is_empty() { None } else { Some(nickname) };
        self.nav
            .update_recipient(recipient_id, |r| r.nickname = value.clone());
        self.status = match &value {
            Some(nick) => format!("Nickname set to {}", nick),
            None => String::from("Nickname cleared"),
        };
    }

    /// Renames are local: the backend exposes no rename endpoint
    fn apply_group_name(&mut self, group_id: &str, name: String) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
            group.name = name.clone();
        }
        self.nav
            .update_recipient(group_id, |r| r.display_name = name.clone());
        self.status = format!("Group renamed to {}", name);
    }

    fn create_group(&mut self, name: String) -> Option<NetworkCommand> {
        let Some(creator_id) = self.user_id() else {
            self.status = String::from("Not signed in: no user id stored");
            return None;
        };
        let id = self.next_id();
        self.pending_create = Some(id);
        self.status = format!("Creating group {}...", name);
        Some(NetworkCommand::CreateGroup {
            id,
            request: CreateGroupRequest::new(name, creator_id),
        })
    }

    fn send_attachment(&mut self, attachment: Attachment) {
        let (Some(sender), Some(target)) = (self.user_id(), self.current_target()) else {
            self.status = String::from("Not signed in: no user id stored");
            return;
        };
        let name = attachment.file_name.clone();
        self.append_message(ChatMessage::new(sender, target, "").with_attachment(attachment));
        self.status = format!("Attached {}", name);
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network responses
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        match response {
            NetworkResponse::Groups { id, outcome } => {
                if self.pending_groups != Some(id) {
                    return;
                }
                self.pending_groups = None;
                self.groups_loading = false;
                match outcome {
                    FetchOutcome::Data(groups) => {
                        self.status = format!("{} groups", groups.len());
                        self.groups = groups;
                    }
                    FetchOutcome::Empty => {
                        self.groups.clear();
                        self.status = String::from("No groups yet, press n to create one");
                    }
                    FetchOutcome::Failed(reason) => {
                        self.status = format!("Could not load groups: {}", reason);
                    }
                }
                self.selected_group = self.selected_group.min(self.groups.len().saturating_sub(1));
            }
            NetworkResponse::GroupCreated { id, group } => {
                if self.pending_create != Some(id) {
                    return;
                }
                self.pending_create = None;
                match group {
                    Some(group) => {
                        self.status = format!("Created group {}", group.name);
                        self.groups.push(group);
                        self.selected_group = self.groups.len() - 1;
                    }
                    None => self.status = String::from("Group creation failed"),
                }
            }
            NetworkResponse::SearchResults { id, query, outcome } => {
                if self.pending_search != Some(id) {
                    return;
                }
                self.pending_search = None;
                self.selected_result = 0;
                match outcome {
                    FetchOutcome::Data(users) => {
                        self.search_results = users;
                        self.search_notice = None;
                    }
                    FetchOutcome::Empty => {
                        self.search_results.clear();
                        self.search_notice = Some(format!("No users match \"{}\"", query));
                    }
                    FetchOutcome::Failed(reason) => {
                        self.search_results.clear();
                        self.search_notice = Some(format!("Search failed: {}", reason));
                    }
                }
            }
        }
    }
}

/// Move a list cursor one step, wrapping at both ends
fn step(index: &mut usize, len: usize, forward: bool) {
    if len == 0 {
        *index = 0;
    } else if forward {
        *index = (*index + 1) % len;
    } else {
        *index = index.checked_sub(1).unwrap_or(len - 1);
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, MessageTarget, Theme, UserProfile};
    use crate::storage::LocalStore;
    use std::sync::Arc;

    fn signed_in() -> AppState {
        let store = LocalStore::in_memory();
        store.set_user_id("me").unwrap();
        AppState::new(Arc::new(store), "http://localhost:5000")
    }

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.into(),
            name: name.into(),
            avatar: None,
            creator_id: None,
            members: vec![],
            created_at: None,
        }
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[test]
    fn test_send_message_in_group_conversation() {
        let mut state = signed_in();
        state.groups = vec![group("g1", "Team")];
        state.activate();
        assert!(matches!(state.nav.current(), Route::Conversation(r) if r.id == "g1"));

        state.start_editing();
        type_text(&mut state, "  hi all ");
        assert_eq!(state.submit(), None);

        let log = &state.conversations[&MessageTarget::Group("g1".into())];
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].content, "hi all");
        assert_eq!(log[0].sender_id, "me");
    }

    #[test]
    fn test_blank_message_not_sent() {
        let mut state = signed_in();
        state.groups = vec![group("g1", "Team")];
        state.activate();
        state.start_editing();
        type_text(&mut state, "   ");
        state.submit();
        assert!(state.conversations.is_empty());
    }

    #[test]
    fn test_theme_dialog_persists_choice() {
        let mut state = signed_in();
        state.switch_tab(AppTab::Settings);
        state.activate();
        assert!(matches!(state.dialog, Some(ActiveDialog::Theme(..))));
        state.dialog_next();
        assert_eq!(state.dialog_confirm(), None);
        assert!(state.dialog.is_none());
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.store.theme(), Theme::Dark);
    }

    #[test]
    fn test_nickname_dialog_updates_open_conversation() {
        let mut state = signed_in();
        state.search_results = vec![UserProfile {
            id: "u2".into(),
            username: "alex".into(),
            display_name: "Alex".into(),
            tag_name: None,
            birthday: None,
            email: None,
            avatar: None,
            status: Default::default(),
        }];
        state.switch_tab(AppTab::Search);
        state.activate();
        state.edit_nickname();
        type_text(&mut state, "a");
        state.dialog_confirm();

        assert_eq!(state.nav.current().title(), "Alexa");
        assert_eq!(state.store.nickname("u2").as_deref(), Some("Alexa"));
    }

    #[test]
    fn test_cancelled_rename_changes_nothing() {
        let mut state = signed_in();
        state.groups = vec![group("g1", "Team")];
        state.activate();
        state.rename_group();
        type_text(&mut state, " B");
        state.dialog_cancel();
        assert!(state.dialog.is_none());
        assert_eq!(state.groups[0].name, "Team");
    }

    #[test]
    fn test_new_group_issues_create_command() {
        let mut state = signed_in();
        state.new_group();
        assert_eq!(state.dialog_confirm(), None);
        assert!(state.dialog.is_some(), "blank name keeps dialog open");

        type_text(&mut state, "Climbing");
        match state.dialog_confirm() {
            Some(NetworkCommand::CreateGroup { request, .. }) => {
                assert_eq!(request.name, "Climbing");
                assert_eq!(request.creator_id, "me");
                assert_eq!(request.member_ids, vec!["me".to_string()]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_stale_search_response_ignored() {
        let mut state = signed_in();
        state.switch_tab(AppTab::Search);
        state.start_editing();
        type_text(&mut state, "ab");
        let Some(NetworkCommand::SearchUsers { id, .. }) = state.submit() else {
            panic!("expected a search command");
        };
        state.handle_response(NetworkResponse::SearchResults {
            id: id + 100,
            query: "old".into(),
            outcome: FetchOutcome::Empty,
        });
        assert!(state.pending_search.is_some());

        state.handle_response(NetworkResponse::SearchResults {
            id,
            query: "ab".into(),
            outcome: FetchOutcome::Failed("Connection failed".into()),
        });
        assert_eq!(state.search_notice.as_deref(), Some("Search failed: Connection failed"));
    }

    #[test]
    fn test_delete_and_react_last() {
        let mut state = signed_in();
        state.groups = vec![group("g1", "Team")];
        state.activate();
        state.start_editing();
        type_text(&mut state, "first");
        state.submit();

        state.react_last();
        state.delete_last();
        let log = &state.conversations[&MessageTarget::Group("g1".into())];
        assert!(log[0].is_deleted);
        assert_eq!(log[0].reactions.len(), 1);
    }

    #[test]
    fn test_log_out_clears_identity() {
        let mut state = signed_in();
        state.groups = vec![group("g1", "Team")];
        state.log_out();
        assert_eq!(state.user_id(), None);
        assert!(state.groups.is_empty());
        assert_eq!(state.nav.active_tab(), AppTab::Settings);
    }

    #[test]
    fn test_responses_after_log_out_are_dropped() {
        let mut state = signed_in();
        let Some(NetworkCommand::LoadGroups { id }) = state.refresh() else {
            panic!("expected a groups command");
        };
        state.search_results = vec![UserProfile {
            id: "u2".into(),
            username: "alex".into(),
            display_name: "Alex".into(),
            tag_name: None,
            birthday: None,
            email: None,
            avatar: None,
            status: Default::default(),
        }];
        state.log_out();

        state.handle_response(NetworkResponse::Groups {
            id,
            outcome: FetchOutcome::Data(vec![group("g1", "Secret")]),
        });
        assert_eq!(state.user_id(), None);
        assert!(state.groups.is_empty());
        assert!(!state.groups_loading);
        assert!(state.search_results.is_empty());
        assert_eq!(state.pending_search, None);
        assert_eq!(state.pending_create, None);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/a.png"), PathBuf::from("/tmp/a.png"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/a.png"), home.join("a.png"));
        }
    }
}
