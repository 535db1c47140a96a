//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::navigation::AppTab;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    SwitchTab(AppTab),
    Back,
    SelectNext,
    SelectPrev,
    Activate,

    // Chats
    Refresh,
    NewGroup,

    // Input editing (composer or search box)
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Submit,

    // Conversation actions
    Attach,
    DeleteLast,
    ReactLast,
    EditNickname,
    RenameGroup,

    // Open dialog
    DialogConfirm,
    DialogCancel,
    DialogNext,
    DialogPrev,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Screen kind, enough to pick key bindings
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ScreenKind {
    #[default]
    ChatList,
    Conversation { is_group: bool },
    Search,
    SettingsList,
    Detail,
}

/// Kind of the dialog currently on top, if any
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DialogKind {
    TextPrompt,
    Choice,
    Preview,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Everything the key mapper needs to know about the current UI
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct KeyContext {
    pub screen: ScreenKind,
    pub input_mode: InputMode,
    pub dialog: Option<DialogKind>,
    pub show_help: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if let Some(dialog) = ctx.dialog {
        return handle_dialog_keys(key, dialog);
    }

    match ctx.input_mode {
        InputMode::Editing => handle_editing_keys(key),
        InputMode::Normal => handle_normal_keys(key, ctx.screen),
    }
}

fn handle_dialog_keys(key: KeyEvent, dialog: DialogKind) -> Option<UiEvent> {
    match dialog {
        DialogKind::TextPrompt => match key.code {
            KeyCode::Esc => Some(UiEvent::DialogCancel),
            KeyCode::Enter => Some(UiEvent::DialogConfirm),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        DialogKind::Choice => match key.code {
            KeyCode::Esc => Some(UiEvent::DialogCancel),
            KeyCode::Enter => Some(UiEvent::DialogConfirm),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::DialogPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::DialogNext),
            _ => None,
        },
        DialogKind::Preview => match key.code {
            KeyCode::Esc | KeyCode::Char('n') => Some(UiEvent::DialogCancel),
            KeyCode::Enter | KeyCode::Char('y') => Some(UiEvent::DialogConfirm),
            _ => None,
        },
    }
}

fn handle_editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_normal_keys(key: KeyEvent, screen: ScreenKind) -> Option<UiEvent> {
    // Keys shared by every screen
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => return Some(UiEvent::SwitchTab(AppTab::Chats)),
        KeyCode::Char('2') => return Some(UiEvent::SwitchTab(AppTab::Search)),
        KeyCode::Char('3') => return Some(UiEvent::SwitchTab(AppTab::Settings)),
        KeyCode::Esc | KeyCode::Backspace => return Some(UiEvent::Back),
        KeyCode::Up | KeyCode::Char('k') => return Some(UiEvent::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => return Some(UiEvent::SelectNext),
        _ => {}
    }

    match screen {
        ScreenKind::ChatList => match key.code {
            KeyCode::Enter => Some(UiEvent::Activate),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('n') => Some(UiEvent::NewGroup),
            _ => None,
        },
        ScreenKind::Conversation { is_group } => match key.code {
            KeyCode::Char('i') | KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('a') => Some(UiEvent::Attach),
            KeyCode::Char('d') => Some(UiEvent::DeleteLast),
            KeyCode::Char('+') => Some(UiEvent::ReactLast),
            KeyCode::Char('N') if !is_group => Some(UiEvent::EditNickname),
            KeyCode::Char('R') if is_group => Some(UiEvent::RenameGroup),
            _ => None,
        },
        ScreenKind::Search => match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') => Some(UiEvent::StartEditing),
            KeyCode::Enter => Some(UiEvent::Activate),
            _ => None,
        },
        ScreenKind::SettingsList => match key.code {
            KeyCode::Enter => Some(UiEvent::Activate),
            _ => None,
        },
        ScreenKind::Detail => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_dialog_captures_text() {
        let ctx = KeyContext {
            dialog: Some(DialogKind::TextPrompt),
            ..KeyContext::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx), Some(UiEvent::CharInput('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::DialogCancel));
    }

    #[test]
    fn test_rename_only_for_groups() {
        let private = KeyContext {
            screen: ScreenKind::Conversation { is_group: false },
            ..KeyContext::default()
        };
        let group = KeyContext {
            screen: ScreenKind::Conversation { is_group: true },
            ..KeyContext::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('R')), private), None);
        assert_eq!(key_to_ui_event(press(KeyCode::Char('R')), group), Some(UiEvent::RenameGroup));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('N')), private), Some(UiEvent::EditNickname));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctx = KeyContext {
            input_mode: InputMode::Editing,
            ..KeyContext::default()
        };
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(key, ctx), Some(UiEvent::Quit));
    }
}
