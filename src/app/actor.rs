//! App actor - message loop processing UI events and network responses

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::storage::LocalStore;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        store: Arc<LocalStore>,
        api_base_url: impl Into<String>,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(store, api_base_url),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Load the chat list up front
        let cmd = self.state.refresh();
        self.send(cmd);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),
            UiEvent::Back => self.state.back(),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::Activate => self.state.activate(),

            // Chats
            UiEvent::Refresh => {
                let cmd = self.state.refresh();
                self.send(cmd);
            }
            UiEvent::NewGroup => self.state.new_group(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::Submit => {
                let cmd = self.state.submit();
                self.send(cmd);
            }

            // Conversation
            UiEvent::Attach => self.state.attach(),
            UiEvent::DeleteLast => self.state.delete_last(),
            UiEvent::ReactLast => self.state.react_last(),
            UiEvent::EditNickname => self.state.edit_nickname(),
            UiEvent::RenameGroup => self.state.rename_group(),

            // Dialogs
            UiEvent::DialogConfirm => {
                let cmd = self.state.dialog_confirm();
                self.send(cmd);
            }
            UiEvent::DialogCancel => self.state.dialog_cancel(),
            UiEvent::DialogNext => self.state.dialog_next(),
            UiEvent::DialogPrev => self.state.dialog_prev(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
