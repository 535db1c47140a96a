use crate::dialogs::{channel, DialogHandle, DialogView, Resolver, TextInput};

/// Edits the nickname shown for a private contact
#[derive(Debug)]
pub struct NicknameDialog {
    pub recipient_id: String,
    pub input: TextInput,
    resolver: Resolver<String>,
}

impl NicknameDialog {
    pub fn open(recipient_id: impl Into<String>, current_nickname: &str) -> (Self, DialogHandle<String>) {
        let (resolver, handle) = channel();
        let dialog = NicknameDialog {
            recipient_id: recipient_id.into(),
            input: TextInput::new(current_nickname),
            resolver,
        };
        (dialog, handle)
    }

    /// Resolve with the edited nickname. An empty value clears the nickname.
    pub fn confirm(&mut self) -> bool {
        let value = self.input.value().trim().to_string();
        self.resolver.resolve(Some(value))
    }

    pub fn cancel(&mut self) -> bool {
        self.resolver.resolve(None)
    }

    pub fn is_open(&self) -> bool {
        self.resolver.is_open()
    }

    pub fn view(&self) -> DialogView {
        DialogView::TextPrompt {
            title: String::from(" Change nickname "),
            label: String::from("Nickname"),
            value: self.input.value().to_string(),
            cursor: self.input.cursor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_resolves_edited_value() {
        let (mut dialog, handle) = NicknameDialog::open("u1", "Alex");
        dialog.input.insert('a');
        assert!(dialog.confirm());
        assert!(!dialog.is_open());
        assert_eq!(handle.await.as_deref(), Some("Alexa"));
    }

    #[tokio::test]
    async fn test_cancel_resolves_nothing() {
        let (mut dialog, handle) = NicknameDialog::open("u1", "Alex");
        dialog.input.set("Alexa");
        assert!(dialog.cancel());
        assert!(!dialog.confirm());
        assert_eq!(handle.await, None);
    }
}
