use crate::dialogs::{channel, DialogHandle, DialogView, Resolver, TextInput};

/// Names a group: renames an existing one, or names a new one when `group_id` is `None`
#[derive(Debug)]
pub struct RenameGroupDialog {
    pub group_id: Option<String>,
    pub input: TextInput,
    resolver: Resolver<String>,
}

impl RenameGroupDialog {
    pub fn open(group_id: Option<String>, current_name: &str) -> (Self, DialogHandle<String>) {
        let (resolver, handle) = channel();
        let dialog = RenameGroupDialog {
            group_id,
            input: TextInput::new(current_name),
            resolver,
        };
        (dialog, handle)
    }

    /// Blank names are refused and the dialog stays open
    pub fn confirm(&mut self) -> bool {
        if self.input.is_blank() {
            return false;
        }
        let name = self.input.value().trim().to_string();
        self.resolver.resolve(Some(name))
    }

    pub fn cancel(&mut self) -> bool {
        self.resolver.resolve(None)
    }

    pub fn is_open(&self) -> bool {
        self.resolver.is_open()
    }

    pub fn view(&self) -> DialogView {
        let title = if self.group_id.is_some() {
            " Rename group "
        } else {
            " New group "
        };
        DialogView::TextPrompt {
            title: title.to_string(),
            label: String::from("Group name"),
            value: self.input.value().to_string(),
            cursor: self.input.cursor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rename_trims_value() {
        let (mut dialog, handle) = RenameGroupDialog::open(Some("g1".into()), "Team");
        dialog.input.set("  Core team ");
        assert!(dialog.confirm());
        assert_eq!(handle.await.as_deref(), Some("Core team"));
    }

    #[test]
    fn test_blank_name_keeps_dialog_open() {
        let (mut dialog, mut handle) = RenameGroupDialog::open(None, "");
        assert!(!dialog.confirm());
        assert!(dialog.is_open());
        assert_eq!(handle.try_result(), None);
        assert!(matches!(dialog.view(), DialogView::TextPrompt { ref title, .. } if title == " New group "));
    }
}
