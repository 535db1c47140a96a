use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::dialogs::{channel, DialogHandle, DialogView, Resolver};
use crate::models::Attachment;

/// Shows a file before it is attached to a message
#[derive(Debug)]
pub struct AttachmentPreviewDialog {
    pub path: PathBuf,
    pub attachment: Attachment,
    resolver: Resolver<Attachment>,
}

impl AttachmentPreviewDialog {
    /// Fails when the path is not a readable regular file
    pub fn open(path: &Path) -> Result<(Self, DialogHandle<Attachment>)> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }
        let (resolver, handle) = channel();
        let dialog = AttachmentPreviewDialog {
            path: path.to_path_buf(),
            attachment: Attachment::from_path(path, meta.len()),
            resolver,
        };
        Ok((dialog, handle))
    }

    pub fn confirm(&mut self) -> bool {
        self.resolver.resolve(Some(self.attachment.clone()))
    }

    pub fn cancel(&mut self) -> bool {
        self.resolver.resolve(None)
    }

    pub fn view(&self) -> DialogView {
        let kind = if self.attachment.is_image() { "Image" } else { "File" };
        DialogView::Preview {
            title: format!(" {} preview ", kind),
            lines: vec![
                format!("Name: {}", self.attachment.file_name),
                format!("Type: {}", self.attachment.mime_type),
                format!("Size: {}", self.attachment.size_label()),
                format!("Path: {}", self.path.display()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_preview_image_and_confirm() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cat.png");
        fs::write(&path, [0u8; 2048]).unwrap();

        let (mut dialog, handle) = AttachmentPreviewDialog::open(&path).unwrap();
        match dialog.view() {
            DialogView::Preview { title, lines } => {
                assert_eq!(title, " Image preview ");
                assert!(lines.contains(&"Size: 2.0 KB".to_string()));
            }
            other => panic!("unexpected view {:?}", other),
        }
        dialog.confirm();
        let attachment = handle.await.unwrap();
        assert_eq!(attachment.file_name, "cat.png");
        assert_eq!(attachment.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_cancelled_preview_attaches_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "draft").unwrap();

        let (mut dialog, handle) = AttachmentPreviewDialog::open(&path).unwrap();
        assert!(dialog.cancel());
        assert!(!dialog.confirm());
        assert_eq!(handle.await, None);
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(AttachmentPreviewDialog::open(dir.path()).is_err());
        assert!(AttachmentPreviewDialog::open(&dir.path().join("missing.txt")).is_err());
    }
}
