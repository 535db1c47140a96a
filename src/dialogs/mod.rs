//! Modal dialogs
//!
//! A dialog is opened with its seed data and hands back a [`DialogHandle`].
//! The handle resolves once: with `Some(value)` when the dialog is confirmed,
//! with `None` when it is cancelled or dropped unresolved.

pub mod attachment;
pub mod input;
pub mod nickname;
pub mod rename_group;
pub mod theme;

pub use attachment::AttachmentPreviewDialog;
pub use input::{MessageInput, TextInput};
pub use nickname::NicknameDialog;
pub use rename_group::RenameGroupDialog;
pub use theme::ThemeSelectorDialog;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Caller side of a dialog: awaits the dialog's result
#[derive(Debug)]
pub struct DialogHandle<T> {
    rx: oneshot::Receiver<Option<T>>,
}

impl<T> DialogHandle<T> {
    /// Non-blocking check. `None` while the dialog is still open.
    pub fn try_result(&mut self) -> Option<Option<T>> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(None),
        }
    }
}

impl<T> Future for DialogHandle<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| res.ok().flatten())
    }
}

/// Dialog side: resolves the handle at most once
#[derive(Debug)]
pub(crate) struct Resolver<T> {
    tx: Option<oneshot::Sender<Option<T>>>,
}

impl<T> Resolver<T> {
    /// Returns false if the dialog was already resolved
    pub(crate) fn resolve(&mut self, value: Option<T>) -> bool {
        match self.tx.take() {
            Some(tx) => {
                // Receiver may be gone; the dialog still counts as closed.
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.tx.is_some()
    }
}

pub(crate) fn channel<T>() -> (Resolver<T>, DialogHandle<T>) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx: Some(tx) }, DialogHandle { rx })
}

/// Snapshot of an open dialog for rendering
#[derive(Clone, Debug, PartialEq)]
pub enum DialogView {
    TextPrompt {
        title: String,
        label: String,
        value: String,
        cursor: usize,
    },
    Choice {
        title: String,
        options: Vec<String>,
        selected: usize,
    },
    Preview {
        title: String,
        lines: Vec<String>,
    },
}
