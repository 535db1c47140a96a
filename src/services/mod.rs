//! Remote access services over the chat backend
//!
//! Each service exposes `try_*` methods returning `anyhow::Result` and the
//! sentinel-style methods the screens use: any failure is logged once and
//! collapsed to `None`.

pub mod groups;
pub mod users;

pub use groups::GroupService;
pub use users::UserService;

/// Outcome of a list fetch that keeps "empty" apart from "failed"
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<Vec<T>> {
    /// Classify a list result, logging failures once under `context`
    pub fn from_list(result: anyhow::Result<Vec<T>>, context: &str) -> Self {
        match result {
            Ok(items) if items.is_empty() => FetchOutcome::Empty,
            Ok(items) => FetchOutcome::Data(items),
            Err(err) => {
                tracing::error!("{}: {:#}", context, err);
                FetchOutcome::Failed(format!("{:#}", err))
            }
        }
    }
}

impl<T: Default> FetchOutcome<T> {
    /// Collapse to the sentinel form: failures become `None`, empty becomes `Some(default)`
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Data(data) => Some(data),
            FetchOutcome::Empty => Some(T::default()),
            FetchOutcome::Failed(_) => None,
        }
    }
}

impl<T> FetchOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}
