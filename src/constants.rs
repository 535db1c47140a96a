//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the chat backend
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "CHATDESK_API_URL";

/// Environment variable that seeds the current user identity
pub const USER_ID_ENV: &str = "CHATDESK_USER_ID";

/// Name of the per-user data directory under $HOME
pub const DATA_DIR_NAME: &str = ".chatdesk";

/// Local storage key holding the current user's id
pub const USER_ID_KEY: &str = "userId";

/// Local storage key holding the selected theme
pub const THEME_KEY: &str = "theme";

/// Prefix for per-recipient nickname keys
pub const NICKNAME_KEY_PREFIX: &str = "nickname:";

/// Log file written inside the data directory
pub const LOG_FILE_NAME: &str = "chatdesk.log";

/// Application name
pub const APP_NAME: &str = "chatdesk";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
