use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Presence status reported by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PresenceStatus {
    Online,
    Away,
    Busy,
    #[default]
    Offline,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Away => "away",
            PresenceStatus::Busy => "busy",
            PresenceStatus::Offline => "offline",
        }
    }
}

impl From<String> for PresenceStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "online" => PresenceStatus::Online,
            "away" | "idle" => PresenceStatus::Away,
            "busy" | "dnd" => PresenceStatus::Busy,
            _ => PresenceStatus::Offline,
        }
    }
}

impl From<PresenceStatus> for String {
    fn from(value: PresenceStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A user as returned by the Users API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "userId")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    /// Searchable handle, distinct from the display name
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: PresenceStatus,
}

impl UserProfile {
    /// Name to show in lists, falling back to the username
    pub fn shown_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// A member entry inside a group's details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    #[serde(alias = "id")]
    pub user_id: String,
    #[serde(default, alias = "username")]
    pub display_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A group chat with its details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(alias = "groupId")]
    pub id: String,
    #[serde(alias = "groupName")]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payload for creating a group chat
#[derive(Clone, Debug, PartialEq)]
pub struct CreateGroupRequest {
    pub name: String,
    pub creator_id: String,
    pub member_ids: Vec<String>,
    pub avatar: Option<PathBuf>,
}

impl CreateGroupRequest {
    pub fn new(name: impl Into<String>, creator_id: impl Into<String>) -> Self {
        let creator_id = creator_id.into();
        CreateGroupRequest {
            name: name.into(),
            member_ids: vec![creator_id.clone()],
            creator_id,
            avatar: None,
        }
    }

    pub fn with_member(mut self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if !self.member_ids.contains(&user_id) {
            self.member_ids.push(user_id);
        }
        self
    }
}

/// Whether a recipient is an individual contact or a group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    Private,
    Group,
}

/// Wire form of a recipient; older payloads carry an `isGroup` flag instead of `type`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipientWire {
    id: String,
    #[serde(alias = "name")]
    display_name: String,
    #[serde(default, alias = "tag")]
    nickname: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    status: PresenceStatus,
    #[serde(default, rename = "type")]
    kind: Option<RecipientKind>,
    #[serde(default)]
    is_group: Option<bool>,
}

/// The addressed party of a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecipientWire")]
pub struct Recipient {
    pub id: String,
    pub display_name: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub status: PresenceStatus,
    #[serde(rename = "type")]
    pub kind: RecipientKind,
}

impl TryFrom<RecipientWire> for Recipient {
    type Error = String;

    fn try_from(wire: RecipientWire) -> Result<Self, Self::Error> {
        let flag_kind = wire.is_group.map(|g| {
            if g {
                RecipientKind::Group
            } else {
                RecipientKind::Private
            }
        });
        let kind = match (wire.kind, flag_kind) {
            (Some(kind), Some(flag)) if kind != flag => {
                return Err(format!(
                    "recipient {} has type {:?} but isGroup says {:?}",
                    wire.id, kind, flag
                ));
            }
            (Some(kind), _) => kind,
            (None, Some(flag)) => flag,
            (None, None) => RecipientKind::Private,
        };
        Ok(Recipient {
            id: wire.id,
            display_name: wire.display_name,
            nickname: wire.nickname,
            avatar: wire.avatar,
            status: wire.status,
            kind,
        })
    }
}

impl Recipient {
    pub fn from_user(user: &UserProfile) -> Self {
        Recipient {
            id: user.id.clone(),
            display_name: user.shown_name().to_string(),
            nickname: None,
            avatar: user.avatar.clone(),
            status: user.status,
            kind: RecipientKind::Private,
        }
    }

    pub fn from_group(group: &Group) -> Self {
        Recipient {
            id: group.id.clone(),
            display_name: group.name.clone(),
            nickname: None,
            avatar: group.avatar.clone(),
            status: PresenceStatus::Offline,
            kind: RecipientKind::Group,
        }
    }

    /// Nickname when set, otherwise the display name
    pub fn title(&self) -> &str {
        match &self.nickname {
            Some(nick) if !nick.trim().is_empty() => nick,
            _ => &self.display_name,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == RecipientKind::Group
    }

    pub fn target(&self) -> MessageTarget {
        match self.kind {
            RecipientKind::Private => MessageTarget::User(self.id.clone()),
            RecipientKind::Group => MessageTarget::Group(self.id.clone()),
        }
    }
}

/// Exactly one addressed party of a message
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageTarget {
    User(String),
    Group(String),
}

impl MessageTarget {
    pub fn id(&self) -> &str {
        match self {
            MessageTarget::User(id) | MessageTarget::Group(id) => id,
        }
    }
}

/// A single emoji reaction left by a user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: String,
    pub emoji: String,
}

/// File attached to a message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl Attachment {
    /// Describe a local file without reading its contents
    pub fn from_path(path: &Path, size_bytes: u64) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        Attachment {
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            file_name,
            size_bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Human readable size, e.g. "1.5 KB"
    pub fn size_label(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut size = self.size_bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.size_bytes, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}

/// Wire form of a message: the target is split over two optional ids
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatMessageWire {
    #[serde(default)]
    id: Option<String>,
    sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    is_deleted: bool,
    #[serde(default)]
    reactions: Vec<Reaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment: Option<Attachment>,
}

/// A chat message addressed to a user or a group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChatMessageWire", into = "ChatMessageWire")]
pub struct ChatMessage {
    pub id: Option<String>,
    pub sender_id: String,
    pub target: MessageTarget,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub is_deleted: bool,
    pub reactions: Vec<Reaction>,
    pub attachment: Option<Attachment>,
}

impl TryFrom<ChatMessageWire> for ChatMessage {
    type Error = String;

    fn try_from(wire: ChatMessageWire) -> Result<Self, Self::Error> {
        let target = match (wire.recipient_id, wire.group_id) {
            (Some(user), None) => MessageTarget::User(user),
            (None, Some(group)) => MessageTarget::Group(group),
            (Some(_), Some(_)) => {
                return Err("message has both a recipient user and a group".to_string())
            }
            (None, None) => return Err("message has no recipient".to_string()),
        };
        Ok(ChatMessage {
            id: wire.id,
            sender_id: wire.sender_id,
            target,
            timestamp: wire.timestamp,
            content: wire.content,
            is_deleted: wire.is_deleted,
            reactions: wire.reactions,
            attachment: wire.attachment,
        })
    }
}

impl From<ChatMessage> for ChatMessageWire {
    fn from(msg: ChatMessage) -> Self {
        let (recipient_id, group_id) = match msg.target {
            MessageTarget::User(id) => (Some(id), None),
            MessageTarget::Group(id) => (None, Some(id)),
        };
        ChatMessageWire {
            id: msg.id,
            sender_id: msg.sender_id,
            recipient_id,
            group_id,
            timestamp: msg.timestamp,
            content: msg.content,
            is_deleted: msg.is_deleted,
            reactions: msg.reactions,
            attachment: msg.attachment,
        }
    }
}

impl ChatMessage {
    pub fn new(sender_id: impl Into<String>, target: MessageTarget, content: impl Into<String>) -> Self {
        ChatMessage {
            id: None,
            sender_id: sender_id.into(),
            target,
            timestamp: Utc::now(),
            content: content.into(),
            is_deleted: false,
            reactions: Vec::new(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Soft delete: the body is hidden but the message keeps its slot
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
    }

    /// Adds the reaction, or removes it when the user already left the same emoji.
    /// Returns true when the reaction is now present.
    pub fn toggle_reaction(&mut self, user_id: &str, emoji: &str) -> bool {
        if let Some(pos) = self
            .reactions
            .iter()
            .position(|r| r.user_id == user_id && r.emoji == emoji)
        {
            self.reactions.remove(pos);
            false
        } else {
            self.reactions.push(Reaction {
                user_id: user_id.to_string(),
                emoji: emoji.to_string(),
            });
            true
        }
    }

    /// Reactions grouped as (emoji, count) in first-seen order
    pub fn reaction_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for reaction in &self.reactions {
            match counts.iter_mut().find(|(e, _)| *e == reaction.emoji) {
                Some((_, n)) => *n += 1,
                None => counts.push((reaction.emoji.clone(), 1)),
            }
        }
        counts
    }

    /// Text shown in the conversation log
    pub fn display_body(&self) -> String {
        if self.is_deleted {
            return String::from("(message deleted)");
        }
        match &self.attachment {
            Some(att) if self.content.is_empty() => format!("[{}]", att.file_name),
            Some(att) => format!("{} [{}]", self.content, att.file_name),
            None => self.content.clone(),
        }
    }
}

/// Color theme offered by the theme selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Blue,
    Green,
    Red,
}

impl Theme {
    pub const ALL: [Theme; 5] = [Theme::Light, Theme::Dark, Theme::Blue, Theme::Green, Theme::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Blue => "blue",
            Theme::Green => "green",
            Theme::Red => "red",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("unknown theme: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_profile_from_backend_json() {
        let json = r#"{"id":"u1","username":"alex","displayName":"Alex","tagName":"alex#1","status":"Online"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name, "Alex");
        assert_eq!(user.tag_name.as_deref(), Some("alex#1"));
        assert_eq!(user.status, PresenceStatus::Online);
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_unknown_status_is_offline() {
        let json = r#"{"id":"u1","status":"sleeping"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.status, PresenceStatus::Offline);
        assert_eq!(user.shown_name(), "");
    }

    #[test]
    fn test_recipient_legacy_is_group_flag() {
        let json = r#"{"id":"g1","name":"Team","isGroup":true}"#;
        let r: Recipient = serde_json::from_str(json).unwrap();
        assert_eq!(r.kind, RecipientKind::Group);
        assert_eq!(r.target(), MessageTarget::Group("g1".into()));
    }

    #[test]
    fn test_recipient_conflicting_kind_rejected() {
        let json = r#"{"id":"g1","displayName":"Team","type":"private","isGroup":true}"#;
        assert!(serde_json::from_str::<Recipient>(json).is_err());
    }

    #[test]
    fn test_recipient_serializes_single_kind() {
        let r = Recipient::from_user(&UserProfile {
            id: "u2".into(),
            username: "sam".into(),
            display_name: String::new(),
            tag_name: None,
            birthday: None,
            email: None,
            avatar: None,
            status: PresenceStatus::Away,
        });
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["type"], "private");
        assert!(value.get("isGroup").is_none());
        assert_eq!(r.title(), "sam");
    }

    #[test]
    fn test_message_requires_exactly_one_target() {
        let both = r#"{"senderId":"a","recipientId":"b","groupId":"g","timestamp":"2024-05-01T10:00:00Z"}"#;
        let neither = r#"{"senderId":"a","timestamp":"2024-05-01T10:00:00Z"}"#;
        let group = r#"{"senderId":"a","groupId":"g","timestamp":"2024-05-01T10:00:00Z","content":"hi"}"#;
        assert!(serde_json::from_str::<ChatMessage>(both).is_err());
        assert!(serde_json::from_str::<ChatMessage>(neither).is_err());
        let msg: ChatMessage = serde_json::from_str(group).unwrap();
        assert_eq!(msg.target, MessageTarget::Group("g".into()));
        assert!(!msg.is_deleted);
    }

    #[test]
    fn test_message_serializes_split_target() {
        let msg = ChatMessage::new("a", MessageTarget::User("b".into()), "yo");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["recipientId"], "b");
        assert!(value.get("groupId").is_none());
    }

    #[test]
    fn test_toggle_reaction_and_delete() {
        let mut msg = ChatMessage::new("a", MessageTarget::Group("g".into()), "hello");
        assert!(msg.toggle_reaction("b", "👍"));
        assert!(msg.toggle_reaction("c", "👍"));
        assert!(msg.toggle_reaction("c", "🎉"));
        assert_eq!(msg.reaction_counts(), vec![("👍".to_string(), 2), ("🎉".to_string(), 1)]);
        assert!(!msg.toggle_reaction("b", "👍"));
        assert_eq!(msg.reactions.len(), 2);

        msg.mark_deleted();
        assert_eq!(msg.display_body(), "(message deleted)");
    }

    #[test]
    fn test_attachment_from_path() {
        let att = Attachment::from_path(Path::new("/tmp/Photo.JPG"), 1536);
        assert_eq!(att.file_name, "Photo.JPG");
        assert!(att.is_image());
        assert_eq!(att.size_label(), "1.5 KB");

        let doc = Attachment::from_path(Path::new("notes.bin"), 10);
        assert!(!doc.is_image());
        assert_eq!(doc.size_label(), "10 B");
        assert_eq!(doc.mime_type, "application/octet-stream");

        let clip = Attachment::from_path(Path::new("clip.webm"), 10);
        assert_eq!(clip.mime_type, "video/webm");
        let word = Attachment::from_path(Path::new("report.docx"), 10);
        assert_eq!(
            word.mime_type,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("purple".parse::<Theme>().is_err());
        assert_eq!(Theme::ALL.map(|t| t.as_str()), ["light", "dark", "blue", "green", "red"]);
    }

    #[test]
    fn test_create_group_request_members() {
        let req = CreateGroupRequest::new("Team", "u1").with_member("u2").with_member("u1");
        assert_eq!(req.member_ids, vec!["u1".to_string(), "u2".to_string()]);
    }
}
