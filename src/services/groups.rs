//! Group chat creation and listing

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

use crate::models::{Attachment, CreateGroupRequest, Group};
use crate::network::client::ApiClient;
use crate::services::FetchOutcome;
use crate::storage::LocalStore;

const CREATE_GROUP_PATH: &str = "/api/Groups/create-group-chat";
const GROUP_DETAILS_PATH: &str = "/api/Groups/user-groups-with-details";

pub struct GroupService {
    api: ApiClient,
    store: Arc<LocalStore>,
}

impl GroupService {
    pub fn new(api: ApiClient, store: Arc<LocalStore>) -> Self {
        GroupService { api, store }
    }

    /// Create a group chat, returning the backend's group object
    pub async fn try_create_group(&self, request: &CreateGroupRequest) -> Result<Group> {
        let form = build_form(request).await?;
        self.api.post_multipart(CREATE_GROUP_PATH, form).await
    }

    /// Create a group chat. Any failure is logged and yields `None`.
    pub async fn create_group(&self, request: &CreateGroupRequest) -> Option<Group> {
        match self.try_create_group(request).await {
            Ok(group) => {
                tracing::info!(group_id = %group.id, name = %group.name, "Group created");
                Some(group)
            }
            Err(err) => {
                tracing::error!("Error creating group: {:#}", err);
                None
            }
        }
    }

    pub async fn try_group_details(&self, user_id: &str) -> Result<Vec<Group>> {
        let path = format!("{}/{}", GROUP_DETAILS_PATH, urlencoding::encode(user_id));
        self.api.get_json(&path, &[]).await
    }

    /// Groups of the stored user. Without a stored `userId` no request is made.
    pub async fn group_details_outcome(&self) -> FetchOutcome<Vec<Group>> {
        let Some(user_id) = self.store.user_id() else {
            tracing::warn!("No userId in local storage, skipping group details");
            return FetchOutcome::Failed(String::from("not signed in"));
        };
        FetchOutcome::from_list(
            self.try_group_details(&user_id).await,
            "Error fetching group details",
        )
    }

    pub async fn get_group_details(&self) -> Option<Vec<Group>> {
        self.group_details_outcome().await.into_option()
    }
}

/// Multipart body expected by the create endpoint
async fn build_form(request: &CreateGroupRequest) -> Result<Form> {
    let mut form = Form::new()
        .text("GroupName", request.name.clone())
        .text("CreatorId", request.creator_id.clone());
    for member in &request.member_ids {
        form = form.text("MemberIds", member.clone());
    }
    if let Some(path) = &request.avatar {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading avatar {}", path.display()))?;
        let meta = Attachment::from_path(path, bytes.len() as u64);
        let part = Part::bytes(bytes)
            .file_name(meta.file_name)
            .mime_str(&meta.mime_type)?;
        form = form.part("Avatar", part);
    }
    Ok(form)
}
