//! Friend lookup by tag name

use anyhow::Result;

use crate::models::UserProfile;
use crate::network::client::ApiClient;
use crate::services::FetchOutcome;

const SEARCH_PATH: &str = "/api/Users/search";

pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        UserService { api }
    }

    pub async fn try_search_friends(&self, query: &str) -> Result<Vec<UserProfile>> {
        self.api.get_json(SEARCH_PATH, &[("tagName", query)]).await
    }

    pub async fn search_outcome(&self, query: &str) -> FetchOutcome<Vec<UserProfile>> {
        FetchOutcome::from_list(self.try_search_friends(query).await, "Error searching users")
    }

    /// Users matching `query`, in backend order. `None` on any failure.
    pub async fn search_friends(&self, query: &str) -> Option<Vec<UserProfile>> {
        self.search_outcome(query).await.into_option()
    }
}
