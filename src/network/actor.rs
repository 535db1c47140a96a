//! Network actor - runs backend calls in the Tokio async runtime

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::services::{GroupService, UserService};

/// Network actor that turns commands into service calls
pub struct NetworkActor {
    groups: Arc<GroupService>,
    users: Arc<UserService>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        groups: GroupService,
        users: UserService,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            groups: Arc::new(groups),
            users: Arc::new(users),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::LoadGroups { id }) => {
                            let groups = Arc::clone(&self.groups);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, "Loading groups");
                                let outcome = groups.group_details_outcome().await;
                                let _ = response_tx.send(NetworkResponse::Groups { id, outcome });
                            });
                        }

                        Some(NetworkCommand::CreateGroup { id, request }) => {
                            let groups = Arc::clone(&self.groups);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, name = %request.name, "Creating group");
                                let group = groups.create_group(&request).await;
                                let _ = response_tx.send(NetworkResponse::GroupCreated { id, group });
                            });
                        }

                        Some(NetworkCommand::SearchUsers { id, query }) => {
                            let users = Arc::clone(&self.users);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, query = %query, "Searching users");
                                let outcome = users.search_outcome(&query).await;
                                let _ = response_tx.send(NetworkResponse::SearchResults { id, query, outcome });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::client::ApiClient;
    use crate::services::FetchOutcome;
    use crate::storage::LocalStore;
    use crate::test_support::spawn_backend;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn test_search_round_trip_through_actor() {
        let app = Router::new().route(
            "/api/Users/search",
            get(|| async { Json(json!([{"id": "u5", "username": "abby"}])) }),
        );
        let api = ApiClient::new(spawn_backend(app).await);
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = NetworkActor::new(
            GroupService::new(api.clone(), Arc::new(LocalStore::in_memory())),
            UserService::new(api),
            resp_tx,
        );
        let task = tokio::spawn(actor.run(cmd_rx));

        cmd_tx.send(NetworkCommand::SearchUsers { id: 7, query: "ab".into() }).unwrap();
        match resp_rx.recv().await.unwrap() {
            NetworkResponse::SearchResults { id, query, outcome } => {
                assert_eq!(id, 7);
                assert_eq!(query, "ab");
                assert!(matches!(outcome, FetchOutcome::Data(ref users) if users[0].id == "u5"));
            }
            other => panic!("unexpected response {:?}", other),
        }

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        task.await.unwrap();
    }
}
