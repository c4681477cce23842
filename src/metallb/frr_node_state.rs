// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::frrk8s::FRRNodeState;
use kube::api::ListParams;

/// Read-only access to the per-node FRR state; these objects are created by frr-k8s
pub type FrrNodeStateBuilder = ResourceBuilder<FRRNodeState>;

impl FrrNodeStateBuilder {
    pub async fn pull(api_client: &Clients, name: &str) -> Result<Self> {
        Self::pull_named(api_client, name, None, |metadata| FRRNodeState {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    /// FRR configuration currently running on the node
    pub fn running_config(&self) -> Option<&str> {
        self.status()?.running_config.as_deref()
    }

    pub fn last_reload_result(&self) -> Option<&str> {
        self.status()?.last_reload_result.as_deref()
    }

    pub fn last_conversion_result(&self) -> Option<&str> {
        self.status()?.last_conversion_result.as_deref()
    }

    fn status(&self) -> Option<&crate::types::frrk8s::FRRNodeStateStatus> {
        self.object.as_ref()?.status.as_ref()
    }
}

pub async fn list_frr_node_states(
    api_client: &Clients,
    options: &[ListParams],
) -> Result<Vec<FrrNodeStateBuilder>> {
    list_builders(api_client, None, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApiServer;
    use crate::types::frrk8s::FRRNodeStateStatus;

    fn node_state(name: &str) -> FRRNodeState {
        let mut state = FRRNodeState::new(name, Default::default());
        state.status = Some(FRRNodeStateStatus {
            running_config: Some("router bgp 64500".to_string()),
            last_reload_result: Some("success".to_string()),
            last_conversion_result: Some("success".to_string()),
        });
        state
    }

    #[tokio::test]
    async fn test_pull_exposes_status() {
        let server = FakeApiServer::new().with_object(&node_state("worker-0"));

        let state = FrrNodeStateBuilder::pull(&server.clients(), "worker-0")
            .await
            .unwrap();

        assert_eq!(state.running_config(), Some("router bgp 64500"));
        assert_eq!(state.last_reload_result(), Some("success"));
        assert_eq!(state.last_conversion_result(), Some("success"));
    }

    #[tokio::test]
    async fn test_pull_missing() {
        let server = FakeApiServer::new();

        let err = FrrNodeStateBuilder::pull(&server.clients(), "worker-0")
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "FRRNodeState object worker-0 does not exist");
    }

    #[tokio::test]
    async fn test_list() {
        let server = FakeApiServer::new()
            .with_object(&node_state("worker-0"))
            .with_object(&node_state("worker-1"));

        let states = list_frr_node_states(&server.clients(), &[]).await.unwrap();
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|state| state.running_config().is_some()));
    }
}
