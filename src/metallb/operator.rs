// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The MetalLB operator resource, which deploys the controller and speakers.

use crate::builder::{list_builders, ResourceBuilder};
use crate::constants::modes::{BGP_TYPES, LOG_LEVELS};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::metallb::{MetalLB, MetalLBSpec};
use crate::validation::{cannot_be_empty_map, is_one_of, not_one_of};
use k8s_openapi::api::core::v1::Toleration;
use kube::api::ListParams;
use std::collections::BTreeMap;
use tracing::debug;

pub type MetalLbBuilder = ResourceBuilder<MetalLB>;

impl MetalLbBuilder {
    pub fn new(
        api_client: &Clients,
        name: &str,
        namespace: &str,
        node_selector: BTreeMap<String, String>,
    ) -> Self {
        debug!(
            "Initializing new MetalLB {} in namespace {} with node selector {:?}",
            name, namespace, node_selector
        );

        let empty = node_selector.is_empty();
        let mut definition = MetalLB::new(
            name,
            MetalLBSpec {
                node_selector: Some(node_selector),
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(namespace.to_string());

        let builder = Self::from_definition(api_client, definition).require_key(name, Some(namespace));
        if empty {
            return builder.reject(cannot_be_empty_map(&Self::kind(), "nodeSelector"));
        }

        builder
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| MetalLB {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    pub fn with_speaker_node_selector(self, selector: BTreeMap<String, String>) -> Self {
        let kind = Self::kind();
        debug!("Setting MetalLB speakerNodeSelector to {:?}", selector);

        self.decorate(|metallb| {
            if selector.is_empty() {
                return Err(cannot_be_empty_map(&kind, "speakerNodeSelector"));
            }

            metallb.spec.speaker_node_selector = Some(selector);
            Ok(())
        })
    }

    pub fn with_speaker_tolerations(self, tolerations: Vec<Toleration>) -> Self {
        debug!("Adding {} MetalLB speaker tolerations", tolerations.len());

        self.decorate(|metallb| {
            metallb
                .spec
                .speaker_tolerations
                .get_or_insert_with(Vec::new)
                .extend(tolerations);
            Ok(())
        })
    }

    pub fn with_bgp_type(self, bgp_type: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting MetalLB bgpType to {}", bgp_type);

        self.decorate(|metallb| {
            if !is_one_of(bgp_type, BGP_TYPES) {
                return Err(not_one_of(&kind, "bgpType", bgp_type, BGP_TYPES));
            }

            metallb.spec.bgp_type = Some(bgp_type.to_string());
            Ok(())
        })
    }

    pub fn with_log_level(self, level: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|metallb| {
            if !is_one_of(level, LOG_LEVELS) {
                return Err(not_one_of(&kind, "logLevel", level, LOG_LEVELS));
            }

            metallb.spec.log_level = Some(level.to_string());
            Ok(())
        })
    }
}

pub async fn list_metallbs(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<MetalLbBuilder>> {
    list_builders(api_client, namespace, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::metallb::MetalLBStatus;
    use crate::types::Condition;
    use crate::test_utils::FakeApiServer;

    fn worker_selector() -> BTreeMap<String, String> {
        BTreeMap::from([("node-role.kubernetes.io/worker".to_string(), String::new())])
    }

    #[tokio::test]
    async fn test_new_requires_node_selector() {
        let server = FakeApiServer::new();
        let metallb = MetalLbBuilder::new(&server.clients(), "metallb", "metallb-system", BTreeMap::new());

        assert_eq!(metallb.error_msg(), "MetalLB 'nodeSelector' cannot be empty map");
    }

    #[tokio::test]
    async fn test_decorators() {
        let server = FakeApiServer::new();
        let metallb =
            MetalLbBuilder::new(&server.clients(), "metallb", "metallb-system", worker_selector())
                .with_bgp_type("frr-k8s")
                .with_log_level("debug")
                .with_speaker_node_selector(worker_selector())
                .with_speaker_tolerations(vec![Toleration {
                    key: Some("node-role.kubernetes.io/master".to_string()),
                    operator: Some("Exists".to_string()),
                    effect: Some("NoSchedule".to_string()),
                    ..Default::default()
                }]);

        assert!(metallb.error_msg().is_empty());
        let spec = metallb.definition.unwrap().spec;
        assert_eq!(spec.bgp_type.as_deref(), Some("frr-k8s"));
        assert_eq!(spec.log_level.as_deref(), Some("debug"));
        assert_eq!(spec.speaker_tolerations.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_bgp_type() {
        let server = FakeApiServer::new();
        let metallb =
            MetalLbBuilder::new(&server.clients(), "metallb", "metallb-system", worker_selector())
                .with_bgp_type("bird")
                .with_log_level("verbose");

        assert_eq!(
            metallb.error_msg(),
            "MetalLB 'bgpType' has invalid value bird, must be one of: native, frr, frr-k8s"
        );
    }

    #[tokio::test]
    async fn test_available_condition() {
        let mut object = MetalLB::new("metallb", Default::default());
        object.metadata.namespace = Some("metallb-system".to_string());
        object.status = Some(MetalLBStatus {
            conditions: Some(vec![Condition {
                condition_type: "Available".to_string(),
                status: "True".to_string(),
                ..Default::default()
            }]),
        });
        let server = FakeApiServer::new().with_object(&object);

        let metallb = MetalLbBuilder::pull(&server.clients(), "metallb", "metallb-system")
            .await
            .unwrap();
        assert!(metallb.get_condition("Available").await.unwrap().is_true());
    }
}
