// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builder for SiteConfig cluster instances.

use crate::builder::{list_builders, ConditionView, ResourceBuilder};
use crate::constants::conditions::{
    CLUSTER_INSTANCE_PROVISIONED, CLUSTER_INSTANCE_RENDERED_TEMPLATES_APPLIED,
    CLUSTER_INSTANCE_VALIDATED,
};
use crate::constants::modes::AUTOMATED_CLEANING_MODES;
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::siteconfig::{
    ClusterInstance, ClusterInstanceSpec, MachineNetworkEntry, NodeSpec, TemplateRef,
};
use crate::types::LocalReference;
use crate::validation::{
    cannot_be_empty, cannot_be_empty_map, invalid_cidr, invalid_ip, is_cidr, is_ip, is_one_of,
    not_one_of,
};
use kube::api::ListParams;
use std::collections::BTreeMap;
use tracing::debug;

pub type ClusterInstanceBuilder = ResourceBuilder<ClusterInstance>;

impl ClusterInstanceBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str, cluster_name: &str) -> Self {
        debug!(
            "Initializing new ClusterInstance {} in namespace {} for cluster {}",
            name, namespace, cluster_name
        );

        let mut definition = ClusterInstance::new(
            name,
            ClusterInstanceSpec {
                cluster_name: cluster_name.to_string(),
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(namespace.to_string());

        let builder = Self::from_definition(api_client, definition).require_key(name, Some(namespace));
        if cluster_name.is_empty() {
            return builder.reject(cannot_be_empty(&Self::kind(), "clusterName"));
        }

        builder
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| ClusterInstance {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    fn with_string(
        self,
        field: &'static str,
        value: &str,
        set: impl FnOnce(&mut ClusterInstanceSpec, String),
    ) -> Self {
        let kind = Self::kind();
        debug!("Setting ClusterInstance {} to {}", field, value);

        self.decorate(|instance| {
            if value.is_empty() {
                return Err(cannot_be_empty(&kind, field));
            }

            set(&mut instance.spec, value.to_string());
            Ok(())
        })
    }

    pub fn with_cluster_image_set(self, image_set: &str) -> Self {
        self.with_string("clusterImageSetNameRef", image_set, |spec, value| {
            spec.cluster_image_set_name_ref = value
        })
    }

    pub fn with_base_domain(self, base_domain: &str) -> Self {
        self.with_string("baseDomain", base_domain, |spec, value| spec.base_domain = value)
    }

    pub fn with_pull_secret(self, secret: &str) -> Self {
        self.with_string("pullSecretRef", secret, |spec, value| {
            spec.pull_secret_ref = Some(LocalReference { name: value })
        })
    }

    pub fn with_ssh_public_key(self, key: &str) -> Self {
        self.with_string("sshPublicKey", key, |spec, value| spec.ssh_public_key = Some(value))
    }

    pub fn with_template_ref(self, name: &str, namespace: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if name.is_empty() {
                return Err(cannot_be_empty(&kind, "templateRef.name"));
            }
            if namespace.is_empty() {
                return Err(cannot_be_empty(&kind, "templateRef.namespace"));
            }

            instance.spec.template_refs.push(TemplateRef {
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
            Ok(())
        })
    }

    /// Labels added to rendered manifests of `manifest_kind`, e.g. `ManagedCluster`
    pub fn with_extra_labels(self, manifest_kind: &str, labels: BTreeMap<String, String>) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if manifest_kind.is_empty() {
                return Err(cannot_be_empty(&kind, "extraLabels key"));
            }
            if labels.is_empty() {
                return Err(cannot_be_empty_map(&kind, "extraLabels"));
            }

            instance
                .spec
                .extra_labels
                .get_or_insert_with(BTreeMap::new)
                .entry(manifest_kind.to_string())
                .or_default()
                .extend(labels);
            Ok(())
        })
    }

    pub fn with_extra_annotations(
        self,
        manifest_kind: &str,
        annotations: BTreeMap<String, String>,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if manifest_kind.is_empty() {
                return Err(cannot_be_empty(&kind, "extraAnnotations key"));
            }
            if annotations.is_empty() {
                return Err(cannot_be_empty_map(&kind, "extraAnnotations"));
            }

            instance
                .spec
                .extra_annotations
                .get_or_insert_with(BTreeMap::new)
                .entry(manifest_kind.to_string())
                .or_default()
                .extend(annotations);
            Ok(())
        })
    }

    pub fn with_node(self, node: NodeSpec) -> Self {
        let kind = Self::kind();
        debug!("Adding ClusterInstance node {}", node.host_name);

        self.decorate(|instance| {
            if node.host_name.is_empty() {
                return Err(cannot_be_empty(&kind, "hostName"));
            }

            instance.spec.nodes.push(node);
            Ok(())
        })
    }

    pub fn with_node_automated_cleaning_mode(self, host_name: &str, mode: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if !is_one_of(mode, AUTOMATED_CLEANING_MODES) {
                return Err(not_one_of(
                    &kind,
                    "automatedCleaningMode",
                    mode,
                    AUTOMATED_CLEANING_MODES,
                ));
            }

            let node = instance
                .spec
                .nodes
                .iter_mut()
                .find(|node| node.host_name == host_name)
                .ok_or_else(|| format!("{} has no node {}", kind, host_name))?;
            node.automated_cleaning_mode = Some(mode.to_string());
            Ok(())
        })
    }

    pub fn with_machine_network(self, cidr: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if !is_cidr(cidr) {
                return Err(invalid_cidr(&kind, "machineNetwork", cidr));
            }

            instance
                .spec
                .machine_networks
                .get_or_insert_with(Vec::new)
                .push(MachineNetworkEntry {
                    cidr: cidr.to_string(),
                });
            Ok(())
        })
    }

    pub fn with_api_vip(self, vip: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if !is_ip(vip) {
                return Err(invalid_ip(&kind, "apiVIP"));
            }

            instance.spec.api_vips.get_or_insert_with(Vec::new).push(vip.to_string());
            Ok(())
        })
    }

    pub fn with_ingress_vip(self, vip: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|instance| {
            if !is_ip(vip) {
                return Err(invalid_ip(&kind, "ingressVIP"));
            }

            instance
                .spec
                .ingress_vips
                .get_or_insert_with(Vec::new)
                .push(vip.to_string());
            Ok(())
        })
    }

    pub async fn provisioned_condition(&self) -> Result<ConditionView> {
        self.get_condition(CLUSTER_INSTANCE_PROVISIONED).await
    }

    pub async fn validated_condition(&self) -> Result<ConditionView> {
        self.get_condition(CLUSTER_INSTANCE_VALIDATED).await
    }

    pub async fn rendered_templates_applied_condition(&self) -> Result<ConditionView> {
        self.get_condition(CLUSTER_INSTANCE_RENDERED_TEMPLATES_APPLIED).await
    }
}

pub async fn list_cluster_instances(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<ClusterInstanceBuilder>> {
    list_builders(api_client, namespace, options).await
}
