// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builder for image based installs of single node clusters.

use crate::builder::{list_builders, ConditionView, ResourceBuilder};
use crate::constants::conditions::{
    IMAGE_CLUSTER_INSTALL_COMPLETED, IMAGE_CLUSTER_INSTALL_FAILED,
    IMAGE_CLUSTER_INSTALL_REQUIREMENTS_MET, IMAGE_CLUSTER_INSTALL_STOPPED,
};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::ibi::{BareMetalHostReference, ImageClusterInstall, Proxy};
use crate::types::LocalReference;
use crate::validation::{cannot_be_empty, invalid_cidr, invalid_ip, is_cidr, is_ip};
use kube::api::ListParams;
use tracing::debug;

pub type ImageClusterInstallBuilder = ResourceBuilder<ImageClusterInstall>;

impl ImageClusterInstallBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new ImageClusterInstall {} in namespace {}",
            name, namespace
        );

        let mut definition = ImageClusterInstall::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| ImageClusterInstall {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    fn with_reference(
        self,
        field: &'static str,
        name: &str,
        set: impl FnOnce(&mut ImageClusterInstall, LocalReference),
    ) -> Self {
        let kind = Self::kind();
        debug!("Setting ImageClusterInstall {} to {}", field, name);

        self.decorate(|ici| {
            if name.is_empty() {
                return Err(cannot_be_empty(&kind, field));
            }

            set(ici, LocalReference::new(name));
            Ok(())
        })
    }

    pub fn with_cluster_deployment(self, name: &str) -> Self {
        self.with_reference("clusterDeploymentRef", name, |ici, reference| {
            ici.spec.cluster_deployment_ref = Some(reference)
        })
    }

    pub fn with_image_set(self, name: &str) -> Self {
        self.with_reference("imageSetRef", name, |ici, reference| {
            ici.spec.image_set_ref = Some(reference)
        })
    }

    pub fn with_ca_bundle(self, config_map: &str) -> Self {
        self.with_reference("caBundleRef", config_map, |ici, reference| {
            ici.spec.ca_bundle_ref = Some(reference)
        })
    }

    /// Append a ConfigMap of manifests applied to the installed cluster
    pub fn with_extra_manifests(self, config_map: &str) -> Self {
        self.with_reference("extraManifestsRefs", config_map, |ici, reference| {
            ici.spec
                .extra_manifests_refs
                .get_or_insert_with(Vec::new)
                .push(reference)
        })
    }

    pub fn with_hostname(self, hostname: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|ici| {
            if hostname.is_empty() {
                return Err(cannot_be_empty(&kind, "hostname"));
            }

            ici.spec.hostname = Some(hostname.to_string());
            Ok(())
        })
    }

    pub fn with_ssh_key(self, ssh_key: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|ici| {
            if ssh_key.is_empty() {
                return Err(cannot_be_empty(&kind, "sshKey"));
            }

            ici.spec.ssh_key = Some(ssh_key.to_string());
            Ok(())
        })
    }

    pub fn with_bare_metal_host_ref(self, name: &str, namespace: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|ici| {
            if name.is_empty() {
                return Err(cannot_be_empty(&kind, "bareMetalHostRef.name"));
            }
            if namespace.is_empty() {
                return Err(cannot_be_empty(&kind, "bareMetalHostRef.namespace"));
            }

            ici.spec.bare_metal_host_ref = Some(BareMetalHostReference {
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
            Ok(())
        })
    }

    pub fn with_machine_network(self, cidr: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|ici| {
            if !is_cidr(cidr) {
                return Err(invalid_cidr(&kind, "machineNetwork", cidr));
            }

            ici.spec.machine_network = Some(cidr.to_string());
            Ok(())
        })
    }

    pub fn with_node_ip(self, address: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|ici| {
            if !is_ip(address) {
                return Err(invalid_ip(&kind, "nodeIP"));
            }

            ici.spec.node_ip = Some(address.to_string());
            Ok(())
        })
    }

    /// Cluster wide proxy; empty values are left unset
    pub fn with_proxy(self, http_proxy: &str, https_proxy: &str, no_proxy: &str) -> Self {
        let kind = Self::kind();
        let value = |v: &str| (!v.is_empty()).then(|| v.to_string());

        self.decorate(|ici| {
            if http_proxy.is_empty() && https_proxy.is_empty() {
                return Err(cannot_be_empty(&kind, "proxy"));
            }

            ici.spec.proxy = Some(Proxy {
                http_proxy: value(http_proxy),
                https_proxy: value(https_proxy),
                no_proxy: value(no_proxy),
            });
            Ok(())
        })
    }

    pub async fn completed_condition(&self) -> Result<ConditionView> {
        self.get_condition(IMAGE_CLUSTER_INSTALL_COMPLETED).await
    }

    pub async fn requirements_met_condition(&self) -> Result<ConditionView> {
        self.get_condition(IMAGE_CLUSTER_INSTALL_REQUIREMENTS_MET).await
    }

    pub async fn failed_condition(&self) -> Result<ConditionView> {
        self.get_condition(IMAGE_CLUSTER_INSTALL_FAILED).await
    }

    pub async fn stopped_condition(&self) -> Result<ConditionView> {
        self.get_condition(IMAGE_CLUSTER_INSTALL_STOPPED).await
    }
}

pub async fn list_image_cluster_installs(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<ImageClusterInstallBuilder>> {
    list_builders(api_client, namespace, options).await
}
