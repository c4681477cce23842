// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::kmm::PreflightValidationOCP;
use crate::validation::cannot_be_empty;
use kube::api::ListParams;
use tracing::debug;

/// Checks that every Module in the cluster can be built for an upgrade target release
pub type PreflightValidationOcpBuilder = ResourceBuilder<PreflightValidationOCP>;

impl PreflightValidationOcpBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new PreflightValidationOCP {} in namespace {}",
            name, namespace
        );

        let mut definition = PreflightValidationOCP::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| PreflightValidationOCP {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    pub fn with_release_image(self, image: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting PreflightValidationOCP releaseImage to {}", image);

        self.decorate(|preflight| {
            if image.is_empty() {
                return Err(cannot_be_empty(&kind, "releaseImage"));
            }

            preflight.spec.release_image = image.to_string();
            Ok(())
        })
    }

    pub fn with_push_built_image(self, push: bool) -> Self {
        self.decorate(|preflight| {
            preflight.spec.push_built_image = Some(push);
            Ok(())
        })
    }

    /// Verification status the operator reported for a module, from the cached object
    pub fn module_verification_status(&self, module: &str, namespace: &str) -> Option<&str> {
        self.object
            .as_ref()?
            .status
            .as_ref()?
            .modules
            .as_ref()?
            .iter()
            .find(|status| status.name == module && status.namespace == namespace)
            .map(|status| status.verification_status.as_str())
    }
}

pub async fn list_preflight_validations(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<PreflightValidationOcpBuilder>> {
    list_builders(api_client, namespace, options).await
}
