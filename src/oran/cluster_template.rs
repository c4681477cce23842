// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ConditionView, ResourceBuilder};
use crate::constants::conditions::CLUSTER_TEMPLATE_VALIDATED;
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::oran::{ClusterTemplate, ClusterTemplateSpec};
use crate::validation::cannot_be_empty;
use kube::api::ListParams;
use serde_json::Value;
use tracing::debug;

pub type ClusterTemplateBuilder = ResourceBuilder<ClusterTemplate>;

impl ClusterTemplateBuilder {
    pub fn new(
        api_client: &Clients,
        name: &str,
        namespace: &str,
        template_name: &str,
        version: &str,
    ) -> Self {
        debug!(
            "Initializing new ClusterTemplate {} in namespace {} for template {} version {}",
            name, namespace, template_name, version
        );

        let mut definition = ClusterTemplate::new(
            name,
            ClusterTemplateSpec {
                name: template_name.to_string(),
                version: version.to_string(),
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(namespace.to_string());

        let kind = Self::kind();
        let builder = Self::from_definition(api_client, definition).require_key(name, Some(namespace));
        if template_name.is_empty() {
            return builder.reject(cannot_be_empty(&kind, "templateName"));
        }
        if version.is_empty() {
            return builder.reject(cannot_be_empty(&kind, "version"));
        }

        builder
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| ClusterTemplate {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    pub fn with_description(self, description: &str) -> Self {
        self.decorate(|template| {
            template.spec.description = Some(description.to_string());
            Ok(())
        })
    }

    /// ConfigMap with the default cluster instance parameters
    pub fn with_cluster_instance_defaults(self, config_map: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|template| {
            if config_map.is_empty() {
                return Err(cannot_be_empty(&kind, "clusterInstanceDefaults"));
            }

            template.spec.templates.cluster_instance_defaults = Some(config_map.to_string());
            Ok(())
        })
    }

    /// ConfigMap with the default policy template parameters
    pub fn with_policy_template_defaults(self, config_map: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|template| {
            if config_map.is_empty() {
                return Err(cannot_be_empty(&kind, "policyTemplateDefaults"));
            }

            template.spec.templates.policy_template_defaults = Some(config_map.to_string());
            Ok(())
        })
    }

    pub fn with_hardware_template(self, hardware_template: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|template| {
            if hardware_template.is_empty() {
                return Err(cannot_be_empty(&kind, "hwTemplate"));
            }

            template.spec.templates.hardware_template = Some(hardware_template.to_string());
            Ok(())
        })
    }

    /// OpenAPI v3 schema that provisioning request parameters must satisfy
    pub fn with_template_parameter_schema(self, schema: Value) -> Self {
        let kind = Self::kind();

        self.decorate(|template| {
            if !schema.is_object() {
                return Err(format!("{} 'templateParameterSchema' must be an object", kind));
            }

            template.spec.template_parameter_schema = Some(schema);
            Ok(())
        })
    }

    pub async fn validated_condition(&self) -> Result<ConditionView> {
        self.get_condition(CLUSTER_TEMPLATE_VALIDATED).await
    }
}

pub async fn list_cluster_templates(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<ClusterTemplateBuilder>> {
    list_builders(api_client, namespace, options).await
}
