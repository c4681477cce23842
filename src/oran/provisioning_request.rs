// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provisioning requests instantiate a ClusterTemplate with caller parameters.
//!
//! Once installation starts most cluster instance parameters are immutable,
//! so pending edits can be checked locally before an update is sent.

use crate::builder::{list_builders, ConditionView, ResourceBuilder};
use crate::constants::cluster_instance::{ALLOWED_UPDATES, IGNORED_UPDATES, PARAMETERS_KEY};
use crate::constants::conditions::{
    PROVISIONING_REQUEST_CLUSTER_PROVISIONED, PROVISIONING_REQUEST_VALIDATED,
};
use crate::error::{InfraError, Result};
use crate::kubernetes::Clients;
use crate::oran::diff::{find_disallowed_updates, UpdateReport};
use crate::oran::schema::{disallow_unknown_fields, extract_sub_schema, validate_json_against_schema};
use crate::types::oran::{ProvisioningRequest, ProvisioningRequestSpec};
use crate::validation::cannot_be_empty;
use kube::api::ListParams;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

pub type ProvisioningRequestBuilder = ResourceBuilder<ProvisioningRequest>;

fn cluster_instance_parameters(request: &ProvisioningRequest) -> Value {
    request
        .spec
        .template_parameters
        .get(PARAMETERS_KEY)
        .cloned()
        .unwrap_or(Value::Null)
}

impl ProvisioningRequestBuilder {
    pub fn new(api_client: &Clients, name: &str, template_name: &str, template_version: &str) -> Self {
        debug!(
            "Initializing new ProvisioningRequest {} for template {} version {}",
            name, template_name, template_version
        );

        let definition = ProvisioningRequest::new(
            name,
            ProvisioningRequestSpec {
                template_name: template_name.to_string(),
                template_version: template_version.to_string(),
                template_parameters: Value::Object(Map::new()),
                ..Default::default()
            },
        );

        let kind = Self::kind();
        let builder = Self::from_definition(api_client, definition).require_key(name, None);
        if template_name.is_empty() {
            return builder.reject(cannot_be_empty(&kind, "templateName"));
        }
        if template_version.is_empty() {
            return builder.reject(cannot_be_empty(&kind, "templateVersion"));
        }

        builder
    }

    pub async fn pull(api_client: &Clients, name: &str) -> Result<Self> {
        Self::pull_named(api_client, name, None, |metadata| ProvisioningRequest {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    pub fn with_description(self, description: &str) -> Self {
        self.decorate(|request| {
            request.spec.description = Some(description.to_string());
            Ok(())
        })
    }

    /// Set one top level template parameter, keeping the others
    pub fn with_template_parameter(self, key: &str, value: Value) -> Self {
        let kind = Self::kind();
        debug!("Setting ProvisioningRequest template parameter {}", key);

        self.decorate(|request| {
            if key.is_empty() {
                return Err(cannot_be_empty(&kind, "templateParameter key"));
            }

            let parameters = &mut request.spec.template_parameters;
            if !parameters.is_object() {
                *parameters = Value::Object(Map::new());
            }
            if let Value::Object(map) = parameters {
                map.insert(key.to_string(), value);
            }
            Ok(())
        })
    }

    /// Replace all template parameters
    pub fn with_template_parameters(self, parameters: Value) -> Self {
        let kind = Self::kind();

        self.decorate(|request| {
            if !parameters.is_object() {
                return Err(format!("{} 'templateParameters' must be an object", kind));
            }

            request.spec.template_parameters = parameters;
            Ok(())
        })
    }

    /// Classify the differences between the stored and the desired cluster
    /// instance parameters
    #[instrument(skip(self))]
    pub async fn cluster_instance_update_report(&mut self) -> Result<UpdateReport> {
        self.validate()?;

        if !self.exists().await {
            return Err(InfraError::NonExistent {
                verb: "compare",
                kind: Self::kind().to_lowercase(),
            });
        }

        let (Some(object), Some(definition)) = (self.object.as_ref(), self.definition.as_ref()) else {
            return Err(InfraError::UndefinedDefinition(Self::kind()));
        };

        let report = find_disallowed_updates(
            &cluster_instance_parameters(object),
            &cluster_instance_parameters(definition),
            ALLOWED_UPDATES,
            IGNORED_UPDATES,
        );
        debug!(
            "ProvisioningRequest update report: {} disallowed, {} scaling",
            report.disallowed_updates.len(),
            report.scaling_nodes.len()
        );

        Ok(report)
    }

    /// Check the desired template parameters against a ClusterTemplate schema
    pub fn validate_template_parameters(&self, schema: &Value) -> Result<()> {
        self.validate()?;

        let parameters = self
            .definition
            .as_ref()
            .map(|request| request.spec.template_parameters.clone())
            .unwrap_or(Value::Null);

        validate_json_against_schema(schema, &parameters)
    }

    /// Check the cluster instance parameters against their part of a ClusterTemplate
    /// schema, rejecting fields the schema does not declare
    pub fn validate_cluster_instance_parameters(&self, schema: &Value) -> Result<()> {
        self.validate()?;

        let mut sub_schema = extract_sub_schema(schema, PARAMETERS_KEY)?;
        disallow_unknown_fields(&mut sub_schema);

        let parameters = self
            .definition
            .as_ref()
            .map(cluster_instance_parameters)
            .unwrap_or(Value::Null);
        if parameters.is_null() {
            return Err(InfraError::InvalidInput(format!(
                "{} not found in templateParameters",
                PARAMETERS_KEY
            )));
        }

        validate_json_against_schema(&sub_schema, &parameters)
    }

    /// Provisioning phase from the cached object
    pub fn provisioning_phase(&self) -> Option<&str> {
        self.object
            .as_ref()?
            .status
            .as_ref()?
            .provisioning_status
            .as_ref()?
            .provisioning_phase
            .as_deref()
    }

    pub async fn validated_condition(&self) -> Result<ConditionView> {
        self.get_condition(PROVISIONING_REQUEST_VALIDATED).await
    }

    pub async fn cluster_provisioned_condition(&self) -> Result<ConditionView> {
        self.get_condition(PROVISIONING_REQUEST_CLUSTER_PROVISIONED).await
    }
}

pub async fn list_provisioning_requests(
    api_client: &Clients,
    options: &[ListParams],
) -> Result<Vec<ProvisioningRequestBuilder>> {
    list_builders(api_client, None, options).await
}
