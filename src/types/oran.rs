// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::{cluster_scoped, namespaced};
use crate::types::{status_conditions, Condition};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "clcm.openshift.io",
    version = "v1alpha1",
    kind = "ClusterTemplate",
    plural = "clustertemplates"
)]
#[kube(namespaced)]
#[kube(status = "ClusterTemplateStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateSpec {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "templateID", skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub templates: Templates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_parameter_schema: Option<Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Templates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_instance_defaults: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_template_defaults: Option<String>,
    #[serde(rename = "hwTemplate", skip_serializing_if = "Option::is_none")]
    pub hardware_template: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTemplateStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "clcm.openshift.io",
    version = "v1alpha1",
    kind = "ProvisioningRequest",
    plural = "provisioningrequests"
)]
#[kube(status = "ProvisioningRequestStatus")]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequestSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template_name: String,
    pub template_version: String,
    #[serde(default)]
    pub template_parameters: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequestStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_status: Option<ProvisioningStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_details: Option<String>,
}

namespaced!(ClusterTemplate);
cluster_scoped!(ProvisioningRequest);
status_conditions!(ClusterTemplate, ProvisioningRequest);
