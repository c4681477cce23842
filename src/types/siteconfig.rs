// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::namespaced;
use crate::types::{status_conditions, Condition, LocalReference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extra labels or annotations keyed by the kind of the rendered manifest
pub type ManifestMetadata = BTreeMap<String, BTreeMap<String, String>>;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "siteconfig.open-cluster-management.io",
    version = "v1alpha1",
    kind = "ClusterInstance",
    plural = "clusterinstances"
)]
#[kube(namespaced)]
#[kube(status = "ClusterInstanceStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClusterInstanceSpec {
    pub cluster_name: String,
    #[serde(default)]
    pub cluster_image_set_name_ref: String,
    #[serde(default)]
    pub base_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_secret_ref: Option<LocalReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_public_key: Option<String>,
    #[serde(default)]
    pub template_refs: Vec<TemplateRef>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_labels: Option<ManifestMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_annotations: Option<ManifestMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_networks: Option<Vec<MachineNetworkEntry>>,
    #[serde(rename = "apiVIPs", skip_serializing_if = "Option::is_none")]
    pub api_vips: Option<Vec<String>>,
    #[serde(rename = "ingressVIPs", skip_serializing_if = "Option::is_none")]
    pub ingress_vips: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct TemplateRef {
    pub name: String,
    pub namespace: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct MachineNetworkEntry {
    pub cidr: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub host_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmc_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmc_credentials_name: Option<LocalReference>,
    #[serde(rename = "bootMACAddress", skip_serializing_if = "Option::is_none")]
    pub boot_mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automated_cleaning_mode: Option<String>,
    #[serde(default)]
    pub template_refs: Vec<TemplateRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_labels: Option<ManifestMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_annotations: Option<ManifestMetadata>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInstanceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

namespaced!(ClusterInstance);
status_conditions!(ClusterInstance);
