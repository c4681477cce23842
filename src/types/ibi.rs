// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::namespaced;
use crate::types::{status_conditions, Condition, LocalReference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Image based installation of a single node cluster from a seed image
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "extensions.hive.openshift.io",
    version = "v1alpha1",
    kind = "ImageClusterInstall",
    plural = "imageclusterinstalls"
)]
#[kube(namespaced)]
#[kube(status = "ImageClusterInstallStatus")]
#[serde(rename_all = "camelCase")]
pub struct ImageClusterInstallSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_set_ref: Option<LocalReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_deployment_ref: Option<LocalReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_bundle_ref: Option<LocalReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_manifests_refs: Option<Vec<LocalReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bare_metal_host_ref: Option<BareMetalHostReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_network: Option<String>,
    #[serde(rename = "nodeIP", skip_serializing_if = "Option::is_none")]
    pub node_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Proxy>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct BareMetalHostReference {
    pub name: String,
    pub namespace: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_proxy: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageClusterInstallStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_time: Option<String>,
}

namespaced!(ImageClusterInstall);
status_conditions!(ImageClusterInstall);
