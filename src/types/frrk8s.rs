// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::{cluster_scoped, namespaced};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Prefix filter mode accepting every prefix
pub const ALLOW_MODE_ALL: &str = "all";
/// Prefix filter mode accepting only the listed prefixes
pub const ALLOW_MODE_FILTERED: &str = "filtered";

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "frrk8s.metallb.io",
    version = "v1beta1",
    kind = "FRRConfiguration",
    plural = "frrconfigurations"
)]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct FRRConfigurationSpec {
    #[serde(default)]
    pub bgp: BGPConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<LabelSelector>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BGPConfig {
    #[serde(default)]
    pub routers: Vec<Router>,
    #[serde(rename = "bfdProfiles", skip_serializing_if = "Option::is_none")]
    pub bfd_profiles: Option<Vec<BFDProfile>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    pub asn: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrf: Option<String>,
    #[serde(default)]
    pub neighbors: Vec<Neighbor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Neighbor {
    #[serde(default)]
    pub asn: u32,
    #[serde(rename = "dynamicASN", skip_serializing_if = "Option::is_none")]
    pub dynamic_asn: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bfd_profile: Option<String>,
    #[serde(rename = "ebgpMultiHop", skip_serializing_if = "Option::is_none")]
    pub ebgp_multi_hop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keepalive_time: Option<String>,
    #[serde(default)]
    pub to_advertise: Advertise,
    #[serde(default)]
    pub to_receive: Receive,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Advertise {
    #[serde(default)]
    pub allowed: AllowedOutPrefixes,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct AllowedOutPrefixes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Receive {
    #[serde(default)]
    pub allowed: AllowedInPrefixes,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct AllowedInPrefixes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<PrefixSelector>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct PrefixSelector {
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub le: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ge: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BFDProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_multiplier: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_ttl: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(rename = "rawConfig")]
    pub config: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Per-node state published by the frr-k8s daemon. Has no desired state.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "frrk8s.metallb.io",
    version = "v1beta1",
    kind = "FRRNodeState",
    plural = "frrnodestates"
)]
#[kube(status = "FRRNodeStateStatus")]
pub struct FRRNodeStateSpec {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FRRNodeStateStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reload_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_conversion_result: Option<String>,
}

namespaced!(FRRConfiguration);
cluster_scoped!(FRRNodeState);
