// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Accepted values for enumerated fields
pub mod modes {
    /// BareMetalHost automated cleaning
    pub const AUTOMATED_CLEANING_MODES: &[&str] = &["disabled", "metadata"];
    /// BGPPeer and FRR neighbor dynamic ASN detection
    pub const DYNAMIC_ASN_MODES: &[&str] = &["internal", "external"];
    /// MetalLB speaker BGP implementation
    pub const BGP_TYPES: &[&str] = &["native", "frr", "frr-k8s"];
    pub const LOG_LEVELS: &[&str] = &["all", "debug", "info", "warn", "error", "none"];
    /// Image digest mirror fallback to the source registry
    pub const MIRROR_SOURCE_POLICIES: &[&str] = &["AllowContactingSource", "NeverContactSource"];
}

/// BFD profile bounds
pub mod bfd {
    pub const MIN_INTERVAL_MS: u32 = 10;
    pub const MAX_INTERVAL_MS: u32 = 60000;
    pub const MIN_DETECT_MULTIPLIER: u32 = 2;
    pub const MAX_DETECT_MULTIPLIER: u32 = 255;
    pub const MIN_TTL: u32 = 1;
    pub const MAX_TTL: u32 = 254;
}

/// Cluster instance parameters of a provisioning request
pub mod cluster_instance {
    /// Key of the cluster instance parameters in the template parameters
    pub const PARAMETERS_KEY: &str = "clusterInstanceParameters";

    /// Fields that may change after installation has started
    pub const ALLOWED_UPDATES: &[&[&str]] = &[
        &["extraAnnotations"],
        &["extraLabels"],
        &["suppressedManifests"],
        &["pruneManifests"],
        &["nodes", "*", "extraAnnotations"],
        &["nodes", "*", "extraLabels"],
        &["nodes", "*", "suppressedManifests"],
        &["nodes", "*", "pruneManifests"],
    ];

    /// Hardware provisioning fields the hardware plugin fills in, never compared
    pub const IGNORED_UPDATES: &[&[&str]] = &[
        &["nodes", "*", "bmcAddress"],
        &["nodes", "*", "bmcCredentialsName"],
        &["nodes", "*", "bootMACAddress"],
        &["nodes", "*", "nodeNetwork", "interfaces", "*", "macAddress"],
    ];
}

/// Well known condition types
pub mod conditions {
    pub const IMAGE_CLUSTER_INSTALL_COMPLETED: &str = "Completed";
    pub const IMAGE_CLUSTER_INSTALL_REQUIREMENTS_MET: &str = "RequirementsMet";
    pub const IMAGE_CLUSTER_INSTALL_FAILED: &str = "Failed";
    pub const IMAGE_CLUSTER_INSTALL_STOPPED: &str = "Stopped";

    pub const CLUSTER_INSTANCE_VALIDATED: &str = "ClusterInstanceValidated";
    pub const CLUSTER_INSTANCE_RENDERED_TEMPLATES_APPLIED: &str = "RenderedTemplatesApplied";
    pub const CLUSTER_INSTANCE_PROVISIONED: &str = "Provisioned";

    pub const CLUSTER_TEMPLATE_VALIDATED: &str = "ClusterTemplateValidated";

    pub const PROVISIONING_REQUEST_VALIDATED: &str = "ProvisioningRequestValidated";
    pub const PROVISIONING_REQUEST_CLUSTER_PROVISIONED: &str = "ClusterProvisioned";
}
