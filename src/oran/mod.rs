// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! O-RAN O2IMS cluster templates and provisioning requests, with the parameter
//! diff and schema checks they rely on.

pub mod cluster_template;
pub mod diff;
pub mod provisioning_request;
pub mod schema;

pub use cluster_template::{list_cluster_templates, ClusterTemplateBuilder};
pub use diff::{diff, find_disallowed_updates, Change, ChangeType, UpdateReport};
pub use provisioning_request::{list_provisioning_requests, ProvisioningRequestBuilder};
pub use schema::{disallow_unknown_fields, extract_sub_schema, validate_json_against_schema};
