// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Admission webhook configurations come from k8s-openapi; only their scope is declared here.

use crate::kubernetes::cluster_scoped;

pub use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhook, MutatingWebhookConfiguration, ValidatingWebhook,
    ValidatingWebhookConfiguration,
};

cluster_scoped!(ValidatingWebhookConfiguration, MutatingWebhookConfiguration);
