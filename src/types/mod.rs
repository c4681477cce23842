// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types for the wrapped kinds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod frrk8s;
pub mod ibi;
pub mod kmm;
pub mod metallb;
pub mod mirror;
pub mod oran;
pub mod siteconfig;
pub mod webhook;

/// A status condition as reported by the controllers of these kinds
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// Reference to an object in the same namespace
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct LocalReference {
    pub name: String,
}

impl LocalReference {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Kinds whose status carries a list of conditions
pub trait HasConditions {
    fn conditions(&self) -> &[Condition];
}

macro_rules! status_conditions {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::types::HasConditions for $kind {
                fn conditions(&self) -> &[$crate::types::Condition] {
                    self.status
                        .as_ref()
                        .and_then(|s| s.conditions.as_deref())
                        .unwrap_or_default()
                }
            }
        )+
    };
}

pub(crate) use status_conditions;
