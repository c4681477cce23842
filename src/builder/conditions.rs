// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::ResourceBuilder;
use crate::error::{InfraError, Result};
use crate::kubernetes::ScopedResource;
use crate::types::{Condition, HasConditions};
use tracing::debug;

/// Condition fields a caller usually asserts on
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionView {
    pub condition_type: String,
    pub status: String,
    pub reason: String,
    pub message: String,
}

impl From<&Condition> for ConditionView {
    fn from(condition: &Condition) -> Self {
        Self {
            condition_type: condition.condition_type.clone(),
            status: condition.status.clone(),
            reason: condition.reason.clone(),
            message: condition.message.clone(),
        }
    }
}

impl ConditionView {
    pub fn is_true(&self) -> bool {
        self.status == "True"
    }
}

impl<K: ScopedResource + HasConditions> ResourceBuilder<K> {
    /// Read the object fresh and return its condition of the given type
    pub async fn get_condition(&self, condition_type: &str) -> Result<ConditionView> {
        self.validate()?;

        let object = match self.get().await {
            Ok(object) => object,
            Err(err) if err.is_not_found() => {
                return Err(InfraError::NonExistent {
                    verb: "get condition from",
                    kind: Self::kind().to_lowercase(),
                })
            }
            Err(err) => return Err(err),
        };

        debug!("Looking up {} condition on {}", condition_type, Self::kind());

        object
            .conditions()
            .iter()
            .find(|condition| condition.condition_type == condition_type)
            .map(ConditionView::from)
            .ok_or_else(|| InfraError::ConditionNotFound {
                condition: condition_type.to_string(),
                kind: Self::kind(),
            })
    }
}
