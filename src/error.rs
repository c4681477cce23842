// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("can not redefine the undefined {0}")]
    UndefinedDefinition(String),

    /// Deferred error recorded by a constructor or a `with_*` decorator.
    #[error("{0}")]
    InvalidBuilder(String),

    #[error("cannot {verb} non-existent {kind}")]
    NonExistent { verb: &'static str, kind: String },

    #[error("{kind} object {key} does not exist")]
    NotFound { kind: String, key: String },

    #[error("cannot find {condition} condition in {kind} status")]
    ConditionNotFound { condition: String, kind: String },

    #[error("more than one ListOptions was passed")]
    TooManyListOptions,

    #[error("{0} scheme is not attached to the client")]
    SchemeNotAttached(String),

    #[error("Kubeconfig error: {0}")]
    KubeconfigError(String),

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InfraError {
    /// True when the API server answered with a definitive 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, InfraError::KubeError(kube::Error::Api(err)) if err.code == 404)
    }
}

pub type Result<T> = std::result::Result<T, InfraError>;
