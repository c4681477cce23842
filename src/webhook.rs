// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Admission webhook configurations. Both kinds are cluster scoped and keyed
//! by webhook name inside the configuration.

use crate::builder::{list_builders, object_meta, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::webhook::{
    MutatingWebhook, MutatingWebhookConfiguration, ValidatingWebhook,
    ValidatingWebhookConfiguration,
};
use crate::validation::cannot_be_empty;
use kube::api::ListParams;
use tracing::debug;

pub type ValidatingWebhookConfigurationBuilder = ResourceBuilder<ValidatingWebhookConfiguration>;
pub type MutatingWebhookConfigurationBuilder = ResourceBuilder<MutatingWebhookConfiguration>;

/// Insert `webhook`, replacing an entry with the same name
fn upsert<W>(webhooks: &mut Option<Vec<W>>, webhook: W, name_of: impl Fn(&W) -> &str) {
    let entries = webhooks.get_or_insert_with(Vec::new);
    let name = name_of(&webhook).to_string();

    match entries.iter_mut().find(|entry| name_of(entry) == name) {
        Some(entry) => *entry = webhook,
        None => entries.push(webhook),
    }
}

impl ValidatingWebhookConfigurationBuilder {
    pub fn new(api_client: &Clients, name: &str) -> Self {
        debug!("Initializing new ValidatingWebhookConfiguration {}", name);

        let definition = ValidatingWebhookConfiguration {
            metadata: object_meta(name, None),
            ..Default::default()
        };

        Self::from_definition(api_client, definition).require_key(name, None)
    }

    pub async fn pull(api_client: &Clients, name: &str) -> Result<Self> {
        Self::pull_named(api_client, name, None, |metadata| ValidatingWebhookConfiguration {
            metadata,
            ..Default::default()
        })
        .await
    }

    pub fn with_webhook(self, webhook: ValidatingWebhook) -> Self {
        let kind = Self::kind();
        debug!("Adding ValidatingWebhookConfiguration webhook {}", webhook.name);

        self.decorate(|configuration| {
            if webhook.name.is_empty() {
                return Err(cannot_be_empty(&kind, "webhook name"));
            }

            upsert(&mut configuration.webhooks, webhook, |w| w.name.as_str());
            Ok(())
        })
    }
}

impl MutatingWebhookConfigurationBuilder {
    pub fn new(api_client: &Clients, name: &str) -> Self {
        debug!("Initializing new MutatingWebhookConfiguration {}", name);

        let definition = MutatingWebhookConfiguration {
            metadata: object_meta(name, None),
            ..Default::default()
        };

        Self::from_definition(api_client, definition).require_key(name, None)
    }

    pub async fn pull(api_client: &Clients, name: &str) -> Result<Self> {
        Self::pull_named(api_client, name, None, |metadata| MutatingWebhookConfiguration {
            metadata,
            ..Default::default()
        })
        .await
    }

    pub fn with_webhook(self, webhook: MutatingWebhook) -> Self {
        let kind = Self::kind();
        debug!("Adding MutatingWebhookConfiguration webhook {}", webhook.name);

        self.decorate(|configuration| {
            if webhook.name.is_empty() {
                return Err(cannot_be_empty(&kind, "webhook name"));
            }

            upsert(&mut configuration.webhooks, webhook, |w| w.name.as_str());
            Ok(())
        })
    }
}

pub async fn list_validating_webhook_configurations(
    api_client: &Clients,
    options: &[ListParams],
) -> Result<Vec<ValidatingWebhookConfigurationBuilder>> {
    list_builders(api_client, None, options).await
}

pub async fn list_mutating_webhook_configurations(
    api_client: &Clients,
    options: &[ListParams],
) -> Result<Vec<MutatingWebhookConfigurationBuilder>> {
    list_builders(api_client, None, options).await
}
