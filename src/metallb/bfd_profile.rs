// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::constants::bfd::{
    MAX_DETECT_MULTIPLIER, MAX_INTERVAL_MS, MAX_TTL, MIN_DETECT_MULTIPLIER, MIN_INTERVAL_MS,
    MIN_TTL,
};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::metallb::BFDProfile;
use crate::validation::{in_range, out_of_range};
use kube::api::ListParams;
use tracing::debug;

pub type BfdProfileBuilder = ResourceBuilder<BFDProfile>;

fn interval(kind: &str, field: &str, milliseconds: u32) -> std::result::Result<u32, String> {
    if !in_range(milliseconds, MIN_INTERVAL_MS, MAX_INTERVAL_MS) {
        return Err(out_of_range(kind, field, MIN_INTERVAL_MS, MAX_INTERVAL_MS));
    }

    Ok(milliseconds)
}

impl BfdProfileBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!("Initializing new BFDProfile {} in namespace {}", name, namespace);

        let mut definition = BFDProfile::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| BFDProfile {
            metadata,
            spec: Default::default(),
        })
        .await
    }

    pub fn with_rcv_interval(self, milliseconds: u32) -> Self {
        let kind = Self::kind();
        debug!("Setting BFDProfile receiveInterval to {}ms", milliseconds);

        self.decorate(|profile| {
            profile.spec.receive_interval = Some(interval(&kind, "receiveInterval", milliseconds)?);
            Ok(())
        })
    }

    pub fn with_transmit_interval(self, milliseconds: u32) -> Self {
        let kind = Self::kind();
        debug!("Setting BFDProfile transmitInterval to {}ms", milliseconds);

        self.decorate(|profile| {
            profile.spec.transmit_interval = Some(interval(&kind, "transmitInterval", milliseconds)?);
            Ok(())
        })
    }

    pub fn with_echo_interval(self, milliseconds: u32) -> Self {
        let kind = Self::kind();
        debug!("Setting BFDProfile echoInterval to {}ms", milliseconds);

        self.decorate(|profile| {
            profile.spec.echo_interval = Some(interval(&kind, "echoInterval", milliseconds)?);
            Ok(())
        })
    }

    pub fn with_detect_multiplier(self, multiplier: u32) -> Self {
        let kind = Self::kind();

        self.decorate(|profile| {
            if !in_range(multiplier, MIN_DETECT_MULTIPLIER, MAX_DETECT_MULTIPLIER) {
                return Err(out_of_range(
                    &kind,
                    "detectMultiplier",
                    MIN_DETECT_MULTIPLIER,
                    MAX_DETECT_MULTIPLIER,
                ));
            }

            profile.spec.detect_multiplier = Some(multiplier);
            Ok(())
        })
    }

    /// Minimum incoming TTL for multi hop sessions
    pub fn with_minimum_ttl(self, ttl: u32) -> Self {
        let kind = Self::kind();

        self.decorate(|profile| {
            if !in_range(ttl, MIN_TTL, MAX_TTL) {
                return Err(out_of_range(&kind, "minimumTtl", MIN_TTL, MAX_TTL));
            }

            profile.spec.minimum_ttl = Some(ttl);
            Ok(())
        })
    }

    pub fn with_echo_mode(self, enabled: bool) -> Self {
        self.decorate(|profile| {
            profile.spec.echo_mode = Some(enabled);
            Ok(())
        })
    }

    pub fn with_passive_mode(self, enabled: bool) -> Self {
        self.decorate(|profile| {
            profile.spec.passive_mode = Some(enabled);
            Ok(())
        })
    }
}

pub async fn list_bfd_profiles(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<BfdProfileBuilder>> {
    list_builders(api_client, namespace, options).await
}
