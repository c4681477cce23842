// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::metallb::ip_address_pool::match_labels;
use crate::types::metallb::L2Advertisement;
use crate::validation::{cannot_be_empty_list, cannot_be_empty_map};
use kube::api::ListParams;
use std::collections::BTreeMap;
use tracing::debug;

pub type L2AdvertisementBuilder = ResourceBuilder<L2Advertisement>;

impl L2AdvertisementBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new L2Advertisement {} in namespace {}",
            name, namespace
        );

        let mut definition = L2Advertisement::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| L2Advertisement {
            metadata,
            spec: Default::default(),
        })
        .await
    }

    pub fn with_ip_address_pools(self, pools: Vec<String>) -> Self {
        let kind = Self::kind();
        debug!("Setting L2Advertisement ipAddressPools to {:?}", pools);

        self.decorate(|advertisement| {
            if pools.is_empty() {
                return Err(cannot_be_empty_list(&kind, "ipAddressPools"));
            }

            advertisement.spec.ip_address_pools = Some(pools);
            Ok(())
        })
    }

    pub fn with_ip_address_pools_selectors(self, selectors: Vec<BTreeMap<String, String>>) -> Self {
        let kind = Self::kind();

        self.decorate(|advertisement| {
            if selectors.is_empty() || selectors.iter().any(BTreeMap::is_empty) {
                return Err(cannot_be_empty_map(&kind, "ipAddressPoolSelectors"));
            }

            advertisement.spec.ip_address_pool_selectors =
                Some(selectors.into_iter().map(match_labels).collect());
            Ok(())
        })
    }

    pub fn with_node_selector(self, selectors: Vec<BTreeMap<String, String>>) -> Self {
        let kind = Self::kind();

        self.decorate(|advertisement| {
            if selectors.is_empty() || selectors.iter().any(BTreeMap::is_empty) {
                return Err(cannot_be_empty_map(&kind, "nodeSelectors"));
            }

            advertisement.spec.node_selectors = Some(selectors.into_iter().map(match_labels).collect());
            Ok(())
        })
    }

    /// Announce only from the named node interfaces
    pub fn with_interfaces(self, interfaces: Vec<String>) -> Self {
        let kind = Self::kind();
        debug!("Setting L2Advertisement interfaces to {:?}", interfaces);

        self.decorate(|advertisement| {
            if interfaces.is_empty() {
                return Err(cannot_be_empty_list(&kind, "interfaces"));
            }

            advertisement.spec.interfaces = Some(interfaces);
            Ok(())
        })
    }
}

pub async fn list_l2_advertisements(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<L2AdvertisementBuilder>> {
    list_builders(api_client, namespace, options).await
}
