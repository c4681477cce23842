// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::metallb::ip_address_pool::match_labels;
use crate::types::metallb::BGPAdvertisement;
use crate::validation::{cannot_be_empty_list, cannot_be_empty_map, in_range, out_of_range};
use kube::api::ListParams;
use std::collections::BTreeMap;
use tracing::debug;

pub type BgpAdvertisementBuilder = ResourceBuilder<BGPAdvertisement>;

impl BgpAdvertisementBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new BGPAdvertisement {} in namespace {}",
            name, namespace
        );

        let mut definition = BGPAdvertisement::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| BGPAdvertisement {
            metadata,
            spec: Default::default(),
        })
        .await
    }

    pub fn with_aggregation_length4(self, length: i32) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPAdvertisement aggregationLength to {}", length);

        self.decorate(|advertisement| {
            if !in_range(length, 0, 32) {
                return Err(out_of_range(&kind, "aggregationLength", 0, 32));
            }

            advertisement.spec.aggregation_length = Some(length);
            Ok(())
        })
    }

    pub fn with_aggregation_length6(self, length: i32) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPAdvertisement aggregationLengthV6 to {}", length);

        self.decorate(|advertisement| {
            if !in_range(length, 0, 128) {
                return Err(out_of_range(&kind, "aggregationLengthV6", 0, 128));
            }

            advertisement.spec.aggregation_length_v6 = Some(length);
            Ok(())
        })
    }

    pub fn with_local_pref(self, local_pref: u32) -> Self {
        self.decorate(|advertisement| {
            advertisement.spec.local_pref = Some(local_pref);
            Ok(())
        })
    }

    pub fn with_communities(self, communities: Vec<String>) -> Self {
        let kind = Self::kind();

        self.decorate(|advertisement| {
            if communities.is_empty() {
                return Err(cannot_be_empty_list(&kind, "communities"));
            }

            advertisement.spec.communities = Some(communities);
            Ok(())
        })
    }

    pub fn with_ip_address_pools(self, pools: Vec<String>) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPAdvertisement ipAddressPools to {:?}", pools);

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

    /// Advertise only to the named BGPPeers
    pub fn with_peers(self, peers: Vec<String>) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPAdvertisement peers to {:?}", peers);

        self.decorate(|advertisement| {
            if peers.is_empty() {
                return Err(cannot_be_empty_list(&kind, "peers"));
            }

            advertisement.spec.peers = Some(peers);
            Ok(())
        })
    }
}

pub async fn list_bgp_advertisements(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<BgpAdvertisementBuilder>> {
    list_builders(api_client, namespace, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApiServer;

    fn builder(server: &FakeApiServer) -> BgpAdvertisementBuilder {
        BgpAdvertisementBuilder::new(&server.clients(), "advertisement", "metallb-system")
    }

    #[tokio::test]
    async fn test_aggregation_lengths() {
        let server = FakeApiServer::new();
        let advertisement = builder(&server)
            .with_aggregation_length4(24)
            .with_aggregation_length6(64);
        let spec = advertisement.definition.unwrap().spec;
        assert_eq!(spec.aggregation_length, Some(24));
        assert_eq!(spec.aggregation_length_v6, Some(64));

        let advertisement = builder(&server).with_aggregation_length4(33);
        assert_eq!(
            advertisement.error_msg(),
            "BGPAdvertisement 'aggregationLength' must be between 0 and 32"
        );

        let advertisement = builder(&server).with_aggregation_length6(-1);
        assert_eq!(
            advertisement.error_msg(),
            "BGPAdvertisement 'aggregationLengthV6' must be between 0 and 128"
        );
    }

    #[tokio::test]
    async fn test_collections_must_not_be_empty() {
        let server = FakeApiServer::new();

        let advertisement = builder(&server).with_ip_address_pools(vec![]);
        assert_eq!(
            advertisement.error_msg(),
            "BGPAdvertisement 'ipAddressPools' cannot be empty list"
        );

        let advertisement = builder(&server).with_peers(vec![]);
        assert_eq!(advertisement.error_msg(), "BGPAdvertisement 'peers' cannot be empty list");

        let advertisement = builder(&server).with_node_selector(vec![BTreeMap::new()]);
        assert_eq!(
            advertisement.error_msg(),
            "BGPAdvertisement 'nodeSelectors' cannot be empty map"
        );
    }

    #[tokio::test]
    async fn test_with_selectors_and_pools() {
        let server = FakeApiServer::new();
        let selector = BTreeMap::from([("pool".to_string(), "blue".to_string())]);
        let advertisement = builder(&server)
            .with_ip_address_pools(vec!["pool".to_string()])
            .with_ip_address_pools_selectors(vec![selector.clone()])
            .with_node_selector(vec![selector])
            .with_communities(vec!["65535:65282".to_string()])
            .with_local_pref(100)
            .with_peers(vec!["peer".to_string()]);

        assert!(advertisement.error_msg().is_empty());
        let spec = advertisement.definition.unwrap().spec;
        assert_eq!(spec.ip_address_pools.unwrap(), vec!["pool"]);
        assert_eq!(spec.local_pref, Some(100));
        assert_eq!(
            spec.ip_address_pool_selectors.unwrap()[0]
                .match_labels
                .as_ref()
                .unwrap()
                .get("pool"),
            Some(&"blue".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let server = FakeApiServer::new();
        let mut advertisement = builder(&server).with_local_pref(50);

        advertisement.create().await.unwrap();
        assert!(advertisement.exists().await);

        advertisement.delete().await.unwrap();
        assert!(advertisement.object.is_none());
        assert!(!advertisement.exists().await);
    }
}
