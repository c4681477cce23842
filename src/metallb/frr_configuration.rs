// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! FRR-K8s configuration: BGP routers, their neighbors and prefix filters.
//!
//! Neighbor decorators address a neighbor by router index and neighbor index,
//! both of which must point into lists already populated on the definition.

use crate::builder::{list_builders, ResourceBuilder};
use crate::constants::modes::DYNAMIC_ASN_MODES;
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::metallb::bgp_peer::timer;
use crate::metallb::ip_address_pool::match_labels;
use crate::types::frrk8s::{
    BFDProfile, FRRConfiguration, Neighbor, PrefixSelector, RawConfig, Router, ALLOW_MODE_ALL,
    ALLOW_MODE_FILTERED,
};
use crate::validation::{
    cannot_be_empty, cannot_be_empty_list, cannot_be_empty_map, invalid_cidr, invalid_ip, is_cidr,
    is_ip, is_ipv4, is_one_of, not_one_of, out_of_range, MAX_BGP_PORT,
};
use kube::api::ListParams;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub type FrrConfigurationBuilder = ResourceBuilder<FRRConfiguration>;

type Check<T> = std::result::Result<T, String>;

fn router_mut<'a>(
    kind: &str,
    config: &'a mut FRRConfiguration,
    router_index: usize,
) -> Check<&'a mut Router> {
    let defined = config.spec.bgp.routers.len();

    config.spec.bgp.routers.get_mut(router_index).ok_or_else(|| {
        format!(
            "{} router index {} is out of range, {} routers defined",
            kind, router_index, defined
        )
    })
}

fn neighbor_mut<'a>(
    kind: &str,
    config: &'a mut FRRConfiguration,
    router_index: usize,
    neighbor_index: usize,
) -> Check<&'a mut Neighbor> {
    let router = router_mut(kind, config, router_index)?;
    let defined = router.neighbors.len();

    router.neighbors.get_mut(neighbor_index).ok_or_else(|| {
        format!(
            "{} neighbor index {} is out of range, {} neighbors defined on router {}",
            kind, neighbor_index, defined, router_index
        )
    })
}

fn cidrs(kind: &str, field: &str, prefixes: &[String]) -> Check<()> {
    if prefixes.is_empty() {
        return Err(cannot_be_empty_list(kind, field));
    }

    match prefixes.iter().find(|prefix| !is_cidr(prefix)) {
        Some(prefix) => Err(invalid_cidr(kind, field, prefix)),
        None => Ok(()),
    }
}

impl FrrConfigurationBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new FRRConfiguration {} in namespace {}",
            name, namespace
        );

        let mut definition = FRRConfiguration::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| FRRConfiguration {
            metadata,
            spec: Default::default(),
        })
        .await
    }

    /// Append a BGP router; `router_id` must be an IPv4 address when given
    pub fn with_bgp_router(self, asn: u32, router_id: Option<&str>) -> Self {
        let kind = Self::kind();
        debug!("Adding FRRConfiguration router asn {} id {:?}", asn, router_id);

        self.decorate(|config| {
            if let Some(id) = router_id {
                if !is_ipv4(id) {
                    return Err(invalid_ip(&kind, "routerID"));
                }
            }

            config.spec.bgp.routers.push(Router {
                asn,
                id: router_id.map(str::to_string),
                ..Default::default()
            });
            Ok(())
        })
    }

    pub fn with_bgp_neighbor(self, router_index: usize, asn: u32, address: &str) -> Self {
        let kind = Self::kind();
        debug!(
            "Adding FRRConfiguration neighbor {} asn {} to router {}",
            address, asn, router_index
        );

        self.decorate(|config| {
            if !is_ip(address) {
                return Err(invalid_ip(&kind, "neighborAddress"));
            }

            router_mut(&kind, config, router_index)?.neighbors.push(Neighbor {
                asn,
                address: address.to_string(),
                ..Default::default()
            });
            Ok(())
        })
    }

    pub fn with_router_prefixes(self, router_index: usize, prefixes: Vec<String>) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            cidrs(&kind, "prefixes", &prefixes)?;

            router_mut(&kind, config, router_index)?.prefixes = Some(prefixes);
            Ok(())
        })
    }

    pub fn with_to_receive_mode_all(self, router_index: usize, neighbor_index: usize) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            let neighbor = neighbor_mut(&kind, config, router_index, neighbor_index)?;
            neighbor.to_receive.allowed.mode = Some(ALLOW_MODE_ALL.to_string());
            Ok(())
        })
    }

    pub fn with_to_advertise_mode_all(self, router_index: usize, neighbor_index: usize) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            let neighbor = neighbor_mut(&kind, config, router_index, neighbor_index)?;
            neighbor.to_advertise.allowed.mode = Some(ALLOW_MODE_ALL.to_string());
            Ok(())
        })
    }

    /// Accept only the given prefixes from the neighbor
    pub fn with_to_receive_prefixes(
        self,
        router_index: usize,
        neighbor_index: usize,
        prefixes: Vec<String>,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            cidrs(&kind, "toReceive", &prefixes)?;

            let neighbor = neighbor_mut(&kind, config, router_index, neighbor_index)?;
            neighbor.to_receive.allowed.mode = Some(ALLOW_MODE_FILTERED.to_string());
            neighbor.to_receive.allowed.prefixes = Some(
                prefixes
                    .into_iter()
                    .map(|prefix| PrefixSelector {
                        prefix,
                        ..Default::default()
                    })
                    .collect(),
            );
            Ok(())
        })
    }

    /// Advertise only the given prefixes to the neighbor
    pub fn with_to_advertise_prefixes(
        self,
        router_index: usize,
        neighbor_index: usize,
        prefixes: Vec<String>,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            cidrs(&kind, "toAdvertise", &prefixes)?;

            let neighbor = neighbor_mut(&kind, config, router_index, neighbor_index)?;
            neighbor.to_advertise.allowed.mode = Some(ALLOW_MODE_FILTERED.to_string());
            neighbor.to_advertise.allowed.prefixes = Some(prefixes);
            Ok(())
        })
    }

    pub fn with_neighbor_port(self, router_index: usize, neighbor_index: usize, port: u16) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            if port > MAX_BGP_PORT {
                return Err(out_of_range(&kind, "port", 0, MAX_BGP_PORT));
            }

            neighbor_mut(&kind, config, router_index, neighbor_index)?.port = Some(port);
            Ok(())
        })
    }

    pub fn with_neighbor_hold_time(
        self,
        router_index: usize,
        neighbor_index: usize,
        hold_time: Duration,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            let hold_time = timer(&kind, "holdTime", hold_time)?;
            neighbor_mut(&kind, config, router_index, neighbor_index)?.hold_time = Some(hold_time);
            Ok(())
        })
    }

    pub fn with_neighbor_keepalive_time(
        self,
        router_index: usize,
        neighbor_index: usize,
        keepalive_time: Duration,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            let keepalive_time = timer(&kind, "keepaliveTime", keepalive_time)?;
            neighbor_mut(&kind, config, router_index, neighbor_index)?.keepalive_time =
                Some(keepalive_time);
            Ok(())
        })
    }

    pub fn with_neighbor_ebgp_multi_hop(
        self,
        router_index: usize,
        neighbor_index: usize,
        multi_hop: bool,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            neighbor_mut(&kind, config, router_index, neighbor_index)?.ebgp_multi_hop = Some(multi_hop);
            Ok(())
        })
    }

    /// Detect the neighbor ASN; clears the configured one
    pub fn with_neighbor_dynamic_asn(
        self,
        router_index: usize,
        neighbor_index: usize,
        mode: &str,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            if !is_one_of(mode, DYNAMIC_ASN_MODES) {
                return Err(not_one_of(&kind, "dynamicASN", mode, DYNAMIC_ASN_MODES));
            }

            let neighbor = neighbor_mut(&kind, config, router_index, neighbor_index)?;
            neighbor.dynamic_asn = Some(mode.to_string());
            neighbor.asn = 0;
            Ok(())
        })
    }

    pub fn with_neighbor_bfd_profile(
        self,
        router_index: usize,
        neighbor_index: usize,
        profile: &str,
    ) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            if profile.is_empty() {
                return Err(cannot_be_empty(&kind, "bfdProfile"));
            }

            neighbor_mut(&kind, config, router_index, neighbor_index)?.bfd_profile =
                Some(profile.to_string());
            Ok(())
        })
    }

    pub fn with_bfd_profile(self, profile: BFDProfile) -> Self {
        let kind = Self::kind();
        debug!("Adding FRRConfiguration bfd profile {}", profile.name);

        self.decorate(|config| {
            if profile.name.is_empty() {
                return Err(cannot_be_empty(&kind, "bfdProfile"));
            }

            config
                .spec
                .bgp
                .bfd_profiles
                .get_or_insert_with(Vec::new)
                .push(profile);
            Ok(())
        })
    }

    /// Raw FRR configuration appended to the rendered one
    pub fn with_raw_config(self, raw: &str, priority: Option<i32>) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            if raw.is_empty() {
                return Err(cannot_be_empty(&kind, "rawConfig"));
            }

            config.spec.raw = Some(RawConfig {
                config: raw.to_string(),
                priority,
            });
            Ok(())
        })
    }

    pub fn with_node_selector(self, selector: BTreeMap<String, String>) -> Self {
        let kind = Self::kind();

        self.decorate(|config| {
            if selector.is_empty() {
                return Err(cannot_be_empty_map(&kind, "nodeSelector"));
            }

            config.spec.node_selector = Some(match_labels(selector));
            Ok(())
        })
    }
}

pub async fn list_frr_configurations(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<FrrConfigurationBuilder>> {
    list_builders(api_client, namespace, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApiServer;

    fn builder(server: &FakeApiServer) -> FrrConfigurationBuilder {
        FrrConfigurationBuilder::new(&server.clients(), "frr", "openshift-frr-k8s")
    }

    fn with_neighbor(server: &FakeApiServer) -> FrrConfigurationBuilder {
        builder(server)
            .with_bgp_router(64500, Some("10.0.0.1"))
            .with_bgp_neighbor(0, 64501, "10.0.0.2")
    }

    #[tokio::test]
    async fn test_router_and_neighbor() {
        let server = FakeApiServer::new();
        let config = with_neighbor(&server)
            .with_router_prefixes(0, vec!["192.168.10.0/24".to_string()])
            .with_neighbor_port(0, 0, 179)
            .with_neighbor_hold_time(0, 0, Duration::from_secs(90))
            .with_neighbor_keepalive_time(0, 0, Duration::from_secs(30))
            .with_neighbor_ebgp_multi_hop(0, 0, true)
            .with_neighbor_bfd_profile(0, 0, "fast");

        assert!(config.error_msg().is_empty());
        let spec = config.definition.unwrap().spec;
        let router = &spec.bgp.routers[0];
        assert_eq!(router.asn, 64500);
        assert_eq!(router.id.as_deref(), Some("10.0.0.1"));
        assert_eq!(router.prefixes.as_ref().unwrap().len(), 1);

        let neighbor = &router.neighbors[0];
        assert_eq!(neighbor.address, "10.0.0.2");
        assert_eq!(neighbor.port, Some(179));
        assert_eq!(neighbor.hold_time.as_deref(), Some("90s"));
        assert_eq!(neighbor.bfd_profile.as_deref(), Some("fast"));
    }

    #[tokio::test]
    async fn test_router_index_out_of_range() {
        let server = FakeApiServer::new();
        let config = builder(&server).with_bgp_neighbor(0, 64501, "10.0.0.2");

        assert_eq!(
            config.error_msg(),
            "FRRConfiguration router index 0 is out of range, 0 routers defined"
        );
    }

    #[tokio::test]
    async fn test_neighbor_index_out_of_range() {
        let server = FakeApiServer::new();
        let config = with_neighbor(&server).with_to_receive_mode_all(0, 1);

        assert_eq!(
            config.error_msg(),
            "FRRConfiguration neighbor index 1 is out of range, 1 neighbors defined on router 0"
        );
    }

    #[tokio::test]
    async fn test_prefix_filters() {
        let server = FakeApiServer::new();
        let config = with_neighbor(&server)
            .with_to_receive_prefixes(0, 0, vec!["10.10.0.0/16".to_string()])
            .with_to_advertise_mode_all(0, 0);

        let neighbor = config.definition.unwrap().spec.bgp.routers[0].neighbors[0].clone();
        assert_eq!(neighbor.to_receive.allowed.mode.as_deref(), Some(ALLOW_MODE_FILTERED));
        assert_eq!(
            neighbor.to_receive.allowed.prefixes.unwrap()[0].prefix,
            "10.10.0.0/16"
        );
        assert_eq!(neighbor.to_advertise.allowed.mode.as_deref(), Some(ALLOW_MODE_ALL));

        let config = with_neighbor(&server).with_to_advertise_prefixes(0, 0, vec!["10.10.0.0".to_string()]);
        assert_eq!(
            config.error_msg(),
            "FRRConfiguration 'toAdvertise' contains invalid CIDR 10.10.0.0"
        );
    }

    #[tokio::test]
    async fn test_invalid_neighbor_address() {
        let server = FakeApiServer::new();
        let config = builder(&server)
            .with_bgp_router(64500, None)
            .with_bgp_neighbor(0, 64501, "not-an-ip");

        assert_eq!(
            config.error_msg(),
            "FRRConfiguration 'neighborAddress' of the FRRConfiguration contains invalid ip address"
        );
    }

    #[tokio::test]
    async fn test_dynamic_asn_clears_asn() {
        let server = FakeApiServer::new();
        let config = with_neighbor(&server).with_neighbor_dynamic_asn(0, 0, "internal");

        let neighbor = config.definition.unwrap().spec.bgp.routers[0].neighbors[0].clone();
        assert_eq!(neighbor.asn, 0);
        assert_eq!(neighbor.dynamic_asn.as_deref(), Some("internal"));
    }

    #[tokio::test]
    async fn test_bfd_raw_and_node_selector() {
        let server = FakeApiServer::new();
        let config = builder(&server)
            .with_bfd_profile(BFDProfile {
                name: "fast".to_string(),
                detect_multiplier: Some(3),
                ..Default::default()
            })
            .with_raw_config("router bgp 64500", Some(10))
            .with_node_selector(BTreeMap::from([(
                "kubernetes.io/hostname".to_string(),
                "worker-0".to_string(),
            )]));

        assert!(config.error_msg().is_empty());
        let spec = config.definition.unwrap().spec;
        assert_eq!(spec.bgp.bfd_profiles.unwrap()[0].name, "fast");
        assert_eq!(spec.raw.unwrap().priority, Some(10));
        assert!(spec.node_selector.is_some());

        let config = builder(&server).with_raw_config("", None);
        assert_eq!(config.error_msg(), "FRRConfiguration 'rawConfig' cannot be empty");
    }

    #[tokio::test]
    async fn test_create_and_pull() {
        let server = FakeApiServer::new();
        with_neighbor(&server).create().await.unwrap();

        let config = FrrConfigurationBuilder::pull(&server.clients(), "frr", "openshift-frr-k8s")
            .await
            .unwrap();
        assert_eq!(
            config.definition.unwrap().spec.bgp.routers[0].neighbors[0].asn,
            64501
        );
    }
}
