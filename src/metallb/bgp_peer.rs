// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::constants::modes::DYNAMIC_ASN_MODES;
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::metallb::ip_address_pool::match_labels;
use crate::types::metallb::{BGPPeer, BGPPeerSpec};
use crate::validation::{
    cannot_be_empty, cannot_be_empty_map, format_duration, invalid_ip, is_ip, is_ipv4, is_one_of,
    is_valid_timer, not_one_of, out_of_range, MAX_BGP_PORT, MAX_TIMER_SECS, MIN_TIMER_SECS,
};
use kube::api::ListParams;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub type BgpPeerBuilder = ResourceBuilder<BGPPeer>;

impl BgpPeerBuilder {
    pub fn new(
        api_client: &Clients,
        name: &str,
        namespace: &str,
        peer_ip: &str,
        asn: u32,
        remote_asn: u32,
    ) -> Self {
        debug!(
            "Initializing new BGPPeer {} in namespace {} with peer {} asn {} remote asn {}",
            name, namespace, peer_ip, asn, remote_asn
        );

        let mut definition = BGPPeer::new(
            name,
            BGPPeerSpec {
                my_asn: asn,
                peer_asn: remote_asn,
                peer_address: peer_ip.to_string(),
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(namespace.to_string());

        let builder = Self::from_definition(api_client, definition).require_key(name, Some(namespace));
        if !is_ip(peer_ip) {
            return builder.reject(invalid_ip(&Self::kind(), "peerIP"));
        }

        builder
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| BGPPeer {
            metadata,
            spec: Default::default(),
        })
        .await
    }

    pub fn with_router_id(self, router_id: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer routerID to {}", router_id);

        self.decorate(|peer| {
            if !is_ipv4(router_id) {
                return Err(invalid_ip(&kind, "routerID"));
            }

            peer.spec.router_id = Some(router_id.to_string());
            Ok(())
        })
    }

    pub fn with_bfd_profile(self, profile: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer bfdProfile to {}", profile);

        self.decorate(|peer| {
            if profile.is_empty() {
                return Err(cannot_be_empty(&kind, "bfdProfile"));
            }

            peer.spec.bfd_profile = Some(profile.to_string());
            Ok(())
        })
    }

    pub fn with_src_address(self, address: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer sourceAddress to {}", address);

        self.decorate(|peer| {
            if !is_ip(address) {
                return Err(invalid_ip(&kind, "srcAddress"));
            }

            peer.spec.source_address = Some(address.to_string());
            Ok(())
        })
    }

    pub fn with_port(self, port: u16) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer port to {}", port);

        self.decorate(|peer| {
            if port > MAX_BGP_PORT {
                return Err(out_of_range(&kind, "port", 0, MAX_BGP_PORT));
            }

            peer.spec.peer_port = Some(port);
            Ok(())
        })
    }

    pub fn with_hold_time(self, hold_time: Duration) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer holdTime to {:?}", hold_time);

        self.decorate(|peer| {
            peer.spec.hold_time = Some(timer(&kind, "holdTime", hold_time)?);
            Ok(())
        })
    }

    pub fn with_keepalive_time(self, keepalive_time: Duration) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer keepaliveTime to {:?}", keepalive_time);

        self.decorate(|peer| {
            peer.spec.keepalive_time = Some(timer(&kind, "keepaliveTime", keepalive_time)?);
            Ok(())
        })
    }

    pub fn with_connect_time(self, connect_time: Duration) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer connectTime to {:?}", connect_time);

        self.decorate(|peer| {
            peer.spec.connect_time = Some(timer(&kind, "connectTime", connect_time)?);
            Ok(())
        })
    }

    pub fn with_ebgp_multi_hop(self, multi_hop: bool) -> Self {
        self.decorate(|peer| {
            peer.spec.ebgp_multi_hop = Some(multi_hop);
            Ok(())
        })
    }

    pub fn with_password(self, password: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|peer| {
            if password.is_empty() {
                return Err(cannot_be_empty(&kind, "password"));
            }

            peer.spec.password = Some(password.to_string());
            Ok(())
        })
    }

    pub fn with_vrf(self, vrf: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer vrf to {}", vrf);

        self.decorate(|peer| {
            if vrf.is_empty() {
                return Err(cannot_be_empty(&kind, "vrf"));
            }

            peer.spec.vrf = Some(vrf.to_string());
            Ok(())
        })
    }

    pub fn with_node_selector(self, selector: BTreeMap<String, String>) -> Self {
        let kind = Self::kind();
        debug!("Adding BGPPeer nodeSelector {:?}", selector);

        self.decorate(|peer| {
            if selector.is_empty() {
                return Err(cannot_be_empty_map(&kind, "nodeSelector"));
            }

            peer.spec
                .node_selectors
                .get_or_insert_with(Vec::new)
                .push(match_labels(selector));
            Ok(())
        })
    }

    /// Discover the peer ASN instead of pinning it; clears any configured peer ASN
    pub fn with_dynamic_asn(self, mode: &str) -> Self {
        let kind = Self::kind();
        debug!("Setting BGPPeer dynamicASN to {}", mode);

        self.decorate(|peer| {
            if !is_one_of(mode, DYNAMIC_ASN_MODES) {
                return Err(not_one_of(&kind, "dynamicASN", mode, DYNAMIC_ASN_MODES));
            }

            peer.spec.dynamic_asn = Some(mode.to_string());
            peer.spec.peer_asn = 0;
            Ok(())
        })
    }

    pub fn with_graceful_restart(self, enabled: bool) -> Self {
        self.decorate(|peer| {
            peer.spec.enable_graceful_restart = Some(enabled);
            Ok(())
        })
    }
}

pub(crate) fn timer(kind: &str, field: &str, duration: Duration) -> std::result::Result<String, String> {
    if !is_valid_timer(duration) {
        return Err(out_of_range(
            kind,
            field,
            format_duration(Duration::from_secs(MIN_TIMER_SECS)),
            format_duration(Duration::from_secs(MAX_TIMER_SECS)),
        ));
    }

    Ok(format_duration(duration))
}

pub async fn list_bgp_peers(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<BgpPeerBuilder>> {
    list_builders(api_client, namespace, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApiServer;

    fn builder(server: &FakeApiServer) -> BgpPeerBuilder {
        BgpPeerBuilder::new(&server.clients(), "peer", "metallb-system", "10.0.0.1", 64500, 64501)
    }

    #[tokio::test]
    async fn test_new() {
        let server = FakeApiServer::new();
        let peer = builder(&server);

        assert!(peer.error_msg().is_empty());
        let spec = peer.definition.unwrap().spec;
        assert_eq!(spec.my_asn, 64500);
        assert_eq!(spec.peer_asn, 64501);
        assert_eq!(spec.peer_address, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_invalid_peer_ip_poisons_builder() {
        let server = FakeApiServer::new();
        let mut peer = BgpPeerBuilder::new(
            &server.clients(),
            "peer",
            "metallb-system",
            "192.168.1.1000",
            64500,
            64501,
        );
        assert_eq!(
            peer.error_msg(),
            "BGPPeer 'peerIP' of the BGPPeer contains invalid ip address"
        );

        peer = peer.with_router_id("1.1.1.1");
        assert_eq!(
            peer.error_msg(),
            "BGPPeer 'peerIP' of the BGPPeer contains invalid ip address"
        );
        assert!(peer.definition.as_ref().unwrap().spec.router_id.is_none());

        assert!(peer.create().await.is_err());
        assert_eq!(server.request_count(), 0);
    }

    #[tokio::test]
    async fn test_with_router_id() {
        let server = FakeApiServer::new();
        let peer = builder(&server).with_router_id("1.1.1.1");
        assert_eq!(
            peer.definition.unwrap().spec.router_id.as_deref(),
            Some("1.1.1.1")
        );

        let peer = builder(&server).with_router_id("fd00::1");
        assert_eq!(
            peer.error_msg(),
            "BGPPeer 'routerID' of the BGPPeer contains invalid ip address"
        );
    }

    #[tokio::test]
    async fn test_with_port() {
        let server = FakeApiServer::new();
        let peer = builder(&server).with_port(179);
        assert_eq!(peer.definition.unwrap().spec.peer_port, Some(179));

        let peer = builder(&server).with_port(16385);
        assert_eq!(peer.error_msg(), "BGPPeer 'port' must be between 0 and 16384");
    }

    #[tokio::test]
    async fn test_with_timers() {
        let server = FakeApiServer::new();
        let peer = builder(&server)
            .with_hold_time(Duration::from_secs(90))
            .with_keepalive_time(Duration::from_secs(30))
            .with_connect_time(Duration::from_secs(10));

        let spec = peer.definition.unwrap().spec;
        assert_eq!(spec.hold_time.as_deref(), Some("90s"));
        assert_eq!(spec.keepalive_time.as_deref(), Some("30s"));
        assert_eq!(spec.connect_time.as_deref(), Some("10s"));

        let peer = builder(&server).with_hold_time(Duration::from_secs(70000));
        assert_eq!(
            peer.error_msg(),
            "BGPPeer 'holdTime' must be between 1s and 65535s"
        );
    }

    #[tokio::test]
    async fn test_with_dynamic_asn() {
        let server = FakeApiServer::new();
        let peer = builder(&server).with_dynamic_asn("external");

        let spec = peer.definition.unwrap().spec;
        assert_eq!(spec.dynamic_asn.as_deref(), Some("external"));
        assert_eq!(spec.peer_asn, 0);

        let payload = serde_json::to_value(&spec).unwrap();
        assert!(payload.get("peerASN").is_none());
        assert_eq!(payload["dynamicASN"], "external");

        let peer = builder(&server).with_dynamic_asn("auto");
        assert_eq!(
            peer.error_msg(),
            "BGPPeer 'dynamicASN' has invalid value auto, must be one of: internal, external"
        );
    }

    #[tokio::test]
    async fn test_with_node_selector() {
        let server = FakeApiServer::new();
        let selector = BTreeMap::from([("zone".to_string(), "east".to_string())]);
        let peer = builder(&server).with_node_selector(selector);
        assert_eq!(peer.definition.unwrap().spec.node_selectors.unwrap().len(), 1);

        let peer = builder(&server).with_node_selector(BTreeMap::new());
        assert_eq!(peer.error_msg(), "BGPPeer 'nodeSelector' cannot be empty map");
    }

    #[tokio::test]
    async fn test_string_decorators() {
        let server = FakeApiServer::new();
        let peer = builder(&server)
            .with_bfd_profile("fast")
            .with_src_address("10.0.0.2")
            .with_password("secret")
            .with_vrf("red")
            .with_ebgp_multi_hop(true)
            .with_graceful_restart(true);

        assert!(peer.error_msg().is_empty());
        let spec = peer.definition.unwrap().spec;
        assert_eq!(spec.bfd_profile.as_deref(), Some("fast"));
        assert_eq!(spec.source_address.as_deref(), Some("10.0.0.2"));
        assert_eq!(spec.vrf.as_deref(), Some("red"));
        assert_eq!(spec.ebgp_multi_hop, Some(true));

        let peer = builder(&server).with_vrf("");
        assert_eq!(peer.error_msg(), "BGPPeer 'vrf' cannot be empty");
    }

    #[tokio::test]
    async fn test_pull() {
        let server = FakeApiServer::new();
        builder(&server).create().await.unwrap();

        let peer = BgpPeerBuilder::pull(&server.clients(), "peer", "metallb-system")
            .await
            .unwrap();
        assert_eq!(peer.definition.unwrap().spec.peer_address, "10.0.0.1");
    }
}
