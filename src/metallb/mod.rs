// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builders for MetalLB and FRR-K8s resources.

pub mod bfd_profile;
pub mod bgp_advertisement;
pub mod bgp_peer;
pub mod frr_configuration;
pub mod frr_node_state;
pub mod ip_address_pool;
pub mod l2_advertisement;
pub mod operator;

pub use bfd_profile::{list_bfd_profiles, BfdProfileBuilder};
pub use bgp_advertisement::{list_bgp_advertisements, BgpAdvertisementBuilder};
pub use bgp_peer::{list_bgp_peers, BgpPeerBuilder};
pub use frr_configuration::{list_frr_configurations, FrrConfigurationBuilder};
pub use frr_node_state::{list_frr_node_states, FrrNodeStateBuilder};
pub use ip_address_pool::{list_ip_address_pools, IpAddressPoolBuilder};
pub use l2_advertisement::{list_l2_advertisements, L2AdvertisementBuilder};
pub use operator::{list_metallbs, MetalLbBuilder};
