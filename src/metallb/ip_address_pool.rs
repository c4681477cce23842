// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::metallb::{IPAddressPool, IPAddressPoolSpec, ServiceAllocation};
use crate::validation::{cannot_be_empty_list, cannot_be_empty_map};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ListParams;
use std::collections::BTreeMap;
use tracing::debug;

/// Builder for MetalLB address pools
pub type IpAddressPoolBuilder = ResourceBuilder<IPAddressPool>;

impl IpAddressPoolBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str, addresses: Vec<String>) -> Self {
        debug!(
            "Initializing new IPAddressPool {} in namespace {} with addresses {:?}",
            name, namespace, addresses
        );

        let empty = addresses.is_empty();
        let mut definition = IPAddressPool::new(
            name,
            IPAddressPoolSpec {
                addresses,
                ..Default::default()
            },
        );
        definition.metadata.namespace = Some(namespace.to_string());

        let builder = Self::from_definition(api_client, definition).require_key(name, Some(namespace));
        if empty {
            return builder.reject(cannot_be_empty_list(&Self::kind(), "addrPool"));
        }

        builder
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| IPAddressPool {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    pub fn with_auto_assign(self, auto_assign: bool) -> Self {
        debug!("Setting IPAddressPool autoAssign to {}", auto_assign);

        self.decorate(|pool| {
            pool.spec.auto_assign = Some(auto_assign);
            Ok(())
        })
    }

    pub fn with_avoid_buggy_ips(self, avoid: bool) -> Self {
        debug!("Setting IPAddressPool avoidBuggyIPs to {}", avoid);

        self.decorate(|pool| {
            pool.spec.avoid_buggy_ips = Some(avoid);
            Ok(())
        })
    }

    /// Restrict the pool to services in the given namespaces
    pub fn with_service_allocation(
        self,
        priority: i32,
        namespaces: Vec<String>,
        namespace_selectors: Vec<BTreeMap<String, String>>,
        service_selectors: Vec<BTreeMap<String, String>>,
    ) -> Self {
        let kind = Self::kind();
        debug!(
            "Setting IPAddressPool service allocation priority {} namespaces {:?}",
            priority, namespaces
        );

        self.decorate(|pool| {
            if namespaces.is_empty() {
                return Err(cannot_be_empty_list(&kind, "namespaces"));
            }
            if namespace_selectors.iter().any(BTreeMap::is_empty)
                || service_selectors.iter().any(BTreeMap::is_empty)
            {
                return Err(cannot_be_empty_map(&kind, "selector"));
            }

            pool.spec.service_allocation = Some(ServiceAllocation {
                priority: Some(priority),
                namespaces: Some(namespaces),
                namespace_selectors: non_empty(namespace_selectors.into_iter().map(match_labels).collect()),
                service_selectors: non_empty(service_selectors.into_iter().map(match_labels).collect()),
            });
            Ok(())
        })
    }
}

pub(crate) fn match_labels(labels: BTreeMap<String, String>) -> LabelSelector {
    LabelSelector {
        match_labels: Some(labels),
        ..Default::default()
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

pub async fn list_ip_address_pools(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<IpAddressPoolBuilder>> {
    list_builders(api_client, namespace, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApiServer;

    fn addresses() -> Vec<String> {
        vec!["1.1.1.1".to_string(), "1.1.1.20".to_string()]
    }

    #[tokio::test]
    async fn test_create_then_exists() {
        let server = FakeApiServer::new();
        let mut pool =
            IpAddressPoolBuilder::new(&server.clients(), "default-pool", "test-namespace", addresses());
        assert_eq!(pool.error_msg(), "");

        pool.create().await.unwrap();
        assert!(pool.exists().await);
        assert_eq!(pool.object.as_ref().unwrap().spec.addresses, addresses());
    }

    #[tokio::test]
    async fn test_empty_addresses_poison_builder() {
        let server = FakeApiServer::new();
        let mut pool =
            IpAddressPoolBuilder::new(&server.clients(), "default-pool", "test-namespace", vec![]);
        assert_eq!(pool.error_msg(), "IPAddressPool 'addrPool' cannot be empty list");

        let err = pool.create().await.err().unwrap();
        assert_eq!(err.to_string(), "IPAddressPool 'addrPool' cannot be empty list");
        assert_eq!(server.request_count(), 0);
    }

    #[tokio::test]
    async fn test_new_empty_key() {
        let server = FakeApiServer::new();

        let pool = IpAddressPoolBuilder::new(&server.clients(), "", "test-namespace", addresses());
        assert_eq!(pool.error_msg(), "IPAddressPool 'name' cannot be empty");

        let pool = IpAddressPoolBuilder::new(&server.clients(), "pool", "", vec![]);
        assert_eq!(pool.error_msg(), "IPAddressPool 'nsname' cannot be empty");
    }

    #[tokio::test]
    async fn test_new_attaches_scheme() {
        let server = FakeApiServer::new();
        let clients = server.clients();
        assert!(!clients.is_scheme_attached::<IPAddressPool>());

        let _ = IpAddressPoolBuilder::new(&clients, "pool", "test-namespace", addresses());
        assert!(clients.is_scheme_attached::<IPAddressPool>());
    }

    #[tokio::test]
    async fn test_with_service_allocation() {
        let server = FakeApiServer::new();
        let selector = BTreeMap::from([("app".to_string(), "web".to_string())]);

        let pool = IpAddressPoolBuilder::new(&server.clients(), "pool", "test-namespace", addresses())
            .with_service_allocation(10, vec!["web".to_string()], vec![], vec![selector]);
        let allocation = pool.definition.unwrap().spec.service_allocation.unwrap();
        assert_eq!(allocation.priority, Some(10));
        assert!(allocation.namespace_selectors.is_none());
        assert_eq!(allocation.service_selectors.unwrap().len(), 1);

        let pool = IpAddressPoolBuilder::new(&server.clients(), "pool", "test-namespace", addresses())
            .with_service_allocation(10, vec![], vec![], vec![]);
        assert_eq!(pool.error_msg(), "IPAddressPool 'namespaces' cannot be empty list");
    }

    #[tokio::test]
    async fn test_with_flags() {
        let server = FakeApiServer::new();
        let pool = IpAddressPoolBuilder::new(&server.clients(), "pool", "test-namespace", addresses())
            .with_auto_assign(false)
            .with_avoid_buggy_ips(true);

        let spec = pool.definition.unwrap().spec;
        assert_eq!(spec.auto_assign, Some(false));
        assert_eq!(spec.avoid_buggy_ips, Some(true));
    }

    #[tokio::test]
    async fn test_list_ip_address_pools() {
        let server = FakeApiServer::new();
        let clients = server.clients();
        IpAddressPoolBuilder::new(&clients, "a", "test-namespace", addresses())
            .create()
            .await
            .unwrap();
        IpAddressPoolBuilder::new(&clients, "b", "other", addresses())
            .create()
            .await
            .unwrap();

        let pools = list_ip_address_pools(&clients, Some("test-namespace"), &[])
            .await
            .unwrap();
        assert_eq!(pools.len(), 1);

        let pools = list_ip_address_pools(&clients, None, &[]).await.unwrap();
        assert_eq!(pools.len(), 2);
    }
}
