// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed CRUD facade over a kube client

use crate::config::Config;
use crate::error::{InfraError, Result};
use crate::kubernetes::scheme::SchemeRegistry;
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info, instrument};

/// A kind the facade can address. Cluster scoped kinds ignore the namespace.
pub trait ScopedResource:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn scoped_api(client: Client, namespace: Option<&str>) -> Api<Self>;
}

macro_rules! namespaced {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::kubernetes::ScopedResource for $kind {
                fn scoped_api(client: ::kube::Client, namespace: Option<&str>) -> ::kube::Api<Self> {
                    match namespace {
                        Some(namespace) => ::kube::Api::namespaced(client, namespace),
                        None => ::kube::Api::all(client),
                    }
                }
            }
        )+
    };
}

macro_rules! cluster_scoped {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::kubernetes::ScopedResource for $kind {
                fn scoped_api(client: ::kube::Client, _namespace: Option<&str>) -> ::kube::Api<Self> {
                    ::kube::Api::all(client)
                }
            }
        )+
    };
}

pub(crate) use cluster_scoped;
pub(crate) use namespaced;

/// Kubernetes client handle shared by every builder.
#[derive(Clone)]
pub struct Clients {
    client: Client,
    schemes: SchemeRegistry,
}

impl Clients {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            schemes: SchemeRegistry::new(),
        }
    }

    /// Create a client from an explicit kubeconfig file, or infer one from the environment
    #[instrument(skip(config))]
    pub async fn from_config(config: &Config) -> Result<Self> {
        let options = KubeConfigOptions {
            context: config.context.clone(),
            ..Default::default()
        };

        let mut client_config = match &config.kubeconfig {
            Some(path) => {
                info!("Creating Kubernetes client from kubeconfig {}", path.display());
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    InfraError::KubeconfigError(format!(
                        "Failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let kubeconfig: Kubeconfig = serde_yaml::from_str(&raw).map_err(|e| {
                    InfraError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
                })?;

                kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        InfraError::KubeconfigError(format!("Failed to create config: {}", e))
                    })?
            }
            None if config.context.is_some() => kube::Config::from_kubeconfig(&options)
                .await
                .map_err(|e| {
                    InfraError::KubeconfigError(format!("Failed to create config: {}", e))
                })?,
            None => kube::Config::infer().await.map_err(|e| {
                InfraError::KubeconfigError(format!("Failed to infer config: {}", e))
            })?,
        };

        if config.read_timeout.is_some() {
            client_config.read_timeout = config.read_timeout;
        }

        let client = Client::try_from(client_config).map_err(|e| {
            InfraError::KubeconfigError(format!("Failed to create client: {}", e))
        })?;

        Ok(Self::new(client))
    }

    pub fn kube_client(&self) -> &Client {
        &self.client
    }

    /// Register `K` so the facade accepts it. Safe to call repeatedly.
    pub fn attach_scheme<K: ScopedResource>(&self) -> Result<()> {
        self.schemes.attach::<K>().map(|_| ())
    }

    pub fn is_scheme_attached<K: ScopedResource>(&self) -> bool {
        self.schemes.contains::<K>()
    }

    fn api<K: ScopedResource>(&self, namespace: Option<&str>) -> Result<Api<K>> {
        if !self.schemes.contains::<K>() {
            return Err(InfraError::SchemeNotAttached(format!(
                "{}/{}",
                K::api_version(&()),
                K::kind(&())
            )));
        }

        Ok(K::scoped_api(self.client.clone(), namespace))
    }

    pub async fn get<K: ScopedResource>(&self, name: &str, namespace: Option<&str>) -> Result<K> {
        debug!("Getting {} {}", K::kind(&()), name);
        Ok(self.api::<K>(namespace)?.get(name).await?)
    }

    pub async fn create<K: ScopedResource>(&self, object: &K) -> Result<K> {
        let namespace = object.namespace();
        debug!("Creating {} {}", K::kind(&()), object.name_any());

        Ok(self
            .api::<K>(namespace.as_deref())?
            .create(&PostParams::default(), object)
            .await?)
    }

    pub async fn update<K: ScopedResource>(&self, object: &K) -> Result<K> {
        let namespace = object.namespace();
        debug!("Updating {} {}", K::kind(&()), object.name_any());

        Ok(self
            .api::<K>(namespace.as_deref())?
            .replace(&object.name_any(), &PostParams::default(), object)
            .await?)
    }

    pub async fn delete<K: ScopedResource>(&self, object: &K) -> Result<()> {
        let namespace = object.namespace();
        debug!("Deleting {} {}", K::kind(&()), object.name_any());

        self.api::<K>(namespace.as_deref())?
            .delete(&object.name_any(), &DeleteParams::default())
            .await?;

        Ok(())
    }

    /// List `K` in a namespace, or across all namespaces when `namespace` is `None`
    pub async fn list<K: ScopedResource>(
        &self,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> Result<Vec<K>> {
        debug!("Listing {} in {:?}", K::kind(&()), namespace);
        Ok(self.api::<K>(namespace)?.list(params).await?.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApiServer;
    use crate::types::metallb::{IPAddressPool, IPAddressPoolSpec};
    use kube::api::ObjectMeta;

    fn make_pool(name: &str) -> IPAddressPool {
        IPAddressPool {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("metallb-system".to_string()),
                ..Default::default()
            },
            spec: IPAddressPoolSpec {
                addresses: vec!["10.0.0.0/24".to_string()],
                ..Default::default()
            },
            status: None,
        }
    }

    #[tokio::test]
    async fn test_unattached_kind_is_refused() {
        let server = FakeApiServer::new();
        let clients = server.clients();

        let err = clients
            .get::<IPAddressPool>("pool", Some("metallb-system"))
            .await
            .unwrap_err();

        assert!(matches!(err, InfraError::SchemeNotAttached(_)));
        assert_eq!(server.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let server = FakeApiServer::new();
        let clients = server.clients();
        clients.attach_scheme::<IPAddressPool>().unwrap();

        let created = clients.create(&make_pool("pool")).await.unwrap();
        assert!(created.resource_version().is_some());

        let fetched: IPAddressPool = clients.get("pool", Some("metallb-system")).await.unwrap();
        assert_eq!(fetched.spec.addresses, vec!["10.0.0.0/24".to_string()]);

        clients.delete(&fetched).await.unwrap();

        let err = clients
            .get::<IPAddressPool>("pool", Some("metallb-system"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_all_namespaces() {
        let mut other = make_pool("other");
        other.metadata.namespace = Some("other-ns".to_string());

        let server = FakeApiServer::new()
            .with_object(&make_pool("pool"))
            .with_object(&other);
        let clients = server.clients();
        clients.attach_scheme::<IPAddressPool>().unwrap();

        let all: Vec<IPAddressPool> = clients.list(None, &ListParams::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped: Vec<IPAddressPool> = clients
            .list(Some("other-ns"), &ListParams::default())
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].name_any(), "other");
    }

    #[tokio::test]
    async fn test_from_config_missing_file() {
        let config = Config {
            kubeconfig: Some("/nonexistent/kubeconfig".into()),
            ..Default::default()
        };

        let err = Clients::from_config(&config).await.err().unwrap();
        assert!(matches!(err, InfraError::KubeconfigError(_)));
        assert!(err
            .to_string()
            .starts_with("Kubeconfig error: Failed to read kubeconfig /nonexistent/kubeconfig"));
    }
}
