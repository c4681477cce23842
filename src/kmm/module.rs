// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::kmm::{
    DevicePluginContainerSpec, DevicePluginSpec, Module, ModuleLoaderContainerSpec,
    ModuleLoaderSpec,
};
use crate::types::LocalReference;
use crate::validation::{cannot_be_empty, cannot_be_empty_list, cannot_be_empty_map};
use k8s_openapi::api::core::v1::Toleration;
use kube::api::ListParams;
use std::collections::BTreeMap;
use tracing::debug;

pub type ModuleBuilder = ResourceBuilder<Module>;

impl ModuleBuilder {
    pub fn new(api_client: &Clients, name: &str, namespace: &str) -> Self {
        debug!("Initializing new Module {} in namespace {}", name, namespace);

        let mut definition = Module::new(name, Default::default());
        definition.metadata.namespace = Some(namespace.to_string());

        Self::from_definition(api_client, definition).require_key(name, Some(namespace))
    }

    pub async fn pull(api_client: &Clients, name: &str, namespace: &str) -> Result<Self> {
        Self::pull_named(api_client, name, Some(namespace), |metadata| Module {
            metadata,
            spec: Default::default(),
            status: None,
        })
        .await
    }

    pub fn with_node_selector(self, selector: BTreeMap<String, String>) -> Self {
        let kind = Self::kind();
        debug!("Setting Module selector to {:?}", selector);

        self.decorate(|module| {
            if selector.is_empty() {
                return Err(cannot_be_empty_map(&kind, "selector"));
            }

            module.spec.selector = selector;
            Ok(())
        })
    }

    pub fn with_module_loader_container(self, container: ModuleLoaderContainerSpec) -> Self {
        let kind = Self::kind();
        debug!(
            "Setting Module loader container for {}",
            container.modprobe.module_name
        );

        self.decorate(|module| {
            if container.modprobe.module_name.is_empty() {
                return Err(cannot_be_empty(&kind, "moduleName"));
            }

            match module.spec.module_loader.as_mut() {
                Some(loader) => loader.container = container,
                None => {
                    module.spec.module_loader = Some(ModuleLoaderSpec {
                        container,
                        service_account_name: None,
                    })
                }
            }
            Ok(())
        })
    }

    pub fn with_image_repo_secret(self, secret: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|module| {
            if secret.is_empty() {
                return Err(cannot_be_empty(&kind, "imageRepoSecret"));
            }

            module.spec.image_repo_secret = Some(LocalReference::new(secret));
            Ok(())
        })
    }

    /// Service account of the module loader; the loader container must be set first
    pub fn with_load_service_account(self, service_account: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|module| {
            if service_account.is_empty() {
                return Err(cannot_be_empty(&kind, "loadServiceAccount"));
            }

            let loader = module
                .spec
                .module_loader
                .as_mut()
                .ok_or_else(|| format!("{} moduleLoader container must be set before its service account", kind))?;
            loader.service_account_name = Some(service_account.to_string());
            Ok(())
        })
    }

    pub fn with_device_plugin_container(self, container: DevicePluginContainerSpec) -> Self {
        let kind = Self::kind();

        self.decorate(|module| {
            if container.image.is_empty() {
                return Err(cannot_be_empty(&kind, "devicePluginImage"));
            }

            match module.spec.device_plugin.as_mut() {
                Some(plugin) => plugin.container = container,
                None => {
                    module.spec.device_plugin = Some(DevicePluginSpec {
                        container,
                        service_account_name: None,
                    })
                }
            }
            Ok(())
        })
    }

    /// Service account of the device plugin; the plugin container must be set first
    pub fn with_device_plugin_service_account(self, service_account: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|module| {
            if service_account.is_empty() {
                return Err(cannot_be_empty(&kind, "devicePluginServiceAccount"));
            }

            let plugin = module
                .spec
                .device_plugin
                .as_mut()
                .ok_or_else(|| format!("{} devicePlugin container must be set before its service account", kind))?;
            plugin.service_account_name = Some(service_account.to_string());
            Ok(())
        })
    }

    pub fn with_tolerations(self, tolerations: Vec<Toleration>) -> Self {
        let kind = Self::kind();

        self.decorate(|module| {
            if tolerations.is_empty() {
                return Err(cannot_be_empty_list(&kind, "tolerations"));
            }

            module
                .spec
                .tolerations
                .get_or_insert_with(Vec::new)
                .extend(tolerations);
            Ok(())
        })
    }

    /// Whether the module loader runs on every node matching the selector
    pub fn is_module_loaded(&self) -> bool {
        self.object
            .as_ref()
            .and_then(|module| module.status.as_ref())
            .and_then(|status| status.module_loader.as_ref())
            .is_some_and(|loader| {
                loader.nodes_matching_selector_number > 0
                    && loader.available_number == loader.nodes_matching_selector_number
            })
    }
}

pub async fn list_modules(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<ModuleBuilder>> {
    list_builders(api_client, namespace, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmm::container::{KernelMappingBuilder, ModuleLoaderContainerBuilder};
    use crate::test_utils::FakeApiServer;
    use crate::types::kmm::{DaemonSetStatus, ModuleStatus};

    fn builder(server: &FakeApiServer) -> ModuleBuilder {
        ModuleBuilder::new(&server.clients(), "simple-kmod", "kmm-tests")
    }

    fn container() -> ModuleLoaderContainerSpec {
        let mapping = KernelMappingBuilder::regexp("^.+$")
            .with_container_image("quay.io/example/simple-kmod:$KERNEL_FULL_VERSION")
            .build()
            .unwrap();

        ModuleLoaderContainerBuilder::new("simple-kmod")
            .with_kernel_mapping(mapping)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_module_loader() {
        let server = FakeApiServer::new();
        let module = builder(&server)
            .with_node_selector(BTreeMap::from([(
                "node-role.kubernetes.io/worker".to_string(),
                String::new(),
            )]))
            .with_module_loader_container(container())
            .with_load_service_account("kmm-loader")
            .with_image_repo_secret("pull-secret");

        assert!(module.error_msg().is_empty());
        let spec = module.definition.unwrap().spec;
        let loader = spec.module_loader.unwrap();
        assert_eq!(loader.service_account_name.as_deref(), Some("kmm-loader"));
        assert_eq!(loader.container.modprobe.module_name, "simple-kmod");
        assert_eq!(spec.image_repo_secret.unwrap().name, "pull-secret");
    }

    #[tokio::test]
    async fn test_service_account_requires_container() {
        let server = FakeApiServer::new();
        let module = builder(&server).with_load_service_account("kmm-loader");

        assert_eq!(
            module.error_msg(),
            "Module moduleLoader container must be set before its service account"
        );
    }

    #[tokio::test]
    async fn test_device_plugin() {
        let server = FakeApiServer::new();
        let module = builder(&server)
            .with_device_plugin_container(DevicePluginContainerSpec {
                image: "quay.io/example/device-plugin:latest".to_string(),
                ..Default::default()
            })
            .with_device_plugin_service_account("kmm-device-plugin");

        let plugin = module.definition.unwrap().spec.device_plugin.unwrap();
        assert_eq!(plugin.service_account_name.as_deref(), Some("kmm-device-plugin"));

        let module = builder(&server).with_device_plugin_container(Default::default());
        assert_eq!(module.error_msg(), "Module 'devicePluginImage' cannot be empty");
    }

    #[tokio::test]
    async fn test_empty_inputs() {
        let server = FakeApiServer::new();

        let module = builder(&server).with_node_selector(BTreeMap::new());
        assert_eq!(module.error_msg(), "Module 'selector' cannot be empty map");

        let module = builder(&server).with_tolerations(vec![]);
        assert_eq!(module.error_msg(), "Module 'tolerations' cannot be empty list");
    }

    #[tokio::test]
    async fn test_is_module_loaded() {
        let mut object = Module::new("simple-kmod", Default::default());
        object.metadata.namespace = Some("kmm-tests".to_string());
        object.status = Some(ModuleStatus {
            module_loader: Some(DaemonSetStatus {
                nodes_matching_selector_number: 2,
                desired_number: 2,
                available_number: 2,
            }),
            device_plugin: None,
        });
        let server = FakeApiServer::new().with_object(&object);

        let mut module = builder(&server);
        assert!(!module.is_module_loaded());
        assert!(module.exists().await);
        assert!(module.is_module_loaded());
    }
}
