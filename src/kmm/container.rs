// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client-less builders for the module loader container of a Module.
//!
//! These assemble plain structs that are later handed to
//! `ModuleBuilder::with_module_loader_container`. Like the resource builders they
//! park the first failure, and `build` reports it.

use crate::error::{InfraError, Result};
use crate::types::kmm::{
    Build, BuildArg, KernelMapping, ModprobeSpec, ModuleLoaderContainerSpec, Sign,
};
use crate::types::LocalReference;
use crate::validation::{cannot_be_empty, cannot_be_empty_list};
use tracing::debug;

const KERNEL_MAPPING: &str = "KernelMapping";
const MODULE_LOADER_CONTAINER: &str = "ModuleLoaderContainer";

#[derive(Clone, Debug)]
pub struct KernelMappingBuilder {
    definition: KernelMapping,
    error_msg: String,
}

impl KernelMappingBuilder {
    /// Mapping selected by a regular expression over the kernel version
    pub fn regexp(regexp: &str) -> Self {
        debug!("Initializing new regexp KernelMapping {}", regexp);

        Self::start(
            KernelMapping {
                regexp: Some(regexp.to_string()),
                ..Default::default()
            },
            regexp.is_empty().then(|| cannot_be_empty(KERNEL_MAPPING, "regexp")),
        )
    }

    /// Mapping selected by an exact kernel version
    pub fn literal(literal: &str) -> Self {
        debug!("Initializing new literal KernelMapping {}", literal);

        Self::start(
            KernelMapping {
                literal: Some(literal.to_string()),
                ..Default::default()
            },
            literal.is_empty().then(|| cannot_be_empty(KERNEL_MAPPING, "literal")),
        )
    }

    fn start(definition: KernelMapping, error: Option<String>) -> Self {
        Self {
            definition,
            error_msg: error.unwrap_or_default(),
        }
    }

    fn apply(mut self, mutate: impl FnOnce(&mut KernelMapping) -> std::result::Result<(), String>) -> Self {
        if !self.error_msg.is_empty() {
            return self;
        }

        if let Err(message) = mutate(&mut self.definition) {
            debug!("{}", message);
            self.error_msg = message;
        }

        self
    }

    pub fn with_container_image(self, image: &str) -> Self {
        self.apply(|mapping| {
            if image.is_empty() {
                return Err(cannot_be_empty(KERNEL_MAPPING, "containerImage"));
            }

            mapping.container_image = Some(image.to_string());
            Ok(())
        })
    }

    pub fn with_build_arg(self, name: &str, value: &str) -> Self {
        self.apply(|mapping| {
            if name.is_empty() {
                return Err(cannot_be_empty(KERNEL_MAPPING, "buildArgName"));
            }

            mapping
                .build
                .get_or_insert_with(Build::default)
                .build_args
                .get_or_insert_with(Vec::new)
                .push(BuildArg {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            Ok(())
        })
    }

    /// ConfigMap holding the Dockerfile used to build the module image
    pub fn with_build_docker_cfg_file(self, config_map: &str) -> Self {
        self.apply(|mapping| {
            if config_map.is_empty() {
                return Err(cannot_be_empty(KERNEL_MAPPING, "dockerfileConfigMap"));
            }

            mapping.build.get_or_insert_with(Build::default).dockerfile_config_map =
                Some(LocalReference::new(config_map));
            Ok(())
        })
    }

    pub fn with_sign(self, cert_secret: &str, key_secret: &str, files_to_sign: Vec<String>) -> Self {
        self.apply(|mapping| {
            if cert_secret.is_empty() {
                return Err(cannot_be_empty(KERNEL_MAPPING, "certSecret"));
            }
            if key_secret.is_empty() {
                return Err(cannot_be_empty(KERNEL_MAPPING, "keySecret"));
            }
            if files_to_sign.is_empty() {
                return Err(cannot_be_empty_list(KERNEL_MAPPING, "filesToSign"));
            }

            mapping.sign = Some(Sign {
                unsigned_image: None,
                key_secret: LocalReference::new(key_secret),
                cert_secret: LocalReference::new(cert_secret),
                files_to_sign,
            });
            Ok(())
        })
    }

    pub fn build(self) -> Result<KernelMapping> {
        if !self.error_msg.is_empty() {
            return Err(InfraError::InvalidBuilder(self.error_msg));
        }

        Ok(self.definition)
    }
}

#[derive(Clone, Debug)]
pub struct ModuleLoaderContainerBuilder {
    definition: ModuleLoaderContainerSpec,
    error_msg: String,
}

impl ModuleLoaderContainerBuilder {
    pub fn new(module_name: &str) -> Self {
        debug!("Initializing new ModuleLoaderContainer for module {}", module_name);

        Self {
            definition: ModuleLoaderContainerSpec {
                modprobe: ModprobeSpec {
                    module_name: module_name.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            error_msg: if module_name.is_empty() {
                cannot_be_empty(MODULE_LOADER_CONTAINER, "moduleName")
            } else {
                String::new()
            },
        }
    }

    fn apply(
        mut self,
        mutate: impl FnOnce(&mut ModuleLoaderContainerSpec) -> std::result::Result<(), String>,
    ) -> Self {
        if !self.error_msg.is_empty() {
            return self;
        }

        if let Err(message) = mutate(&mut self.definition) {
            debug!("{}", message);
            self.error_msg = message;
        }

        self
    }

    pub fn with_kernel_mapping(self, mapping: KernelMapping) -> Self {
        self.apply(|container| {
            container.kernel_mappings.push(mapping);
            Ok(())
        })
    }

    pub fn with_image_pull_policy(self, policy: &str) -> Self {
        self.apply(|container| {
            if policy.is_empty() {
                return Err(cannot_be_empty(MODULE_LOADER_CONTAINER, "imagePullPolicy"));
            }

            container.image_pull_policy = Some(policy.to_string());
            Ok(())
        })
    }

    pub fn with_modprobe_parameters(self, parameters: Vec<String>) -> Self {
        self.apply(|container| {
            if parameters.is_empty() {
                return Err(cannot_be_empty_list(MODULE_LOADER_CONTAINER, "parameters"));
            }

            container.modprobe.parameters = Some(parameters);
            Ok(())
        })
    }

    pub fn with_dir_name(self, dir_name: &str) -> Self {
        self.apply(|container| {
            if dir_name.is_empty() {
                return Err(cannot_be_empty(MODULE_LOADER_CONTAINER, "dirName"));
            }

            container.modprobe.dir_name = Some(dir_name.to_string());
            Ok(())
        })
    }

    pub fn with_firmware_path(self, path: &str) -> Self {
        self.apply(|container| {
            if path.is_empty() {
                return Err(cannot_be_empty(MODULE_LOADER_CONTAINER, "firmwarePath"));
            }

            container.modprobe.firmware_path = Some(path.to_string());
            Ok(())
        })
    }

    pub fn with_version(self, version: &str) -> Self {
        self.apply(|container| {
            if version.is_empty() {
                return Err(cannot_be_empty(MODULE_LOADER_CONTAINER, "version"));
            }

            container.version = Some(version.to_string());
            Ok(())
        })
    }

    pub fn build(self) -> Result<ModuleLoaderContainerSpec> {
        if !self.error_msg.is_empty() {
            return Err(InfraError::InvalidBuilder(self.error_msg));
        }

        if self.definition.kernel_mappings.is_empty() {
            return Err(InfraError::InvalidBuilder(cannot_be_empty_list(
                MODULE_LOADER_CONTAINER,
                "kernelMappings",
            )));
        }

        Ok(self.definition)
    }
}
