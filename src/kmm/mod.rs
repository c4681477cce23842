// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builders for Kernel Module Management resources.

pub mod container;
pub mod module;
pub mod preflight;

pub use container::{KernelMappingBuilder, ModuleLoaderContainerBuilder};
pub use module::{list_modules, ModuleBuilder};
pub use preflight::{list_preflight_validations, PreflightValidationOcpBuilder};
