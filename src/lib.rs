// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod ibi;
pub mod kmm;
pub mod kubernetes;
pub mod metallb;
pub mod mirror;
pub mod oran;
pub mod siteconfig;
pub mod types;
pub mod validation;
pub mod webhook;

#[cfg(test)]
pub mod test_utils;

pub use builder::{list_builders, ConditionView, ResourceBuilder};
pub use config::Config;
pub use error::{InfraError, Result};
pub use kubernetes::Clients;
