// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes API client facade and scheme registration.

pub mod client;
pub mod scheme;

pub use client::{Clients, ScopedResource};
pub(crate) use client::{cluster_scoped, namespaced};
pub use scheme::SchemeRegistry;
