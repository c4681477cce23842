// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry of the kinds a client is allowed to encode and decode.

use crate::error::{InfraError, Result};
use kube::Resource;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Shared set of attached `apiVersion/kind` pairs. Clones share the same set.
#[derive(Clone, Default, Debug)]
pub struct SchemeRegistry {
    kinds: Arc<RwLock<HashSet<String>>>,
}

fn scheme_key<K: Resource<DynamicType = ()>>() -> String {
    format!("{}/{}", K::api_version(&()), K::kind(&()))
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `K`. Returns true when the kind was not attached before.
    pub fn attach<K: Resource<DynamicType = ()>>(&self) -> Result<bool> {
        let key = scheme_key::<K>();

        if self.contains::<K>() {
            return Ok(false);
        }

        let mut kinds = self
            .kinds
            .write()
            .map_err(|_| InfraError::SchemeNotAttached(key.clone()))?;
        let added = kinds.insert(key.clone());
        if added {
            debug!("Attached scheme {}", key);
        }

        Ok(added)
    }

    pub fn contains<K: Resource<DynamicType = ()>>(&self) -> bool {
        self.kinds
            .read()
            .map(|kinds| kinds.contains(&scheme_key::<K>()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.kinds.read().map(|kinds| kinds.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::metallb::{BGPPeer, IPAddressPool};
    use std::thread;

    #[test]
    fn test_attach_is_idempotent() {
        let registry = SchemeRegistry::new();

        assert!(registry.attach::<IPAddressPool>().unwrap());
        assert!(!registry.attach::<IPAddressPool>().unwrap());
        assert!(registry.contains::<IPAddressPool>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_attach_keeps_kinds_apart() {
        let registry = SchemeRegistry::new();
        registry.attach::<IPAddressPool>().unwrap();

        assert!(!registry.contains::<BGPPeer>());
        registry.attach::<BGPPeer>().unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clones_share_registry() {
        let registry = SchemeRegistry::new();
        let clone = registry.clone();
        clone.attach::<BGPPeer>().unwrap();

        assert!(registry.contains::<BGPPeer>());
    }

    #[test]
    fn test_concurrent_attach() {
        let registry = SchemeRegistry::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    if i % 2 == 0 {
                        registry.attach::<IPAddressPool>().unwrap()
                    } else {
                        registry.attach::<BGPPeer>().unwrap()
                    }
                })
            })
            .collect();

        let newly_added = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();

        assert_eq!(newly_added, 2);
        assert_eq!(registry.len(), 2);
    }
}
