// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::{list_builders, ResourceBuilder};
use crate::constants::modes::MIRROR_SOURCE_POLICIES;
use crate::error::Result;
use crate::kubernetes::Clients;
use crate::types::mirror::{ImageDigestMirrorSet, ImageDigestMirrors};
use crate::validation::{cannot_be_empty, cannot_be_empty_list, is_one_of, not_one_of};
use kube::api::ListParams;
use tracing::debug;

/// Builder for cluster wide image digest mirrors
pub type ImageDigestMirrorSetBuilder = ResourceBuilder<ImageDigestMirrorSet>;

impl ImageDigestMirrorSetBuilder {
    pub fn new(api_client: &Clients, name: &str) -> Self {
        debug!("Initializing new ImageDigestMirrorSet {}", name);

        let definition = ImageDigestMirrorSet::new(name, Default::default());

        Self::from_definition(api_client, definition).require_key(name, None)
    }

    pub async fn pull(api_client: &Clients, name: &str) -> Result<Self> {
        Self::pull_named(api_client, name, None, |metadata| ImageDigestMirrorSet {
            metadata,
            spec: Default::default(),
        })
        .await
    }

    /// Mirror `source` to `mirrors`, replacing any mirrors already set for that source
    pub fn with_digest_mirror(self, source: &str, mirrors: Vec<String>) -> Self {
        let kind = Self::kind();
        debug!("Adding ImageDigestMirrorSet mirror {} -> {:?}", source, mirrors);

        self.decorate(|set| {
            if source.is_empty() {
                return Err(cannot_be_empty(&kind, "source"));
            }
            if mirrors.is_empty() {
                return Err(cannot_be_empty_list(&kind, "mirrors"));
            }

            let entries = &mut set.spec.image_digest_mirrors;
            match entries.iter_mut().find(|entry| entry.source == source) {
                Some(entry) => entry.mirrors = mirrors,
                None => entries.push(ImageDigestMirrors {
                    source: source.to_string(),
                    mirrors,
                    mirror_source_policy: None,
                }),
            }
            Ok(())
        })
    }

    /// Set the fallback policy of an already configured source
    pub fn with_source_policy(self, source: &str, policy: &str) -> Self {
        let kind = Self::kind();

        self.decorate(|set| {
            if !is_one_of(policy, MIRROR_SOURCE_POLICIES) {
                return Err(not_one_of(
                    &kind,
                    "mirrorSourcePolicy",
                    policy,
                    MIRROR_SOURCE_POLICIES,
                ));
            }

            let entry = set
                .spec
                .image_digest_mirrors
                .iter_mut()
                .find(|entry| entry.source == source)
                .ok_or_else(|| format!("{} has no mirror for source {}", kind, source))?;
            entry.mirror_source_policy = Some(policy.to_string());
            Ok(())
        })
    }
}

pub async fn list_image_digest_mirror_sets(
    api_client: &Clients,
    options: &[ListParams],
) -> Result<Vec<ImageDigestMirrorSetBuilder>> {
    list_builders(api_client, None, options).await
}
