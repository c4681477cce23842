// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::builder::ResourceBuilder;
use crate::error::{InfraError, Result};
use crate::kubernetes::{Clients, ScopedResource};
use kube::api::ListParams;
use tracing::debug;

/// List `K` and wrap every item in its own builder.
///
/// `options` holds at most one `ListParams`; an empty slice lists everything.
/// For cluster scoped kinds `namespace` is ignored.
pub async fn list_builders<K: ScopedResource>(
    api_client: &Clients,
    namespace: Option<&str>,
    options: &[ListParams],
) -> Result<Vec<ResourceBuilder<K>>> {
    let kind = K::kind(&());

    if options.len() > 1 {
        debug!("More than one ListOptions passed when listing {}", kind);
        return Err(InfraError::TooManyListOptions);
    }

    api_client.attach_scheme::<K>()?;

    let params = options.first().cloned().unwrap_or_default();
    debug!(
        "Listing {} in {:?} with selector {:?}",
        kind, namespace, params.label_selector
    );

    let items = api_client.list::<K>(namespace, &params).await?;

    Ok(items
        .into_iter()
        .map(|item| ResourceBuilder::from_object(api_client, item))
        .collect())
}
