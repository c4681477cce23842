// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builder core shared by every wrapped kind.
//!
//! A builder owns the desired `definition`, the last `object` read from the
//! cluster and a client handle. Decorators never fail: a rejected value is
//! parked in the builder and every later decorator becomes a no-op, while the
//! next terminal verb (`get`, `exists`, `create`, `update`, `delete`) reports it.
//! A builder is not meant to be shared between tasks; the `Clients` handle is.

pub mod conditions;
pub mod list;

pub use conditions::ConditionView;
pub use list::list_builders;

use crate::error::{InfraError, Result};
use crate::kubernetes::{Clients, ScopedResource};
use crate::validation::cannot_be_empty;
use kube::api::ObjectMeta;
use kube::core::{ApiResource, GroupVersionResource};
use kube::ResourceExt;
use tracing::{debug, info, instrument, warn};

pub struct ResourceBuilder<K: ScopedResource> {
    /// Desired state, the payload of create and update requests
    pub definition: Option<K>,
    /// Last copy read from the cluster
    pub object: Option<K>,
    api_client: Clients,
    error_msg: String,
}

impl<K: ScopedResource> Clone for ResourceBuilder<K> {
    fn clone(&self) -> Self {
        Self {
            definition: self.definition.clone(),
            object: self.object.clone(),
            api_client: self.api_client.clone(),
            error_msg: self.error_msg.clone(),
        }
    }
}

pub(crate) fn object_meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(str::to_string),
        ..Default::default()
    }
}

impl<K: ScopedResource> ResourceBuilder<K> {
    /// Wrap a freshly built definition, attaching the kind's scheme to the client first
    pub(crate) fn from_definition(api_client: &Clients, definition: K) -> Self {
        let mut builder = Self {
            definition: Some(definition),
            object: None,
            api_client: api_client.clone(),
            error_msg: String::new(),
        };

        if let Err(err) = api_client.attach_scheme::<K>() {
            builder.error_msg = format!("failed to attach {} scheme: {}", Self::kind(), err);
        }

        builder
    }

    /// Builder for an object read from the cluster; `definition` is an independent copy
    pub(crate) fn from_object(api_client: &Clients, object: K) -> Self {
        Self {
            definition: Some(object.clone()),
            object: Some(object),
            api_client: api_client.clone(),
            error_msg: String::new(),
        }
    }

    /// Read an existing object and seed the definition from it
    pub(crate) async fn pull_named(
        api_client: &Clients,
        name: &str,
        namespace: Option<&str>,
        skeleton: impl FnOnce(ObjectMeta) -> K,
    ) -> Result<Self> {
        let kind = Self::kind();
        debug!("Pulling existing {} {} in {:?}", kind, name, namespace);

        if name.is_empty() {
            return Err(InfraError::InvalidBuilder(cannot_be_empty(&kind, "name")));
        }
        if namespace.is_some_and(str::is_empty) {
            return Err(InfraError::InvalidBuilder(cannot_be_empty(&kind, "nsname")));
        }

        api_client.attach_scheme::<K>()?;

        let mut builder = Self {
            definition: Some(skeleton(object_meta(name, namespace))),
            object: None,
            api_client: api_client.clone(),
            error_msg: String::new(),
        };

        let object = match builder.get().await {
            Ok(object) => object,
            Err(err) if err.is_not_found() => {
                return Err(InfraError::NotFound {
                    kind,
                    key: builder.key(),
                })
            }
            Err(err) => return Err(err),
        };

        builder.definition = Some(object.clone());
        builder.object = Some(object);

        Ok(builder)
    }

    /// Record the first construction or decorator failure; later ones are dropped
    pub(crate) fn reject(mut self, message: impl Into<String>) -> Self {
        if self.error_msg.is_empty() {
            self.error_msg = message.into();
            debug!("{}", self.error_msg);
        }

        self
    }

    /// Reject an empty name or namespace with the canonical message
    pub(crate) fn require_key(self, name: &str, namespace: Option<&str>) -> Self {
        let kind = Self::kind();
        if name.is_empty() {
            return self.reject(cannot_be_empty(&kind, "name"));
        }
        if namespace.is_some_and(str::is_empty) {
            return self.reject(cannot_be_empty(&kind, "nsname"));
        }

        self
    }

    /// Apply `mutate` to the definition unless the builder is already invalid.
    /// `mutate` must check its input before touching the definition.
    pub(crate) fn decorate(
        mut self,
        mutate: impl FnOnce(&mut K) -> std::result::Result<(), String>,
    ) -> Self {
        if self.validate().is_err() {
            return self;
        }

        if let Some(definition) = self.definition.as_mut() {
            if let Err(message) = mutate(definition) {
                return self.reject(message);
            }
        }

        self
    }

    /// Caller supplied modification of the definition; an `Err` poisons the builder
    pub fn with_options(
        self,
        option: impl FnOnce(&mut K) -> std::result::Result<(), String>,
    ) -> Self {
        self.decorate(option)
    }

    pub fn with_label(self, key: &str, value: &str) -> Self {
        let kind = Self::kind();
        debug!("Adding label {}={} to {}", key, value, kind);

        self.decorate(|definition| {
            if key.is_empty() {
                return Err(cannot_be_empty(&kind, "labelKey"));
            }

            definition
                .labels_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    pub fn kind() -> String {
        K::kind(&()).into_owned()
    }

    /// Group, version and plural resource name, for generic cleanup tooling
    pub fn gvr() -> GroupVersionResource {
        let resource = ApiResource::erase::<K>(&());
        GroupVersionResource::gvr(&resource.group, &resource.version, &resource.plural)
    }

    pub fn error_msg(&self) -> &str {
        &self.error_msg
    }

    pub fn api_client(&self) -> &Clients {
        &self.api_client
    }

    fn name(&self) -> String {
        self.definition
            .as_ref()
            .map(|definition| definition.name_any())
            .unwrap_or_default()
    }

    fn namespace(&self) -> Option<String> {
        self.definition
            .as_ref()
            .and_then(|definition| definition.namespace())
    }

    fn key(&self) -> String {
        match self.namespace() {
            Some(namespace) => format!("{}/{}", namespace, self.name()),
            None => self.name(),
        }
    }

    fn definition_ref(&self) -> Result<&K> {
        self.definition
            .as_ref()
            .ok_or_else(|| InfraError::UndefinedDefinition(Self::kind()))
    }

    /// Check the builder can be used: a definition is present and no error is parked
    pub fn validate(&self) -> Result<()> {
        let kind = Self::kind();

        if self.definition.is_none() {
            debug!("The {} is undefined", kind);
            return Err(InfraError::UndefinedDefinition(kind));
        }

        if !self.error_msg.is_empty() {
            debug!("The {} builder has error message: {}", kind, self.error_msg);
            return Err(InfraError::InvalidBuilder(self.error_msg.clone()));
        }

        Ok(())
    }

    /// Read the object currently stored on the cluster without caching it
    #[instrument(skip(self), fields(kind = %Self::kind(), key = %self.key()))]
    pub async fn get(&self) -> Result<K> {
        self.validate()?;

        self.api_client
            .get::<K>(&self.name(), self.namespace().as_deref())
            .await
    }

    /// Whether the object exists. Any error other than not-found counts as existing.
    #[instrument(skip(self), fields(kind = %Self::kind(), key = %self.key()))]
    pub async fn exists(&mut self) -> bool {
        if let Err(err) = self.validate() {
            debug!("Failed to validate builder: {}", err);
            return false;
        }

        match self.get().await {
            Ok(object) => {
                self.object = Some(object);
                true
            }
            Err(err) if err.is_not_found() => {
                debug!("{} {} does not exist", Self::kind(), self.key());
                false
            }
            Err(err) => {
                debug!(
                    "Failed to read {} {}, assuming it exists: {}",
                    Self::kind(),
                    self.key(),
                    err
                );
                true
            }
        }
    }

    /// Create the object unless it already exists
    #[instrument(skip(self), fields(kind = %Self::kind(), key = %self.key()))]
    pub async fn create(&mut self) -> Result<&mut Self> {
        self.validate()?;

        if self.exists().await {
            debug!("{} {} already exists", Self::kind(), self.key());
            return Ok(self);
        }

        let created = self.api_client.create(self.definition_ref()?).await?;
        info!("Created {} {}", Self::kind(), self.key());

        self.definition = Some(created.clone());
        self.object = Some(created);

        Ok(self)
    }

    /// Replace the stored object with the definition. With `force`, a rejected
    /// update is retried as delete followed by create.
    #[instrument(skip(self), fields(kind = %Self::kind(), key = %self.key()))]
    pub async fn update(&mut self, force: bool) -> Result<&mut Self> {
        self.validate()?;

        if !self.exists().await {
            return Err(InfraError::NonExistent {
                verb: "update",
                kind: Self::kind().to_lowercase(),
            });
        }

        let resource_version = self
            .object
            .as_ref()
            .and_then(|object| object.resource_version());
        let mut definition = self.definition_ref()?.clone();
        definition.meta_mut().resource_version = resource_version;

        match self.api_client.update(&definition).await {
            Ok(updated) => {
                debug!("Updated {} {}", Self::kind(), self.key());
                self.definition = Some(updated.clone());
                self.object = Some(updated);

                Ok(self)
            }
            Err(err) if force => {
                warn!(
                    "Failed to update {} {}, deleting and recreating it: {}",
                    Self::kind(),
                    self.key(),
                    err
                );

                self.delete().await?;

                if let Some(definition) = self.definition.as_mut() {
                    let metadata = definition.meta_mut();
                    metadata.resource_version = None;
                    metadata.uid = None;
                    metadata.creation_timestamp = None;
                }

                self.create().await
            }
            Err(err) => Err(err),
        }
    }

    /// Delete the object. Deleting an absent object succeeds.
    #[instrument(skip(self), fields(kind = %Self::kind(), key = %self.key()))]
    pub async fn delete(&mut self) -> Result<()> {
        self.validate()?;

        if !self.exists().await {
            debug!("{} {} does not exist, nothing to delete", Self::kind(), self.key());
            self.object = None;
            return Ok(());
        }

        match self.api_client.delete(self.definition_ref()?).await {
            Ok(()) => info!("Deleted {} {}", Self::kind(), self.key()),
            Err(err) if err.is_not_found() => {
                debug!("{} {} was already gone", Self::kind(), self.key())
            }
            Err(err) => return Err(err),
        }

        self.object = None;

        Ok(())
    }
}
