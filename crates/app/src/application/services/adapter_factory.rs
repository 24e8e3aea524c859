//! Adapter Factory - creates entity adapters and runs their readiness check
//!
//! Hosts create every adapter through one factory while wiring, register
//! their backing repositories, then call
//! [`AdapterFactory::validate_after_refresh`] once. Adapters created later
//! are validated by the next call.

use std::any::Any;
use std::mem;
use std::sync::Arc;

use entity_bridge_domain::{EntityDescriptor, EntityDescriptorBuilder, EscapeCharacter};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use super::entity_adapter::{AdapterDependencies, EntityAdapter, ValidateAfterRefresh};
use crate::application::error::ConfigurationError;

/// Defaults applied to every adapter a factory creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDefaults {
    pub escape_character: EscapeCharacter,
    /// Map id used when a descriptor does not set one
    pub map_id: Option<String>,
    pub convert_body: bool,
    pub convert_id: bool,
    /// When false, adapters get no conversion service at all
    pub use_conversion_service: bool,
}

impl Default for AdapterDefaults {
    fn default() -> Self {
        Self {
            escape_character: EscapeCharacter::DEFAULT,
            map_id: None,
            convert_body: false,
            convert_id: true,
            use_conversion_service: true,
        }
    }
}

pub struct AdapterFactory {
    dependencies: AdapterDependencies,
    defaults: AdapterDefaults,
    pending: Mutex<Vec<Arc<dyn ValidateAfterRefresh>>>,
}

impl AdapterFactory {
    pub fn new(mut dependencies: AdapterDependencies, defaults: AdapterDefaults) -> Self {
        if !defaults.use_conversion_service && dependencies.conversion.take().is_some() {
            debug!("Conversion service disabled, adapters rely on the object mapper only");
        }
        Self {
            dependencies,
            defaults,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn defaults(&self) -> &AdapterDefaults {
        &self.defaults
    }

    /// Build a descriptor, filling unset options from the defaults
    pub fn descriptor(&self, builder: EntityDescriptorBuilder) -> EntityDescriptor {
        builder
            .or_defaults(
                self.defaults.map_id.as_deref(),
                self.defaults.convert_body,
                self.defaults.convert_id,
            )
            .build()
    }

    /// Create an adapter for facade `F`; it stays unusable until the next
    /// [`AdapterFactory::validate_after_refresh`]
    pub async fn create<F, FId>(&self, builder: EntityDescriptorBuilder) -> Arc<EntityAdapter<F, FId>>
    where
        F: Any + Send + Sync,
        FId: Any + Send + Sync,
    {
        let adapter = Arc::new(
            EntityAdapter::new(self.descriptor(builder), self.dependencies.clone())
                .with_escape_character(self.defaults.escape_character),
        );
        let pending: Arc<dyn ValidateAfterRefresh> = adapter.clone();
        self.pending.lock().await.push(pending);
        adapter
    }

    /// Adapters created since the last validation
    pub async fn pending(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Validate every pending adapter once. Stops at the first failure; the
    /// failed adapter and every adapter after it stay pending for the next
    /// call.
    #[instrument(skip(self))]
    pub async fn validate_after_refresh(&self) -> Result<usize, ConfigurationError> {
        let pending = mem::take(&mut *self.pending.lock().await);
        let count = pending.len();

        let mut remaining = pending.into_iter();
        while let Some(adapter) = remaining.next() {
            if let Err(e) = adapter.validate_after_refresh().await {
                error!(facade = %adapter.facade_type(), error = %e, "Entity adapter failed validation");
                let mut queue = self.pending.lock().await;
                let created_meanwhile = mem::take(&mut *queue);
                queue.push(adapter);
                queue.extend(remaining);
                queue.extend(created_meanwhile);
                return Err(e);
            }
        }

        info!(count, "Entity adapters validated");
        Ok(count)
    }
}
