//! Persistence boundary for the configuration.
//!
//! Backends implement [`ConfigStore`] and only move bytes. [`ConfigService`]
//! sits in front of any backend and owns the rules: defaults are layered under
//! whatever was stored, and nothing that fails validation is ever persisted.

use std::cell::{Cell, RefCell};
use std::future::Future;

use crate::config::{Config, ConfigPatch};
use crate::error::StoreError;

/// A persisted key-value slot holding the configuration.
pub trait ConfigStore {
    /// Load the stored patch, `None` when nothing was saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<ConfigPatch>, StoreError>>;

    /// Persist a validated, normalized configuration.
    fn save(&self, config: &Config) -> impl Future<Output = Result<(), StoreError>>;
}

/// Validating front for a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S: ConfigStore> ConfigService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current configuration: defaults overlaid with the stored patch.
    ///
    /// A stored value that no longer validates is ignored in favor of the
    /// defaults rather than propagated.
    pub async fn get(&self) -> Result<Config, StoreError> {
        let Some(patch) = self.store.load().await? else {
            return Ok(Config::default());
        };
        Ok(resolve_stored(&patch))
    }

    /// Validate and persist a full configuration.
    pub async fn set(&self, config: Config) -> Result<Config, StoreError> {
        let config = config.normalized();
        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "rejected configuration");
            return Err(err.into());
        }
        self.store.save(&config).await?;
        tracing::debug!("configuration saved");
        Ok(config)
    }

    /// Overlay a patch onto the current configuration and persist the result.
    pub async fn update(&self, patch: &ConfigPatch) -> Result<Config, StoreError> {
        let current = self.get().await?;
        self.set(current.merged(patch)).await
    }

    /// Apply a built-in preset and persist the result.
    pub async fn apply_preset(&self, name: &str) -> Result<Config, StoreError> {
        let current = self.get().await?;
        let next = current.with_preset(name)?;
        self.set(next).await
    }
}

/// Resolve a patch received from storage or a change notification.
pub fn resolve_stored(patch: &ConfigPatch) -> Config {
    match Config::default().try_merged(patch) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "stored configuration invalid, using defaults");
            Config::default()
        }
    }
}

/// In-memory store, mostly for tests.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<ConfigPatch>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patch(patch: ConfigPatch) -> Self {
        Self {
            slot: RefCell::new(Some(patch)),
            saves: Cell::new(0),
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl ConfigStore for MemoryStore {
    async fn load(&self) -> Result<Option<ConfigPatch>, StoreError> {
        Ok(self.slot.borrow().clone())
    }

    async fn save(&self, config: &Config) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some(ConfigPatch::from(config));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorTheme;

    #[tokio::test]
    async fn empty_store_yields_defaults() {
        let service = ConfigService::new(MemoryStore::new());
        assert_eq!(service.get().await.unwrap(), Config::default());
    }

    #[tokio::test]
    async fn invalid_config_is_never_persisted() {
        let service = ConfigService::new(MemoryStore::new());
        let bad = Config {
            modal_width: 150.0,
            ..Default::default()
        };
        let err = service.set(bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert_eq!(service.store().saves(), 0);
    }

    #[tokio::test]
    async fn set_recomputes_derived_proportion() {
        let service = ConfigService::new(MemoryStore::new());
        let config = Config {
            editor_proportion: 35,
            documentation_proportion: 99,
            ..Default::default()
        };
        let saved = service.set(config).await.unwrap();
        assert_eq!(saved.documentation_proportion, 65);
        assert_eq!(service.get().await.unwrap().documentation_proportion, 65);
    }

    #[tokio::test]
    async fn update_merges_onto_stored_value() {
        let service = ConfigService::new(MemoryStore::with_patch(ConfigPatch {
            editor_theme: Some(EditorTheme::Dark),
            ..Default::default()
        }));
        let next = service
            .update(&ConfigPatch {
                editor_font_size: Some(18.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(next.editor_theme, EditorTheme::Dark);
        assert_eq!(next.editor_font_size, 18.0);
        assert_eq!(service.store().saves(), 1);
    }

    #[tokio::test]
    async fn stale_invalid_storage_falls_back() {
        let service = ConfigService::new(MemoryStore::with_patch(ConfigPatch {
            editor_proportion: Some(95),
            ..Default::default()
        }));
        assert_eq!(service.get().await.unwrap(), Config::default());
    }

    #[tokio::test]
    async fn presets_go_through_validation() {
        let service = ConfigService::new(MemoryStore::new());
        let config = service.apply_preset("medium").await.unwrap();
        assert_eq!(config.modal_width, 80.0);
        assert!(service.apply_preset("huge").await.is_err());
        assert_eq!(service.store().saves(), 1);
    }
}
