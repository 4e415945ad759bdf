use super::{EngineLoader, SpeechEngine, SttModel};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::info;

type EngineSlot = Arc<OnceCell<Arc<dyn SpeechEngine>>>;

/// Lazily populated map of loaded engines, one per model.
///
/// The map lock only guards slot lookup. Loading happens on the model's own
/// slot, so a slow first load never blocks models that are already loaded,
/// and two concurrent first requests for one model load it only once.
/// A failed load leaves the slot empty for the next caller to retry.
/// Entries are never evicted.
#[derive(Clone)]
pub struct EngineCache {
    loader: Arc<dyn EngineLoader>,
    engines: Arc<Mutex<HashMap<SttModel, EngineSlot>>>,
}

impl EngineCache {
    pub fn new(loader: Arc<dyn EngineLoader>) -> Self {
        Self {
            loader,
            engines: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the engine for `model`, loading it on first use
    pub async fn get(&self, model: SttModel) -> Result<Arc<dyn SpeechEngine>> {
        let slot = {
            let mut engines = self.engines.lock().await;
            Arc::clone(engines.entry(model).or_default())
        };

        let engine = slot
            .get_or_try_init(|| async {
                info!("Loading STT model {}", model);
                let engine = self
                    .loader
                    .load(model)
                    .await
                    .with_context(|| format!("Failed to load STT model {}", model))?;
                info!("STT model {} ready", model);
                Ok::<_, anyhow::Error>(engine)
            })
            .await?;

        Ok(Arc::clone(engine))
    }

    /// Models loaded so far
    pub async fn loaded(&self) -> Vec<SttModel> {
        let engines = self.engines.lock().await;
        engines
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(model, _)| *model)
            .collect()
    }
}
