//! Context aggregation: gather identity-scoped inventory, then generate.
//!
//! The facade in front of the backend for one turn. Equipment and license
//! fetches run concurrently and join all-or-nothing; the generator only ever
//! sees a complete snapshot.

use std::sync::Arc;

use tracing::debug;

use ativos_core::types::{Equipment, GeneratedReport, Identity, License};

use crate::backend::AssistantBackend;
use crate::error::AssistantError;

/// Inventory snapshot attached to a single generation request.
///
/// Built fresh for every turn and dropped with it. Nothing caches snapshots
/// across turns, so consecutive prompts always see current data.
#[derive(Debug, Clone, Default)]
pub struct ContextSnapshot {
    pub equipment: Vec<Equipment>,
    pub licenses: Vec<License>,
}

/// Joins the inventory fetches and calls the generator.
#[derive(Clone)]
pub struct ContextAggregator {
    backend: Arc<dyn AssistantBackend>,
}

impl ContextAggregator {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self { backend }
    }

    /// Run one full generation request for `prompt` on behalf of `identity`.
    ///
    /// Both fetches receive the same identity and run concurrently; the
    /// first failure wins, the sibling fetch is dropped, and the generator
    /// is not called. Empty collections are valid context.
    pub async fn generate_answer(
        &self,
        prompt: &str,
        identity: &Identity,
    ) -> Result<GeneratedReport, AssistantError> {
        let (equipment, licenses) = tokio::try_join!(
            self.backend.fetch_equipment(identity),
            self.backend.fetch_licenses(identity),
        )
        .map_err(AssistantError::ContextFetch)?;

        let snapshot = ContextSnapshot {
            equipment,
            licenses,
        };
        debug!(
            equipment = snapshot.equipment.len(),
            licenses = snapshot.licenses.len(),
            "inventory context assembled"
        );

        self.backend
            .generate_report(prompt, &snapshot.equipment, &snapshot.licenses)
            .await
            .map_err(AssistantError::Generation)
    }
}
