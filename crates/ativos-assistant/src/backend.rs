//! Backend seam: status, inventory fetches, and report generation.
//!
//! - [`AssistantBackend`] is the trait a host implements over its transport
//!   (HTTP, IPC, in-process). The pipeline only ever sees the trait.
//! - [`StaticBackend`] serves canned data for tests and demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use ativos_core::types::{CapabilityStatus, Equipment, GeneratedReport, Identity, License};

use crate::error::BackendError;

/// Remote operations the assistant depends on.
///
/// `fetch_equipment` and `fetch_licenses` must scope their results to the
/// given identity; the pipeline passes it through without inspecting it.
/// `generate_report` receives the full inventory snapshot for the turn and
/// returns the reply text verbatim.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Report whether the generation capability is configured.
    async fn check_availability(&self) -> Result<CapabilityStatus, BackendError>;

    /// Fetch the equipment visible to `identity`.
    async fn fetch_equipment(&self, identity: &Identity) -> Result<Vec<Equipment>, BackendError>;

    /// Fetch the licenses visible to `identity`.
    async fn fetch_licenses(&self, identity: &Identity) -> Result<Vec<License>, BackendError>;

    /// Generate a reply to `prompt` grounded in the given inventory.
    async fn generate_report(
        &self,
        prompt: &str,
        equipment: &[Equipment],
        licenses: &[License],
    ) -> Result<GeneratedReport, BackendError>;
}

// ---------------------------------------------------------------------------
// StaticBackend - canned inventory and replies for tests and demos
// ---------------------------------------------------------------------------

/// Deterministic backend serving a fixed inventory snapshot.
///
/// Every operation can be scripted to fail with a stored error, which makes
/// each failure path of the pipeline reachable without a transport. Call
/// counters are shared across clones so a test can hand the backend to the
/// widget and still observe what was invoked.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    equipment: Vec<Equipment>,
    licenses: Vec<License>,
    has_capability: bool,
    fail_status: Option<BackendError>,
    fail_equipment: Option<BackendError>,
    fail_licenses: Option<BackendError>,
    fail_generation: Option<BackendError>,
    status_calls: Arc<AtomicUsize>,
    equipment_calls: Arc<AtomicUsize>,
    license_calls: Arc<AtomicUsize>,
    generation_calls: Arc<AtomicUsize>,
}

impl StaticBackend {
    /// Empty inventory, capability configured, nothing scripted to fail.
    pub fn new() -> Self {
        Self {
            has_capability: true,
            ..Self::default()
        }
    }

    /// Replace the served inventory.
    pub fn with_inventory(mut self, equipment: Vec<Equipment>, licenses: Vec<License>) -> Self {
        self.equipment = equipment;
        self.licenses = licenses;
        self
    }

    /// Report the capability as absent.
    pub fn without_capability(mut self) -> Self {
        self.has_capability = false;
        self
    }

    /// Script the status call to fail.
    pub fn failing_status(mut self, err: BackendError) -> Self {
        self.fail_status = Some(err);
        self
    }

    /// Script the equipment fetch to fail.
    pub fn failing_equipment(mut self, err: BackendError) -> Self {
        self.fail_equipment = Some(err);
        self
    }

    /// Script the license fetch to fail.
    pub fn failing_licenses(mut self, err: BackendError) -> Self {
        self.fail_licenses = Some(err);
        self
    }

    /// Script the generation call to fail.
    pub fn failing_generation(mut self, err: BackendError) -> Self {
        self.fail_generation = Some(err);
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn equipment_calls(&self) -> usize {
        self.equipment_calls.load(Ordering::SeqCst)
    }

    pub fn license_calls(&self) -> usize {
        self.license_calls.load(Ordering::SeqCst)
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistantBackend for StaticBackend {
    async fn check_availability(&self) -> Result<CapabilityStatus, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_status {
            return Err(err.clone());
        }
        Ok(CapabilityStatus {
            has_capability: self.has_capability,
        })
    }

    async fn fetch_equipment(&self, _identity: &Identity) -> Result<Vec<Equipment>, BackendError> {
        self.equipment_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_equipment {
            return Err(err.clone());
        }
        Ok(self.equipment.clone())
    }

    async fn fetch_licenses(&self, _identity: &Identity) -> Result<Vec<License>, BackendError> {
        self.license_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_licenses {
            return Err(err.clone());
        }
        Ok(self.licenses.clone())
    }

    async fn generate_report(
        &self,
        prompt: &str,
        equipment: &[Equipment],
        licenses: &[License],
    ) -> Result<GeneratedReport, BackendError> {
        self.generation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_generation {
            return Err(err.clone());
        }
        Ok(GeneratedReport {
            report: format!(
                "Com base em {} equipamentos e {} licenças: {}",
                equipment.len(),
                licenses.len(),
                prompt
            ),
        })
    }
}
