//! One-shot probe for the remote generation capability.
//!
//! Runs once when the widget mounts. The outcome is carried around as a
//! plain [`Availability`] value for the rest of the process; nothing
//! re-probes, polls, or reacts to later changes.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::AssistantBackend;

/// Resolved availability of the assistant for this process.
///
/// Injected into [`crate::widget::AssistantWidget`] as an explicit value so
/// the gate is visible in the wiring instead of hiding in ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Availability {
    available: bool,
}

impl Availability {
    pub fn available() -> Self {
        Self { available: true }
    }

    pub fn unavailable() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Checks once whether the generation capability can be used.
pub struct StatusProbe {
    backend: Arc<dyn AssistantBackend>,
    enabled: bool,
}

impl StatusProbe {
    /// `enabled` is the local kill switch from the assistant configuration;
    /// when false the backend is never contacted.
    pub fn new(backend: Arc<dyn AssistantBackend>, enabled: bool) -> Self {
        Self { backend, enabled }
    }

    /// Resolve availability for this process.
    ///
    /// Fails closed: any error from the status endpoint is logged and
    /// reported as unavailable. Nothing is surfaced to the user.
    pub async fn resolve(&self) -> Availability {
        if !self.enabled {
            info!("assistant disabled by configuration");
            return Availability::unavailable();
        }
        match self.backend.check_availability().await {
            Ok(status) if status.has_capability => Availability::available(),
            Ok(_) => {
                info!("generation capability not configured on the backend");
                Availability::unavailable()
            }
            Err(e) => {
                warn!(error = %e, "availability check failed, assistant hidden");
                Availability::unavailable()
            }
        }
    }
}
