//! Launcher widget: availability gate and session lifecycle.
//!
//! The widget is the only way a session comes into being. It holds no
//! conversation state of its own: an availability value decided at mount
//! plus an open/closed toggle.

use std::sync::Arc;

use tracing::{debug, info};

use ativos_core::config::AssistantConfig;
use ativos_core::types::Identity;

use crate::backend::AssistantBackend;
use crate::context::ContextAggregator;
use crate::error::AssistantError;
use crate::probe::{Availability, StatusProbe};
use crate::session::ChatSession;

/// Floating assistant entry point for a host surface.
///
/// When availability is false the host renders nothing and [`open`] can
/// never succeed: the feature does not exist for this process. At most one
/// session is open at a time; closing discards it entirely.
///
/// [`open`]: AssistantWidget::open
pub struct AssistantWidget {
    availability: Availability,
    aggregator: ContextAggregator,
    identity: Identity,
    config: AssistantConfig,
    session: Option<Arc<ChatSession>>,
}

impl AssistantWidget {
    /// Build a widget from an already-resolved availability value.
    pub fn new(
        availability: Availability,
        backend: Arc<dyn AssistantBackend>,
        identity: Identity,
        config: AssistantConfig,
    ) -> Self {
        Self {
            availability,
            aggregator: ContextAggregator::new(backend),
            identity,
            config,
            session: None,
        }
    }

    /// Probe the backend once and build the widget from the result.
    ///
    /// This is the mount point: availability is decided here and never
    /// revisited for the lifetime of the widget.
    pub async fn mount(
        backend: Arc<dyn AssistantBackend>,
        identity: Identity,
        config: AssistantConfig,
    ) -> Self {
        let probe = StatusProbe::new(Arc::clone(&backend), config.enabled);
        let availability = probe.resolve().await;
        Self::new(availability, backend, identity, config)
    }

    /// Whether the host should render the launcher at all.
    pub fn is_visible(&self) -> bool {
        self.availability.is_available()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open the chat panel.
    ///
    /// Returns the running session when one is already open; otherwise
    /// creates the single session for this widget, transcript seeded from
    /// the configured greeting.
    pub fn open(&mut self) -> Result<Arc<ChatSession>, AssistantError> {
        if !self.is_visible() {
            return Err(AssistantError::Unavailable);
        }
        if let Some(session) = &self.session {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new(ChatSession::new(
            self.aggregator.clone(),
            self.identity.clone(),
            &self.config,
        ));
        info!(session = %session.id(), "assistant panel opened");
        self.session = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Close the chat panel, discarding the conversation.
    ///
    /// A turn still in flight finishes against its own handle and is
    /// dropped with it; nothing is cancelled and nothing is kept.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session = %session.id(), "assistant panel closed");
        }
    }

    /// The session currently open, if any.
    pub fn session(&self) -> Option<Arc<ChatSession>> {
        self.session.as_ref().map(Arc::clone)
    }
}
