//! Embeddable AI assistant for the Ativos inventory platform.
//!
//! A host surface mounts [`AssistantWidget`], which probes the backend once
//! for the remote generation capability and gates the whole feature on the
//! result. An open session gathers equipment and license context for every
//! prompt, both fetches running concurrently, and asks the backend to
//! generate a reply grounded in that snapshot.

pub mod backend;
pub mod context;
pub mod error;
pub mod probe;
pub mod session;
pub mod widget;

pub use backend::{AssistantBackend, StaticBackend};
pub use context::{ContextAggregator, ContextSnapshot};
pub use error::{AssistantError, BackendError};
pub use probe::{Availability, StatusProbe};
pub use session::{
    ChatSession, Message, MessageSender, SessionEvent, SessionPhase, SubmitOutcome,
};
pub use widget::AssistantWidget;
