//! Error types for the assistant pipeline.

/// Errors a backend implementation can produce.
///
/// `Clone` so scripted test backends can replay a stored failure on every
/// call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("backend error: {0}")]
    Service(String),
}

/// Failures of one assistant turn, classified by pipeline stage.
///
/// The failing backend error is carried whole rather than flattened to a
/// string; [`AssistantError::user_message`] is the one place it becomes
/// user-facing text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssistantError {
    /// The generation capability is not available for this process.
    #[error("assistant unavailable")]
    Unavailable,
    /// An inventory fetch failed; generation was never attempted.
    #[error("context fetch failed: {0}")]
    ContextFetch(BackendError),
    /// Context was gathered but the generator call failed.
    #[error("report generation failed: {0}")]
    Generation(BackendError),
}

impl AssistantError {
    /// Transcript-facing text for a failed turn.
    ///
    /// Copy is Portuguese to match the rest of the product surface; callers
    /// append the result verbatim as an assistant message.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Unavailable => {
                "Desculpe, o assistente não está disponível no momento.".to_string()
            }
            AssistantError::ContextFetch(e) => {
                format!("Desculpe, não consegui consultar o inventário agora. ({})", e)
            }
            AssistantError::Generation(e) => {
                format!("Desculpe, ocorreu um erro ao gerar a resposta. ({})", e)
            }
        }
    }
}
