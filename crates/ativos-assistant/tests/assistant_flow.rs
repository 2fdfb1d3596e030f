//! End-to-end tests for the assistant widget.
//!
//! Drives the public surface the way a host application would: mount the
//! widget, open the panel, type or pick a prompt, submit, and watch the
//! transcript and events. Each test wires its own backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use ativos_assistant::{
    AssistantBackend, AssistantError, AssistantWidget, Availability, BackendError, MessageSender,
    SessionEvent, SessionPhase, StaticBackend, SubmitOutcome,
};
use ativos_core::config::AssistantConfig;
use ativos_core::types::{
    CapabilityStatus, Equipment, EquipmentStatus, GeneratedReport, Identity, License,
    LicenseStatus,
};

// =============================================================================
// Helpers
// =============================================================================

fn identity() -> Identity {
    Identity::new("marcelo.reis")
}

fn sample_equipment() -> Vec<Equipment> {
    vec![
        Equipment {
            id: Uuid::new_v4(),
            name: "Notebook Dell Latitude 5440".to_string(),
            serial_number: "BR-1001".to_string(),
            status: EquipmentStatus::InUse,
            assigned_to: Some("Marcelo Reis".to_string()),
        },
        Equipment {
            id: Uuid::new_v4(),
            name: "Monitor LG 27\"".to_string(),
            serial_number: "BR-1002".to_string(),
            status: EquipmentStatus::InStock,
            assigned_to: None,
        },
    ]
}

fn sample_licenses() -> Vec<License> {
    vec![License {
        id: Uuid::new_v4(),
        product: "Microsoft 365 E3".to_string(),
        seats: 25,
        status: LicenseStatus::Active,
        expires_at: None,
        assigned_to: None,
    }]
}

fn stocked_backend() -> StaticBackend {
    StaticBackend::new().with_inventory(sample_equipment(), sample_licenses())
}

async fn mount(backend: StaticBackend) -> AssistantWidget {
    AssistantWidget::mount(Arc::new(backend), identity(), AssistantConfig::default()).await
}

/// Backend whose generation call blocks until the gate is released.
struct GatedBackend {
    gate: Arc<Notify>,
}

#[async_trait]
impl AssistantBackend for GatedBackend {
    async fn check_availability(&self) -> Result<CapabilityStatus, BackendError> {
        Ok(CapabilityStatus {
            has_capability: true,
        })
    }

    async fn fetch_equipment(&self, _identity: &Identity) -> Result<Vec<Equipment>, BackendError> {
        Ok(vec![])
    }

    async fn fetch_licenses(&self, _identity: &Identity) -> Result<Vec<License>, BackendError> {
        Ok(vec![])
    }

    async fn generate_report(
        &self,
        prompt: &str,
        _equipment: &[Equipment],
        _licenses: &[License],
    ) -> Result<GeneratedReport, BackendError> {
        self.gate.notified().await;
        Ok(GeneratedReport {
            report: format!("resposta: {}", prompt),
        })
    }
}

// =============================================================================
// Availability gating
// =============================================================================

#[tokio::test]
async fn test_probe_error_hides_widget_entirely() {
    let backend =
        StaticBackend::new().failing_status(BackendError::Network("unreachable".to_string()));
    let mut widget = mount(backend).await;

    assert!(!widget.is_visible());
    assert!(matches!(widget.open(), Err(AssistantError::Unavailable)));
    assert!(widget.session().is_none());
}

#[tokio::test]
async fn test_missing_capability_hides_widget() {
    let mut widget = mount(StaticBackend::new().without_capability()).await;
    assert!(!widget.is_visible());
    assert!(widget.open().is_err());
}

#[tokio::test]
async fn test_injected_availability_skips_probing() {
    let backend = StaticBackend::new();
    let mut widget = AssistantWidget::new(
        Availability::available(),
        Arc::new(backend.clone()),
        identity(),
        AssistantConfig::default(),
    );
    assert!(widget.is_visible());
    assert!(widget.open().is_ok());
    assert_eq!(backend.status_calls(), 0);
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_full_turn_through_widget() {
    let mut widget = mount(stocked_backend()).await;
    assert!(widget.is_visible());

    let session = widget.open().unwrap();
    session.set_input("Liste todos os equipamentos em estoque.");
    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Answered);
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3); // greeting + user + assistant
    assert_eq!(transcript[1].sender, MessageSender::User);
    assert_eq!(transcript[2].sender, MessageSender::Assistant);
    assert!(transcript[2].text.contains("2 equipamentos"));
    assert!(transcript[2].text.contains("1 licenças"));
    assert!(session.pending_input().is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_quick_prompt_flow() {
    let mut widget = mount(stocked_backend()).await;
    let session = widget.open().unwrap();

    assert!(session.apply_quick_prompt(0));
    assert_eq!(session.pending_input(), "Quantos notebooks estão em uso?");

    let outcome = session.submit().await;
    assert_eq!(outcome, SubmitOutcome::Answered);
    assert_eq!(
        session.transcript()[1].text,
        "Quantos notebooks estão em uso?"
    );
}

#[tokio::test]
async fn test_empty_inventory_still_answers() {
    let mut widget = mount(StaticBackend::new()).await;
    let session = widget.open().unwrap();
    session.set_input("Qual equipamento está com o usuário 'Marcelo Reis'?");

    assert_eq!(session.submit().await, SubmitOutcome::Answered);
    let reply = &session.transcript()[2];
    assert!(reply.text.contains("0 equipamentos"));
    assert!(reply.text.contains("0 licenças"));
}

#[tokio::test]
async fn test_transcript_events_follow_growth() {
    let mut widget = mount(stocked_backend()).await;
    let session = widget.open().unwrap();
    let mut rx = session.subscribe();

    session.set_input("pergunta");
    session.submit().await;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], SessionEvent::MessageAppended { index: 1 });
    assert_eq!(
        events[1],
        SessionEvent::PhaseChanged { generating: true }
    );
    assert_eq!(events[2], SessionEvent::MessageAppended { index: 2 });
    assert_eq!(
        events[3],
        SessionEvent::PhaseChanged { generating: false }
    );
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_fetch_failure_reports_in_transcript_and_recovers() {
    let backend = stocked_backend()
        .failing_equipment(BackendError::Unauthorized("sessão expirada".to_string()));
    let mut widget = mount(backend.clone()).await;
    let session = widget.open().unwrap();

    session.set_input("Quantos notebooks estão em uso?");
    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    // Generator untouched; error surfaced as a normal assistant message
    assert_eq!(backend.generation_calls(), 0);
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[2].sender, MessageSender::Assistant);
    assert!(transcript[2]
        .text
        .starts_with("Desculpe, não consegui consultar o inventário agora."));

    // The session stays usable for the next turn
    assert_eq!(session.phase(), SessionPhase::Idle);
    session.set_input("tentando de novo");
    assert_eq!(session.submit().await, SubmitOutcome::Failed);
    assert_eq!(session.transcript().len(), 5);
}

#[tokio::test]
async fn test_generation_failure_reports_in_transcript() {
    let backend =
        stocked_backend().failing_generation(BackendError::Service("cota excedida".to_string()));
    let mut widget = mount(backend.clone()).await;
    let session = widget.open().unwrap();

    session.set_input("pergunta");
    assert_eq!(session.submit().await, SubmitOutcome::Failed);
    assert_eq!(backend.equipment_calls(), 1);
    assert_eq!(backend.license_calls(), 1);
    assert!(session.transcript()[2]
        .text
        .starts_with("Desculpe, ocorreu um erro ao gerar a resposta."));
}

// =============================================================================
// Guards
// =============================================================================

#[tokio::test]
async fn test_whitespace_submit_changes_nothing() {
    let mut widget = mount(stocked_backend()).await;
    let session = widget.open().unwrap();

    session.set_input("   ");
    assert_eq!(session.submit().await, SubmitOutcome::IgnoredEmpty);
    assert_eq!(session.pending_input(), "   ");
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_submit_while_busy_is_ignored() {
    let gate = Arc::new(Notify::new());
    let mut widget = AssistantWidget::new(
        Availability::available(),
        Arc::new(GatedBackend {
            gate: Arc::clone(&gate),
        }),
        identity(),
        AssistantConfig::default(),
    );
    let session = widget.open().unwrap();

    session.set_input("primeira");
    let worker = Arc::clone(&session);
    let handle = tokio::spawn(async move { worker.submit().await });
    while !session.is_generating() {
        tokio::task::yield_now().await;
    }

    session.set_input("segunda");
    assert_eq!(session.submit().await, SubmitOutcome::IgnoredBusy);
    assert_eq!(session.transcript().len(), 2); // greeting + first user message

    gate.notify_one();
    assert_eq!(handle.await.unwrap(), SubmitOutcome::Answered);
    assert_eq!(session.transcript().len(), 3);
}

// =============================================================================
// Close semantics
// =============================================================================

#[tokio::test]
async fn test_close_discards_conversation() {
    let mut widget = mount(stocked_backend()).await;
    let session = widget.open().unwrap();
    session.set_input("pergunta");
    session.submit().await;
    let old_id = session.id();

    widget.close();
    assert!(!widget.is_open());

    let fresh = widget.open().unwrap();
    assert_ne!(fresh.id(), old_id);
    assert_eq!(fresh.transcript().len(), 1); // greeting only
}

#[tokio::test]
async fn test_close_with_turn_in_flight_discards_silently() {
    let gate = Arc::new(Notify::new());
    let mut widget = AssistantWidget::new(
        Availability::available(),
        Arc::new(GatedBackend {
            gate: Arc::clone(&gate),
        }),
        identity(),
        AssistantConfig::default(),
    );
    let session = widget.open().unwrap();

    session.set_input("pergunta lenta");
    let worker = Arc::clone(&session);
    let handle = tokio::spawn(async move { worker.submit().await });
    while !session.is_generating() {
        tokio::task::yield_now().await;
    }

    // Close while the request is still in flight
    widget.close();
    assert!(!widget.is_open());

    // The detached turn settles against its own handle, nothing panics,
    // and the result goes nowhere visible.
    gate.notify_one();
    assert_eq!(handle.await.unwrap(), SubmitOutcome::Answered);
    assert_eq!(session.transcript().len(), 3);
    assert!(widget.session().is_none());

    // Reopening starts over
    let fresh = widget.open().unwrap();
    assert_ne!(fresh.id(), session.id());
    assert_eq!(fresh.transcript().len(), 1);
}
