use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of a piece of equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    /// Assigned to a user and in active use.
    InUse,
    /// Available in stock, unassigned.
    InStock,
    /// Temporarily out of service for repair.
    Maintenance,
    /// Permanently decommissioned.
    Retired,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EquipmentStatus::InUse => "in_use",
            EquipmentStatus::InStock => "in_stock",
            EquipmentStatus::Maintenance => "maintenance",
            EquipmentStatus::Retired => "retired",
        };
        write!(f, "{}", label)
    }
}

/// Validity status of a software license.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Valid, with no expiry pressure.
    Active,
    /// Valid but close to its expiry date.
    Expiring,
    /// Past its expiry date.
    Expired,
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LicenseStatus::Active => "active",
            LicenseStatus::Expiring => "expiring",
            LicenseStatus::Expired => "expired",
        };
        write!(f, "{}", label)
    }
}

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Opaque principal on whose behalf inventory is fetched.
///
/// The assistant pipeline never inspects the inner value; it is handed to the
/// backend verbatim so that fetches are scoped the same way the host scopes
/// everything else.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Inventory Records
// =============================================================================

/// One tracked piece of equipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    /// Human-readable model name, e.g. "Notebook Dell Latitude 5440".
    pub name: String,
    pub serial_number: String,
    pub status: EquipmentStatus,
    /// Display name of the current holder, if assigned.
    pub assigned_to: Option<String>,
}

/// One software license entitlement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: Uuid,
    /// Licensed product name, e.g. "Microsoft 365 E3".
    pub product: String,
    pub seats: u32,
    pub status: LicenseStatus,
    /// Expiry date; perpetual licenses carry none.
    pub expires_at: Option<DateTime<Utc>>,
    /// Display name of the current holder, if assigned.
    pub assigned_to: Option<String>,
}

// =============================================================================
// Backend Payloads
// =============================================================================

/// Availability descriptor returned by the status endpoint.
///
/// Reports only whether the remote generation capability is configured for
/// this deployment; nothing else about the backend is disclosed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityStatus {
    pub has_capability: bool,
}

/// Generated reply envelope from the report endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report: String,
}
