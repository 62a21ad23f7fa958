//! AppMessage enum for async communication within the application.

use crate::models::{ActivityLog, EntrySummary, ProvisioningCredential};

/// Messages received from async operations (timer ticks, API fetches,
/// QR decoding). All state mutation happens on the main loop in response
/// to these, which keeps the entry set single-writer.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Countdown recomputed from the wall clock
    CountdownTick { seconds_remaining: u64 },
    /// A 30-second step window rolled over - refresh all codes
    StepBoundary,
    /// Entry listing arrived
    EntriesLoaded { entries: Vec<EntrySummary> },
    /// Entry listing failed
    EntriesLoadFailed { error: String },
    /// A single entry's fresh code arrived
    CodeFetched { id: i64, code: String },
    /// New entry accepted by the server
    EntryCreated { service_name: String },
    /// New entry rejected
    EntryCreateFailed { error: String },
    /// Entry deletion confirmed by the server
    EntryDeleted,
    /// Entry deletion failed
    EntryDeleteFailed { error: String },
    /// Activity log arrived
    LogsLoaded { logs: Vec<ActivityLog> },
    /// Activity log failed to load
    LogsLoadFailed { error: String },
    /// A QR image decoded and parsed into a credential
    QrDecoded { credential: ProvisioningCredential },
    /// QR upload failed (unreadable file, no QR, bad provisioning URI)
    QrFailed { error: String },
}
