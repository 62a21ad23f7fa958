//! Async actions spawned by the app.
//!
//! Every action is fire-and-forget: it runs on the runtime, reports back
//! through the [`AppMessage`] channel, and never blocks the main loop.
//! Background refresh failures are logged and swallowed here - a missed
//! refresh self-corrects at the next step boundary, so it is not worth a
//! user-facing error.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::ChronoApiClient;
use crate::app::AppMessage;
use crate::provisioning::{parse_otpauth_uri, ParseError};
use crate::qr::{decode_qr_file, QrDecoder, QrError};
use crate::traits::HttpClient;

/// Fetch the full entry listing.
pub fn spawn_entry_load<C: HttpClient + 'static>(
    api: Arc<ChronoApiClient<C>>,
    tx: UnboundedSender<AppMessage>,
) {
    tokio::spawn(async move {
        match api.fetch_entries().await {
            Ok(entries) => {
                let _ = tx.send(AppMessage::EntriesLoaded { entries });
            }
            Err(e) => {
                tracing::warn!(error = %e, "entry listing failed");
                let _ = tx.send(AppMessage::EntriesLoadFailed {
                    error: e.to_string(),
                });
            }
        }
    });
}

/// The batched fan-out: one independent fetch per tracked entry.
///
/// Each id gets its own task, so the requests run concurrently, complete
/// in any order, and one failure never blocks the rest. Failures are
/// swallowed (logged at warn): the stale code stays on screen and the
/// next boundary retries naturally.
pub fn spawn_code_refresh<C: HttpClient + 'static>(
    api: Arc<ChronoApiClient<C>>,
    ids: Vec<i64>,
    tx: UnboundedSender<AppMessage>,
) {
    for id in ids {
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match api.fetch_code(id).await {
                Ok(code) => {
                    let _ = tx.send(AppMessage::CodeFetched { id, code });
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "code refresh failed");
                }
            }
        });
    }
}

/// Create an entry; the secret is normalized at the API boundary.
pub fn spawn_entry_create<C: HttpClient + 'static>(
    api: Arc<ChronoApiClient<C>>,
    service_name: String,
    secret: String,
    tx: UnboundedSender<AppMessage>,
) {
    tokio::spawn(async move {
        match api.create_entry(&service_name, &secret).await {
            Ok(()) => {
                let _ = tx.send(AppMessage::EntryCreated { service_name });
            }
            Err(e) => {
                tracing::warn!(error = %e, "entry create failed");
                let _ = tx.send(AppMessage::EntryCreateFailed {
                    error: e.to_string(),
                });
            }
        }
    });
}

/// Delete an entry by id.
pub fn spawn_entry_delete<C: HttpClient + 'static>(
    api: Arc<ChronoApiClient<C>>,
    id: i64,
    tx: UnboundedSender<AppMessage>,
) {
    tokio::spawn(async move {
        match api.delete_entry(id).await {
            Ok(()) => {
                let _ = tx.send(AppMessage::EntryDeleted);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "entry delete failed");
                let _ = tx.send(AppMessage::EntryDeleteFailed {
                    error: e.to_string(),
                });
            }
        }
    });
}

/// Fetch the activity log.
pub fn spawn_logs_load<C: HttpClient + 'static>(
    api: Arc<ChronoApiClient<C>>,
    tx: UnboundedSender<AppMessage>,
) {
    tokio::spawn(async move {
        match api.fetch_logs().await {
            Ok(logs) => {
                let _ = tx.send(AppMessage::LogsLoaded { logs });
            }
            Err(e) => {
                tracing::warn!(error = %e, "activity log fetch failed");
                let _ = tx.send(AppMessage::LogsLoadFailed {
                    error: e.to_string(),
                });
            }
        }
    });
}

/// Decode a QR image file and parse its provisioning URI.
///
/// File IO and pixel work run on the blocking pool. Each failure class
/// gets its own user-facing message - never a generic "error".
pub fn spawn_qr_decode(
    decoder: Arc<dyn QrDecoder>,
    path: String,
    tx: UnboundedSender<AppMessage>,
) {
    tokio::task::spawn_blocking(move || {
        let payload = match decode_qr_file(decoder.as_ref(), &path) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "qr decode failed");
                let _ = tx.send(AppMessage::QrFailed {
                    error: describe_qr_error(&e),
                });
                return;
            }
        };
        match parse_otpauth_uri(&payload) {
            Ok(credential) => {
                let _ = tx.send(AppMessage::QrDecoded { credential });
            }
            Err(e) => {
                tracing::debug!(error = %e, "provisioning uri rejected");
                let _ = tx.send(AppMessage::QrFailed {
                    error: describe_parse_error(&e),
                });
            }
        }
    });
}

/// User-facing messages for provisioning parse failures.
fn describe_parse_error(error: &ParseError) -> String {
    match error {
        ParseError::UnsupportedScheme => {
            "Invalid QR code type. Only TOTP codes are supported.".to_string()
        }
        ParseError::MalformedUri(_) => "Failed to parse the QR code data.".to_string(),
        ParseError::MissingSecret => "No secret found in QR code!".to_string(),
    }
}

/// User-facing messages for QR ingestion failures.
fn describe_qr_error(error: &QrError) -> String {
    match error {
        QrError::NotFound => {
            "No QR code found in the image. Please try a clearer image.".to_string()
        }
        QrError::UnreadableImage(_) | QrError::FileError(_) => {
            "Could not read that image file.".to_string()
        }
    }
}
