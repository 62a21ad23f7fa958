//! Message handling: the single place where async results mutate state.

use crate::app::{spawn_code_refresh, spawn_entry_load, App, AppMessage};
use crate::traits::HttpClient;

impl<C: HttpClient + 'static> App<C> {
    /// Apply one message from the async channel.
    ///
    /// Two refresh cadences meet here and stay distinct: a fresh listing
    /// fetches every code immediately, and each step boundary re-fetches
    /// all tracked entries. An entry added mid-window therefore shows a
    /// code right away and falls in with the batch at the next boundary.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::CountdownTick { seconds_remaining } => {
                if self.seconds_remaining != seconds_remaining {
                    self.seconds_remaining = seconds_remaining;
                    self.mark_dirty();
                }
            }
            AppMessage::StepBoundary => {
                spawn_code_refresh(self.api.clone(), self.entry_ids(), self.message_tx.clone());
            }
            AppMessage::EntriesLoaded { entries } => {
                self.set_entries(entries);
                // Immediate fetch for the freshly listed entries.
                spawn_code_refresh(self.api.clone(), self.entry_ids(), self.message_tx.clone());
            }
            AppMessage::EntriesLoadFailed { error } => {
                tracing::warn!(error = %error, "keeping stale entry list");
                self.set_status("Could not load authenticators", true);
            }
            AppMessage::CodeFetched { id, code } => {
                self.apply_code(id, code);
            }
            AppMessage::EntryCreated { service_name } => {
                self.close_add_dialog();
                self.set_status(format!("Added {}", service_name), false);
                spawn_entry_load(self.api.clone(), self.message_tx.clone());
            }
            AppMessage::EntryCreateFailed { error } => {
                if let Some(dialog) = self.add_dialog.as_mut() {
                    dialog.submitting = false;
                    dialog.error =
                        Some("Failed to add. Ensure the secret is a valid Base32 key.".to_string());
                    tracing::warn!(error = %error, "entry create rejected");
                } else {
                    self.set_status(error, true);
                }
                self.mark_dirty();
            }
            AppMessage::EntryDeleted => {
                self.set_status("Service deleted", false);
                spawn_entry_load(self.api.clone(), self.message_tx.clone());
            }
            AppMessage::EntryDeleteFailed { error } => {
                self.set_status(format!("Delete failed: {}", error), true);
            }
            AppMessage::LogsLoaded { logs } => {
                self.logs = logs;
                self.mark_dirty();
            }
            AppMessage::LogsLoadFailed { error } => {
                self.set_status(format!("Could not load activity logs: {}", error), true);
            }
            AppMessage::QrDecoded { credential } => {
                if let Some(dialog) = self.add_dialog.as_mut() {
                    dialog.prefill(credential);
                    self.mark_dirty();
                }
            }
            AppMessage::QrFailed { error } => {
                if let Some(dialog) = self.add_dialog.as_mut() {
                    dialog.error = Some(error);
                    self.mark_dirty();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockHttpClient;
    use crate::api::ChronoApiClient;
    use crate::clipboard::MemoryClipboard;
    use crate::models::ProvisioningCredential;
    use crate::qr::RqrrDecoder;
    use std::sync::Arc;

    fn test_app() -> App<MockHttpClient> {
        let api = Arc::new(ChronoApiClient::new(MockHttpClient::new(), "http://x"));
        App::new(
            api,
            "thanapat",
            Arc::new(RqrrDecoder),
            Box::new(MemoryClipboard::default()),
        )
    }

    #[tokio::test]
    async fn test_tick_updates_countdown() {
        let mut app = test_app();
        app.needs_redraw = false;
        app.handle_message(AppMessage::CountdownTick {
            seconds_remaining: 12,
        });
        assert_eq!(app.seconds_remaining, 12);
        assert!(app.needs_redraw);

        // Same value again: no redraw churn.
        app.needs_redraw = false;
        app.handle_message(AppMessage::CountdownTick {
            seconds_remaining: 12,
        });
        assert!(!app.needs_redraw);
    }

    #[tokio::test]
    async fn test_qr_decoded_prefills_open_dialog() {
        let mut app = test_app();
        app.open_add_dialog();
        app.handle_message(AppMessage::QrDecoded {
            credential: ProvisioningCredential {
                service_name: "GitHub".to_string(),
                secret: "JBSWY3DPEHPK3PXP".to_string(),
            },
        });
        let dialog = app.add_dialog.as_ref().unwrap();
        assert_eq!(dialog.service_name, "GitHub");
        assert_eq!(dialog.secret, "JBSWY3DPEHPK3PXP");
    }

    #[tokio::test]
    async fn test_qr_decoded_without_dialog_is_ignored() {
        let mut app = test_app();
        app.handle_message(AppMessage::QrDecoded {
            credential: ProvisioningCredential {
                service_name: "GitHub".to_string(),
                secret: "JBSWY3DPEHPK3PXP".to_string(),
            },
        });
        assert!(app.add_dialog.is_none());
    }

    #[tokio::test]
    async fn test_qr_failure_shows_in_dialog() {
        let mut app = test_app();
        app.open_add_dialog();
        app.handle_message(AppMessage::QrFailed {
            error: "No secret found in QR code!".to_string(),
        });
        assert_eq!(
            app.add_dialog.as_ref().unwrap().error.as_deref(),
            Some("No secret found in QR code!")
        );
    }

    #[tokio::test]
    async fn test_create_failure_reopens_form() {
        let mut app = test_app();
        app.open_add_dialog();
        app.add_dialog.as_mut().unwrap().submitting = true;
        app.handle_message(AppMessage::EntryCreateFailed {
            error: "server said no".to_string(),
        });
        let dialog = app.add_dialog.as_ref().unwrap();
        assert!(!dialog.submitting);
        assert!(dialog.error.is_some());
    }

    #[tokio::test]
    async fn test_entry_created_closes_dialog() {
        let mut app = test_app();
        app.open_add_dialog();
        app.handle_message(AppMessage::EntryCreated {
            service_name: "GitHub".to_string(),
        });
        assert!(app.add_dialog.is_none());
        assert!(!app.status.as_ref().unwrap().is_error);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_stale_entries() {
        let mut app = test_app();
        app.set_entries(
            serde_json::from_str(r#"[{"id": 1, "serviceName": "GitHub"}]"#).unwrap(),
        );
        app.apply_code(1, "492039".to_string());
        app.handle_message(AppMessage::EntriesLoadFailed {
            error: "connection refused".to_string(),
        });
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].code, "492039");
    }
}
