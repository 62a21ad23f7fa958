//! Application state and logic for the TUI.
//!
//! This module contains the core [`App`] struct and related types:
//! - [`Screen`] - which view is currently displayed
//! - [`AddEntryDialog`] - state of the add-entry modal
//! - [`AppMessage`] - messages for async communication
//!
//! `App` is generic over the HTTP client so integration tests can run the
//! whole dashboard flow against the recording mock.

mod actions;
mod handlers;
mod messages;

pub use actions::{
    spawn_code_refresh, spawn_entry_create, spawn_entry_delete, spawn_entry_load, spawn_logs_load,
    spawn_qr_decode,
};
pub use messages::AppMessage;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::ChronoApiClient;
use crate::clipboard::Clipboard;
use crate::countdown::STEP_SECONDS;
use crate::models::{ActivityLog, EntrySummary, OtpEntry, ProvisioningCredential, CODE_PLACEHOLDER};
use crate::qr::{is_image_file_path, QrDecoder};
use crate::traits::HttpClient;

/// Which view is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The authenticator grid.
    Dashboard,
    /// The activity-log table.
    Logs,
}

/// Which onboarding method the add dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTab {
    Qr,
    Manual,
}

/// Which manual-entry field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualField {
    Name,
    Secret,
}

/// State of the add-entry modal.
#[derive(Debug, Clone)]
pub struct AddEntryDialog {
    pub tab: AddTab,
    pub field: ManualField,
    pub service_name: String,
    pub secret: String,
    /// Path of the QR image to decode, pasted or typed.
    pub qr_path: String,
    pub error: Option<String>,
    /// A create request is in flight; block re-submits.
    pub submitting: bool,
}

impl Default for AddEntryDialog {
    fn default() -> Self {
        Self {
            tab: AddTab::Qr,
            field: ManualField::Name,
            service_name: String::new(),
            secret: String::new(),
            qr_path: String::new(),
            error: None,
            submitting: false,
        }
    }
}

impl AddEntryDialog {
    /// Pre-fill the manual tab from a decoded credential and switch to it
    /// so the user confirms before anything is submitted.
    pub fn prefill(&mut self, credential: ProvisioningCredential) {
        self.service_name = credential.service_name;
        self.secret = credential.secret;
        self.tab = AddTab::Manual;
        self.field = ManualField::Name;
        self.error = None;
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            AddTab::Qr => AddTab::Manual,
            AddTab::Manual => AddTab::Qr,
        };
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            ManualField::Name => ManualField::Secret,
            ManualField::Secret => ManualField::Name,
        };
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.tab {
            AddTab::Qr => &mut self.qr_path,
            AddTab::Manual => match self.field {
                ManualField::Name => &mut self.service_name,
                ManualField::Secret => &mut self.secret,
            },
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.active_field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.active_field_mut().pop();
    }

    /// Handle pasted text. On the QR tab a pasted image path replaces the
    /// path field wholesale (drag-and-drop pastes the path as text);
    /// anything else appends to the focused field.
    pub fn paste(&mut self, text: &str) {
        if self.tab == AddTab::Qr && is_image_file_path(text) {
            self.qr_path = text.trim().to_string();
            return;
        }
        self.active_field_mut().push_str(text.trim_end_matches('\n'));
    }
}

/// A transient footer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state.
///
/// The entry set is owned here exclusively: the full-list reload path
/// replaces it and the merge-by-id path mutates a single `code` field.
/// Both run on the main loop, so there is a single writer.
pub struct App<C> {
    /// Signed-in username, for the header and owner badges.
    pub username: String,
    pub screen: Screen,
    pub entries: Vec<OtpEntry>,
    pub logs: Vec<ActivityLog>,
    /// Index of the selected entry on the dashboard.
    pub selected: usize,
    /// Shared countdown display, derived from the wall clock each tick.
    pub seconds_remaining: u64,
    pub add_dialog: Option<AddEntryDialog>,
    /// Entry id awaiting delete confirmation.
    pub pending_delete: Option<i64>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub api: Arc<ChronoApiClient<C>>,
    pub qr_decoder: Arc<dyn QrDecoder>,
    pub clipboard: Box<dyn Clipboard>,
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Taken by the main loop for `select!`.
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
}

impl<C: HttpClient + 'static> App<C> {
    pub fn new(
        api: Arc<ChronoApiClient<C>>,
        username: impl Into<String>,
        qr_decoder: Arc<dyn QrDecoder>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            username: username.into(),
            screen: Screen::Dashboard,
            entries: Vec::new(),
            logs: Vec::new(),
            selected: 0,
            seconds_remaining: STEP_SECONDS,
            add_dialog: None,
            pending_delete: None,
            status: None,
            should_quit: false,
            needs_redraw: true,
            api,
            qr_decoder,
            clipboard,
            message_tx,
            message_rx: Some(message_rx),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // -----------------------------------------------------------------
    // Entry set
    // -----------------------------------------------------------------

    /// Replace the entry set from a fresh listing. Every code starts at
    /// the placeholder; the caller issues the immediate per-entry fetches.
    pub fn set_entries(&mut self, summaries: Vec<EntrySummary>) {
        self.entries = summaries.into_iter().map(OtpEntry::from).collect();
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        self.mark_dirty();
    }

    /// Merge one fetched code by id. A response for an id we no longer
    /// track (deleted meanwhile) is dropped; a duplicate response is a
    /// no-op beyond rewriting the same code.
    pub fn apply_code(&mut self, id: i64, code: String) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.code = code;
            self.mark_dirty();
        }
    }

    pub fn entry_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn selected_entry(&self) -> Option<&OtpEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() && self.selected + 1 < self.entries.len() {
            self.selected += 1;
            self.mark_dirty();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.mark_dirty();
        }
    }

    // -----------------------------------------------------------------
    // Views and dialogs
    // -----------------------------------------------------------------

    /// Toggle between the dashboard and the activity log. Entering the
    /// log view fetches it.
    pub fn toggle_logs(&mut self) {
        self.screen = match self.screen {
            Screen::Dashboard => {
                spawn_logs_load(self.api.clone(), self.message_tx.clone());
                Screen::Logs
            }
            Screen::Logs => Screen::Dashboard,
        };
        self.mark_dirty();
    }

    pub fn open_add_dialog(&mut self) {
        self.add_dialog = Some(AddEntryDialog::default());
        self.mark_dirty();
    }

    pub fn close_add_dialog(&mut self) {
        self.add_dialog = None;
        self.mark_dirty();
    }

    /// Submit the add dialog. On the QR tab this kicks off the decode of
    /// the named image; on the manual tab it creates the entry.
    pub fn submit_add(&mut self) {
        let Some(dialog) = self.add_dialog.as_mut() else {
            return;
        };
        if dialog.submitting {
            return;
        }
        match dialog.tab {
            AddTab::Qr => {
                let path = dialog.qr_path.trim().to_string();
                if path.is_empty() {
                    dialog.error = Some("Paste or type the path of a QR image.".to_string());
                } else {
                    dialog.error = None;
                    spawn_qr_decode(self.qr_decoder.clone(), path, self.message_tx.clone());
                }
            }
            AddTab::Manual => {
                if dialog.service_name.trim().is_empty() || dialog.secret.trim().is_empty() {
                    dialog.error = Some("Service name and secret are required.".to_string());
                } else {
                    dialog.error = None;
                    dialog.submitting = true;
                    spawn_entry_create(
                        self.api.clone(),
                        dialog.service_name.trim().to_string(),
                        dialog.secret.clone(),
                        self.message_tx.clone(),
                    );
                }
            }
        }
        self.mark_dirty();
    }

    /// Ask for confirmation before deleting the selected entry.
    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_entry().map(|e| e.id) {
            self.pending_delete = Some(id);
            self.mark_dirty();
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mark_dirty();
    }

    /// Confirmed: issue the delete. The local set is only mutated once
    /// the server confirms and the list is refetched.
    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            spawn_entry_delete(self.api.clone(), id, self.message_tx.clone());
            self.mark_dirty();
        }
    }

    /// Copy the selected entry's code to the clipboard.
    pub fn copy_selected_code(&mut self) {
        let Some((code, name)) = self
            .entries
            .get(self.selected)
            .map(|e| (e.code.clone(), e.service_name.clone()))
        else {
            return;
        };
        if code == CODE_PLACEHOLDER {
            self.set_status("No code to copy yet", true);
            return;
        }
        match self.clipboard.set_text(&code) {
            Ok(()) => self.set_status(format!("Copied code for {}", name), false),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.set_status("Clipboard unavailable", true);
            }
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
        });
        self.mark_dirty();
    }
}
