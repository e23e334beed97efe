// 🗂️ Dashboard - the page container
//
// Owns every piece of session state. Views read from it and report user
// actions back as `DashboardEvent`s; nothing else mutates it.

use crate::claims::{load_claims_csv, sample_denials, Claim};
use crate::config::AppConfig;
use crate::documents::{DocumentCategory, DocumentLibrary, FileDescriptor, UploadZone};
use crate::error::{AppealsError, Result};
use crate::verification::{Clock, SequencerEvent, VerificationSequencer};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

const MAX_NOTIFICATIONS: usize = 50;

/// A toast-style message for the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Increases with every notification, even after old ones are dropped
    pub seq: u64,
    pub title: String,
    pub description: String,
    pub raised_at_ms: i64,
}

/// Actions reported by the views
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    GenerateSamples,
    ClaimClicked(String),
    CsvUpload(Vec<FileDescriptor>),
    DocumentUpload(Vec<FileDescriptor>),
    EditDraft(String),
    SendAppeal,
    Close,
}

pub struct Dashboard {
    claims: Vec<Claim>,
    documents: DocumentLibrary,
    selected: Option<Claim>,
    modal_open: bool,
    verification: VerificationSequencer,
    notifications: VecDeque<Notification>,
    next_seq: u64,
    clock: Arc<dyn Clock>,
}

impl Dashboard {
    pub fn new(verification: VerificationSequencer, clock: Arc<dyn Clock>) -> Self {
        Dashboard {
            claims: Vec::new(),
            documents: DocumentLibrary::new(),
            selected: None,
            modal_open: false,
            verification,
            notifications: VecDeque::new(),
            next_seq: 1,
            clock,
        }
    }

    /// Build from configuration, seeding the table from the claims CSV or
    /// the sample list when configured to.
    pub fn from_config(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let sequencer =
            VerificationSequencer::new(config.verification.clone(), config.appeal.clone());
        let mut dashboard = Dashboard::new(sequencer, clock);

        if let Some(path) = &config.data.claims_csv {
            let claims = load_claims_csv(path)?;
            tracing::info!(path = %path.display(), count = claims.len(), "Loaded claims CSV");
            dashboard.claims = claims;
        } else if config.data.load_samples_on_start {
            dashboard.claims = sample_denials();
        }

        Ok(dashboard)
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn documents(&self) -> &DocumentLibrary {
        &self.documents
    }

    pub fn selected_claim(&self) -> Option<&Claim> {
        self.selected.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn verification(&self) -> &VerificationSequencer {
        &self.verification
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn dispatch(&mut self, event: DashboardEvent) -> Result<()> {
        tracing::debug!(?event, "Dashboard event");
        match event {
            DashboardEvent::GenerateSamples => self.generate_sample_denials(),
            DashboardEvent::ClaimClicked(id) => self.claim_clicked(&id)?,
            DashboardEvent::CsvUpload(files) => {
                self.upload_csv(&files);
            }
            DashboardEvent::DocumentUpload(files) => {
                self.upload_documents(&files);
            }
            DashboardEvent::EditDraft(text) => self.edit_draft(text)?,
            DashboardEvent::SendAppeal => {
                self.send_appeal()?;
            }
            DashboardEvent::Close => self.close_modal(),
        }
        Ok(())
    }

    pub fn generate_sample_denials(&mut self) {
        self.claims = sample_denials();
        self.notify(
            "Sample Data Generated",
            format!(
                "{} sample claim denials have been loaded into the table.",
                self.claims.len()
            ),
        );
    }

    /// Select the claim, open the modal and (re)start its verification
    pub fn claim_clicked(&mut self, claim_id: &str) -> Result<()> {
        let claim = self
            .claims
            .iter()
            .find(|c| c.id == claim_id)
            .cloned()
            .ok_or_else(|| AppealsError::ClaimNotFound(claim_id.to_string()))?;

        self.verification.start(claim.clone(), self.clock.as_ref());
        self.selected = Some(claim);
        self.modal_open = true;
        Ok(())
    }

    /// CSV zone: acknowledge the first `.csv` of the batch. Contents are not
    /// read. Returns the accepted name.
    pub fn upload_csv(&mut self, files: &[FileDescriptor]) -> Option<String> {
        let picked = UploadZone::Csv.select(files).into_iter().next().cloned();
        match &picked {
            Some(file) => {
                tracing::info!(name = %file.name, size = file.size, "CSV upload accepted");
                self.notify("CSV Uploaded", format!("Processing {}...", file.name));
            }
            None => tracing::debug!(offered = files.len(), "CSV upload dropped"),
        }
        picked.map(|f| f.name)
    }

    /// Document zone: file every `.pdf`/`.docx` under its category.
    /// Returns the categories assigned, in batch order.
    pub fn upload_documents(&mut self, files: &[FileDescriptor]) -> Vec<DocumentCategory> {
        let mut assigned = Vec::new();

        for file in files {
            if !UploadZone::Document.accepts(&file.name) {
                tracing::debug!(name = %file.name, "Document upload dropped");
                continue;
            }

            let category = DocumentCategory::classify(&file.name);
            let id = self
                .documents
                .add(file, category, self.clock.timestamp_ms(), self.clock.today())
                .id;
            tracing::info!(name = %file.name, size = file.size, %category, id, "Document uploaded");

            self.notify(
                "Document Uploaded",
                format!("{} has been processed and vectorized.", file.name),
            );
            assigned.push(category);
        }

        assigned
    }

    /// Hide the modal, abandoning any running verification or pending send
    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.verification.cancel();
    }

    pub fn edit_draft(&mut self, text: String) -> Result<()> {
        self.verification.edit_draft(text)
    }

    pub fn push_draft(&mut self, c: char) -> Result<()> {
        self.verification.push_draft(c)
    }

    pub fn pop_draft(&mut self) -> Result<()> {
        self.verification.pop_draft()
    }

    /// Start sending the appeal; `false` when a send is already under way
    pub fn send_appeal(&mut self) -> Result<bool> {
        let queued = self.verification.send(self.clock.as_ref())?;
        if queued {
            self.tick();
        }
        Ok(queued)
    }

    /// Advance timers; call regularly from the UI loop
    pub fn tick(&mut self) -> Vec<SequencerEvent> {
        let events = self.verification.poll(self.clock.as_ref());

        for event in &events {
            if let SequencerEvent::AppealSent { claim, .. } = event {
                tracing::info!(claim_id = %claim.id, distributor = %claim.distributor, "Appeal sent");
                self.notify(
                    "Email Sent Successfully! 📧",
                    format!(
                        "Appeal for claim {} has been sent to {}.",
                        claim.id, claim.distributor
                    ),
                );
                self.modal_open = false;
            }
        }

        events
    }

    fn notify(&mut self, title: &str, description: String) {
        tracing::debug!(title, %description, "Notification");
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            seq: self.next_seq,
            title: title.to_string(),
            description,
            raised_at_ms: self.clock.timestamp_ms(),
        });
        self.next_seq += 1;
    }
}
