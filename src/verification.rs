// 🔎 Verification - simulated claim verification and appeal drafting
//
// Idle -> Running { progress } -> Complete(outcome)
//
// The sequencer never reads the wall clock itself: every call takes a
// `Clock`, so tests drive it with a `ManualClock`.

use crate::claims::Claim;
use crate::config::{AppealConfig, VerificationConfig};
use crate::documents::display_date;
use crate::error::{AppealsError, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// CLOCK
// ============================================================================

pub trait Clock: Send + Sync {
    /// Monotonic instant used for scheduling ticks
    fn now(&self) -> Instant;

    /// Calendar date printed on uploads and letters
    fn today(&self) -> NaiveDate;

    /// Milliseconds since the epoch, used as upload ids
    fn timestamp_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn timestamp_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

#[derive(Debug, Clone, Copy)]
struct ManualState {
    now: Instant,
    today: NaiveDate,
    timestamp_ms: i64,
}

impl ManualClock {
    pub fn new(today: NaiveDate, timestamp_ms: i64) -> Self {
        ManualClock {
            state: Mutex::new(ManualState {
                now: Instant::now(),
                today,
                timestamp_ms,
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        state.now += by;
        state.timestamp_ms += by.as_millis() as i64;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        // The state is plain data, a poisoned lock still holds a usable value
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.lock().now
    }

    fn today(&self) -> NaiveDate {
        self.lock().today
    }

    fn timestamp_ms(&self) -> i64 {
        self.lock().timestamp_ms
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

pub const VALID_CHECKS: [&str; 4] = [
    "✓ Contract price matches claim amount ($45.00/unit)",
    "✓ GPO agreement covers this NDC",
    "✓ Invoice quantities within contract limits",
    "✓ Payment terms properly applied",
];

pub const INVALID_CHECKS: [&str; 4] = [
    "✗ Contract price differs from claimed amount",
    "✓ GPO agreement covers this NDC",
    "✗ Invoice shows different quantity than claimed",
    "✓ Payment terms properly applied",
];

/// Result of a finished verification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChecklistOutcome {
    /// The distributor was right to reject; nothing to appeal
    Valid { checks: [&'static str; 4] },
    /// The rejection does not hold up; an appeal email is drafted
    Invalid {
        checks: [&'static str; 4],
        email_draft: String,
    },
}

impl ChecklistOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ChecklistOutcome::Valid { .. })
    }

    pub fn checks(&self) -> &[&'static str] {
        match self {
            ChecklistOutcome::Valid { checks } => checks,
            ChecklistOutcome::Invalid { checks, .. } => checks,
        }
    }

    pub fn email_draft(&self) -> Option<&str> {
        match self {
            ChecklistOutcome::Valid { .. } => None,
            ChecklistOutcome::Invalid { email_draft, .. } => Some(email_draft),
        }
    }

    pub fn label(&self) -> &'static str {
        if self.is_valid() {
            "Valid Rejection"
        } else {
            "Invalid Rejection"
        }
    }
}

/// Whether a check line reports a pass
pub fn check_passed(check: &str) -> bool {
    check.starts_with('✓')
}

/// Fill the appeal letter for `claim`
pub fn draft_appeal_email(
    claim: &Claim,
    letter: &AppealConfig,
    contract_number: u32,
    invoice_number: u32,
    date: NaiveDate,
) -> String {
    format!(
        "Subject: Chargeback Reconsideration Request – Claim ID {id} | SKU {ndc} | {distributor}

Dear {distributor} Claims Team,

We are writing in response to the denial of Chargeback Claim ID {id}, citing {reason} for contract {prefix}-{contract} – {tier} for SKU {ndc} (Pharmaceutical Product).

Upon further review, we verified that the customer {customer} was an active member of {gpo} at the time of sale (Invoice INV-{invoice} dated {date}). Membership validation and eligibility confirmation are attached.

We kindly request reconsideration of this chargeback submission. Supporting contract clause {clause} and pricing matrix snapshot are included.

Thank you for your attention, and please let us know if additional documentation is needed.

Warm regards,

{sender}
{title}
{organization}",
        id = claim.id,
        ndc = claim.ndc,
        distributor = claim.distributor,
        reason = claim.reason,
        prefix = letter.contract_prefix,
        contract = contract_number,
        tier = letter.contract_tier,
        customer = letter.customer,
        gpo = letter.gpo,
        invoice = invoice_number,
        date = display_date(date),
        clause = letter.clause,
        sender = letter.sender_name,
        title = letter.sender_title,
        organization = letter.organization,
    )
}

// ============================================================================
// SEQUENCER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum VerificationPhase {
    Idle,
    Running { progress: u8 },
    Complete { outcome: ChecklistOutcome },
}

/// Something observable that happened during `poll`
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    Progressed(u8),
    Completed { claim_id: String, valid: bool },
    AppealSent { claim: Claim, email: String },
}

pub struct VerificationSequencer {
    settings: VerificationConfig,
    letter: AppealConfig,
    rng: Box<dyn RngCore + Send>,
    phase: VerificationPhase,
    claim: Option<Claim>,
    next_tick: Option<Instant>,
    draft: String,
    send_deadline: Option<Instant>,
    run: u64,
}

impl VerificationSequencer {
    /// Seeded from `settings.seed`, or from entropy when it is unset
    pub fn new(settings: VerificationConfig, letter: AppealConfig) -> Self {
        let rng: Box<dyn RngCore + Send> = match settings.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };
        Self::with_rng(settings, letter, rng)
    }

    pub fn with_rng(
        settings: VerificationConfig,
        letter: AppealConfig,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        VerificationSequencer {
            settings,
            letter,
            rng,
            phase: VerificationPhase::Idle,
            claim: None,
            next_tick: None,
            draft: String::new(),
            send_deadline: None,
            run: 0,
        }
    }

    pub fn phase(&self) -> &VerificationPhase {
        &self.phase
    }

    pub fn claim(&self) -> Option<&Claim> {
        self.claim.as_ref()
    }

    pub fn progress(&self) -> u8 {
        match self.phase {
            VerificationPhase::Idle => 0,
            VerificationPhase::Running { progress } => progress,
            VerificationPhase::Complete { .. } => 100,
        }
    }

    pub fn outcome(&self) -> Option<&ChecklistOutcome> {
        match &self.phase {
            VerificationPhase::Complete { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// The appeal section is shown only for invalid rejections
    pub fn appeal_visible(&self) -> bool {
        matches!(self.outcome(), Some(ChecklistOutcome::Invalid { .. }))
    }

    /// Current (possibly edited) appeal text
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_sending(&self) -> bool {
        self.send_deadline.is_some()
    }

    /// Number of verifications started so far
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Begin verifying `claim`, discarding whatever was in flight
    pub fn start(&mut self, claim: Claim, clock: &dyn Clock) {
        self.run += 1;
        tracing::info!(claim_id = %claim.id, run = self.run, "Verification started");

        self.phase = VerificationPhase::Running { progress: 0 };
        self.claim = Some(claim);
        self.draft.clear();
        self.send_deadline = None;
        self.next_tick = Some(clock.now() + self.settings.tick_interval());
    }

    /// Stop any running verification or pending send and go idle
    pub fn cancel(&mut self) {
        if self.next_tick.is_some() || self.send_deadline.is_some() {
            tracing::debug!(run = self.run, "Verification cancelled");
        }
        self.phase = VerificationPhase::Idle;
        self.claim = None;
        self.draft.clear();
        self.next_tick = None;
        self.send_deadline = None;
    }

    /// Apply every tick and send deadline that is due
    pub fn poll(&mut self, clock: &dyn Clock) -> Vec<SequencerEvent> {
        let now = clock.now();
        let mut events = Vec::new();

        while let Some(at) = self.next_tick {
            if at > now {
                break;
            }

            let progress = (self.progress() as u16 + self.settings.progress_step as u16).min(100) as u8;
            if progress >= 100 {
                self.next_tick = None;
                events.push(SequencerEvent::Progressed(100));
                events.push(self.complete(clock.today()));
            } else {
                self.phase = VerificationPhase::Running { progress };
                self.next_tick = Some(at + self.settings.tick_interval());
                events.push(SequencerEvent::Progressed(progress));
            }
        }

        if let Some(deadline) = self.send_deadline {
            if deadline <= now {
                self.send_deadline = None;
                if let Some(claim) = self.claim.clone() {
                    let email = std::mem::take(&mut self.draft);
                    self.cancel();
                    events.push(SequencerEvent::AppealSent { claim, email });
                }
            }
        }

        events
    }

    fn complete(&mut self, today: NaiveDate) -> SequencerEvent {
        let draw: f64 = self.rng.gen();
        let valid = draw > self.settings.valid_rejection_threshold;

        let claim_id = self
            .claim
            .as_ref()
            .map(|c| c.id.clone())
            .unwrap_or_default();

        let outcome = if valid {
            ChecklistOutcome::Valid {
                checks: VALID_CHECKS,
            }
        } else {
            let contract_number = self.rng.gen_range(0..1000);
            let invoice_number = self.rng.gen_range(0..10000);
            let email_draft = match &self.claim {
                Some(claim) => draft_appeal_email(
                    claim,
                    &self.letter,
                    contract_number,
                    invoice_number,
                    today,
                ),
                None => String::new(),
            };
            ChecklistOutcome::Invalid {
                checks: INVALID_CHECKS,
                email_draft,
            }
        };

        tracing::info!(claim_id = %claim_id, valid, draw, "Verification complete");

        self.draft = outcome.email_draft().unwrap_or_default().to_string();
        self.phase = VerificationPhase::Complete { outcome };
        SequencerEvent::Completed { claim_id, valid }
    }

    /// Replace the appeal text
    pub fn edit_draft(&mut self, text: String) -> Result<()> {
        self.require_appeal()?;
        self.draft = text;
        Ok(())
    }

    /// Append to the appeal text (terminal editing)
    pub fn push_draft(&mut self, c: char) -> Result<()> {
        self.require_appeal()?;
        self.draft.push(c);
        Ok(())
    }

    /// Drop the last character of the appeal text
    pub fn pop_draft(&mut self) -> Result<()> {
        self.require_appeal()?;
        self.draft.pop();
        Ok(())
    }

    /// Queue the appeal for sending after the configured delay.
    ///
    /// Returns `false` when a send is already pending.
    pub fn send(&mut self, clock: &dyn Clock) -> Result<bool> {
        self.require_appeal()?;
        if self.send_deadline.is_some() {
            return Ok(false);
        }

        self.send_deadline = Some(clock.now() + self.settings.send_delay());
        tracing::info!(
            claim_id = %self.claim.as_ref().map(|c| c.id.as_str()).unwrap_or_default(),
            delay_ms = self.settings.send_delay_ms,
            "Sending appeal"
        );
        Ok(true)
    }

    fn require_appeal(&self) -> Result<()> {
        if self.appeal_visible() {
            return Ok(());
        }
        match &self.claim {
            Some(claim) => Err(AppealsError::NoAppealDraft(claim.id.clone())),
            None => Err(AppealsError::NoActiveVerification),
        }
    }
}
