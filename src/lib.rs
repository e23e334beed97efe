// Claim-Denial Appeals Desk - Core Library
// Exposes all modules for use in the terminal UI, API server, and tests

pub mod claims;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod logging;
pub mod verification;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use claims::{
    load_claims_csv, parse_age_days, read_claims, sample_denials, AgeBand, Claim, ClaimStatus,
    StatusBadge,
};
pub use config::{AppConfig, AppealConfig, VerificationConfig};
pub use dashboard::{Dashboard, DashboardEvent, Notification};
pub use documents::{
    descriptors_from_path, DocumentCategory, DocumentLibrary, FileDescriptor, UploadZone,
    UploadedFile,
};
pub use error::{AppealsError, Result};
pub use verification::{
    draft_appeal_email, ChecklistOutcome, Clock, ManualClock, SequencerEvent, SystemClock,
    VerificationPhase, VerificationSequencer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
