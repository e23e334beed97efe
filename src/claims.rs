// 📋 Claims - denial records shown in the claims table
// Records are display-oriented: amount and age stay as the strings the
// distributor sent us, the colour rules derive from them on demand.

use crate::error::{AppealsError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

// ============================================================================
// CLAIM STATUS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    PendingReview,
    AppealSent,
    Resolved,
    Other(String),
}

impl ClaimStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Pending Review" => ClaimStatus::PendingReview,
            "Appeal Sent" => ClaimStatus::AppealSent,
            "Resolved" => ClaimStatus::Resolved,
            other => ClaimStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClaimStatus::PendingReview => "Pending Review",
            ClaimStatus::AppealSent => "Appeal Sent",
            ClaimStatus::Resolved => "Resolved",
            ClaimStatus::Other(raw) => raw,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        match self {
            ClaimStatus::PendingReview => StatusBadge::Yellow,
            ClaimStatus::AppealSent => StatusBadge::Blue,
            ClaimStatus::Resolved => StatusBadge::Green,
            ClaimStatus::Other(_) => StatusBadge::Gray,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ClaimStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClaimStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ClaimStatus::parse(raw.trim()))
    }
}

/// Badge colour for a claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    Yellow,
    Blue,
    Green,
    Gray,
}

/// How overdue a claim is, derived from its age string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    /// 5 days or more (red)
    High,
    /// 3 or 4 days (orange)
    Medium,
    /// Under 3 days, or no number at all (green)
    Low,
}

impl AgeBand {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            Some(d) if d >= 5 => AgeBand::High,
            Some(d) if d >= 3 => AgeBand::Medium,
            _ => AgeBand::Low,
        }
    }
}

/// Leading integer of an age string ("6 days" -> 6).
///
/// Accepts leading whitespace and an optional sign, then stops at the first
/// non-digit. Returns `None` when there are no digits; oversized numbers
/// saturate.
pub fn parse_age_days(age: &str) -> Option<i64> {
    let s = age.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    // Only overflow can fail here
    let value: i64 = digits.parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

// ============================================================================
// CLAIM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub distributor: String,
    pub ndc: String,
    pub reason: String,
    /// Display string, e.g. "$2,847.50"
    pub amount: String,
    pub status: ClaimStatus,
    /// Display string, e.g. "3 days"
    pub age: String,
}

impl Claim {
    pub fn new(
        id: &str,
        distributor: &str,
        ndc: &str,
        reason: &str,
        amount: &str,
        age: &str,
    ) -> Self {
        Claim {
            id: id.to_string(),
            distributor: distributor.to_string(),
            ndc: ndc.to_string(),
            reason: reason.to_string(),
            amount: amount.to_string(),
            status: ClaimStatus::PendingReview,
            age: age.to_string(),
        }
    }

    pub fn badge(&self) -> StatusBadge {
        self.status.badge()
    }

    pub fn age_days(&self) -> Option<i64> {
        parse_age_days(&self.age)
    }

    pub fn age_band(&self) -> AgeBand {
        AgeBand::from_days(self.age_days())
    }
}

/// The five denials loaded by "Generate Sample Denials"
pub fn sample_denials() -> Vec<Claim> {
    vec![
        Claim::new(
            "CLM001",
            "Cardinal Health",
            "0069-2587-68",
            "Price Variance - Contract Dispute",
            "$2,847.50",
            "3 days",
        ),
        Claim::new(
            "CLM002",
            "AmerisourceBergen",
            "0074-3368-13",
            "GPO Pricing Mismatch",
            "$1,255.00",
            "1 day",
        ),
        Claim::new(
            "CLM003",
            "McKesson Corp",
            "0093-7663-56",
            "Invoice Discrepancy",
            "$892.25",
            "5 days",
        ),
        Claim::new(
            "CLM004",
            "Henry Schein",
            "0781-5077-95",
            "Contract Term Violation",
            "$3,127.80",
            "2 days",
        ),
        Claim::new(
            "CLM005",
            "Morris & Dickson",
            "16714-063-01",
            "Quantity Limit Exceeded",
            "$674.15",
            "4 days",
        ),
    ]
}

// ============================================================================
// CSV LOADING
// ============================================================================

/// Load claims from a CSV with header `id,distributor,ndc,reason,amount,status,age`
pub fn load_claims_csv(path: &Path) -> Result<Vec<Claim>> {
    let file = std::fs::File::open(path).map_err(|e| AppealsError::io(path, e))?;
    read_claims(file)
}

pub fn read_claims<R: std::io::Read>(reader: R) -> Result<Vec<Claim>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut claims = Vec::new();
    for result in rdr.deserialize() {
        let claim: Claim = result?;
        claims.push(claim);
    }

    tracing::debug!(count = claims.len(), "Parsed claims CSV");
    Ok(claims)
}
