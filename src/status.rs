//! Closed status sets for vendors, vendor-leads and quotes.
//!
//! Statuses are stored as strings but every boundary parses them through
//! these enums, so unknown values are rejected before they reach storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Pending => "pending",
            VendorStatus::Approved => "approved",
            VendorStatus::Rejected => "rejected",
            VendorStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for VendorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VendorStatus::Pending),
            "approved" => Ok(VendorStatus::Approved),
            "rejected" => Ok(VendorStatus::Rejected),
            "suspended" => Ok(VendorStatus::Suspended),
            other => Err(format!("unknown vendor status: {other}")),
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-vendor tracking status of a routed lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VendorLeadStatus {
    Sent,
    Seen,
    Contacted,
    Quoted,
    Won,
    Lost,
}

impl VendorLeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorLeadStatus::Sent => "sent",
            VendorLeadStatus::Seen => "seen",
            VendorLeadStatus::Contacted => "contacted",
            VendorLeadStatus::Quoted => "quoted",
            VendorLeadStatus::Won => "won",
            VendorLeadStatus::Lost => "lost",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VendorLeadStatus::Won | VendorLeadStatus::Lost)
    }

    /// Whether a quote may still be issued against a lead in this status.
    pub fn can_quote(&self) -> bool {
        matches!(
            self,
            VendorLeadStatus::Sent | VendorLeadStatus::Seen | VendorLeadStatus::Contacted
        )
    }
}

impl FromStr for VendorLeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(VendorLeadStatus::Sent),
            "seen" => Ok(VendorLeadStatus::Seen),
            "contacted" => Ok(VendorLeadStatus::Contacted),
            "quoted" => Ok(VendorLeadStatus::Quoted),
            "won" => Ok(VendorLeadStatus::Won),
            "lost" => Ok(VendorLeadStatus::Lost),
            other => Err(format!("unknown vendor lead status: {other}")),
        }
    }
}

impl fmt::Display for VendorLeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Viewed,
    Accepted,
    Rejected,
    Expired,
    Cancelled,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Viewed => "viewed",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
            QuoteStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Accepted
                | QuoteStatus::Rejected
                | QuoteStatus::Expired
                | QuoteStatus::Cancelled
        )
    }

    /// Expiry is never written back to storage; an unresolved quote past its
    /// validity date reads as expired.
    pub fn effective(self, valid_until: DateTime<Utc>, now: DateTime<Utc>) -> QuoteStatus {
        match self {
            QuoteStatus::Sent | QuoteStatus::Viewed if now > valid_until => QuoteStatus::Expired,
            other => other,
        }
    }

    /// An active quote blocks a new quote on the same vendor lead and is the
    /// one presented to the customer.
    pub fn is_active(self, valid_until: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        matches!(
            self.effective(valid_until, now),
            QuoteStatus::Sent | QuoteStatus::Viewed | QuoteStatus::Accepted
        )
    }

    /// A customer may only resolve a quote that is still open.
    pub fn can_respond(self, valid_until: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        matches!(
            self.effective(valid_until, now),
            QuoteStatus::Sent | QuoteStatus::Viewed
        )
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "viewed" => Ok(QuoteStatus::Viewed),
            "accepted" => Ok(QuoteStatus::Accepted),
            "rejected" => Ok(QuoteStatus::Rejected),
            "expired" => Ok(QuoteStatus::Expired),
            "cancelled" => Ok(QuoteStatus::Cancelled),
            other => Err(format!("unknown quote status: {other}")),
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn vendor_lead_quote_eligibility() {
        assert!(VendorLeadStatus::Sent.can_quote());
        assert!(VendorLeadStatus::Seen.can_quote());
        assert!(VendorLeadStatus::Contacted.can_quote());
        assert!(!VendorLeadStatus::Quoted.can_quote());
        assert!(!VendorLeadStatus::Won.can_quote());
        assert!(!VendorLeadStatus::Lost.can_quote());
    }

    #[test]
    fn quote_expiry_is_computed_at_read_time() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        assert_eq!(
            QuoteStatus::Sent.effective(past, now),
            QuoteStatus::Expired
        );
        assert_eq!(
            QuoteStatus::Viewed.effective(past, now),
            QuoteStatus::Expired
        );
        assert_eq!(QuoteStatus::Sent.effective(future, now), QuoteStatus::Sent);
        // Resolved quotes keep their status even past the validity date.
        assert_eq!(
            QuoteStatus::Accepted.effective(past, now),
            QuoteStatus::Accepted
        );
        assert_eq!(
            QuoteStatus::Cancelled.effective(past, now),
            QuoteStatus::Cancelled
        );
    }

    #[test]
    fn expired_quote_is_not_active() {
        let now = Utc::now();
        let past = now - Duration::minutes(5);
        let future = now + Duration::minutes(5);

        assert!(QuoteStatus::Sent.is_active(future, now));
        assert!(QuoteStatus::Viewed.is_active(future, now));
        assert!(QuoteStatus::Accepted.is_active(past, now));
        assert!(!QuoteStatus::Sent.is_active(past, now));
        assert!(!QuoteStatus::Rejected.is_active(future, now));
        assert!(!QuoteStatus::Cancelled.is_active(future, now));
    }

    #[test]
    fn terminal_states_cannot_be_responded_to() {
        let now = Utc::now();
        let future = now + Duration::hours(1);
        for status in [
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
            QuoteStatus::Expired,
            QuoteStatus::Cancelled,
        ] {
            assert!(status.is_terminal());
            assert!(!status.can_respond(future, now));
        }
        assert!(QuoteStatus::Sent.can_respond(future, now));
        assert!(!QuoteStatus::Sent.can_respond(now - Duration::hours(1), now));
    }

    #[test]
    fn statuses_round_trip_and_reject_unknown() {
        for s in ["pending", "approved", "rejected", "suspended"] {
            assert_eq!(s.parse::<VendorStatus>().unwrap().as_str(), s);
        }
        for s in ["sent", "seen", "contacted", "quoted", "won", "lost"] {
            assert_eq!(s.parse::<VendorLeadStatus>().unwrap().as_str(), s);
        }
        assert!("shipped".parse::<QuoteStatus>().is_err());
        assert!("".parse::<VendorLeadStatus>().is_err());
    }
}
