// ==========================================
// Rental Ledger - Core Domain Types
// ==========================================
// Closed enums shared across the import pipeline.
// Serialized forms align with the reservation schema
// (SCREAMING_SNAKE_CASE in storage and API payloads).
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Platform - source booking platform
// ==========================================
// Determined once per file from the header row.
// `Other` reuses the most general (earnings-reported) column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    /// Earnings-reported family: host earnings are a column in the export.
    Airbnb,
    /// Gross-plus-marketplace-commission family: host earnings are derived
    /// as gross price minus the marketplace commission column.
    Booking,
    /// Unrecognized export; resolved with the general column set.
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Airbnb => "AIRBNB",
            Platform::Booking => "BOOKING",
            Platform::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Platform {
        match value {
            "AIRBNB" => Platform::Airbnb,
            "BOOKING" => Platform::Booking,
            _ => Platform::Other,
        }
    }
}

// ==========================================
// RowOutcome - terminal state of one data row
// ==========================================
// Every row resolves to exactly one of these; the loop always
// advances to the next row regardless of which state was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowOutcome {
    /// Reservation created in storage.
    Persisted,
    /// Non-reservation ledger entry (payout, resolution, adjustment,
    /// credit) or cancelled/no-show booking.
    FilteredOut,
    /// Check-in or check-out field empty (placeholder rows in exports).
    MissingDates,
    /// Dates present but unparseable or inverted.
    DateInvalid,
    /// Confirmation code already seen (pre-loaded set or earlier row).
    Duplicate,
    /// No property/billing configuration could be associated.
    PropertyUnmatched,
    /// Persistence or normalization raised an unexpected failure.
    UnexpectedError,
}

impl RowOutcome {
    /// Skips are expected and benign; errors need operator attention.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            RowOutcome::FilteredOut | RowOutcome::MissingDates | RowOutcome::Duplicate
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            RowOutcome::DateInvalid | RowOutcome::PropertyUnmatched | RowOutcome::UnexpectedError
        )
    }
}

// ==========================================
// RowErrorCategory - closed set of row error reasons
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowErrorCategory {
    InvalidDates,
    UnmatchedProperty,
    Unexpected,
}

impl RowErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowErrorCategory::InvalidDates => "INVALID_DATES",
            RowErrorCategory::UnmatchedProperty => "UNMATCHED_PROPERTY",
            RowErrorCategory::Unexpected => "UNEXPECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_roundtrip() {
        assert_eq!(Platform::parse("AIRBNB"), Platform::Airbnb);
        assert_eq!(Platform::parse("BOOKING"), Platform::Booking);
        assert_eq!(Platform::parse("anything"), Platform::Other);
        assert_eq!(Platform::Booking.as_str(), "BOOKING");
    }

    #[test]
    fn test_row_outcome_classification() {
        assert!(RowOutcome::Duplicate.is_skip());
        assert!(RowOutcome::MissingDates.is_skip());
        assert!(!RowOutcome::DateInvalid.is_skip());
        assert!(RowOutcome::PropertyUnmatched.is_error());
        assert!(!RowOutcome::Persisted.is_error());
        assert!(!RowOutcome::Persisted.is_skip());
    }
}
