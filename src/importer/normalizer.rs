// ==========================================
// Rental Ledger - Row Normalizer
// ==========================================
// Stage 3: raw strings -> typed values.
// Dates come in ISO, day-first and month-first forms depending on
// the export locale; amounts carry currency symbols and either
// decimal separator. Unparseable dates become row-level errors
// upstream; unparseable amounts mean absence and default to zero.
// ==========================================

use chrono::NaiveDate;

// ==========================================
// ParsedDate - date plus ambiguity marker
// ==========================================
// `ambiguous` is set when both leading components were <= 12 and
// the month-first convention had to be assumed; the run surfaces
// the total so operators can spot locale-misread files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub ambiguous: bool,
}

/// Parse a date cell. Dates are kept timezone-free (`NaiveDate`),
/// which pins them to the calendar day and avoids off-by-one
/// shifts at timezone boundaries.
///
/// Accepted forms:
/// - ISO prefix `YYYY-MM-DD` (unambiguous, extra text ignored)
/// - slash/dash numeric triplet `N/N/YYYY`:
///   second > 12 -> first is the month; first > 12 -> first is the
///   day; both <= 12 -> month-first convention, flagged ambiguous.
pub fn parse_date(value: &str) -> Option<ParsedDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // ISO prefix: some exports append a time of day.
    if let Some(prefix) = value.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(ParsedDate {
                date,
                ambiguous: false,
            });
        }
    }

    let parts: Vec<&str> = value.split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let first: u32 = parts[0].trim().parse().ok()?;
    let second: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;
    if parts[2].trim().len() != 4 {
        return None;
    }

    let (month, day, ambiguous) = if second > 12 {
        // Second component cannot be a month.
        (first, second, false)
    } else if first > 12 {
        // First component cannot be a month.
        (second, first, false)
    } else {
        // Genuinely ambiguous; month-first is the inherited convention.
        (first, second, true)
    };

    // Rejects impossible calendar dates such as 31/11.
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(ParsedDate { date, ambiguous })
}

/// Parse a monetary cell. Currency symbols and whitespace are
/// stripped; a comma, when present, is the decimal separator and
/// dots are thousands separators. A non-numeric remainder is
/// absence, not an error.
pub fn parse_amount(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£') && !c.is_whitespace())
        .collect();

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Number of nights: the explicit column when present and positive,
/// otherwise the whole-day span between the dates (>= 1 whenever
/// check_in < check_out).
pub fn resolve_nights(explicit: Option<&str>, check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    if let Some(raw) = explicit {
        if let Ok(n) = raw.trim().parse::<i64>() {
            if n > 0 {
                return n;
            }
        }
    }
    (check_out - check_in).num_days().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_iso() {
        let parsed = parse_date("2025-02-13").unwrap();
        assert_eq!(parsed.date, date(2025, 2, 13));
        assert!(!parsed.ambiguous);
    }

    #[test]
    fn test_parse_date_iso_with_time_suffix() {
        let parsed = parse_date("2025-02-13 14:30:00").unwrap();
        assert_eq!(parsed.date, date(2025, 2, 13));
    }

    #[test]
    fn test_parse_date_second_component_over_12_is_day() {
        // 13 cannot be a month, so the first number is the month.
        let parsed = parse_date("02/13/2025").unwrap();
        assert_eq!(parsed.date, date(2025, 2, 13));
        assert!(!parsed.ambiguous);
    }

    #[test]
    fn test_parse_date_first_component_over_12_is_day() {
        let parsed = parse_date("13/02/2025").unwrap();
        assert_eq!(parsed.date, date(2025, 2, 13));
        assert!(!parsed.ambiguous);
    }

    #[test]
    fn test_parse_date_ambiguous_defaults_month_first() {
        let parsed = parse_date("02/03/2025").unwrap();
        assert_eq!(parsed.date, date(2025, 2, 3));
        assert!(parsed.ambiguous);
    }

    #[test]
    fn test_parse_date_invalid_calendar_date() {
        assert_eq!(parse_date("31/11/2025"), None);
    }

    #[test]
    fn test_parse_date_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next week"), None);
        assert_eq!(parse_date("1/2"), None);
        assert_eq!(parse_date("01/02/25"), None);
    }

    #[test]
    fn test_parse_amount_currency_and_comma_decimal() {
        assert_eq!(parse_amount("€85,50"), 85.5);
        assert_eq!(parse_amount("1.234,56"), 1234.56);
        assert_eq!(parse_amount("$ 120.00"), 120.0);
    }

    #[test]
    fn test_parse_amount_non_numeric_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("N/A"), 0.0);
    }

    #[test]
    fn test_resolve_nights_explicit_wins() {
        let ci = date(2025, 3, 1);
        let co = date(2025, 3, 5);
        assert_eq!(resolve_nights(Some("3"), ci, co), 3);
    }

    #[test]
    fn test_resolve_nights_derived_from_span() {
        let ci = date(2025, 3, 1);
        let co = date(2025, 3, 5);
        assert_eq!(resolve_nights(None, ci, co), 4);
        assert_eq!(resolve_nights(Some("0"), ci, co), 4);
        assert_eq!(resolve_nights(Some("x"), ci, co), 4);
    }

    #[test]
    fn test_resolve_nights_minimum_one() {
        let ci = date(2025, 3, 1);
        let co = date(2025, 3, 2);
        assert_eq!(resolve_nights(None, ci, co), 1);
    }
}
