// ==========================================
// Rental Ledger - Billing Resolver & Split Calculator
// ==========================================
// Stage 5: associate the row with a property + billing
// configuration and compute the owner/manager split.
// A caller-supplied target property wins for the whole batch;
// otherwise the listing name is fuzzily matched against the
// user's properties. Billing configuration is mandatory.
// ==========================================

use crate::domain::property::{BillingConfiguration, Property};
use crate::repository::reservation_store::ReservationStore;
use crate::repository::RepositoryResult;
use tracing::debug;

/// Round to cents. All persisted amounts go through this.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// FinancialSplit - owner/manager division of host earnings
// ==========================================
// Invariant: owner_amount + manager_amount == host_earnings
// within rounding tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialSplit {
    pub owner_amount: f64,
    pub manager_amount: f64,
}

/// The internal commission applies to earnings net of cleaning
/// (the cleaning fee is settled separately); the owner keeps the
/// remainder so the two sides always sum back to host earnings.
pub fn compute_split(
    host_earnings: f64,
    cleaning_fee: f64,
    commission_percent: f64,
) -> FinancialSplit {
    let manager_amount = round_cents((host_earnings - cleaning_fee) * commission_percent / 100.0);
    let owner_amount = round_cents(host_earnings - manager_amount);
    FinancialSplit {
        owner_amount,
        manager_amount,
    }
}

/// Match a row to one of the user's properties.
///
/// An explicit target property id takes precedence for the whole
/// batch; a target that is not among the user's properties matches
/// nothing (every row then fails as unmatched). Without a target,
/// the listing name and each property name are compared with a
/// case-insensitive bidirectional substring test.
pub fn match_property<'a>(
    properties: &'a [Property],
    target_property_id: Option<&str>,
    listing_name: Option<&str>,
) -> Option<&'a Property> {
    if let Some(target) = target_property_id {
        return properties.iter().find(|p| p.id == target);
    }

    let listing = listing_name?.trim().to_lowercase();
    if listing.is_empty() {
        return None;
    }
    properties.iter().find(|p| {
        let name = p.name.to_lowercase();
        name.contains(&listing) || listing.contains(&name)
    })
}

/// Billing configuration for a matched property, refreshing the
/// request-scoped cache once per property so a configuration
/// created earlier in the same batch is picked up.
pub async fn billing_for(
    store: &dyn ReservationStore,
    properties: &mut [Property],
    property_id: &str,
) -> RepositoryResult<Option<BillingConfiguration>> {
    let Some(entry) = properties.iter_mut().find(|p| p.id == property_id) else {
        return Ok(None);
    };

    if entry.billing.is_none() {
        if let Some(config) = store.find_billing_config(property_id).await? {
            debug!(property_id = %property_id, "billing configuration found on fresh lookup");
            entry.billing = Some(config);
        }
    }

    Ok(entry.billing.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(id: &str, name: &str) -> Property {
        Property {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: name.to_string(),
            billing: None,
        }
    }

    #[test]
    fn test_compute_split_invariant() {
        let split = compute_split(500.0, 60.0, 20.0);
        assert_eq!(split.manager_amount, 88.0);
        assert_eq!(split.owner_amount, 412.0);
        assert!((split.owner_amount + split.manager_amount - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_compute_split_rounding() {
        let split = compute_split(100.10, 0.0, 15.0);
        assert!((split.owner_amount + split.manager_amount - 100.10).abs() < 0.01);
    }

    #[test]
    fn test_compute_split_zero_commission() {
        let split = compute_split(300.0, 50.0, 0.0);
        assert_eq!(split.manager_amount, 0.0);
        assert_eq!(split.owner_amount, 300.0);
    }

    #[test]
    fn test_match_property_target_precedence() {
        let props = vec![property("p1", "Casa Azul"), property("p2", "Loft Centro")];
        let matched = match_property(&props, Some("p2"), Some("Casa Azul"));
        assert_eq!(matched.unwrap().id, "p2");
    }

    #[test]
    fn test_match_property_foreign_target_matches_nothing() {
        let props = vec![property("p1", "Casa Azul")];
        assert!(match_property(&props, Some("someone-elses"), Some("Casa Azul")).is_none());
    }

    #[test]
    fn test_match_property_fuzzy_bidirectional() {
        let props = vec![property("p1", "Casa Azul")];
        // Export name longer than property name.
        let m = match_property(&props, None, Some("Casa Azul - Vista al mar"));
        assert_eq!(m.unwrap().id, "p1");
        // Property name longer than export name.
        let props = vec![property("p1", "Apartamento Casa Azul Deluxe")];
        let m = match_property(&props, None, Some("casa azul"));
        assert_eq!(m.unwrap().id, "p1");
    }

    #[test]
    fn test_match_property_no_listing() {
        let props = vec![property("p1", "Casa Azul")];
        assert!(match_property(&props, None, None).is_none());
        assert!(match_property(&props, None, Some("  ")).is_none());
        assert!(match_property(&props, None, Some("Villa Roja")).is_none());
    }
}
