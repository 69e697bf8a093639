// ==========================================
// Rental Ledger - Platform Adapters & Detector
// ==========================================
// Stage 1: classify the export from its header row.
// Header matching is substring duck-typing encoded as data:
// each adapter carries marker phrases (definitive), indicator
// phrases (scored) and the ordered column-candidate table, all
// in normalized form (lowercase, accent-stripped).
// ==========================================

use crate::domain::types::Platform;
use crate::importer::columns::{normalize_header, ColumnIndexMap, FieldCandidates, SemanticField};
use crate::importer::normalizer::parse_amount;
use crate::importer::reservation_importer_trait::{PlatformAdapter, PlatformAmounts};
use crate::importer::tokenizer::RawRow;

// ==========================================
// Airbnb - earnings-reported family
// ==========================================
pub struct AirbnbAdapter;

// Candidate order is load-bearing: "fecha de inicio" must be tried
// before any arrival phrase so "Fecha de llegada estimada" (a
// different column) cannot shadow the real check-in.
const AIRBNB_COLUMNS: &[FieldCandidates] = &[
    (
        SemanticField::ConfirmationCode,
        &["codigo de confirmacion", "confirmation code", "conf code", "codigo", "code"],
    ),
    (
        SemanticField::ListingName,
        &["anuncio", "listing", "alojamiento", "property"],
    ),
    (
        SemanticField::CheckIn,
        &["fecha de inicio", "start date", "entrada", "check-in", "checkin", "fecha entrada"],
    ),
    (
        SemanticField::CheckOut,
        &["fecha de finalizacion", "end date", "salida", "check-out", "checkout", "fecha salida", "departure"],
    ),
    (SemanticField::Nights, &["noches", "nights", "numero noches"]),
    (
        SemanticField::GuestName,
        &["nombre del viajero", "traveler name", "guest name", "huesped", "viajero", "guest"],
    ),
    (
        SemanticField::GuestContact,
        &["contacto", "contact", "email", "correo"],
    ),
    (
        SemanticField::GrossAmount,
        &["total bruto", "gross earnings", "bruto", "gross"],
    ),
    (
        SemanticField::PlatformServiceFee,
        &["comision del servicio del anfitrion", "host service fee", "service fee"],
    ),
    (
        SemanticField::HostEarnings,
        &["tus ganancias", "your earnings", "earnings", "ganancias", "neto", "importe", "total"],
    ),
    (SemanticField::RowType, &["tipo", "type"]),
];

const AIRBNB_INDICATORS: &[&str] = &[
    "codigo de confirmacion",
    "confirmation code",
    "nombre del viajero",
    "viajero",
    "traveler name",
    "guest name",
    "fecha de inicio",
    "start date",
    "fecha de finalizacion",
    "gastos de limpieza",
    "fecha de llegada estimada",
    "fecha de la reserva",
    "ganancias netas",
    "earnings",
    "comision servicio anfitrion",
];

impl PlatformAdapter for AirbnbAdapter {
    fn platform(&self) -> Platform {
        Platform::Airbnb
    }

    fn marker_phrases(&self) -> &'static [&'static str] {
        // Airbnb exports vary too much per export language for a
        // definitive marker; classification is score-based.
        &[]
    }

    fn indicator_phrases(&self) -> &'static [&'static str] {
        AIRBNB_INDICATORS
    }

    fn column_candidates(&self) -> &'static [FieldCandidates] {
        AIRBNB_COLUMNS
    }

    /// The ledger export mixes reservations with payout, resolution
    /// and credit rows; only reservation rows are billable.
    fn is_reservation_row(&self, row: &RawRow, cols: &ColumnIndexMap) -> bool {
        match cols.value(row, SemanticField::RowType) {
            Some(row_type) => {
                let lower = row_type.to_lowercase();
                lower.contains("reserva") || lower.contains("reservation")
            }
            // No type column (or empty cell): assume a reservation.
            None => true,
        }
    }

    /// Host earnings are reported directly; gross falls back to
    /// host earnings when the export has no gross column.
    fn extract_amounts(&self, row: &RawRow, cols: &ColumnIndexMap) -> PlatformAmounts {
        let host_earnings = cols
            .value(row, SemanticField::HostEarnings)
            .map(parse_amount)
            .unwrap_or(0.0);
        let gross_amount = if cols.has(SemanticField::GrossAmount) {
            cols.value(row, SemanticField::GrossAmount)
                .map(parse_amount)
                .unwrap_or(0.0)
        } else {
            host_earnings
        };
        let platform_service_fee = cols
            .value(row, SemanticField::PlatformServiceFee)
            .map(parse_amount)
            .unwrap_or(0.0);

        PlatformAmounts {
            gross_amount,
            host_earnings,
            platform_service_fee,
        }
    }
}

// ==========================================
// Booking - gross-plus-marketplace-commission family
// ==========================================
pub struct BookingAdapter;

const BOOKING_COLUMNS: &[FieldCandidates] = &[
    (
        SemanticField::ConfirmationCode,
        &["numero de reserva", "reservation number", "booking number"],
    ),
    (
        SemanticField::GuestName,
        &["nombre del cliente", "guest name", "customer name"],
    ),
    (SemanticField::CheckIn, &["entrada", "check-in", "arrival"]),
    (SemanticField::CheckOut, &["salida", "check-out", "departure"]),
    (
        SemanticField::Nights,
        &["duracion", "duration", "noches", "nights"],
    ),
    (SemanticField::Status, &["estado", "status"]),
    (SemanticField::GrossAmount, &["precio", "price", "total"]),
    (
        SemanticField::PlatformServiceFee,
        &["importe de la comision", "commission amount"],
    ),
    (
        SemanticField::ListingName,
        &["tipo de unidad", "unit type", "room type", "accommodation"],
    ),
];

const BOOKING_MARKERS: &[&str] = &[
    "numero de reserva",
    "reservation number",
    "tipo de unidad",
    "unit type",
    "importe de la comision",
    "commission amount",
];

impl PlatformAdapter for BookingAdapter {
    fn platform(&self) -> Platform {
        Platform::Booking
    }

    fn marker_phrases(&self) -> &'static [&'static str] {
        BOOKING_MARKERS
    }

    fn indicator_phrases(&self) -> &'static [&'static str] {
        &[]
    }

    fn column_candidates(&self) -> &'static [FieldCandidates] {
        BOOKING_COLUMNS
    }

    /// Booking marks confirmed stays with status "ok"; anything
    /// else (cancelled, no-show) is not billable.
    fn is_reservation_row(&self, row: &RawRow, cols: &ColumnIndexMap) -> bool {
        if !cols.has(SemanticField::Status) {
            return true;
        }
        cols.value(row, SemanticField::Status)
            .map(|s| s.eq_ignore_ascii_case("ok"))
            .unwrap_or(false)
    }

    /// Price is gross; the commission column is what the
    /// marketplace keeps, and host earnings are the difference.
    fn extract_amounts(&self, row: &RawRow, cols: &ColumnIndexMap) -> PlatformAmounts {
        let gross_amount = cols
            .value(row, SemanticField::GrossAmount)
            .map(parse_amount)
            .unwrap_or(0.0);
        let platform_service_fee = cols
            .value(row, SemanticField::PlatformServiceFee)
            .map(parse_amount)
            .unwrap_or(0.0);

        PlatformAmounts {
            gross_amount,
            host_earnings: gross_amount - platform_service_fee,
            platform_service_fee,
        }
    }
}

// ==========================================
// Generic fallback - unrecognized exports
// ==========================================
// Reuses the most general (Airbnb) column set and semantics.
pub struct GenericAdapter;

impl PlatformAdapter for GenericAdapter {
    fn platform(&self) -> Platform {
        Platform::Other
    }

    fn marker_phrases(&self) -> &'static [&'static str] {
        &[]
    }

    fn indicator_phrases(&self) -> &'static [&'static str] {
        &[]
    }

    fn column_candidates(&self) -> &'static [FieldCandidates] {
        AIRBNB_COLUMNS
    }

    fn is_reservation_row(&self, row: &RawRow, cols: &ColumnIndexMap) -> bool {
        AirbnbAdapter.is_reservation_row(row, cols)
    }

    fn extract_amounts(&self, row: &RawRow, cols: &ColumnIndexMap) -> PlatformAmounts {
        AirbnbAdapter.extract_amounts(row, cols)
    }
}

// ==========================================
// Detector
// ==========================================

static ADAPTERS: &[&(dyn PlatformAdapter)] = &[&BookingAdapter, &AirbnbAdapter, &GenericAdapter];

/// Adapter for a detected platform.
pub fn adapter_for(platform: Platform) -> &'static dyn PlatformAdapter {
    ADAPTERS
        .iter()
        .copied()
        .find(|a| a.platform() == platform)
        .unwrap_or(&GenericAdapter)
}

/// Classify the export from its header row.
///
/// A marker hit classifies immediately; otherwise indicator
/// phrases are scored against the joined header set and two or
/// more matches classify. Anything else is `Other`.
pub fn detect_platform(headers: &RawRow) -> Platform {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let joined = normalized.join(" ");

    for adapter in ADAPTERS {
        if adapter
            .marker_phrases()
            .iter()
            .any(|marker| normalized.iter().any(|h| h.contains(marker)))
        {
            return adapter.platform();
        }
    }

    for adapter in ADAPTERS {
        let indicators = adapter.indicator_phrases();
        if indicators.is_empty() {
            continue;
        }
        let score = indicators.iter().filter(|p| joined.contains(*p)).count();
        if score >= 2 {
            return adapter.platform();
        }
    }

    Platform::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(fields: &[&str]) -> RawRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_airbnb_spanish_export() {
        let h = headers(&[
            "Código de confirmación",
            "Fecha de inicio",
            "Fecha de finalización",
            "Nombre del viajero",
            "Tus ganancias",
        ]);
        assert_eq!(detect_platform(&h), Platform::Airbnb);
    }

    #[test]
    fn test_detect_airbnb_english_export() {
        let h = headers(&["Confirmation code", "Guest name", "Start date", "Earnings"]);
        assert_eq!(detect_platform(&h), Platform::Airbnb);
    }

    #[test]
    fn test_detect_booking_spanish_export() {
        let h = headers(&[
            "Número de reserva",
            "Nombre del cliente",
            "Entrada",
            "Salida",
            "Importe de la comisión",
        ]);
        assert_eq!(detect_platform(&h), Platform::Booking);
    }

    #[test]
    fn test_detect_booking_english_export() {
        let h = headers(&["Reservation number", "Unit type", "Commission amount"]);
        assert_eq!(detect_platform(&h), Platform::Booking);
    }

    #[test]
    fn test_detect_booking_marker_beats_airbnb_score() {
        // Booking exports also carry a guest-name style column; the
        // definitive marker must win over the scored indicators.
        let h = headers(&["Número de reserva", "Guest name", "Entrada", "Salida"]);
        assert_eq!(detect_platform(&h), Platform::Booking);
    }

    #[test]
    fn test_detect_unknown_falls_back_to_other() {
        let h = headers(&["Fecha", "Nombre", "Total"]);
        assert_eq!(detect_platform(&h), Platform::Other);
    }

    #[test]
    fn test_single_indicator_is_not_enough() {
        let h = headers(&["Guest name", "Fecha", "Total"]);
        assert_eq!(detect_platform(&h), Platform::Other);
    }

    #[test]
    fn test_airbnb_row_type_filter() {
        use crate::importer::columns::resolve_columns;
        let h = headers(&["Tipo", "Fecha de inicio"]);
        let cols = resolve_columns(&h, AIRBNB_COLUMNS);

        let reservation = headers(&["Reserva", "01/02/2025"]);
        let payout = headers(&["Payout", ""]);
        let resolution = headers(&["Resolution adjustment", ""]);
        let blank_type = headers(&["", "01/02/2025"]);

        assert!(AirbnbAdapter.is_reservation_row(&reservation, &cols));
        assert!(!AirbnbAdapter.is_reservation_row(&payout, &cols));
        assert!(!AirbnbAdapter.is_reservation_row(&resolution, &cols));
        assert!(AirbnbAdapter.is_reservation_row(&blank_type, &cols));
    }

    #[test]
    fn test_booking_status_filter() {
        use crate::importer::columns::resolve_columns;
        let h = headers(&["Estado", "Precio"]);
        let cols = resolve_columns(&h, BOOKING_COLUMNS);

        assert!(BookingAdapter.is_reservation_row(&headers(&["ok", "100"]), &cols));
        assert!(!BookingAdapter.is_reservation_row(&headers(&["cancelled", "100"]), &cols));
        assert!(!BookingAdapter.is_reservation_row(&headers(&["no_show", "100"]), &cols));
        assert!(!BookingAdapter.is_reservation_row(&headers(&["", "100"]), &cols));
    }

    #[test]
    fn test_booking_amount_extraction() {
        use crate::importer::columns::resolve_columns;
        let h = headers(&["Precio", "Importe de la comisión"]);
        let cols = resolve_columns(&h, BOOKING_COLUMNS);
        let row = headers(&["€200,00", "€30,00"]);

        let amounts = BookingAdapter.extract_amounts(&row, &cols);
        assert_eq!(amounts.gross_amount, 200.0);
        assert_eq!(amounts.platform_service_fee, 30.0);
        assert_eq!(amounts.host_earnings, 170.0);
    }

    #[test]
    fn test_airbnb_gross_falls_back_to_earnings() {
        use crate::importer::columns::resolve_columns;
        let h = headers(&["Tus ganancias"]);
        let cols = resolve_columns(&h, AIRBNB_COLUMNS);
        let row = headers(&["€150,50"]);

        let amounts = AirbnbAdapter.extract_amounts(&row, &cols);
        assert_eq!(amounts.host_earnings, 150.5);
        assert_eq!(amounts.gross_amount, 150.5);
    }
}
