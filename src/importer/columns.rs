// ==========================================
// Rental Ledger - Column Resolver
// ==========================================
// Stage 2: map semantic fields to column positions.
// Exports vary by export language and column ordering, so exact
// header matching is too brittle; each semantic field carries an
// ordered candidate substring list, most specific first, and the
// first normalized header containing a candidate wins.
// ==========================================

use crate::importer::tokenizer::RawRow;
use std::collections::HashMap;

// ==========================================
// SemanticField - fields the pipeline needs downstream
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticField {
    ConfirmationCode,
    ListingName,
    CheckIn,
    CheckOut,
    Nights,
    GuestName,
    GuestContact,
    GrossAmount,
    CleaningFee,
    PlatformServiceFee,
    HostEarnings,
    Status,
    RowType,
}

/// Ordered candidate substrings for one semantic field.
pub type FieldCandidates = (SemanticField, &'static [&'static str]);

// ==========================================
// ColumnIndexMap - semantic field -> column position
// ==========================================
// Absence is the sentinel `None`; request-scoped, built once per file.
#[derive(Debug, Default, Clone)]
pub struct ColumnIndexMap {
    indices: HashMap<SemanticField, usize>,
}

impl ColumnIndexMap {
    pub fn get(&self, field: SemanticField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn has(&self, field: SemanticField) -> bool {
        self.indices.contains_key(&field)
    }

    /// Trimmed, non-empty cell value for a semantic field, if the
    /// column exists and the row reaches it.
    pub fn value<'a>(&self, row: &'a RawRow, field: SemanticField) -> Option<&'a str> {
        let idx = self.get(field)?;
        let raw = row.get(idx)?.trim();
        if raw.is_empty() {
            None
        } else {
            Some(raw)
        }
    }
}

/// Normalize a header for matching: strip BOM and smart quotes,
/// case-fold, strip accents, collapse whitespace.
pub fn normalize_header(name: &str) -> String {
    let stripped: String = name
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, '“' | '”' | '„' | '"'))
        .map(fold_accent)
        .collect::<String>()
        .to_lowercase();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Spanish/Portuguese accented letters seen in real exports.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' | 'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        _ => c,
    }
}

/// Resolve every semantic field of a platform's candidate table
/// against the header row. Headers are normalized once; candidates
/// are tried in declaration order so a narrower phrase is checked
/// before a broader one that would match an unrelated column.
pub fn resolve_columns(headers: &RawRow, candidates: &[FieldCandidates]) -> ColumnIndexMap {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let mut map = ColumnIndexMap::default();
    for (field, names) in candidates {
        if let Some(idx) = find_column(&normalized, names) {
            map.indices.insert(*field, idx);
        }
    }
    map
}

fn find_column(normalized_headers: &[String], candidates: &[&str]) -> Option<usize> {
    for name in candidates {
        if let Some(idx) = normalized_headers.iter().position(|h| h.contains(name)) {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK_IN: &[FieldCandidates] = &[(
        SemanticField::CheckIn,
        &["fecha de inicio", "entrada", "start date", "check-in"],
    )];

    fn row(fields: &[&str]) -> RawRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header_accents_and_case() {
        assert_eq!(
            normalize_header("Código  de Confirmación"),
            "codigo de confirmacion"
        );
        assert_eq!(normalize_header("\u{feff}Entrada "), "entrada");
    }

    #[test]
    fn test_specific_candidate_beats_broad_match() {
        // "Fecha de llegada estimada" must not shadow the real check-in
        // column; "fecha de inicio" is tried before any arrival phrase.
        let headers = row(&["Fecha de llegada estimada", "Fecha de inicio"]);
        let map = resolve_columns(&headers, CHECK_IN);
        assert_eq!(map.get(SemanticField::CheckIn), Some(1));
    }

    #[test]
    fn test_absent_column_is_none() {
        let headers = row(&["Huésped", "Importe"]);
        let map = resolve_columns(&headers, CHECK_IN);
        assert_eq!(map.get(SemanticField::CheckIn), None);
        assert!(!map.has(SemanticField::CheckIn));
    }

    #[test]
    fn test_value_empty_cell_is_none() {
        let headers = row(&["Entrada"]);
        let map = resolve_columns(&headers, CHECK_IN);
        let data = row(&["  "]);
        assert_eq!(map.value(&data, SemanticField::CheckIn), None);
    }

    #[test]
    fn test_value_short_row_is_none() {
        let headers = row(&["Huésped", "Entrada"]);
        let map = resolve_columns(&headers, CHECK_IN);
        let data = row(&["Ana"]);
        assert_eq!(map.value(&data, SemanticField::CheckIn), None);
    }
}
