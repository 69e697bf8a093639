// ==========================================
// Rental Ledger - Export Tokenizer
// ==========================================
// Stage 0: raw file text -> rows of trimmed fields.
// Platform exports are inconsistent: quoted fields with doubled
// quotes, comma AND semicolon separators in the same file, CRLF
// or bare LF, a leading BOM. This stage never raises structural
// errors; malformed input degrades to best-effort rows.
// ==========================================

/// One tokenized row; lives only while its file is processed.
pub type RawRow = Vec<String>;

/// Split full file content into rows of trimmed fields.
///
/// Rules:
/// - a leading U+FEFF is stripped before anything else
/// - `"` opens a quoted field; `""` inside quotes is a literal quote
/// - `,` and `;` both separate fields, but only outside quotes
/// - `\r\n` and `\n` both end a row
/// - fully blank rows are discarded
/// - an unterminated quote at EOF flushes whatever was accumulated
pub fn tokenize(content: &str) -> Vec<RawRow> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut rows: Vec<RawRow> = Vec::new();
    let mut current_row: RawRow = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;

    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current_field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => current_field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' | ';' => {
                current_row.push(current_field.trim().to_string());
                current_field = String::new();
            }
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                flush_row(&mut rows, &mut current_row, &mut current_field);
            }
            '\n' => flush_row(&mut rows, &mut current_row, &mut current_field),
            _ => current_field.push(ch),
        }
    }

    // Last row may lack a trailing line break (or close an open quote).
    if !current_field.is_empty() || !current_row.is_empty() {
        flush_row(&mut rows, &mut current_row, &mut current_field);
    }

    rows
}

fn flush_row(rows: &mut Vec<RawRow>, row: &mut RawRow, field: &mut String) {
    row.push(field.trim().to_string());
    field.clear();
    if row.iter().any(|f| !f.is_empty()) {
        rows.push(std::mem::take(row));
    } else {
        row.clear();
    }
}
