//! Tabular-text (CSV) format.
//!
//! Export writes a fixed column order ([`COLUMNS`]) with RFC 4180 quoting:
//! text values are wrapped in double quotes with inner quotes doubled,
//! absent optional values are left empty and the favorite flag is written
//! bare as `true`/`false`.
//!
//! Import is driven by the header row, so columns may appear in any order
//! and unknown columns are ignored. Rows are split by [`split_rows`], a
//! character-level state machine that tracks whether it is inside a quoted
//! field; commas and newlines inside quotes never split.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{Result, VaultError};
use crate::record::{
    RecordId, RecordType, VaultRecord, format_timestamp, non_empty, parse_timestamp,
};

/// Export column order.
pub const COLUMNS: [&str; 10] = [
    "name",
    "username",
    "password",
    "url",
    "notes",
    "type",
    "folder",
    "favorite",
    "createdAt",
    "updatedAt",
];

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Render records as CSV with a header line and one row per record.
pub fn export_csv(records: &[VaultRecord]) -> String {
    let mut out = COLUMNS.join(",");

    for record in records {
        let fields = [
            quote(&record.name),
            quote(&record.username),
            quote(&record.password),
            quote_opt(record.url.as_deref()),
            quote_opt(record.notes.as_deref()),
            quote(record.record_type.as_str()),
            quote_opt(record.folder.as_deref()),
            record.favorite.to_string(),
            quote(&format_timestamp(&record.created_at)),
            quote(&format_timestamp(&record.updated_at)),
        ];
        out.push('\n');
        out.push_str(&fields.join(","));
    }

    out
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn quote_opt(value: Option<&str>) -> String {
    value.map(quote).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the beginning of a field.
    FieldStart,
    /// Inside a field that did not start with a quote.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Just saw a quote while inside a quoted field: either an escaped
    /// quote (`""`) or the closing quote.
    QuoteInQuoted,
}

/// Split CSV text into rows of unquoted, unescaped fields.
///
/// Rows that are empty or whitespace only are skipped. `\r` outside quotes
/// is ignored so CRLF input works.
///
/// # Errors
///
/// Returns [`VaultError::Parse`] if a quoted field is never closed.
pub fn split_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut line = 1usize;
    let mut quote_line = 1usize;

    for c in content.chars() {
        if c == '\n' {
            line += 1;
        }

        state = match (state, c) {
            (State::Quoted, '"') => State::QuoteInQuoted,
            (State::Quoted, _) => {
                field.push(c);
                State::Quoted
            }
            (State::QuoteInQuoted, '"') => {
                field.push('"');
                State::Quoted
            }
            (State::FieldStart, '"') => {
                quote_line = line;
                State::Quoted
            }
            (_, ',') => {
                row.push(std::mem::take(&mut field));
                State::FieldStart
            }
            (_, '\n') => {
                row.push(std::mem::take(&mut field));
                finish_row(&mut rows, std::mem::take(&mut row));
                State::FieldStart
            }
            (_, '\r') => state,
            (_, _) => {
                // Text after a closing quote is kept rather than rejected.
                field.push(c);
                State::Unquoted
            }
        };
    }

    if state == State::Quoted {
        return Err(VaultError::csv(format!(
            "unterminated quoted field starting on line {quote_line}"
        )));
    }

    if state != State::FieldStart || !field.is_empty() || !row.is_empty() {
        row.push(field);
        finish_row(&mut rows, row);
    }

    Ok(rows)
}

fn finish_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = row.iter().all(|f| f.trim().is_empty()) && row.len() <= 1;
    if !blank {
        rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse CSV text into records using the header row as the column map.
pub fn import_csv(content: &str, now: DateTime<Utc>) -> Result<Vec<VaultRecord>> {
    // Spreadsheet exports often start with a byte order mark.
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rows = split_rows(content)?.into_iter();

    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| VaultError::csv("missing header row"))?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    if !header.iter().any(|h| h == "name") {
        return Err(VaultError::csv("header has no `name` column"));
    }

    rows.enumerate()
        .map(|(index, row)| {
            let fields: HashMap<&str, String> = header
                .iter()
                .map(String::as_str)
                .zip(row)
                .collect();
            record_from_row(index + 1, fields, now)
        })
        .collect()
}

fn record_from_row(
    row_number: usize,
    mut fields: HashMap<&str, String>,
    now: DateTime<Utc>,
) -> Result<VaultRecord> {
    let mut take = |key: &str| non_empty(fields.remove(key));

    let name = take("name").unwrap_or_default();
    if name.trim().is_empty() {
        return Err(VaultError::csv(format!("row {row_number} has no name")));
    }

    let timestamp = |raw: Option<String>| {
        raw.as_deref().and_then(parse_timestamp).unwrap_or_else(|| {
            if let Some(raw) = &raw {
                tracing::debug!(raw = raw.as_str(), row = row_number, "invalid timestamp, using now");
            }
            now
        })
    };

    Ok(VaultRecord {
        id: take("id")
            .map(RecordId::from)
            .unwrap_or_else(RecordId::generate),
        name,
        username: take("username").unwrap_or_default(),
        password: take("password").unwrap_or_default(),
        url: take("url"),
        notes: take("notes"),
        record_type: take("type")
            .map(|t| RecordType::parse_lenient(&t))
            .unwrap_or_default(),
        folder: take("folder"),
        favorite: take("favorite").is_some_and(|f| parse_bool(&f)),
        created_at: timestamp(take("createdAt")),
        updated_at: timestamp(take("updatedAt")),
    })
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let records = import_csv("\u{feff}name,username\nAcme,bob\n", now()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Acme");
        assert_eq!(records[0].username, "bob");
    }

    #[test]
    fn splits_quoted_commas_and_escaped_quotes() {
        let rows = split_rows("a,\"b,c\",\"say \"\"hi\"\"\"\n1,2,3").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b,c".to_string(), "say \"hi\"".to_string()],
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
            ]
        );
    }

    #[test]
    fn newline_inside_quotes_stays_in_field() {
        let rows = split_rows("\"line1\nline2\",x\r\n").unwrap();
        assert_eq!(rows, vec![vec!["line1\nline2".to_string(), "x".to_string()]]);
    }

    #[test]
    fn blank_lines_are_skipped_and_trailing_empty_field_kept() {
        let rows = split_rows("a,b\n\n   \nc,\n").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn unterminated_quote_fails() {
        let err = split_rows("a,\"oops\nb").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn exported_row_imports() {
        let content = "name,username,password,url,notes,type,folder,favorite,createdAt,updatedAt\n\
            \"Acme\",\"bob\",\"s3cret\",\"\",\"\",\"login\",\"\",false,\"2024-01-01T00:00:00.000Z\",\"2024-01-01T00:00:00.000Z\"";
        let records = import_csv(content, now()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Acme");
        assert_eq!(r.username, "bob");
        assert_eq!(r.password, "s3cret");
        assert_eq!(r.record_type, RecordType::Login);
        assert!(!r.favorite);
        assert_eq!(r.url, None);
        assert_eq!(r.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn header_order_drives_mapping() {
        let content = "password,favorite,name,extra\nhunter2,true,Mail,ignored";
        let records = import_csv(content, now()).unwrap();
        let r = &records[0];
        assert_eq!(r.name, "Mail");
        assert_eq!(r.password, "hunter2");
        assert!(r.favorite);
        assert_eq!(r.record_type, RecordType::Login);
        assert_eq!(r.created_at, now());
        assert_eq!(r.updated_at, now());
    }

    #[test]
    fn short_rows_leave_fields_absent() {
        let records = import_csv("name,username,notes\nOnly", now()).unwrap();
        assert_eq!(records[0].username, "");
        assert_eq!(records[0].notes, None);
    }

    #[test]
    fn header_without_name_fails() {
        assert!(import_csv("title,username\nx,y", now()).is_err());
        assert!(import_csv("", now()).is_err());
    }

    #[test]
    fn export_quotes_text_and_leaves_bool_bare() {
        let record = VaultRecord::from_new(
            NewRecord {
                notes: Some("a, \"b\"".to_string()),
                ..NewRecord::named("Acme")
            },
            RecordId::from("1"),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();

        let csv = export_csv(&[record]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "\"Acme\",\"\",\"\",,\"a, \"\"b\"\"\",\"login\",,false,\
             \"2024-01-01T00:00:00.000Z\",\"2024-01-01T00:00:00.000Z\""
        );
    }

    #[test]
    fn round_trip_preserves_comma_and_quote() {
        let record = VaultRecord::from_new(
            NewRecord {
                name: "Bank, \"main\"".to_string(),
                password: "p,a\"ss".to_string(),
                notes: Some("multi\nline".to_string()),
                folder: Some("Finance".to_string()),
                ..NewRecord::default()
            },
            RecordId::from("1"),
            now(),
        )
        .unwrap();

        let back = import_csv(&export_csv(std::slice::from_ref(&record)), now()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name, record.name);
        assert_eq!(back[0].password, record.password);
        assert_eq!(back[0].notes, record.notes);
        assert_eq!(back[0].folder, record.folder);
    }
}
