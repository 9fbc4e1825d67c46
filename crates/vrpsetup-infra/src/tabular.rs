//! Tabular file ingestion
//!
//! The first row is the header; every later row becomes a [`Record`] keyed by
//! header names. Cells stay strings so zip codes keep their leading zeros.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use serde_json::Value;
use vrpsetup_domain::model::Record;
use vrpsetup_types::ParseError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read and parse a CSV file from disk
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, ParseError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| ParseError::Unreadable(format!("{}: {}", path.display(), e)))?;
    parse(&bytes)
}

/// Parse raw CSV bytes into records
pub fn parse(bytes: &[u8]) -> Result<Vec<Record>, ParseError> {
    let text = decode(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ParseError::Unreadable(e.to_string()))?
        .clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut seen = HashSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(header) {
            return Err(ParseError::DuplicateColumn(header.to_string()));
        }
    }

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = result.map_err(|e| ParseError::Unreadable(format!("row {}: {}", row_idx + 1, e)))?;
        if row.iter().all(|cell| cell.is_empty()) {
            tracing::debug!(row = row_idx + 1, "Skipping blank row");
            continue;
        }

        let mut record = Record::new();
        // Short rows simply lack the trailing columns; extra cells are dropped
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            record.insert(header, Value::String(cell.to_string()));
        }
        records.push(record);
    }

    tracing::debug!(
        columns = headers.len(),
        rows = records.len(),
        "Parsed tabular file"
    );
    Ok(records)
}

/// UTF-8 (BOM stripped), falling back to Windows-1252 for spreadsheet exports
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::warn!("File is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_header_and_rows() {
        let records = parse(b"zip,country\n10001,US\n 94105 , US \n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("zip").as_deref(), Some("10001"));
        assert_eq!(records[1].text("zip").as_deref(), Some("94105"));
        assert_eq!(records[1].text("country").as_deref(), Some("US"));
        assert_eq!(records[0].columns().collect::<Vec<_>>(), vec!["zip", "country"]);
    }

    #[test]
    fn test_leading_zeros_kept() {
        let records = parse(b"zip\n02134\n").unwrap();
        assert_eq!(records[0].text("zip").as_deref(), Some("02134"));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        assert_eq!(parse(b"").unwrap_err(), ParseError::MissingHeader);
        assert_eq!(parse(b" , \n1,2\n").unwrap_err(), ParseError::MissingHeader);
    }

    #[test]
    fn test_header_only_is_empty() {
        let records = parse(b"zip,country\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_duplicate_header() {
        assert_eq!(
            parse(b"zip,zip\n1,2\n").unwrap_err(),
            ParseError::DuplicateColumn("zip".to_string())
        );
    }

    #[test]
    fn test_short_long_and_blank_rows() {
        let records = parse(b"latitude,longitude,kg\n40.0,-100.0\n,,\n41.0,-90.0,5,extra\n").unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].has_field("kg"));
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1].text("kg").as_deref(), Some("5"));
    }

    #[test]
    fn test_bom_and_windows_1252() {
        let records = parse(b"\xEF\xBB\xBFzip\n10001\n").unwrap();
        assert_eq!(records[0].text("zip").as_deref(), Some("10001"));

        // 0xE9 is "é" in Windows-1252 and invalid on its own in UTF-8
        let records = parse(b"city,zip\nMontr\xE9al,10001\n").unwrap();
        assert_eq!(records[0].text("city").as_deref(), Some("Montréal"));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "zip").unwrap();
        writeln!(file, "10001").unwrap();
        let records = parse_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);

        let missing = file.path().with_extension("missing");
        assert!(matches!(parse_file(&missing), Err(ParseError::Unreadable(_))));
    }
}
