//! Fault-tolerant parsing of delimited telemetry exports.
//!
//! Exports from the field loggers are irregular: the delimiter varies by
//! firmware, a header line may or may not be present, and a corrupt tail
//! must not lose a valid head. Parsing therefore never fails on malformed
//! content; bad rows are counted and skipped.

use crate::record::{PlantRecord, CANONICAL_HEADERS, CSV_ROW_LENGTH};
use csv::ReaderBuilder;
use log::debug;

/// Delimiters recognized in telemetry exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn as_char(&self) -> char {
        self.as_byte() as char
    }
}

/// Detect the delimiter from the first line of an export.
///
/// Counts `,`, `;`, and tab occurrences; the highest count wins, with ties
/// broken by the fixed preference order comma > semicolon > tab. The chosen
/// delimiter applies to every line of the file (the format is homogeneous).
pub fn detect_delimiter(first_line: &str) -> Delimiter {
    let candidates = [Delimiter::Comma, Delimiter::Semicolon, Delimiter::Tab];
    let mut best = Delimiter::Comma;
    let mut best_count = first_line.matches(',').count();
    for candidate in candidates.into_iter().skip(1) {
        let count = first_line.matches(candidate.as_char()).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Result of parsing a full telemetry payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// Successfully normalized records, in file order (not time-sorted)
    pub records: Vec<PlantRecord>,
    /// Lines that failed normalization (a header line counts as one)
    pub skipped_lines: usize,
    /// The delimiter detected on the first line
    pub delimiter: Delimiter,
}

/// Parse a raw telemetry payload into normalized records.
///
/// Blank lines are skipped silently; lines that fail normalization are
/// counted in `skipped_lines` and parsing continues. An empty payload
/// yields an empty outcome, never an error.
pub fn parse(raw_text: &str) -> ParseOutcome {
    let first_line = raw_text.lines().next().unwrap_or_default();
    let delimiter = detect_delimiter(first_line);

    let mut records = Vec::new();
    let mut skipped_lines = 0usize;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(raw_text.as_bytes());

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(_) => {
                skipped_lines += 1;
                continue;
            }
        };
        // Whitespace-only rows are blanks, not errors
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        match PlantRecord::try_from(&row) {
            Ok(record) => records.push(record),
            Err(_) => skipped_lines += 1,
        }
    }

    debug!(
        "parsed {} records ({} skipped, delimiter {:?})",
        records.len(),
        skipped_lines,
        delimiter
    );

    ParseOutcome {
        records,
        skipped_lines,
        delimiter,
    }
}

/// Advisory pre-check: does this payload look like a plant telemetry CSV?
///
/// True when the first line, split by the detected delimiter, has at least
/// 7 columns and at least one column name case-insensitively matches a
/// canonical header name. A heuristic for file pickers, not a correctness
/// gate: headerless exports legitimately fail this check and still parse.
pub fn looks_like_plant_csv(raw_text: &str) -> bool {
    let first_line = match raw_text.lines().next() {
        Some(line) => line,
        None => return false,
    };
    let delimiter = detect_delimiter(first_line);
    let columns: Vec<&str> = first_line.split(delimiter.as_char()).collect();
    if columns.len() < CSV_ROW_LENGTH {
        return false;
    }
    columns.iter().any(|column| {
        let name = column.trim().to_ascii_lowercase();
        CANONICAL_HEADERS.contains(&name.as_str())
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const COMMA_EXPORT: &str = "\
id,timestamp,temperature,relative_humidity,lux,moisture_value,moisture_percent
A,1700000000,21.5,55.0,320,600,40.0
B,1700003600,22.0,50.0,310,610,38.0
";

    const SEMICOLON_EXPORT: &str = "\
A;1700000000;21.5;55.0;320;600;40.0
B;1700003600;22.0;50.0;310;610;38.0
";

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c"), Delimiter::Comma);
        assert_eq!(detect_delimiter("a;b;c"), Delimiter::Semicolon);
        assert_eq!(detect_delimiter("a\tb\tc"), Delimiter::Tab);
        // More semicolons than commas
        assert_eq!(detect_delimiter("a;b;c,d"), Delimiter::Semicolon);
    }

    #[test]
    fn test_detect_delimiter_tie_prefers_comma() {
        assert_eq!(detect_delimiter("a,b;c"), Delimiter::Comma);
        assert_eq!(detect_delimiter(""), Delimiter::Comma);
    }

    #[test]
    fn test_detect_delimiter_idempotent() {
        let line = "A;1700000000;21.5;55.0;320;600;40.0";
        let first = detect_delimiter(line);
        assert_eq!(detect_delimiter(line), first);
        assert_eq!(detect_delimiter(line), first);
    }

    #[test]
    fn test_parse_with_header_counts_one_skip() {
        let outcome = parse(COMMA_EXPORT);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped_lines, 1);
        assert_eq!(outcome.delimiter, Delimiter::Comma);
        assert_eq!(outcome.records[0].id, "A");
        assert_eq!(outcome.records[1].id, "B");
    }

    #[test]
    fn test_parse_semicolon_headerless() {
        let outcome = parse(SEMICOLON_EXPORT);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped_lines, 0);
        assert_eq!(outcome.delimiter, Delimiter::Semicolon);
    }

    #[test]
    fn test_parse_skips_short_row_and_continues() {
        let payload = "\
A,1700000000,21.5,55.0,320,600,40.0
B,1700003600,22.0
C,1700007200,20.0,52.0,300,590,41.0
";
        let outcome = parse(payload);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped_lines, 1);
        assert_eq!(outcome.records[1].id, "C");
    }

    #[test]
    fn test_parse_blank_lines_not_counted() {
        let payload = "A,1700000000,21.5,55.0,320,600,40.0\n\n\nB,1700003600,22.0,50.0,310,610,38.0\n";
        let outcome = parse(payload);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped_lines, 0);
    }

    #[test]
    fn test_parse_empty_payload() {
        let outcome = parse("");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped_lines, 0);
    }

    #[test]
    fn test_parse_preserves_file_order() {
        // Deliberately out of time order
        let payload = "\
B,1700003600,22.0,50.0,310,610,38.0
A,1700000000,21.5,55.0,320,600,40.0
";
        let outcome = parse(payload);
        assert_eq!(outcome.records[0].id, "B");
        assert_eq!(outcome.records[1].id, "A");
    }

    #[test]
    fn test_looks_like_plant_csv() {
        assert!(looks_like_plant_csv(COMMA_EXPORT));
        // Headerless data line has 7 columns but no canonical name
        assert!(!looks_like_plant_csv(SEMICOLON_EXPORT));
        // Too few columns
        assert!(!looks_like_plant_csv("id,timestamp,temperature\n"));
        assert!(!looks_like_plant_csv(""));
        // Case-insensitive match
        assert!(looks_like_plant_csv(
            "ID,Timestamp,Temp,RH,Brightness,MoistRaw,MoistPct\n"
        ));
    }
}
