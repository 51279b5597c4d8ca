//! Minimal CSV reader for spreadsheet exports
//!
//! Spreadsheet CSV exports quote most fields, so names containing commas,
//! doubled quotes (`""`) and embedded line breaks have to survive parsing.

/// A parsed CSV table: one header row followed by data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text into a header and rows
    ///
    /// Rows whose cells are all blank are dropped. Cells are trimmed.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut records = parse_records(text.trim_start_matches('\u{feff}')).into_iter();
        let headers = records.next().unwrap_or_default();
        let rows = records
            .filter(|record| record.iter().any(|cell| !cell.is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// Header names in column order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Whether the table has no header row
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.iter().all(String::is_empty)
    }

    /// Data rows
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Find a column index by header name (case-insensitive)
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }
}

/// Get a cell from a row, treating short rows and spreadsheet `nan` as empty
#[must_use]
pub fn cell(row: &[String], column: Option<usize>) -> &str {
    let value = column
        .and_then(|idx| row.get(idx))
        .map_or("", String::as_str);
    if value.eq_ignore_ascii_case("nan") {
        ""
    } else {
        value
    }
}

/// Split CSV text into records of trimmed fields
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => record.push(std::mem::take(&mut field).trim().to_string()),
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut field).trim().to_string());
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field.trim().to_string());
        records.push(record);
    }

    records
}
