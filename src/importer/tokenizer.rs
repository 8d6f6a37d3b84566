//! Comma-delimited text tokenizer.
//!
//! Quoting follows RFC 4180: a double quote toggles quoted mode, `""` inside a
//! quoted field is a literal quote, and commas/newlines inside quotes are part
//! of the field. Runs of newline characters (`\n`, `\r\n`, bare `\r`, blank
//! lines) collapse into a single row boundary.

/// Header row plus data rows, all cells trimmed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Cell lookup that treats missing trailing cells as empty.
    pub fn cell<'a>(row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Unquoted,
    Quoted,
}

struct Tokenizer {
    state: State,
    field: String,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Tokenizer {
    fn new() -> Self {
        Self {
            state: State::Unquoted,
            field: String::new(),
            row: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn end_field(&mut self) {
        self.row.push(std::mem::take(&mut self.field));
    }

    fn end_row(&mut self) {
        if !self.field.is_empty() || !self.row.is_empty() {
            self.end_field();
        }
        let row = std::mem::take(&mut self.row);
        // whitespace-only lines carry no data
        let blank = row.len() == 1 && row[0].trim().is_empty();
        if !row.is_empty() && !blank {
            self.rows.push(row);
        }
    }
}

/// Tokenize `text` into a header row and data rows.
///
/// Returns `None` when the input holds no rows at all.
pub fn parse(text: &str) -> Option<ParsedTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut tok = Tokenizer::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match (tok.state, ch) {
            (State::Quoted, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                tok.field.push('"');
            }
            (State::Quoted, '"') => tok.state = State::Unquoted,
            (State::Unquoted, '"') => tok.state = State::Quoted,
            (State::Unquoted, ',') => tok.end_field(),
            (State::Unquoted, '\n' | '\r') => {
                tok.end_row();
                while matches!(chars.peek(), Some('\n' | '\r')) {
                    chars.next();
                }
            }
            (_, c) => tok.field.push(c),
        }
    }
    tok.end_row();

    let mut rows = tok.rows.into_iter();
    let headers = rows
        .next()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let rows = rows
        .map(|r| r.iter().map(|c| c.trim().to_string()).collect())
        .collect();
    Some(ParsedTable { headers, rows })
}
