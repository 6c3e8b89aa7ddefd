use thiserror::Error;

/// A parsed query result: one header record plus zero or more data rows.
///
/// Header names are not required to be unique; order is significant and
/// matches the engine's output exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated quoted field on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("bare quote in unquoted field on line {line}")]
    BareQuote { line: usize },

    #[error("unexpected character after closing quote on line {line}")]
    TrailingQuote { line: usize },

    #[error("record {record} has {found} fields, expected {expected}")]
    UnevenFields {
        record: usize,
        expected: usize,
        found: usize,
    },
}

/// Parses CSV text produced by the query engine into headers and rows.
///
/// Standard quoting rules apply: fields containing the delimiter, quote
/// character, or line breaks are quoted, and a doubled quote inside a quoted
/// field is a literal quote. Empty input yields an empty [`QueryResult`],
/// not an error. All records after the first must carry the same field count
/// as the header record.
pub fn parse(text: &str) -> Result<QueryResult, ParseError> {
    let mut records = read_records(text)?;
    if records.is_empty() {
        return Ok(QueryResult::default());
    }

    let expected = records[0].len();
    for (i, record) in records.iter().enumerate().skip(1) {
        if record.len() != expected {
            return Err(ParseError::UnevenFields {
                record: i + 1,
                expected,
                found: record.len(),
            });
        }
    }

    let headers = records.remove(0);
    Ok(QueryResult {
        headers,
        rows: records,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteEnd,
}

fn read_records(text: &str) -> Result<Vec<Vec<String>>, ParseError> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut line = 1usize;

    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        // Normalize CRLF so bare '\n' is the only terminator we see.
        let ch = if ch == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
            '\n'
        } else {
            ch
        };

        match state {
            State::FieldStart => match ch {
                '"' => state = State::Quoted,
                ',' => record.push(String::new()),
                '\n' => {
                    if record.is_empty() {
                        // Blank line between records: skipped entirely.
                        line += 1;
                        continue;
                    }
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    line += 1;
                }
                _ => {
                    field.push(ch);
                    state = State::Unquoted;
                }
            },

            State::Unquoted => match ch {
                ',' => {
                    record.push(std::mem::take(&mut field));
                    state = State::FieldStart;
                }
                '"' => return Err(ParseError::BareQuote { line }),
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    line += 1;
                    state = State::FieldStart;
                }
                _ => field.push(ch),
            },

            State::Quoted => match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        state = State::QuoteEnd;
                    }
                }
                '\n' => {
                    field.push('\n');
                    line += 1;
                }
                _ => field.push(ch),
            },

            State::QuoteEnd => match ch {
                ',' => {
                    record.push(std::mem::take(&mut field));
                    state = State::FieldStart;
                }
                '\n' => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    line += 1;
                    state = State::FieldStart;
                }
                _ => return Err(ParseError::TrailingQuote { line }),
            },
        }
    }

    match state {
        State::Quoted => return Err(ParseError::UnterminatedQuote { line }),
        State::Unquoted | State::QuoteEnd => {
            record.push(field);
            records.push(record);
        }
        State::FieldStart => {
            // Text ended right after a delimiter: the record still owes a
            // trailing empty field. Text ending on a newline owes nothing.
            if !record.is_empty() {
                record.push(field);
                records.push(record);
            }
        }
    }

    Ok(records)
}
