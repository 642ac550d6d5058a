//! Placeholder styles.
//!
//! Statements are assembled with `?` placeholders. Postgres-style drivers
//! need `$1, $2, ...`, which [`PlaceholderStyle::Dollar`] produces by
//! renumbering every `?` in textual order. Question marks inside quoted
//! literals and identifiers, comments and dollar-quoted bodies are left alone.

/// Parameter placeholder style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` (MySQL, SQLite).
    #[default]
    Question,
    /// `$1, $2, ...` (Postgres).
    Dollar,
}

impl PlaceholderStyle {
    /// Render `?`-style SQL in this style.
    pub fn render(self, sql: &str) -> String {
        match self {
            PlaceholderStyle::Question => sql.to_string(),
            PlaceholderStyle::Dollar => number_placeholders(sql),
        }
    }
}

/// Count `?` placeholders outside quoted text and comments.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    scan(sql, |token| {
        if let Token::Placeholder = token {
            count += 1;
        }
    });
    count
}

fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut idx = 0usize;
    scan(sql, |token| match token {
        Token::Char(c) => out.push(c),
        Token::Placeholder => {
            idx += 1;
            out.push('$');
            out.push_str(&idx.to_string());
        }
    });
    out
}

enum Token {
    Char(char),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Normal,
    /// `'...'`; in `E'...'` strings a backslash escapes the next char.
    Single { escapes: bool },
    Double,
    LineComment,
    BlockComment { depth: usize },
    /// `$tag$...$tag$`, holding the full delimiter.
    Dollar(String),
}

/// Walk `sql`, reporting `?` as a placeholder unless it sits inside a quoted
/// literal, a quoted identifier, a comment or a dollar-quoted body.
fn scan(sql: &str, mut emit: impl FnMut(Token)) {
    let chars: Vec<char> = sql.chars().collect();
    let mut state = State::Normal;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match &mut state {
            State::Normal => match c {
                '?' => {
                    emit(Token::Placeholder);
                    i += 1;
                    continue;
                }
                '\'' => {
                    state = State::Single {
                        escapes: is_escape_prefix(&chars, i),
                    }
                }
                '"' => state = State::Double,
                '-' if next == Some('-') => {
                    emit(Token::Char(c));
                    emit(Token::Char('-'));
                    i += 2;
                    state = State::LineComment;
                    continue;
                }
                '/' if next == Some('*') => {
                    emit(Token::Char(c));
                    emit(Token::Char('*'));
                    i += 2;
                    state = State::BlockComment { depth: 1 };
                    continue;
                }
                '$' => {
                    if let Some(delimiter) = dollar_delimiter(&chars, i) {
                        let len = delimiter.chars().count();
                        delimiter.chars().for_each(|d| emit(Token::Char(d)));
                        i += len;
                        state = State::Dollar(delimiter);
                        continue;
                    }
                }
                _ => {}
            },
            State::Single { escapes } => {
                if *escapes && c == '\\' {
                    emit(Token::Char(c));
                    if let Some(escaped) = next {
                        emit(Token::Char(escaped));
                    }
                    i += 2;
                    continue;
                }
                if c == '\'' {
                    if next == Some('\'') {
                        emit(Token::Char(c));
                        emit(Token::Char(c));
                        i += 2;
                        continue;
                    }
                    state = State::Normal;
                }
            }
            State::Double => {
                if c == '"' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment { depth } => {
                if c == '/' && next == Some('*') {
                    *depth += 1;
                    emit(Token::Char(c));
                    emit(Token::Char('*'));
                    i += 2;
                    continue;
                }
                if c == '*' && next == Some('/') {
                    *depth -= 1;
                    emit(Token::Char(c));
                    emit(Token::Char('/'));
                    i += 2;
                    if *depth == 0 {
                        state = State::Normal;
                    }
                    continue;
                }
            }
            State::Dollar(delimiter) => {
                if starts_with_at(&chars, i, delimiter) {
                    let len = delimiter.chars().count();
                    chars[i..i + len].iter().for_each(|d| emit(Token::Char(*d)));
                    i += len;
                    state = State::Normal;
                    continue;
                }
            }
        }

        emit(Token::Char(c));
        i += 1;
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `E'` / `e'` starting a string with backslash escapes.
fn is_escape_prefix(chars: &[char], quote: usize) -> bool {
    match quote.checked_sub(1).map(|p| chars[p]) {
        Some('E' | 'e') => quote
            .checked_sub(2)
            .is_none_or(|p| !is_ident_char(chars[p])),
        _ => false,
    }
}

/// Delimiter (`$$` or `$tag$`) of a dollar-quoted string starting at `start`.
///
/// `$1` style parameters and identifiers containing `$` are not delimiters.
fn dollar_delimiter(chars: &[char], start: usize) -> Option<String> {
    if start > 0 && is_ident_char(chars[start - 1]) {
        return None;
    }
    let mut end = start + 1;
    if let Some(first) = chars.get(end) {
        if first.is_ascii_digit() {
            return None;
        }
    }
    while let Some(c) = chars.get(end) {
        match c {
            '$' => return Some(chars[start..=end].iter().collect()),
            c if is_ident_char(*c) => end += 1,
            _ => return None,
        }
    }
    None
}

fn starts_with_at(chars: &[char], at: usize, needle: &str) -> bool {
    let mut i = at;
    for n in needle.chars() {
        if chars.get(i) != Some(&n) {
            return false;
        }
        i += 1;
    }
    true
}
