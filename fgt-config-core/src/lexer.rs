//! Quote-aware splitting of FortiGate command scripts into logical lines.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;

use crate::error::ParseError;

const QUOTE: char = '"';
const ESCAPE: char = '\\';
const COMMENT: char = '#';

/// One word of a command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Word text, with surrounding quotes removed and escapes decoded.
    pub text: String,
    /// Whether the word was written as a `"..."` string.
    pub quoted: bool,
}

impl Token {
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }
}

/// Writes the word back as it appears in a configuration, re-quoting and
/// escaping quoted text.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.text.replace('\\', "\\\\").replace('"', "\\\""))
        } else {
            f.write_str(&self.text)
        }
    }
}

/// A logical command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number where the command starts.
    pub number: usize,
    /// Words in order. Never empty.
    pub tokens: Vec<Token>,
}

impl Line {
    /// Leading keyword of the line.
    pub fn keyword(&self) -> &str {
        self.tokens.first().map(|t| t.text.as_str()).unwrap_or_default()
    }

    /// Tokens after the keyword.
    pub fn args(&self) -> &[Token] {
        self.tokens.get(1..).unwrap_or_default()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Lazy iterator of logical lines over a configuration text.
///
/// Blank lines and `#` comment lines are skipped. Comment lines seen before
/// the first command are kept and available through [`Lexer::header_comments`].
/// After the first error the iterator is exhausted.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    header: Vec<String>,
    seen_command: bool,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            header: Vec::new(),
            seen_command: false,
            failed: false,
        }
    }

    /// Comment lines that preceded the first command.
    pub fn header_comments(&self) -> &[String] {
        &self.header
    }

    pub fn into_header(self) -> Vec<String> {
        self.header
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.chars.peek() {
            if *c == '\n' || !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn read_comment(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.chars.next_if(|c| *c != '\n') {
            text.push(c);
        }
        text.trim_end().to_string()
    }

    fn read_word(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.chars.next_if(|c| !c.is_whitespace()) {
            text.push(c);
        }
        Token::bare(text)
    }

    fn read_quoted(&mut self) -> Result<Token, ParseError> {
        let opened_at = self.line;
        self.chars.next();

        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => {
                    return Err(ParseError::syntax(opened_at, "unterminated quoted string"));
                }
                Some(QUOTE) => break,
                Some(ESCAPE) => match self.chars.next() {
                    None => {
                        return Err(ParseError::syntax(
                            opened_at,
                            "escape character at end of input",
                        ));
                    }
                    Some(c @ (QUOTE | ESCAPE)) => text.push(c),
                    Some(c) => {
                        if c == '\n' {
                            self.line += 1;
                        }
                        text.push(ESCAPE);
                        text.push(c);
                    }
                },
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    text.push(c);
                }
            }
        }

        Ok(Token::quoted(text))
    }

    fn read_line(&mut self) -> Result<Option<Line>, ParseError> {
        loop {
            self.skip_blanks();
            match self.chars.peek() {
                None => return Ok(None),
                Some('\n') => {
                    self.chars.next();
                    self.line += 1;
                    continue;
                }
                Some(&COMMENT) => {
                    let comment = self.read_comment();
                    if !self.seen_command {
                        self.header.push(comment);
                    }
                    continue;
                }
                Some(_) => {}
            }

            let number = self.line;
            let mut tokens = Vec::new();
            loop {
                self.skip_blanks();
                match self.chars.peek() {
                    None => break,
                    Some('\n') => {
                        self.chars.next();
                        self.line += 1;
                        break;
                    }
                    Some(&QUOTE) => tokens.push(self.read_quoted()?),
                    Some(&COMMENT) => {
                        return Err(ParseError::syntax(
                            self.line,
                            "unexpected comment after command",
                        ));
                    }
                    Some(_) => tokens.push(self.read_word()),
                }
            }

            self.seen_command = true;
            return Ok(Some(Line { number, tokens }));
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Line, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_line() {
            Ok(line) => line.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Split `input` into logical lines, failing on the first malformed one.
pub fn tokenize(input: &str) -> Result<Vec<Line>, ParseError> {
    Lexer::new(input).collect()
}
