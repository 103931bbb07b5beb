//! Line lexer feeding the front-matter scan and the block converter.
//!
//! Uses `memchr` for newline detection (SIMD on supported platforms).
//!
//! # Performance
//!
//! - Zero-copy: lines borrow directly from input
//! - One pass over the bytes, no lookahead buffering

use memchr::memchr;

/// A single line from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text, without the trailing newline or carriage return.
    pub text: &'a str,
    /// Zero-based line index in the original input.
    pub number: usize,
}

impl<'a> Line<'a> {
    /// Get the line text with surrounding spaces, tabs and CRs removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        trim_line(self.text)
    }
}

/// Trim the characters the markup treats as insignificant around a line.
#[inline]
pub fn trim_line(text: &str) -> &str {
    text.trim_matches(|c| c == ' ' || c == '\t' || c == '\r')
}

/// Line lexer over a complete document.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    offset: usize,
    number: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
            number: 0,
        }
    }

    /// Create a lexer over a slice that begins at line `first_line` of a
    /// larger document, so reported line numbers stay absolute.
    #[inline]
    pub fn starting_at(input: &'a str, first_line: usize) -> Self {
        Self {
            number: first_line,
            ..Self::new(input)
        }
    }

    /// Zero-based index of the next line to be produced.
    #[inline(always)]
    pub fn line_number(&self) -> usize {
        self.number
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Get the remaining unconsumed input.
    #[inline(always)]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.offset..]
    }

    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.offset >= self.bytes.len() {
            return None;
        }

        let start = self.offset;
        let end = memchr(b'\n', &self.bytes[start..]).map_or(self.bytes.len(), |pos| start + pos);
        self.offset = (end + 1).min(self.bytes.len());

        // `\n` and `\r` are ASCII, so the slice bounds sit on char boundaries.
        let raw = &self.input[start..end];
        let text = raw.strip_suffix('\r').unwrap_or(raw);

        let line = Line {
            text,
            number: self.number,
        };
        self.number += 1;
        Some(line)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    #[inline]
    fn next(&mut self) -> Option<Line<'a>> {
        self.read_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_and_strips_cr() {
        let lines: Vec<_> = Lexer::new("a\r\nb\n\nc").map(|l| l.text).collect();
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let mut lexer = Lexer::new("one\ntwo\n");
        assert_eq!(lexer.next().map(|l| l.number), Some(0));
        assert_eq!(lexer.remaining(), "two\n");
        assert_eq!(lexer.next().map(|l| l.text), Some("two"));
        assert!(lexer.is_eof());
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.line_number(), 2);
    }

    #[test]
    fn numbering_can_start_mid_document() {
        let numbers: Vec<_> = Lexer::starting_at("x\ny", 5).map(|l| l.number).collect();
        assert_eq!(numbers, vec![5, 6]);
    }

    #[test]
    fn trims_tabs_and_carriage_returns() {
        assert_eq!(trim_line("\t  # Title \r"), "# Title");
        assert_eq!(Line { text: " \t", number: 0 }.trimmed(), "");
    }
}
