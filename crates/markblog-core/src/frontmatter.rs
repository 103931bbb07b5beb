//! Front-matter extraction.
//!
//! The header is a run of lines at the top of a document, closed by the
//! second line containing `---`:
//!
//! ```text
//! ---
//! title: Hello
//! description: A first post
//! created_at: 2023/4/1
//! image: /static/hello.png
//! ---
//! body...
//! ```
//!
//! Keys are recognized by substring containment, not exact match: any header
//! line containing `title` is the title line. A description mentioning the
//! word "title" is therefore read as a title. The rule lives entirely in
//! [`FrontMatterField::match_line`].

use chrono::NaiveDate;

use crate::document::FrontMatter;
use crate::error::{Diagnostic, Diagnostics};
use crate::lexer::{trim_line, Lexer};

/// Substring marking a delimiter line.
pub const DELIMITER: &str = "---";

/// Recognized header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterField {
    Title,
    Description,
    CreatedAt,
    Image,
}

impl FrontMatterField {
    /// Fields in matching precedence order.
    pub const ALL: [FrontMatterField; 4] = [
        FrontMatterField::Title,
        FrontMatterField::Description,
        FrontMatterField::CreatedAt,
        FrontMatterField::Image,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            FrontMatterField::Title => "title",
            FrontMatterField::Description => "description",
            FrontMatterField::CreatedAt => "created_at",
            FrontMatterField::Image => "image",
        }
    }

    /// Find the field a header line belongs to, by key containment.
    pub fn match_line(line: &str) -> Option<FrontMatterField> {
        Self::ALL.into_iter().find(|field| line.contains(field.key()))
    }
}

/// Value part of a `key: value` line: everything after the first `:`,
/// trimmed. Lines without a colon have an empty value.
pub fn field_value(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, value)) => trim_line(value),
        None => "",
    }
}

/// Parse a `year/month/day` date.
///
/// At least three `/`-separated tokens are required; extra tokens are
/// ignored. Each token must be an unsigned integer and the triple must name
/// a real calendar day.
pub fn parse_created_at(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('/');
    let mut next = || parts.next().and_then(|p| trim_line(p).parse::<u16>().ok());
    let year = next()?;
    let month = next()?;
    let day = next()?;
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
}

/// Front matter plus the position where the body begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub front_matter: FrontMatter,
    /// Index of the first body line.
    pub body_start: usize,
    /// Body text, starting at `body_start`.
    pub body: &'a str,
}

/// Extract the front matter, returning it with the index of the first body
/// line.
///
/// When fewer than two delimiter lines exist the whole content is body and
/// the header defaults.
pub fn extract_front_matter(content: &str) -> (FrontMatter, usize) {
    let extracted = extract(content, &mut Diagnostics::new());
    (extracted.front_matter, extracted.body_start)
}

/// Full extraction, recording recoverable problems into `diagnostics`.
pub fn extract<'a>(content: &'a str, diagnostics: &mut Diagnostics) -> Extracted<'a> {
    let mut lexer = Lexer::new(content);
    let mut front_matter = FrontMatter::default();
    let mut delimiters = 0;
    let mut opened_at = 0;
    // Reported only once the header is known to be closed.
    let mut bad_dates = Vec::new();

    while let Some(line) = lexer.next() {
        if line.text.contains(DELIMITER) {
            delimiters += 1;
            if delimiters == 1 {
                opened_at = line.number;
            } else {
                for diagnostic in bad_dates {
                    diagnostics.push(diagnostic);
                }
                return Extracted {
                    front_matter,
                    body_start: lexer.line_number(),
                    body: lexer.remaining(),
                };
            }
            continue;
        }

        let Some(field) = FrontMatterField::match_line(line.text) else {
            continue;
        };
        let value = field_value(line.text);
        match field {
            FrontMatterField::Title => front_matter.title = value.to_string(),
            FrontMatterField::Description => front_matter.description = value.to_string(),
            FrontMatterField::Image => front_matter.image_url = value.to_string(),
            FrontMatterField::CreatedAt => match parse_created_at(value) {
                Some(date) => front_matter.created_at = Some(date),
                None => bad_dates.push(Diagnostic::malformed_date(value, line.number)),
            },
        }
    }

    if delimiters == 1 {
        diagnostics.push(Diagnostic::unclosed_front_matter(opened_at));
    } else {
        log::debug!("no front matter found, rendering whole content as body");
    }

    // Without a closed header the scanned fields belonged to the body.
    Extracted {
        front_matter: FrontMatter::default(),
        body_start: 0,
        body: content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_fields_by_containment() {
        assert_eq!(
            FrontMatterField::match_line("title: Hi"),
            Some(FrontMatterField::Title)
        );
        assert_eq!(
            FrontMatterField::match_line("  my_subtitle : x"),
            Some(FrontMatterField::Title)
        );
        assert_eq!(
            FrontMatterField::match_line("description: a title here"),
            Some(FrontMatterField::Title)
        );
        assert_eq!(
            FrontMatterField::match_line("cover_image: x.png"),
            Some(FrontMatterField::Image)
        );
        assert_eq!(FrontMatterField::match_line("author: me"), None);
    }

    #[test]
    fn value_is_text_after_first_colon() {
        assert_eq!(field_value("image: https://x.io/a.png \r"), "https://x.io/a.png");
        assert_eq!(field_value("title"), "");
        assert_eq!(field_value("title:"), "");
    }

    #[test]
    fn parses_dates() {
        assert_eq!(
            parse_created_at("2023/4/1"),
            NaiveDate::from_ymd_opt(2023, 4, 1)
        );
        assert_eq!(
            parse_created_at(" 2023 / 04 / 01 / extra"),
            NaiveDate::from_ymd_opt(2023, 4, 1)
        );
        assert_eq!(parse_created_at("2023/x/1"), None);
        assert_eq!(parse_created_at("2023/4"), None);
        assert_eq!(parse_created_at("2023/13/1"), None);
        assert_eq!(parse_created_at("-1/4/1"), None);
    }
}
