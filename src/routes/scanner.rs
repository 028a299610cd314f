use std::convert::TryFrom;

use crate::error::RouteError;

use super::Family;

const SESSION: (&str, &str) = ("[", "]");
const CLAUSE: (&str, &str) = ("{ ", " }");
const COMMUNITY: (&str, &str) = ("BGP.ext_community: (", ")");
const FAMILY_TAGS: [&str; 2] = ["flow4", "flow6"];

/// Extraction rules for one route as rendered by `birdc show route ... all`
///
/// ```text
///  flow4 { dst 203.0.113.0/24; dport 80; } [flowspec1 2024-01-01 from 192.0.2.1] * (100)
///     BGP.ext_community: (generic, 0x80060000, 0x0)
/// ```
/// Each rule returns the text strictly between its delimiters (first left delimiter,
/// first right delimiter after it), or "" when the left delimiter is missing.
#[derive(Debug, Clone, Copy)]
pub struct RouteScanner<'a> {
    text: &'a str,
}

impl<'a> RouteScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Session header: `[name time from neighbor]`
    pub fn session(&self) -> &'a str {
        self.between(SESSION)
    }

    /// Match clause: `{ key value; ... }`
    pub fn clause(&self) -> &'a str {
        self.between(CLAUSE)
    }

    /// First extended community: `(kind, high, low)`
    pub fn community(&self) -> &'a str {
        self.between(COMMUNITY)
    }

    /// Earliest flow4/flow6 tag in the route
    pub fn family(&self) -> Result<Family, RouteError> {
        FAMILY_TAGS
            .iter()
            .filter_map(|tag| self.text.find(tag).map(|pos| (pos, *tag)))
            .min_by_key(|(pos, _)| *pos)
            .ok_or(RouteError::MissingFamily)
            .and_then(|(_, tag)| Family::try_from(tag))
    }

    fn between(&self, (left, right): (&str, &str)) -> &'a str {
        match self.text.split_once(left) {
            Some((_, rest)) => rest.split(right).next().unwrap_or(""),
            None => "",
        }
    }
}
