use std::fmt;

use serde::Deserialize;

/// How a BIRD reply is cut into one text block per FlowSpec route
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Every route starts at a `flow4`/`flow6` net and runs until the next one,
    /// so multi-line attributes stay with their route
    Block,
    /// Only lines mentioning `flow4`/`flow6`; attributes on following lines are lost
    Line,
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Block
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SplitMode::Block => write!(f, "block"),
            SplitMode::Line => write!(f, "line"),
        }
    }
}

/// Cut a raw reply into route blocks, keeping reply order
pub fn split_routes(raw: &str, mode: SplitMode) -> Vec<&str> {
    match mode {
        SplitMode::Line => raw
            .lines()
            .filter(|line| line.contains("flow4") || line.contains("flow6"))
            .collect(),
        SplitMode::Block => {
            let starts: Vec<usize> = raw
                .match_indices("flow")
                .map(|(pos, _)| pos)
                .filter(|pos| !raw[..*pos].ends_with('[') && is_route_start(&raw[*pos..]))
                .collect();
            starts
                .iter()
                .enumerate()
                .map(|(i, start)| {
                    let end = starts.get(i + 1).copied().unwrap_or_else(|| raw.len());
                    &raw[*start..end]
                })
                .collect()
        }
    }
}

/// "flow4 {" starts a route; "flowtab4:" or "[flowspec1" do not.
/// A protocol named "flow4" shows up as "[flow4 ..." and is excluded by the caller.
fn is_route_start(text: &str) -> bool {
    let mut chars = text["flow".len()..].chars();
    matches!(chars.next(), Some('4') | Some('6'))
        && chars.next().map_or(true, char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "0001 BIRD 2.0.12 ready.
1007-Table flowtab4:
 flow4 { dst 10.0.0.0/8; } [flowspec1 2024-01-01 from 192.0.2.1] * (100)
\tBGP.ext_community: (generic, 0x80060000, 0x0)
 flow4 { src 10.1.0.0/16; } [flowspec1 2024-01-01 from 192.0.2.1] * (100)
\tBGP.ext_community: (generic, 0x80070000, 0x1)
0000
";

    #[test]
    fn test_split_blocks() {
        let blocks = split_routes(REPLY, SplitMode::Block);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("flow4 { dst 10.0.0.0/8; }"));
        assert!(blocks[0].contains("0x80060000"));
        assert!(blocks[1].starts_with("flow4 { src 10.1.0.0/16; }"));
        assert!(blocks[1].contains("0x80070000"));
    }

    #[test]
    fn test_split_lines() {
        let blocks = split_routes(REPLY, SplitMode::Line);
        assert_eq!(
            blocks,
            vec![
                " flow4 { dst 10.0.0.0/8; } [flowspec1 2024-01-01 from 192.0.2.1] * (100)",
                " flow4 { src 10.1.0.0/16; } [flowspec1 2024-01-01 from 192.0.2.1] * (100)",
            ]
        );
    }

    #[test]
    fn test_split_preserves_order() {
        let routes: Vec<String> = (0..5)
            .map(|i| {
                format!(
                    "flow{} {{ dport {}; }} [flowspec{} 2024-01-01 from 192.0.2.{}]\n",
                    if i % 2 == 0 { 4 } else { 6 },
                    i,
                    i,
                    i
                )
            })
            .collect();
        let raw = routes.concat();
        let blocks = split_routes(&raw, SplitMode::Block);
        assert_eq!(blocks, routes.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_protocol_named_like_tag() {
        let raw = " flow6 { dst 2001:db8::/32; } [flow6 2024-01-01 from 2001:db8::1] * (100)
\tBGP.ext_community: (generic, 0x80060000, 0x0)
 flow4 { dst 10.0.0.0/8; } [flow4 2024-01-01 from 192.0.2.1] * (100)
\tBGP.ext_community: (generic, 0x80060000, 0x0)
";
        let blocks = split_routes(raw, SplitMode::Block);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("flow6 { dst 2001:db8::/32; } [flow6 2024-01-01"));
        assert!(blocks[0].contains("0x80060000"));
        assert!(blocks[1].starts_with("flow4 { dst 10.0.0.0/8; } [flow4 2024-01-01"));
    }

    #[test]
    fn test_split_nothing() {
        assert!(split_routes("0000 \n", SplitMode::Block).is_empty());
        assert!(split_routes("0000 \n", SplitMode::Line).is_empty());
        assert!(split_routes("", SplitMode::Block).is_empty());
    }
}
