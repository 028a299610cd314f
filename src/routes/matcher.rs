use std::fmt;

use ipnetwork::IpNetwork;
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{RouteError, Side};

use super::Family;

/// What to do when a single match field does not parse
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Drop the field, keep the rest of the route
    Lenient,
    /// Drop the whole route
    Strict,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy::Lenient
    }
}

/// Packet-selection predicate of a FlowSpec route.
/// Unset fields do not constrain that dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchAttrs {
    pub source: Option<IpNetwork>,
    pub destination: Option<IpNetwork>,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
}

impl MatchAttrs {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.destination.is_none()
            && self.source_port.is_none()
            && self.destination_port.is_none()
    }

    /// A route must match on something, and its prefixes must fit its family
    pub fn validate(&self, family: Family) -> Result<(), RouteError> {
        if self.is_empty() {
            return Err(RouteError::EmptyMatch);
        }
        for (side, prefix) in [(Side::Source, self.source), (Side::Destination, self.destination)] {
            if let Some(prefix) = prefix {
                if !family.contains(&prefix) {
                    return Err(RouteError::FamilyMismatch {
                        side,
                        prefix: prefix.to_string(),
                        family: family.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MatchAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if let Some(dst) = self.destination {
            parts.push(format!("Dst {}", dst));
        }
        if let Some(src) = self.source {
            parts.push(format!("Src {}", src));
        }
        if let Some(port) = self.destination_port {
            parts.push(format!("DstPort {}", port));
        }
        if let Some(port) = self.source_port {
            parts.push(format!("SrcPort {}", port));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Parse a FlowSpec match clause
/// E.g. "dst 203.0.113.0/24; src 198.51.100.0/24; dport 80;"
///
/// Each `;` separated segment is `<key words...> <value>`; multi-word keys are
/// joined with `_`. Keys other than src/dst/sport/dport are ignored.
pub fn parse_match(clause: &str, policy: MatchPolicy) -> Result<MatchAttrs, RouteError> {
    let mut attrs = MatchAttrs::default();
    for segment in clause.split(';') {
        let words: Vec<&str> = segment.split_whitespace().collect();
        let (value, key) = match words.split_last() {
            Some((value, key)) if !key.is_empty() => (*value, key.iter().join("_")),
            _ => continue,
        };
        let parsed = match key.as_str() {
            "src" => parse_prefix(value, Side::Source).map(|p| attrs.source = Some(p)),
            "dst" => parse_prefix(value, Side::Destination).map(|p| attrs.destination = Some(p)),
            "sport" => parse_port(value, Side::Source).map(|p| attrs.source_port = Some(p)),
            "dport" => parse_port(value, Side::Destination).map(|p| attrs.destination_port = Some(p)),
            _ => Ok(()),
        };
        if let Err(err) = parsed {
            match policy {
                MatchPolicy::Strict => return Err(err),
                MatchPolicy::Lenient => warn!("Ignoring match field '{}': {}", segment.trim(), err),
            }
        }
    }
    Ok(attrs)
}

/// CIDR notation only; host bits are masked off
fn parse_prefix(value: &str, side: Side) -> Result<IpNetwork, RouteError> {
    let invalid = || RouteError::InvalidPrefix {
        side,
        value: value.to_string(),
    };
    if !value.contains('/') {
        return Err(invalid());
    }
    let network: IpNetwork = value.parse().map_err(|_| invalid())?;
    IpNetwork::new(network.network(), network.prefix()).map_err(|_| invalid())
}

fn parse_port(value: &str, side: Side) -> Result<u16, RouteError> {
    let invalid = || RouteError::InvalidPort {
        side,
        value: value.to_string(),
    };
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    fn net(s: &str) -> IpNetwork {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_match() {
        let attrs = parse_match("src 10.0.0.0/24; dport 80", MatchPolicy::Strict).unwrap();
        assert_eq!(
            attrs,
            MatchAttrs {
                source: Some(net("10.0.0.0/24")),
                destination: None,
                source_port: None,
                destination_port: Some(80),
            }
        );
    }

    #[test]
    fn test_parse_match_order_and_whitespace() {
        let a = parse_match(
            "dst 203.0.113.0/24; src 198.51.100.0/24; sport 1024; dport 443;",
            MatchPolicy::Strict,
        )
        .unwrap();
        let b = parse_match(
            "  dport   443 ;sport 1024;   src 198.51.100.0/24 ;dst\t203.0.113.0/24  ",
            MatchPolicy::Strict,
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.destination, Some(net("203.0.113.0/24")));
        assert_eq!(a.source_port, Some(1024));
    }

    #[test]
    fn test_parse_match_ignores_unknown_keys() {
        let attrs = parse_match(
            "dst 2001:db8::/32; proto 6; dport > 1024 && < 2048; tcp flags 0x2/0x2",
            MatchPolicy::Strict,
        )
        .unwrap();
        assert_eq!(attrs.destination, Some(net("2001:db8::/32")));
        assert_eq!(attrs.destination_port, None);
        assert_eq!(attrs.source, None);
    }

    #[test]
    fn test_parse_match_masks_host_bits() {
        let attrs = parse_match("dst 10.1.2.3/8", MatchPolicy::Strict).unwrap();
        assert_eq!(attrs.destination, Some(net("10.0.0.0/8")));
    }

    #[test]
    fn test_parse_match_strict_errors() {
        assert_eq!(
            parse_match("src 10.0.0.300/24; dport 80", MatchPolicy::Strict),
            Err(RouteError::InvalidPrefix {
                side: Side::Source,
                value: "10.0.0.300/24".to_string()
            })
        );
        assert_eq!(
            parse_match("dst 10.0.0.1", MatchPolicy::Strict),
            Err(RouteError::InvalidPrefix {
                side: Side::Destination,
                value: "10.0.0.1".to_string()
            })
        );
        assert_eq!(
            parse_match("sport 65536", MatchPolicy::Strict),
            Err(RouteError::InvalidPort {
                side: Side::Source,
                value: "65536".to_string()
            })
        );
        assert_eq!(
            parse_match("dport +80", MatchPolicy::Strict),
            Err(RouteError::InvalidPort {
                side: Side::Destination,
                value: "+80".to_string()
            })
        );
    }

    #[test]
    fn test_parse_match_lenient_skips_field() {
        let attrs = parse_match("src 10.0.0.300/24; dst 10.9.0.0/16; dport http", MatchPolicy::Lenient)
            .unwrap();
        assert_eq!(
            attrs,
            MatchAttrs {
                destination: Some(net("10.9.0.0/16")),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_validate() {
        let v4 = Family::try_from("flow4").unwrap();
        assert_eq!(MatchAttrs::default().validate(v4), Err(RouteError::EmptyMatch));

        let ports_only = MatchAttrs {
            destination_port: Some(53),
            ..Default::default()
        };
        assert!(ports_only.validate(v4).is_ok());

        let v6_prefix = MatchAttrs {
            source: Some(net("2001:db8::/32")),
            ..Default::default()
        };
        assert!(matches!(
            v6_prefix.validate(v4),
            Err(RouteError::FamilyMismatch { side: Side::Source, .. })
        ));
    }

    #[test]
    fn test_match_display() {
        let attrs = parse_match("src 10.0.0.0/24; dst 10.1.0.0/16; dport 80", MatchPolicy::Strict)
            .unwrap();
        assert_eq!(attrs.to_string(), "Dst 10.1.0.0/16, Src 10.0.0.0/24, DstPort 80");
    }
}
