use std::convert::TryFrom;
use std::fmt;

use serde::Serialize;

use crate::error::RouteError;
use crate::utils::{parse_int_literal, strip_width_suffix};

/// FlowSpec action carried in the extended community type (RFC 5575 section 7)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionCode {
    /// Rate limit, argument in bytes/sec (0 drops)
    TrafficRate = 0x8006,
    /// Sample/terminal bitmask
    TrafficAction = 0x8007,
    /// Redirect to route target
    Redirect = 0x8008,
    /// DSCP value to mark
    TrafficMarking = 0x8009,
}

impl TryFrom<i64> for ActionCode {
    type Error = RouteError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        use ActionCode::*;
        match code {
            0x8006 => Ok(TrafficRate),
            0x8007 => Ok(TrafficAction),
            0x8008 => Ok(Redirect),
            0x8009 => Ok(TrafficMarking),
            _ => Err(RouteError::UnknownAction(code)),
        }
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ActionCode::*;
        let display = match self {
            TrafficRate => "traffic-rate",
            TrafficAction => "traffic-action",
            Redirect => "redirect",
            TrafficMarking => "traffic-marking",
        };
        write!(f, "{}", display)
    }
}

/// Enforcement directive of a route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FlowAction {
    pub code: ActionCode,
    pub argument: i64,
}

impl fmt::Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            ActionCode::TrafficAction => write!(f, "{} {:#x}", self.code, self.argument),
            _ => write!(f, "{} {}", self.code, self.argument),
        }
    }
}

/// Decode BIRD's rendering of a FlowSpec extended community
/// E.g. "generic, 0x80060000, 0x0" -> traffic-rate 0
pub fn decode_action(community: &str) -> Result<FlowAction, RouteError> {
    let fields: Vec<&str> = community.split(", ").map(str::trim).collect();
    if fields.len() != 3 {
        return Err(RouteError::InvalidCommunity(community.to_string()));
    }
    let code = parse_int_literal(strip_width_suffix(fields[1]))
        .ok_or_else(|| RouteError::InvalidCommunity(community.to_string()))?;
    let code = ActionCode::try_from(code)?;
    let argument = parse_int_literal(strip_width_suffix(fields[2]))
        .ok_or_else(|| RouteError::InvalidArgument(fields[2].to_string()))?;
    Ok(FlowAction { code, argument })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_action() {
        assert_eq!(
            decode_action("generic, 0x80060000, 0x0"),
            Ok(FlowAction {
                code: ActionCode::TrafficRate,
                argument: 0
            })
        );
        // "1000000000000" loses one "0000" suffix
        assert_eq!(
            decode_action("generic, 0x80060000, 1000000000000"),
            Ok(FlowAction {
                code: ActionCode::TrafficRate,
                argument: 100_000_000
            })
        );
        assert_eq!(
            decode_action("generic, 0x80080000, 0x12340000").unwrap(),
            FlowAction {
                code: ActionCode::Redirect,
                argument: 0x1234
            }
        );
        assert_eq!(
            decode_action("generic, 0x80090000, 0x2e").unwrap().code,
            ActionCode::TrafficMarking
        );
        assert_eq!(
            decode_action("generic, 0x80070000, 0x3").unwrap().to_string(),
            "traffic-action 0x3"
        );
    }

    #[test]
    fn test_decode_unknown_action() {
        assert_eq!(
            decode_action("generic, 0x80100000, 0x0"),
            Err(RouteError::UnknownAction(0x8010))
        );
        assert_eq!(
            decode_action("generic, 0x80050000, 0x0"),
            Err(RouteError::UnknownAction(0x8005))
        );
        // Without the width suffix the whole value is the code
        assert_eq!(
            decode_action("generic, 0x8006ffff, 0x0"),
            Err(RouteError::UnknownAction(0x8006ffff))
        );
    }

    #[test]
    fn test_decode_invalid_community() {
        assert!(matches!(
            decode_action("rt, 65000, 100, 1"),
            Err(RouteError::InvalidCommunity(_))
        ));
        assert!(matches!(decode_action(""), Err(RouteError::InvalidCommunity(_))));
        assert!(matches!(
            decode_action("generic, redirect, 0x0"),
            Err(RouteError::InvalidCommunity(_))
        ));
        assert_eq!(
            decode_action("generic, 0x80060000, 10gbps"),
            Err(RouteError::InvalidArgument("10gbps".to_string()))
        );
    }

    #[test]
    fn test_action_code_display() {
        assert_eq!(ActionCode::TrafficRate.to_string(), "traffic-rate");
        assert_eq!(ActionCode::TrafficMarking as i64, 0x8009);
    }
}
