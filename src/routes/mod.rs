mod community;
mod family;
mod matcher;
mod scanner;
mod session;
mod split;

pub use community::{decode_action, ActionCode, FlowAction};
pub use family::Family;
pub use matcher::{parse_match, MatchAttrs, MatchPolicy};
pub use scanner::RouteScanner;
pub use session::{parse_session, SessionAttrs};
pub use split::{split_routes, SplitMode};

use std::fmt;

use serde::Serialize;

use crate::error::RouteError;

/// One FlowSpec route as learned by BIRD
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteRecord {
    pub family: Family,
    pub session: SessionAttrs,
    #[serde(rename = "match")]
    pub matches: MatchAttrs,
    pub action: FlowAction,
}

impl RouteRecord {
    /// Build a record from one route block (see [`split_routes`])
    pub fn parse(block: &str, policy: MatchPolicy) -> Result<Self, RouteError> {
        let scanner = RouteScanner::new(block);
        let family = scanner.family()?;
        let session = parse_session(scanner.session())?;
        let matches = parse_match(scanner.clause(), policy)?;
        matches.validate(family)?;
        let action = decode_action(scanner.community())?;
        Ok(Self {
            family,
            session,
            matches,
            action,
        })
    }
}

impl fmt::Display for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} from {}] {} => {}",
            self.family,
            self.session.session_name,
            self.session.neighbor_address,
            self.matches,
            self.action
        )
    }
}
