use std::net::IpAddr;

use serde::Serialize;

use crate::error::RouteError;

/// Provenance of a route: which BIRD protocol imported it, when, and from whom
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionAttrs {
    pub session_name: String,
    pub neighbor_address: IpAddr,
    pub import_time: String,
}

/// Parse the bracketed session header of a route
/// E.g. "flowspec1 2024-01-01 from 192.0.2.1"
///
/// The third token ("from", "via", ...) is not kept.
pub fn parse_session(header: &str) -> Result<SessionAttrs, RouteError> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(RouteError::MalformedSession(header.to_string()));
    }
    let neighbor_address: IpAddr = tokens[3]
        .parse()
        .map_err(|_| RouteError::InvalidNeighborAddress(tokens[3].to_string()))?;
    Ok(SessionAttrs {
        session_name: tokens[0].to_string(),
        neighbor_address,
        import_time: tokens[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_parse_session() {
        let session = parse_session("flowspec1 2024-01-01 from 192.0.2.1").unwrap();
        assert_eq!(session.session_name, "flowspec1");
        assert_eq!(session.import_time, "2024-01-01");
        assert_eq!(
            session.neighbor_address,
            IpAddr::from(Ipv4Addr::new(192, 0, 2, 1))
        );

        let session = parse_session("  flowspec2\t12:00:00.000  from 2001:db8::1 ").unwrap();
        assert_eq!(session.import_time, "12:00:00.000");
        assert_eq!(
            session.neighbor_address,
            IpAddr::from("2001:db8::1".parse::<Ipv6Addr>().unwrap())
        );
    }

    #[test]
    fn test_parse_session_token_count() {
        assert!(matches!(
            parse_session("flowspec1 2024-01-01 192.0.2.1"),
            Err(RouteError::MalformedSession(_))
        ));
        assert!(matches!(
            parse_session("flow4-routes 2024-01-01 12:00:00 via 192.0.2.1"),
            Err(RouteError::MalformedSession(_))
        ));
        assert!(matches!(parse_session(""), Err(RouteError::MalformedSession(_))));
    }

    #[test]
    fn test_parse_session_bad_neighbor() {
        assert_eq!(
            parse_session("flowspec1 2024-01-01 from 192.0.2.256"),
            Err(RouteError::InvalidNeighborAddress("192.0.2.256".to_string()))
        );
    }
}
