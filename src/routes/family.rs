use std::convert::TryFrom;
use std::fmt;

use bgp_rs::{AFI, SAFI};
use ipnetwork::IpNetwork;
use serde::{Serialize, Serializer};

use crate::error::RouteError;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Family {
    pub afi: AFI,
    pub safi: SAFI,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.afi, self.safi)
    }
}

impl Family {
    pub fn new(afi: AFI, safi: SAFI) -> Self {
        Self { afi, safi }
    }

    /// Does this prefix belong to the family's address space?
    pub fn contains(&self, network: &IpNetwork) -> bool {
        matches!(
            (self.afi, network),
            (AFI::IPV4, IpNetwork::V4(_)) | (AFI::IPV6, IpNetwork::V6(_))
        )
    }
}

/// BIRD names its FlowSpec nets "flow4" / "flow6"
impl TryFrom<&str> for Family {
    type Error = RouteError;

    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        match tag {
            "flow4" => Ok(Self::new(AFI::IPV4, SAFI::Flowspec)),
            "flow6" => Ok(Self::new(AFI::IPV6, SAFI::Flowspec)),
            _ => Err(RouteError::MissingFamily),
        }
    }
}

impl Serialize for Family {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
