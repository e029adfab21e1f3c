//! NAT gateway data model, as returned by `describe-nat-gateways`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a NAT gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NatGatewayState {
    Pending,
    Failed,
    #[default]
    Available,
    Deleting,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for NatGatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NatGatewayState::Pending => "pending",
            NatGatewayState::Failed => "failed",
            NatGatewayState::Available => "available",
            NatGatewayState::Deleting => "deleting",
            NatGatewayState::Deleted => "deleted",
            NatGatewayState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A managed NAT gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NatGateway {
    pub nat_gateway_id: String,
    pub vpc_id: String,
    pub subnet_id: Option<String>,
    pub state: NatGatewayState,
}

impl NatGateway {
    /// Only available gateways carry traffic worth auditing.
    pub fn is_available(&self) -> bool {
        self.state == NatGatewayState::Available
    }
}
