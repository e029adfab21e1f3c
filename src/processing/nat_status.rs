//! NAT gateway state check.

use crate::aws::Ec2Api;
use crate::models::{NatGateway, NatGatewayState};
use std::error::Error;

/// Gateways of the region, split by whether they are available.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NatStatusReport {
    pub total: usize,
    pub not_available: Vec<(String, NatGatewayState)>,
}

pub fn summarize_nat_gateways(nat_gateways: &[NatGateway]) -> NatStatusReport {
    NatStatusReport {
        total: nat_gateways.len(),
        not_available: nat_gateways
            .iter()
            .filter(|n| !n.is_available())
            .map(|n| (n.nat_gateway_id.clone(), n.state))
            .collect(),
    }
}

pub fn check_nat_gateways(api: &dyn Ec2Api) -> Result<NatStatusReport, Box<dyn Error>> {
    let nat_gateways = api.list_nat_gateways(None)?;
    Ok(summarize_nat_gateways(&nat_gateways))
}
