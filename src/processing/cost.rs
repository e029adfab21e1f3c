//! NAT gateway data processing cost.

use crate::aws::{Ec2Api, MetricQuery, MetricWindow};
use crate::config::BYTES_PER_GIB;
use crate::models::NatGateway;
use std::error::Error;

pub const NAT_METRIC_NAMESPACE: &str = "AWS/NATGateway";
/// Bytes processed in both directions: outbound from instances and the replies.
pub const NAT_TRAFFIC_METRICS: [&str; 2] = ["BytesInFromSource", "BytesInFromDestination"];

/// Traffic and estimated charge of one NAT gateway over the window.
#[derive(Debug, Clone, PartialEq)]
pub struct NatCost {
    pub nat_gateway_id: String,
    pub vpc_id: String,
    pub total_bytes: f64,
    pub estimated_cost: f64,
}

/// Round to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Charge for `total_bytes` at `cost_per_gib`, rounded to 2 decimals.
pub fn estimate_cost(total_bytes: f64, cost_per_gib: f64) -> f64 {
    round_cents(total_bytes / BYTES_PER_GIB * cost_per_gib)
}

/// Sum the traffic metrics of `nat_gateway` over `window` and price them.
pub fn monthly_cost(
    api: &dyn Ec2Api,
    nat_gateway: &NatGateway,
    window: &MetricWindow,
    cost_per_gib: f64,
) -> Result<NatCost, Box<dyn Error>> {
    let mut total_bytes = 0.0;
    for metric_name in NAT_TRAFFIC_METRICS {
        let query = MetricQuery {
            namespace: NAT_METRIC_NAMESPACE,
            metric_name,
            dimensions: vec![("NatGatewayId", nat_gateway.nat_gateway_id.as_str())],
            window: *window,
        };
        let bytes = api.get_metric_sum(&query)?;
        log::debug!("{} {metric_name} = {bytes}", nat_gateway.nat_gateway_id);
        total_bytes += bytes;
    }
    Ok(NatCost {
        nat_gateway_id: nat_gateway.nat_gateway_id.clone(),
        vpc_id: nat_gateway.vpc_id.clone(),
        total_bytes,
        estimated_cost: estimate_cost(total_bytes, cost_per_gib),
    })
}

/// Cost of every available NAT gateway in the region.
pub fn audit_nat_costs(
    api: &dyn Ec2Api,
    window: &MetricWindow,
    cost_per_gib: f64,
) -> Result<Vec<NatCost>, Box<dyn Error>> {
    let mut costs = Vec::new();
    for nat_gateway in api.list_nat_gateways(None)? {
        if !nat_gateway.is_available() {
            log::debug!(
                "NAT Gateway {} is in state {}, skipped",
                nat_gateway.nat_gateway_id,
                nat_gateway.state
            );
            continue;
        }
        costs.push(monthly_cost(api, &nat_gateway, window, cost_per_gib)?);
    }
    Ok(costs)
}
