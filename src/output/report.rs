//! Tab-separated findings on stdout.
//!
//! Each report writes a header line followed by one line per finding.
//! Actionable lines are highlighted.

use super::terminal::{highlight, tsv_line};
use crate::processing::{EndpointFinding, NatCost, NatStatusReport, RouteFinding};
use std::io::{self, Write};

pub const ENDPOINT_HEADER: [&str; 6] = ["vpce", "az", "vpc", "service", "exposure", "memo"];
pub const ROUTE_HEADER: [&str; 3] = ["natgw", "rtb", "endpoint_kinds"];
pub const COST_HEADER: [&str; 4] = ["natgw", "vpc", "bytes_30d", "estimated_cost"];

pub fn endpoint_row(finding: &EndpointFinding) -> String {
    tsv_line([
        finding.vpc_endpoint_id.as_str(),
        finding.zone.as_str(),
        finding.vpc_id.as_str(),
        finding.service_name.as_str(),
        finding.exposure.as_str(),
        if finding.cached { "yes" } else { "no" },
    ])
}

pub fn route_row(finding: &RouteFinding) -> String {
    tsv_line([
        finding.nat_gateway_id.clone(),
        finding.route_table_id.clone(),
        finding.kinds_label(),
    ])
}

pub fn cost_row(cost: &NatCost) -> String {
    tsv_line([
        cost.nat_gateway_id.clone(),
        cost.vpc_id.clone(),
        format!("{:.0}", cost.total_bytes),
        format!("{:.2}", cost.estimated_cost),
    ])
}

/// Interface endpoint findings; publicly routed zones are actionable.
pub fn write_endpoint_findings(
    out: &mut dyn Write,
    findings: &[EndpointFinding],
) -> io::Result<()> {
    writeln!(out, "{}", tsv_line(ENDPOINT_HEADER))?;
    for finding in findings {
        let line = highlight(&endpoint_row(finding), finding.is_actionable());
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Every reported route table is actionable.
pub fn write_route_findings(out: &mut dyn Write, findings: &[RouteFinding]) -> io::Result<()> {
    writeln!(out, "{}", tsv_line(ROUTE_HEADER))?;
    for finding in findings {
        writeln!(out, "{}", highlight(&route_row(finding), true))?;
    }
    Ok(())
}

/// Gateways with a non-zero estimate are actionable.
pub fn write_nat_costs(out: &mut dyn Write, costs: &[NatCost]) -> io::Result<()> {
    writeln!(out, "{}", tsv_line(COST_HEADER))?;
    for cost in costs {
        let line = highlight(&cost_row(cost), cost.estimated_cost > 0.0);
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn write_nat_status(out: &mut dyn Write, report: &NatStatusReport) -> io::Result<()> {
    for (nat_gateway_id, state) in &report.not_available {
        let line = format!("WARNING: NAT Gateway {nat_gateway_id} is in state {state}");
        writeln!(out, "{}", highlight(&line, true))?;
    }
    writeln!(out, "INFO: Total NAT Gateways: {}", report.total)
}
