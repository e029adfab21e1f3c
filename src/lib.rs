//! Audit a region's VPCs for NAT gateway and interface endpoint waste.
//!
//! - [`aws`] - Provider access through the `aws` CLI, or a JSON snapshot
//! - [`models`] - EC2 resources and the exposure classes
//! - [`processing`] - Subnet classification, zone aggregation, route and cost analysis
//! - [`output`] - Tab-separated findings on stdout

pub mod args;
pub mod aws;
pub mod config;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use args::AuditCommand;
use aws::{AwsCli, Ec2Api, MetricWindow, Snapshot};
use chrono::Utc;
use config::{AuditConfig, COST_WINDOW_DAYS, METRIC_PERIOD_SECS};
use processing::{EndpointFinding, NatCost, RouteFinding, ZoneAggregator};
use std::error::Error;
use std::io::Write;

/// The provider the commands read from: a captured snapshot when one is
/// configured, the `aws` CLI otherwise.
pub fn open_provider(config: &AuditConfig) -> Result<Box<dyn Ec2Api>, Box<dyn Error>> {
    match &config.snapshot {
        Some(path) => {
            log::info!("replaying snapshot {}", path.display());
            Ok(Box::new(Snapshot::from_file(path)?))
        }
        None => Ok(Box::new(AwsCli::new(config))),
    }
}

/// Interface endpoint findings for every zone the endpoints live in.
pub fn waste_vpce(api: &dyn Ec2Api) -> Result<Vec<EndpointFinding>, Box<dyn Error>> {
    let mut aggregator = ZoneAggregator::new();
    let findings = processing::audit_interface_endpoints(api, &mut aggregator)?;
    log::info!(
        "{} finding(s), {} zone(s) classified",
        findings.len(),
        aggregator.len()
    );
    Ok(findings)
}

pub fn ineffective_routes(api: &dyn Ec2Api) -> Result<Vec<RouteFinding>, Box<dyn Error>> {
    processing::audit_nat_routes(api)
}

/// NAT gateway costs over the trailing window ending at `window.end`.
pub fn natgw_cost(
    api: &dyn Ec2Api,
    config: &AuditConfig,
    window: &MetricWindow,
) -> Result<Vec<NatCost>, Box<dyn Error>> {
    processing::audit_nat_costs(api, window, config.nat_cost_per_gib)
}

/// Run one command and write its findings to `out`.
pub fn run(
    command: AuditCommand,
    config: &AuditConfig,
    api: &dyn Ec2Api,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    log::debug!("command {command:?} in region {}", config.region);
    match command {
        AuditCommand::WasteVpce => output::write_endpoint_findings(out, &waste_vpce(api)?)?,
        AuditCommand::IneffectiveRoutes => {
            output::write_route_findings(out, &ineffective_routes(api)?)?
        }
        AuditCommand::NatgwStatus => {
            output::write_nat_status(out, &processing::check_nat_gateways(api)?)?
        }
        AuditCommand::NatgwCost => {
            let window =
                MetricWindow::trailing_days(Utc::now(), COST_WINDOW_DAYS, METRIC_PERIOD_SECS);
            output::write_nat_costs(out, &natgw_cost(api, config, &window)?)?
        }
    }
    out.flush()?;
    Ok(())
}
