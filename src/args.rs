//! Command-line arguments.

use crate::config::{self, Verbosity};
use clap::{Parser, Subcommand};

/// Audit VPC routing and endpoints for NAT gateway and interface endpoint waste.
#[derive(Parser, Debug)]
#[command(name = "vpc-waste-audit", version)]
pub struct Args {
    /// AWS region to audit
    #[arg(long, global = true, default_value = config::DEFAULT_REGION)]
    pub region: String,

    /// Print diagnostic lines on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: AuditCommand,
}

impl Args {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_debug_flag(self.debug)
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCommand {
    /// Interface endpoints in zones whose subnets all route to the internet
    WasteVpce,
    /// Route tables where gateway endpoints shadow a NAT gateway route
    IneffectiveRoutes,
    /// NAT gateways that are not available
    NatgwStatus,
    /// Estimated 30-day data processing cost per NAT gateway
    NatgwCost,
}
