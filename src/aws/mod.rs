//! AWS EC2 / CloudWatch interaction.
//!
//! This module handles all provider-related operations:
//! - [`cli`] - Command execution for the AWS CLI, with throttling retries
//! - [`ec2`] - [`AwsCli`], the live [`Ec2Api`] backed by `aws` commands
//! - [`snapshot`] - [`Snapshot`], an [`Ec2Api`] replayed from a JSON capture

mod cli;
mod ec2;
mod error;
mod snapshot;

use crate::models::{NatGateway, NetworkInterface, RouteTable, Subnet, VpcEndpoint, VpcEndpointType};
use chrono::{DateTime, Duration, Utc};

// Re-export public types and functions
pub use cli::{retry_throttled, run, run_with_retry};
pub use ec2::AwsCli;
pub use error::AwsError;
pub use snapshot::{MetricSum, Snapshot};

/// Which route tables to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTableFilter<'a> {
    Vpc(&'a str),
    /// Tables explicitly associated with the subnet.
    Subnet(&'a str),
}

/// Which network interfaces to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceFilter<'a> {
    Ids(&'a [String]),
    Subnet(&'a str),
}

/// Which VPC endpoints to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFilter<'a> {
    Ids(&'a [String]),
    Type(VpcEndpointType),
}

/// Time range and granularity of a metric query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: u32,
}

impl MetricWindow {
    /// The `days` days ending at `end`.
    pub fn trailing_days(end: DateTime<Utc>, days: i64, period_secs: u32) -> Self {
        MetricWindow {
            start: end - Duration::days(days),
            end,
            period_secs,
        }
    }
}

/// A `Sum` statistic request against one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery<'a> {
    pub namespace: &'a str,
    pub metric_name: &'a str,
    pub dimensions: Vec<(&'a str, &'a str)>,
    pub window: MetricWindow,
}

/// Read-only view of the provider's control plane used by the audit.
///
/// Every call blocks until the provider answers.
pub trait Ec2Api {
    /// NAT gateways, optionally limited to one VPC.
    fn list_nat_gateways(&self, vpc_id: Option<&str>) -> Result<Vec<NatGateway>, AwsError>;

    fn list_route_tables(&self, filter: RouteTableFilter<'_>) -> Result<Vec<RouteTable>, AwsError>;

    fn list_vpc_endpoints(&self, filter: EndpointFilter<'_>) -> Result<Vec<VpcEndpoint>, AwsError>;

    fn list_network_interfaces(
        &self,
        filter: InterfaceFilter<'_>,
    ) -> Result<Vec<NetworkInterface>, AwsError>;

    /// Subnets of one VPC in one availability zone.
    fn list_subnets(&self, vpc_id: &str, zone: &str) -> Result<Vec<Subnet>, AwsError>;

    /// Sum of all datapoints of the metric over the window.
    fn get_metric_sum(&self, query: &MetricQuery<'_>) -> Result<f64, AwsError>;
}
