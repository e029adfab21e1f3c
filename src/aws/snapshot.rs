//! Offline topology snapshots.
//!
//! A [`Snapshot`] holds the collections the audit reads, in the same shape the
//! `describe-*` calls return them, and answers [`Ec2Api`] calls from memory.
//! It replays captured data and backs the tests.

use super::{AwsError, Ec2Api, EndpointFilter, InterfaceFilter, MetricQuery, RouteTableFilter};
use crate::models::{NatGateway, NetworkInterface, RouteTable, Subnet, VpcEndpoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

/// Pre-computed `Sum` of one metric over the audit window.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct MetricSum {
    pub namespace: String,
    pub metric_name: String,
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
    pub sum: f64,
}

impl MetricSum {
    fn matches(&self, query: &MetricQuery<'_>) -> bool {
        self.namespace == query.namespace
            && self.metric_name == query.metric_name
            && self.dimensions.len() == query.dimensions.len()
            && query
                .dimensions
                .iter()
                .all(|(k, v)| self.dimensions.get(*k).map(String::as_str) == Some(*v))
    }
}

/// Captured region topology.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    #[serde(default)]
    pub nat_gateways: Vec<NatGateway>,
    #[serde(default)]
    pub route_tables: Vec<RouteTable>,
    #[serde(default)]
    pub vpc_endpoints: Vec<VpcEndpoint>,
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub metrics: Vec<MetricSum>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file.
    ///
    /// # Returns
    /// * `Ok(Snapshot)` - The parsed snapshot
    /// * `Err` - If the file is missing or does not parse
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Snapshot, Box<dyn Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(format!("Snapshot file does not exist: {}", path.display()).into());
        }
        log::info!("Reading snapshot file: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Snapshot::from_json(&json)
            .map_err(|e| format!("Error parsing snapshot {}: {e}", path.display()).into())
    }

    pub fn from_json(json: &str) -> Result<Snapshot, Box<dyn Error>> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let snapshot: Snapshot = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| format!("path={} error={}", e.path(), e))?;
        Ok(snapshot)
    }
}

impl Ec2Api for Snapshot {
    fn list_nat_gateways(&self, vpc_id: Option<&str>) -> Result<Vec<NatGateway>, AwsError> {
        Ok(self
            .nat_gateways
            .iter()
            .filter(|n| vpc_id.map_or(true, |v| n.vpc_id == v))
            .cloned()
            .collect())
    }

    fn list_route_tables(&self, filter: RouteTableFilter<'_>) -> Result<Vec<RouteTable>, AwsError> {
        Ok(self
            .route_tables
            .iter()
            .filter(|rt| match filter {
                RouteTableFilter::Vpc(vpc_id) => rt.vpc_id == vpc_id,
                RouteTableFilter::Subnet(subnet_id) => rt.is_associated_with(subnet_id),
            })
            .cloned()
            .collect())
    }

    fn list_vpc_endpoints(&self, filter: EndpointFilter<'_>) -> Result<Vec<VpcEndpoint>, AwsError> {
        Ok(self
            .vpc_endpoints
            .iter()
            .filter(|ep| match filter {
                EndpointFilter::Ids(ids) => ids.contains(&ep.vpc_endpoint_id),
                EndpointFilter::Type(kind) => ep.vpc_endpoint_type == kind,
            })
            .cloned()
            .collect())
    }

    fn list_network_interfaces(
        &self,
        filter: InterfaceFilter<'_>,
    ) -> Result<Vec<NetworkInterface>, AwsError> {
        Ok(self
            .network_interfaces
            .iter()
            .filter(|eni| match filter {
                InterfaceFilter::Ids(ids) => ids.contains(&eni.network_interface_id),
                InterfaceFilter::Subnet(subnet_id) => eni.subnet_id == subnet_id,
            })
            .cloned()
            .collect())
    }

    fn list_subnets(&self, vpc_id: &str, zone: &str) -> Result<Vec<Subnet>, AwsError> {
        Ok(self
            .subnets
            .iter()
            .filter(|s| s.vpc_id == vpc_id && s.availability_zone == zone)
            .cloned()
            .collect())
    }

    fn get_metric_sum(&self, query: &MetricQuery<'_>) -> Result<f64, AwsError> {
        Ok(self
            .metrics
            .iter()
            .filter(|m| m.matches(query))
            .map(|m| m.sum)
            .sum())
    }
}
