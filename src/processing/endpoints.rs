//! Interface endpoint audit.
//!
//! An interface endpoint placed in a zone whose subnets all reach the
//! internet anyway is paid for but bypassed.

use super::aggregator::{ZoneAggregator, ZoneKey};
use crate::aws::{Ec2Api, EndpointFilter, InterfaceFilter};
use crate::models::{ExposureClass, VpcEndpoint, VpcEndpointType};
use std::collections::BTreeSet;
use std::error::Error;

/// Classification of one zone, reported for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFinding {
    pub vpc_endpoint_id: String,
    pub service_name: String,
    pub vpc_id: String,
    pub zone: String,
    pub exposure: ExposureClass,
    /// The zone had already been classified for an earlier endpoint.
    pub cached: bool,
}

impl EndpointFinding {
    pub fn is_actionable(&self) -> bool {
        self.exposure.is_actionable()
    }
}

/// Interface endpoints for AWS services (not customer endpoint services).
pub fn list_aws_interface_endpoints(api: &dyn Ec2Api) -> Result<Vec<VpcEndpoint>, Box<dyn Error>> {
    let endpoints = api.list_vpc_endpoints(EndpointFilter::Type(VpcEndpointType::Interface))?;
    let total = endpoints.len();
    let aws: Vec<VpcEndpoint> = endpoints
        .into_iter()
        .filter(|ep| ep.vpc_endpoint_type == VpcEndpointType::Interface && ep.is_aws_service())
        .collect();
    log::info!(
        "interface endpoints: {} AWS service endpoint(s) of {total}",
        aws.len()
    );
    Ok(aws)
}

/// Zones an endpoint is reachable from, taken from its ENIs.
pub fn endpoint_zones(
    api: &dyn Ec2Api,
    endpoint: &VpcEndpoint,
) -> Result<BTreeSet<String>, Box<dyn Error>> {
    let interfaces =
        api.list_network_interfaces(InterfaceFilter::Ids(&endpoint.network_interface_ids))?;
    Ok(interfaces
        .into_iter()
        .map(|eni| eni.availability_zone)
        .collect())
}

/// Classify every zone of every AWS interface endpoint.
///
/// Emits one finding per (endpoint, zone), including zones answered from
/// the aggregator's memo.
pub fn audit_interface_endpoints(
    api: &dyn Ec2Api,
    aggregator: &mut ZoneAggregator,
) -> Result<Vec<EndpointFinding>, Box<dyn Error>> {
    let mut findings = Vec::new();

    for endpoint in list_aws_interface_endpoints(api)? {
        let zones = endpoint_zones(api, &endpoint)?;
        if zones.is_empty() {
            log::debug!(
                "VPC Endpoint ID: {} has no network interfaces, skipped",
                endpoint.vpc_endpoint_id
            );
            continue;
        }

        for zone in zones {
            let key = ZoneKey::new(&endpoint.vpc_id, &zone);
            let result = aggregator.aggregate(api, &key)?;
            log::debug!(
                "VPC Endpoint ID: {}, Service Name: {}, zone {key} = {}{}",
                endpoint.vpc_endpoint_id,
                endpoint.service_name,
                result.exposure,
                if result.cached { " (memo)" } else { "" }
            );
            findings.push(EndpointFinding {
                vpc_endpoint_id: endpoint.vpc_endpoint_id.clone(),
                service_name: endpoint.service_name.clone(),
                vpc_id: endpoint.vpc_id.clone(),
                zone,
                exposure: result.exposure,
                cached: result.cached,
            });
        }
    }

    Ok(findings)
}
