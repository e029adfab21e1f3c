//! VPC endpoint data model, as returned by `describe-vpc-endpoints`.

use super::EndpointKind;
use serde::{Deserialize, Serialize};

/// Prefix of service names published by AWS itself.
pub const AWS_SERVICE_PREFIX: &str = "com.amazonaws.";
/// Marker of customer endpoint services (PrivateLink), not AWS APIs.
pub const ENDPOINT_SERVICE_MARKER: &str = "vpce-svc";

/// Kind of VPC endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VpcEndpointType {
    #[default]
    Interface,
    Gateway,
    GatewayLoadBalancer,
    #[serde(other)]
    Other,
}

impl VpcEndpointType {
    /// Value understood by the `vpc-endpoint-type` filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            VpcEndpointType::Interface => "Interface",
            VpcEndpointType::Gateway => "Gateway",
            VpcEndpointType::GatewayLoadBalancer => "GatewayLoadBalancer",
            VpcEndpointType::Other => "Other",
        }
    }
}

/// A VPC endpoint of any type.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct VpcEndpoint {
    pub vpc_endpoint_id: String,
    pub vpc_endpoint_type: VpcEndpointType,
    pub vpc_id: String,
    pub service_name: String,
    /// ENIs of an interface endpoint, one per zone it serves.
    #[serde(default)]
    pub network_interface_ids: Vec<String>,
}

impl VpcEndpoint {
    /// An AWS API endpoint rather than a customer endpoint service.
    pub fn is_aws_service(&self) -> bool {
        self.service_name.contains(AWS_SERVICE_PREFIX)
            && !self.service_name.contains(ENDPOINT_SERVICE_MARKER)
    }

    pub fn kind(&self) -> EndpointKind {
        EndpointKind::from_service_name(&self.service_name)
    }
}
