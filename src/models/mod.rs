//! Domain models for the VPC waste audit.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Cidr`] - IPv4 route destination with prefix length
//! - [`Subnet`], [`NetworkInterface`], [`RouteTable`] - topology inputs
//! - [`NatGateway`], [`VpcEndpoint`] - the billed resources being audited
//! - [`ExposureClass`], [`EndpointKind`] - classification results

mod cidr;
mod endpoint;
mod exposure;
mod nat_gateway;
mod network_interface;
mod route_table;
mod subnet;

// Re-export public types
pub use cidr::{get_cidr_mask, Cidr, MAX_LENGTH};
pub use endpoint::{VpcEndpoint, VpcEndpointType, AWS_SERVICE_PREFIX, ENDPOINT_SERVICE_MARKER};
pub use exposure::{EndpointKind, ExposureClass};
pub use nat_gateway::{NatGateway, NatGatewayState};
pub use network_interface::{InterfaceAssociation, NetworkInterface};
pub use route_table::{
    Route, RouteTable, RouteTableAssociation, RouteTarget, BLACKHOLE_STATE,
    INTERNET_GATEWAY_PREFIX, VPC_ENDPOINT_PREFIX,
};
pub use subnet::Subnet;
