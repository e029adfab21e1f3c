//! Per-subnet exposure classification.
//!
//! A subnet's exposure follows from the target of its default route and,
//! for internet-gateway routes, from whether any of its ENIs is private.

use crate::aws::{Ec2Api, InterfaceFilter, RouteTableFilter};
use crate::models::{ExposureClass, NetworkInterface, RouteTable, RouteTarget, Subnet};
use itertools::Itertools;
use std::error::Error;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// More than one route table claims the subnet; the default route is ambiguous.
    #[error("subnet {subnet_id} is associated with route tables {}", .route_table_ids.join(","))]
    ConflictingRouteTables {
        subnet_id: String,
        route_table_ids: Vec<String>,
    },
}

/// Where the subnet's `0.0.0.0/0` traffic goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRouteTarget {
    None,
    InternetGateway,
    NatGateway,
}

/// True if any interface lacks a public address.
pub fn has_private_interface(interfaces: &[NetworkInterface]) -> bool {
    interfaces.iter().any(NetworkInterface::is_private)
}

/// Default route target of the single route table associated with `subnet_id`.
///
/// No associated table means no default route. More than one is an error
/// rather than a guess.
pub fn default_route_target(
    subnet_id: &str,
    route_tables: &[RouteTable],
) -> Result<DefaultRouteTarget, ClassifyError> {
    let route_table = match route_tables {
        [] => return Ok(DefaultRouteTarget::None),
        [route_table] => route_table,
        _ => {
            return Err(ClassifyError::ConflictingRouteTables {
                subnet_id: subnet_id.to_string(),
                route_table_ids: route_tables
                    .iter()
                    .map(|rt| rt.route_table_id.clone())
                    .sorted()
                    .collect(),
            })
        }
    };
    let target = match route_table.default_route().map(|r| r.target()) {
        Some(RouteTarget::InternetGateway(_)) => DefaultRouteTarget::InternetGateway,
        Some(RouteTarget::NatGateway(_)) => DefaultRouteTarget::NatGateway,
        _ => DefaultRouteTarget::None,
    };
    Ok(target)
}

/// Combine the default route target with interface privacy.
///
/// NAT-routed subnets count as public whatever their interfaces look like.
pub fn exposure_for(target: DefaultRouteTarget, has_private_interface: bool) -> ExposureClass {
    match target {
        DefaultRouteTarget::InternetGateway if has_private_interface => ExposureClass::HalfPublic,
        DefaultRouteTarget::InternetGateway => ExposureClass::Public,
        DefaultRouteTarget::NatGateway => ExposureClass::Public,
        DefaultRouteTarget::None => ExposureClass::Private,
    }
}

/// Classify a subnet from already fetched data.
pub fn classify(
    subnet_id: &str,
    interfaces: &[NetworkInterface],
    route_tables: &[RouteTable],
) -> Result<ExposureClass, ClassifyError> {
    let target = default_route_target(subnet_id, route_tables)?;
    Ok(exposure_for(target, has_private_interface(interfaces)))
}

/// Fetch a subnet's route tables (and ENIs when they matter) and classify it.
///
/// Interfaces are only listed for internet-gateway routed subnets, the one
/// case where they change the answer.
pub fn classify_subnet(
    api: &dyn Ec2Api,
    subnet: &Subnet,
) -> Result<ExposureClass, Box<dyn Error>> {
    let route_tables = api.list_route_tables(RouteTableFilter::Subnet(&subnet.subnet_id))?;
    let target = default_route_target(&subnet.subnet_id, &route_tables)?;

    let private_eni = match target {
        DefaultRouteTarget::InternetGateway => {
            let interfaces =
                api.list_network_interfaces(InterfaceFilter::Subnet(&subnet.subnet_id))?;
            has_private_interface(&interfaces)
        }
        _ => false,
    };
    let exposure = exposure_for(target, private_eni);

    log::debug!(
        "Subnet ID: {} = {exposure} (default route: {target:?}, private eni: {private_eni})",
        subnet.subnet_id
    );
    Ok(exposure)
}
