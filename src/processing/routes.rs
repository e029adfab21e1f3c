//! NAT gateway route effectiveness.
//!
//! A route table that sends traffic to a NAT gateway but also carries a more
//! specific gateway-endpoint route (S3, DynamoDB) never pushes that service's
//! traffic through the NAT gateway. Such tables are reported with the kinds
//! of endpoints that shadow the NAT route.

use crate::aws::{Ec2Api, EndpointFilter, RouteTableFilter};
use crate::models::{EndpointKind, NatGateway, RouteTable};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::error::Error;

/// Route table id -> kinds of the gateway endpoints shadowing the NAT route.
pub type IneffectiveRoutes = BTreeMap<String, BTreeSet<EndpointKind>>;

/// One reported route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFinding {
    pub nat_gateway_id: String,
    pub route_table_id: String,
    pub kinds: BTreeSet<EndpointKind>,
}

impl RouteFinding {
    /// Kinds joined by commas, `none` when no endpoint could be resolved.
    pub fn kinds_label(&self) -> String {
        if self.kinds.is_empty() {
            "none".to_string()
        } else {
            self.kinds.iter().join(",")
        }
    }
}

/// Gateway endpoint ids that shadow a route to `nat_gateway_id`.
///
/// Empty unless the table is in use, routes to the NAT gateway, and has at
/// least one endpoint route more specific than a NAT route.
pub fn shadowing_endpoint_ids<'a>(
    route_table: &'a RouteTable,
    nat_gateway_id: &str,
) -> BTreeSet<&'a str> {
    if !route_table.is_in_use() {
        return BTreeSet::new();
    }
    let nat_routes: Vec<_> = route_table.routes_to_nat(nat_gateway_id).collect();
    if nat_routes.is_empty() {
        return BTreeSet::new();
    }
    route_table
        .endpoint_routes()
        .filter(|(id, route)| {
            let shadows = nat_routes.iter().any(|nat| route.is_more_specific_than(nat));
            if shadows {
                log::trace!(
                    "{}: {} via {id} bypasses {nat_gateway_id}",
                    route_table.route_table_id,
                    route.destination()
                );
            }
            shadows
        })
        .map(|(id, _)| id)
        .collect()
}

/// Route tables of the NAT gateway's VPC where gateway endpoints shadow it.
///
/// Gateways that are not `available` are skipped and yield an empty map.
pub fn find_ineffective_routes(
    api: &dyn Ec2Api,
    nat_gateway: &NatGateway,
) -> Result<IneffectiveRoutes, Box<dyn Error>> {
    let mut result = IneffectiveRoutes::new();
    if !nat_gateway.is_available() {
        log::debug!(
            "NAT Gateway {} is in state {}, skipped",
            nat_gateway.nat_gateway_id,
            nat_gateway.state
        );
        return Ok(result);
    }

    let route_tables = api.list_route_tables(RouteTableFilter::Vpc(&nat_gateway.vpc_id))?;
    let candidates: Vec<(&str, BTreeSet<&str>)> = route_tables
        .iter()
        .map(|rt| {
            (
                rt.route_table_id.as_str(),
                shadowing_endpoint_ids(rt, &nat_gateway.nat_gateway_id),
            )
        })
        .filter(|(_, ids)| !ids.is_empty())
        .collect();
    if candidates.is_empty() {
        return Ok(result);
    }

    // One lookup for every endpoint referenced by any candidate table.
    let endpoint_ids: Vec<String> = candidates
        .iter()
        .flat_map(|(_, ids)| ids.iter().map(|id| id.to_string()))
        .unique()
        .sorted()
        .collect();
    let kinds: HashMap<String, EndpointKind> = api
        .list_vpc_endpoints(EndpointFilter::Ids(&endpoint_ids))?
        .into_iter()
        .map(|ep| {
            let kind = ep.kind();
            (ep.vpc_endpoint_id, kind)
        })
        .collect();

    for (route_table_id, ids) in candidates {
        let found: BTreeSet<EndpointKind> = ids
            .iter()
            .filter_map(|id| {
                let kind = kinds.get(*id).copied();
                if kind.is_none() {
                    log::warn!("VPC endpoint {id} in route table {route_table_id} not found");
                }
                kind
            })
            .collect();
        log::debug!(
            "route table {route_table_id} routes to {} and gateway endpoint(s) {}",
            nat_gateway.nat_gateway_id,
            ids.iter().join(",")
        );
        result.insert(route_table_id.to_string(), found);
    }

    Ok(result)
}

/// Ineffective route tables for every NAT gateway in the region.
pub fn audit_nat_routes(api: &dyn Ec2Api) -> Result<Vec<RouteFinding>, Box<dyn Error>> {
    let mut findings = Vec::new();
    for nat_gateway in api.list_nat_gateways(None)? {
        for (route_table_id, kinds) in find_ineffective_routes(api, &nat_gateway)? {
            findings.push(RouteFinding {
                nat_gateway_id: nat_gateway.nat_gateway_id.clone(),
                route_table_id,
                kinds,
            });
        }
    }
    Ok(findings)
}
