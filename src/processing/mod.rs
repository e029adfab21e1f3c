//! Audit logic.
//!
//! This module contains the business logic of the audit:
//! - [`classifier`] - Public/private classification of one subnet
//! - [`aggregator`] - Memoized per-(VPC, zone) aggregation
//! - [`endpoints`] - Interface endpoint findings built on the aggregator
//! - [`routes`] - NAT gateway routes shadowed by gateway endpoints
//! - [`cost`] - NAT gateway data processing cost
//! - [`nat_status`] - NAT gateway state check

pub mod aggregator;
pub mod classifier;
pub mod cost;
pub mod endpoints;
pub mod nat_status;
pub mod routes;

// Re-export public types and functions
pub use aggregator::{fold_exposure, ZoneAggregator, ZoneExposure, ZoneKey};
pub use classifier::{classify, classify_subnet, ClassifyError, DefaultRouteTarget};
pub use cost::{audit_nat_costs, estimate_cost, monthly_cost, NatCost};
pub use endpoints::{audit_interface_endpoints, EndpointFinding};
pub use nat_status::{check_nat_gateways, NatStatusReport};
pub use routes::{audit_nat_routes, find_ineffective_routes, IneffectiveRoutes, RouteFinding};
