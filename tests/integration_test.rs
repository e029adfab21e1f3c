//! Integration tests for vpc-waste-audit
//!
//! These tests run every command against a captured topology snapshot.

use chrono::{TimeZone, Utc};
use std::cell::Cell;
use std::collections::BTreeSet;
use vpc_waste_audit::args::AuditCommand;
use vpc_waste_audit::aws::{
    AwsError, Ec2Api, EndpointFilter, InterfaceFilter, MetricQuery, MetricWindow, RouteTableFilter,
    Snapshot,
};
use vpc_waste_audit::config::{AuditConfig, Verbosity, DEFAULT_REGION};
use vpc_waste_audit::models::{
    EndpointKind, ExposureClass, NatGateway, NetworkInterface, RouteTable, Subnet, VpcEndpoint,
};
use vpc_waste_audit::processing::{classify_subnet, ZoneAggregator, ZoneKey};
use std::path::PathBuf;
use vpc_waste_audit::{ineffective_routes, natgw_cost, open_provider, run, waste_vpce};

const TOPOLOGY: &str = "tests/test_data/topology_01.json";

fn load() -> Snapshot {
    Snapshot::from_file(TOPOLOGY).expect("Failed to read topology snapshot")
}

/// Counts the calls that reach the wrapped snapshot.
struct CountingApi {
    inner: Snapshot,
    subnet_lists: Cell<usize>,
    interface_lists: Cell<usize>,
}

impl CountingApi {
    fn new(inner: Snapshot) -> Self {
        CountingApi {
            inner,
            subnet_lists: Cell::new(0),
            interface_lists: Cell::new(0),
        }
    }
}

impl Ec2Api for CountingApi {
    fn list_nat_gateways(&self, vpc_id: Option<&str>) -> Result<Vec<NatGateway>, AwsError> {
        self.inner.list_nat_gateways(vpc_id)
    }

    fn list_route_tables(&self, filter: RouteTableFilter<'_>) -> Result<Vec<RouteTable>, AwsError> {
        self.inner.list_route_tables(filter)
    }

    fn list_vpc_endpoints(&self, filter: EndpointFilter<'_>) -> Result<Vec<VpcEndpoint>, AwsError> {
        self.inner.list_vpc_endpoints(filter)
    }

    fn list_network_interfaces(
        &self,
        filter: InterfaceFilter<'_>,
    ) -> Result<Vec<NetworkInterface>, AwsError> {
        if let InterfaceFilter::Subnet(_) = filter {
            self.interface_lists.set(self.interface_lists.get() + 1);
        }
        self.inner.list_network_interfaces(filter)
    }

    fn list_subnets(&self, vpc_id: &str, zone: &str) -> Result<Vec<Subnet>, AwsError> {
        self.subnet_lists.set(self.subnet_lists.get() + 1);
        self.inner.list_subnets(vpc_id, zone)
    }

    fn get_metric_sum(&self, query: &MetricQuery<'_>) -> Result<f64, AwsError> {
        self.inner.get_metric_sum(query)
    }
}

fn subnet<'a>(snap: &'a Snapshot, id: &str) -> &'a Subnet {
    snap.subnets
        .iter()
        .find(|s| s.subnet_id == id)
        .expect("subnet missing from snapshot")
}

#[test]
fn test_subnet_classification() {
    let snap = load();
    let expected = [
        ("subnet-pub", ExposureClass::Public),
        ("subnet-iso", ExposureClass::Private),
        ("subnet-a2", ExposureClass::Public),
        ("subnet-a2b", ExposureClass::HalfPublic),
        ("subnet-c", ExposureClass::Public),
    ];
    for (id, exposure) in expected {
        assert_eq!(
            classify_subnet(&snap, subnet(&snap, id)).unwrap(),
            exposure,
            "{id}"
        );
    }
}

#[test]
fn test_interfaces_only_listed_for_igw_subnets() {
    let api = CountingApi::new(load());
    for id in ["subnet-iso", "subnet-a2", "subnet-c"] {
        classify_subnet(&api, subnet(&api.inner, id)).unwrap();
    }
    assert_eq!(api.interface_lists.get(), 0);
    classify_subnet(&api, subnet(&api.inner, "subnet-a2b")).unwrap();
    assert_eq!(api.interface_lists.get(), 1);
}

#[test]
fn test_waste_vpce_findings_and_memo() {
    let api = CountingApi::new(load());
    let findings = waste_vpce(&api).expect("waste-vpce failed");

    let rows: Vec<(&str, &str, ExposureClass, bool)> = findings
        .iter()
        .map(|f| (f.vpc_endpoint_id.as_str(), f.zone.as_str(), f.exposure, f.cached))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("vpce-ec2", "az-1", ExposureClass::Private, false),
            ("vpce-ec2", "az-2", ExposureClass::HalfPublic, false),
            ("vpce-logs", "az-1", ExposureClass::Private, true),
            ("vpce-logs", "az-3", ExposureClass::Public, false),
        ]
    );
    assert!(
        findings.iter().all(|f| f.vpc_endpoint_id != "vpce-custom"),
        "customer endpoint services are not audited"
    );
    assert_eq!(api.subnet_lists.get(), 3, "each zone is listed once");

    let actionable: Vec<_> = findings.iter().filter(|f| f.is_actionable()).collect();
    assert_eq!(actionable.len(), 1);
    assert_eq!(actionable[0].zone, "az-3");
}

#[test]
fn test_aggregator_shared_across_calls() {
    let api = CountingApi::new(load());
    let mut aggregator = ZoneAggregator::new();
    let key = ZoneKey::new("vpc-1", "az-2");

    let first = aggregator.aggregate(&api, &key).unwrap();
    let second = aggregator.aggregate(&api, &key).unwrap();
    assert_eq!(first.exposure, ExposureClass::HalfPublic);
    assert_eq!(second.exposure, ExposureClass::HalfPublic);
    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(api.subnet_lists.get(), 1);

    let empty = aggregator
        .aggregate(&api, &ZoneKey::new("vpc-1", "az-9"))
        .unwrap();
    assert_eq!(empty.exposure, ExposureClass::Private);
}

#[test]
fn test_ineffective_routes() {
    let snap = load();
    let findings = ineffective_routes(&snap).expect("ineffective-routes failed");

    assert_eq!(findings.len(), 1, "{findings:?}");
    assert_eq!(findings[0].nat_gateway_id, "nat-1");
    assert_eq!(findings[0].route_table_id, "rtb-nat");
    assert_eq!(
        findings[0].kinds,
        BTreeSet::from([EndpointKind::ObjectStore, EndpointKind::KeyValueStore])
    );
    assert_eq!(findings[0].kinds_label(), "OBJECT_STORE,KEY_VALUE_STORE");
}

#[test]
fn test_natgw_cost() {
    let snap = load();
    let config = AuditConfig::new(DEFAULT_REGION, Verbosity::Normal);
    let end = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    let window = MetricWindow::trailing_days(end, 30, 86_400);

    let costs = natgw_cost(&snap, &config, &window).expect("natgw-cost failed");
    assert_eq!(costs.len(), 1, "deleted gateways are not priced");
    assert_eq!(costs[0].nat_gateway_id, "nat-1");
    assert_eq!(costs[0].total_bytes, 10_737_418_240.0);
    assert_eq!(costs[0].estimated_cost, 0.64);
}

#[test]
fn test_run_writes_reports() {
    let snap = load();
    let config = AuditConfig::new(DEFAULT_REGION, Verbosity::Normal);

    let mut out = Vec::new();
    run(AuditCommand::NatgwStatus, &config, &snap, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(
        text.contains("NAT Gateway nat-2 is in state deleted"),
        "{text}"
    );
    assert!(text.ends_with("INFO: Total NAT Gateways: 2\n"), "{text}");

    let mut out = Vec::new();
    run(AuditCommand::WasteVpce, &config, &snap, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5, "header and 4 findings: {text}");
    assert!(lines[0].starts_with("vpce\taz\tvpc"));
    assert!(lines[3].contains("vpce-logs\taz-1\tvpc-1"));

    let mut out = Vec::new();
    run(AuditCommand::IneffectiveRoutes, &config, &snap, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(
        text.contains("nat-1\trtb-nat\tOBJECT_STORE,KEY_VALUE_STORE"),
        "{text}"
    );
}

#[test]
fn test_configured_snapshot_is_replayed() {
    let mut config = AuditConfig::new(DEFAULT_REGION, Verbosity::Normal);
    config.aws_bin = "vpc-waste-audit-no-such-binary".to_string();
    config.snapshot = Some(PathBuf::from(TOPOLOGY));

    let api = open_provider(&config).expect("Failed to open snapshot provider");
    let mut out = Vec::new();
    run(AuditCommand::NatgwStatus, &config, api.as_ref(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("INFO: Total NAT Gateways: 2\n"), "{text}");

    config.snapshot = Some(PathBuf::from("tests/test_data/no_such_snapshot.json"));
    assert!(open_provider(&config).is_err());
}
