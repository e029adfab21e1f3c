//! Live [`Ec2Api`] backed by the `aws` command-line tool.
//!
//! Each call builds one `aws ... --output json` command, runs it with
//! throttling retries and parses the PascalCase response. The CLI follows
//! pagination tokens itself, so every response is complete.

use super::cli;
use super::{AwsError, Ec2Api, EndpointFilter, InterfaceFilter, MetricQuery, RouteTableFilter};
use crate::config::AuditConfig;
use crate::models::{NatGateway, NetworkInterface, RouteTable, Subnet, VpcEndpoint};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Timestamp format accepted by `--start-time` / `--end-time`.
const METRIC_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeNatGateways {
    #[serde(default)]
    nat_gateways: Vec<NatGateway>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeRouteTables {
    #[serde(default)]
    route_tables: Vec<RouteTable>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcEndpoints {
    #[serde(default)]
    vpc_endpoints: Vec<VpcEndpoint>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeNetworkInterfaces {
    #[serde(default)]
    network_interfaces: Vec<NetworkInterface>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnets {
    #[serde(default)]
    subnets: Vec<Subnet>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Datapoint {
    sum: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct GetMetricStatistics {
    #[serde(default)]
    datapoints: Vec<Datapoint>,
}

/// Provider that shells out to `aws` for one region.
#[derive(Debug, Clone)]
pub struct AwsCli {
    config: AuditConfig,
}

impl AwsCli {
    pub fn new(config: &AuditConfig) -> Self {
        AwsCli {
            config: config.clone(),
        }
    }

    /// `aws <service> <operation> <args> --region R --output json`
    fn command(&self, service: &str, operation: &str, args: &[String]) -> String {
        let mut cmd = format!("{} {service} {operation}", self.config.aws_bin);
        for arg in args {
            cmd.push(' ');
            cmd.push_str(arg);
        }
        cmd.push_str(&format!(" --region {} --output json", self.config.region));
        cmd
    }

    fn query<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
        args: &[String],
    ) -> Result<T, AwsError> {
        let cmd = self.command(service, operation, args);
        let output = cli::run_with_retry(&cmd, &self.config.retry)?;
        parse_response(&cmd, &output)
    }
}

/// Parse a JSON response, reporting the failing path on mismatch.
fn parse_response<T: DeserializeOwned>(cmd: &str, output: &str) -> Result<T, AwsError> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        AwsError::Parse {
            cmd: cmd.to_string(),
            path: e.path().to_string(),
            message: e.to_string(),
        }
    })
}

/// `Name=<name>,Values=<value>` filter argument.
fn filter(name: &str, value: &str) -> String {
    format!("Name={name},Values={value}")
}

impl Ec2Api for AwsCli {
    fn list_nat_gateways(&self, vpc_id: Option<&str>) -> Result<Vec<NatGateway>, AwsError> {
        // describe-nat-gateways spells it --filter, not --filters.
        let args = match vpc_id {
            Some(vpc_id) => vec!["--filter".to_string(), filter("vpc-id", vpc_id)],
            None => vec![],
        };
        let resp: DescribeNatGateways = self.query("ec2", "describe-nat-gateways", &args)?;
        Ok(resp.nat_gateways)
    }

    fn list_route_tables(
        &self,
        filter_by: RouteTableFilter<'_>,
    ) -> Result<Vec<RouteTable>, AwsError> {
        let arg = match filter_by {
            RouteTableFilter::Vpc(vpc_id) => filter("vpc-id", vpc_id),
            RouteTableFilter::Subnet(subnet_id) => filter("association.subnet-id", subnet_id),
        };
        let resp: DescribeRouteTables = self.query(
            "ec2",
            "describe-route-tables",
            &["--filters".to_string(), arg],
        )?;
        Ok(resp.route_tables)
    }

    fn list_vpc_endpoints(
        &self,
        filter_by: EndpointFilter<'_>,
    ) -> Result<Vec<VpcEndpoint>, AwsError> {
        let mut args = Vec::new();
        match filter_by {
            // An empty id list would list every endpoint instead of none.
            EndpointFilter::Ids([]) => return Ok(vec![]),
            EndpointFilter::Ids(ids) => {
                args.push("--vpc-endpoint-ids".to_string());
                args.extend(ids.iter().cloned());
            }
            EndpointFilter::Type(kind) => {
                args.push("--filters".to_string());
                args.push(filter("vpc-endpoint-type", kind.as_str()));
            }
        }
        let resp: DescribeVpcEndpoints = self.query("ec2", "describe-vpc-endpoints", &args)?;
        Ok(resp.vpc_endpoints)
    }

    fn list_network_interfaces(
        &self,
        filter_by: InterfaceFilter<'_>,
    ) -> Result<Vec<NetworkInterface>, AwsError> {
        let mut args = Vec::new();
        match filter_by {
            InterfaceFilter::Ids([]) => return Ok(vec![]),
            InterfaceFilter::Ids(ids) => {
                args.push("--network-interface-ids".to_string());
                args.extend(ids.iter().cloned());
            }
            InterfaceFilter::Subnet(subnet_id) => {
                args.push("--filters".to_string());
                args.push(filter("subnet-id", subnet_id));
            }
        }
        let resp: DescribeNetworkInterfaces =
            self.query("ec2", "describe-network-interfaces", &args)?;
        Ok(resp.network_interfaces)
    }

    fn list_subnets(&self, vpc_id: &str, zone: &str) -> Result<Vec<Subnet>, AwsError> {
        let args = vec![
            "--filters".to_string(),
            filter("vpc-id", vpc_id),
            filter("availability-zone", zone),
        ];
        let resp: DescribeSubnets = self.query("ec2", "describe-subnets", &args)?;
        Ok(resp.subnets)
    }

    fn get_metric_sum(&self, query: &MetricQuery<'_>) -> Result<f64, AwsError> {
        let mut args = vec![
            "--namespace".to_string(),
            query.namespace.to_string(),
            "--metric-name".to_string(),
            query.metric_name.to_string(),
            "--start-time".to_string(),
            query.window.start.format(METRIC_TIME_FORMAT).to_string(),
            "--end-time".to_string(),
            query.window.end.format(METRIC_TIME_FORMAT).to_string(),
            "--period".to_string(),
            query.window.period_secs.to_string(),
            "--statistics".to_string(),
            "Sum".to_string(),
        ];
        if !query.dimensions.is_empty() {
            args.push("--dimensions".to_string());
            args.extend(
                query
                    .dimensions
                    .iter()
                    .map(|(name, value)| format!("Name={name},Value={value}")),
            );
        }
        let resp: GetMetricStatistics = self.query("cloudwatch", "get-metric-statistics", &args)?;
        Ok(resp.datapoints.iter().filter_map(|d| d.sum).sum())
    }
}
