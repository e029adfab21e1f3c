//! EC2 route table data model, as returned by `describe-route-tables`.

use super::Cidr;
use serde::{Deserialize, Serialize};

/// Id prefix of internet gateways.
pub const INTERNET_GATEWAY_PREFIX: &str = "igw-";
/// Id prefix of VPC endpoints. Gateway endpoints appear in `GatewayId`.
pub const VPC_ENDPOINT_PREFIX: &str = "vpce-";
/// Route state when the target was deleted.
pub const BLACKHOLE_STATE: &str = "blackhole";

/// A single route entry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    /// IPv4 destination (absent for prefix-list and IPv6 routes).
    pub destination_cidr_block: Option<Cidr>,
    /// Managed prefix list destination, used by gateway endpoints.
    pub destination_prefix_list_id: Option<String>,
    /// Internet gateway, virtual private gateway, `local` or gateway endpoint.
    pub gateway_id: Option<String>,
    pub nat_gateway_id: Option<String>,
    pub state: Option<String>,
}

/// What a route sends its traffic to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget<'a> {
    InternetGateway(&'a str),
    NatGateway(&'a str),
    VpcEndpoint(&'a str),
    Other,
}

impl Route {
    pub fn target(&self) -> RouteTarget<'_> {
        if let Some(gw) = self.gateway_id.as_deref() {
            if gw.starts_with(INTERNET_GATEWAY_PREFIX) {
                return RouteTarget::InternetGateway(gw);
            }
            if gw.starts_with(VPC_ENDPOINT_PREFIX) {
                return RouteTarget::VpcEndpoint(gw);
            }
        }
        match self.nat_gateway_id.as_deref() {
            Some(nat) => RouteTarget::NatGateway(nat),
            None => RouteTarget::Other,
        }
    }

    pub fn is_default_route(&self) -> bool {
        self.destination_cidr_block
            .is_some_and(|cidr| cidr.is_default_route())
    }

    /// Whether longest-prefix matching prefers this route over `other`.
    ///
    /// Prefix list contents are not resolved, so a prefix-list destination is
    /// only known to sit inside `0.0.0.0/0`. Two prefix lists cannot be
    /// ordered, so neither shadows the other.
    pub fn is_more_specific_than(&self, other: &Route) -> bool {
        match (&self.destination_cidr_block, &other.destination_cidr_block) {
            (Some(mine), Some(theirs)) => mine.is_more_specific_than(theirs),
            (None, Some(theirs)) => {
                self.destination_prefix_list_id.is_some() && theirs.is_default_route()
            }
            _ => false,
        }
    }

    /// A `blackhole` route's target is gone and the route drops its traffic.
    pub fn is_active(&self) -> bool {
        self.state.as_deref() != Some(BLACKHOLE_STATE)
    }

    /// Destination as shown in reports.
    pub fn destination(&self) -> String {
        match (&self.destination_cidr_block, &self.destination_prefix_list_id) {
            (Some(cidr), _) => cidr.to_string(),
            (None, Some(pl)) => pl.clone(),
            (None, None) => "None".to_string(),
        }
    }
}

/// Link between a route table and a subnet (or the VPC main-table marker).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableAssociation {
    #[serde(default)]
    pub main: bool,
    pub route_table_association_id: Option<String>,
    pub subnet_id: Option<String>,
}

/// An EC2 route table.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTable {
    pub route_table_id: String,
    pub vpc_id: String,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub associations: Vec<RouteTableAssociation>,
}

impl RouteTable {
    /// In use when at least one association names a subnet.
    pub fn is_in_use(&self) -> bool {
        self.associations.iter().any(|a| a.subnet_id.is_some())
    }

    pub fn is_associated_with(&self, subnet_id: &str) -> bool {
        self.associations
            .iter()
            .any(|a| a.subnet_id.as_deref() == Some(subnet_id))
    }

    /// First active `0.0.0.0/0` route, if any.
    pub fn default_route(&self) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.is_active() && r.is_default_route())
    }

    /// Routes whose target is the given NAT gateway.
    pub fn routes_to_nat<'a>(&'a self, nat_gateway_id: &'a str) -> impl Iterator<Item = &'a Route> {
        self.routes
            .iter()
            .filter(move |r| {
                r.is_active() && r.target() == RouteTarget::NatGateway(nat_gateway_id)
            })
    }

    /// Gateway endpoint routes, paired with their `vpce-` id.
    pub fn endpoint_routes(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes
            .iter()
            .filter(|r| r.is_active())
            .filter_map(|r| match r.target() {
                RouteTarget::VpcEndpoint(id) => Some((id, r)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(dest: &str, gateway: Option<&str>, nat: Option<&str>) -> Route {
        Route {
            destination_cidr_block: Cidr::new(dest).ok(),
            destination_prefix_list_id: dest.starts_with("pl-").then(|| dest.to_string()),
            gateway_id: gateway.map(str::to_string),
            nat_gateway_id: nat.map(str::to_string),
            state: Some("active".to_string()),
        }
    }

    #[test]
    fn test_route_target() {
        assert_eq!(
            route("0.0.0.0/0", Some("igw-1"), None).target(),
            RouteTarget::InternetGateway("igw-1")
        );
        assert_eq!(
            route("0.0.0.0/0", None, Some("nat-1")).target(),
            RouteTarget::NatGateway("nat-1")
        );
        assert_eq!(
            route("pl-61a54008", Some("vpce-1"), None).target(),
            RouteTarget::VpcEndpoint("vpce-1")
        );
        assert_eq!(
            route("10.0.0.0/16", Some("local"), None).target(),
            RouteTarget::Other
        );
    }

    #[test]
    fn test_route_specificity() {
        let nat_default = route("0.0.0.0/0", None, Some("nat-1"));
        let s3 = route("pl-61a54008", Some("vpce-1"), None);
        let narrow = route("10.20.0.0/16", Some("vpce-2"), None);

        assert!(s3.is_more_specific_than(&nat_default));
        assert!(narrow.is_more_specific_than(&nat_default));
        assert!(!nat_default.is_more_specific_than(&narrow));
        assert!(!s3.is_more_specific_than(&s3));
        assert_eq!(s3.destination(), "pl-61a54008");

        let private_nat = route("100.64.0.0/10", None, Some("nat-1"));
        assert!(!s3.is_more_specific_than(&private_nat));
    }

    #[test]
    fn test_blackhole_routes_are_ignored() {
        let mut igw = route("0.0.0.0/0", Some("igw-1"), None);
        igw.state = Some("blackhole".to_string());
        let mut s3 = route("pl-61a54008", Some("vpce-1"), None);
        s3.state = Some("blackhole".to_string());
        let rtb = RouteTable {
            route_table_id: "rtb-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            routes: vec![igw.clone(), s3],
            associations: vec![],
        };
        assert!(!igw.is_active());
        assert_eq!(rtb.default_route(), None);
        assert_eq!(rtb.endpoint_routes().count(), 0);
    }

    #[test]
    fn test_route_table_in_use() {
        let mut rtb = RouteTable {
            route_table_id: "rtb-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            routes: vec![],
            associations: vec![RouteTableAssociation {
                main: true,
                ..Default::default()
            }],
        };
        assert!(
            !rtb.is_in_use(),
            "main marker alone is not a subnet association"
        );

        rtb.associations.push(RouteTableAssociation {
            subnet_id: Some("subnet-1".to_string()),
            ..Default::default()
        });
        assert!(rtb.is_in_use());
        assert!(rtb.is_associated_with("subnet-1"));
        assert!(!rtb.is_associated_with("subnet-2"));
    }

    #[test]
    fn test_deserialize_describe_route_tables_item() {
        let json = r#"{
            "RouteTableId": "rtb-1",
            "VpcId": "vpc-1",
            "Routes": [
                {"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local", "State": "active"},
                {"DestinationCidrBlock": "0.0.0.0/0", "NatGatewayId": "nat-1", "State": "active"},
                {"DestinationPrefixListId": "pl-61a54008", "GatewayId": "vpce-1", "State": "active"},
                {"DestinationIpv6CidrBlock": "::/0", "GatewayId": "igw-1", "State": "active"}
            ],
            "Associations": [
                {"Main": false, "RouteTableAssociationId": "rtbassoc-1", "RouteTableId": "rtb-1", "SubnetId": "subnet-1"}
            ],
            "Tags": []
        }"#;
        let rtb: RouteTable = serde_json::from_str(json).unwrap();
        assert_eq!(rtb.routes.len(), 4);
        assert_eq!(
            rtb.default_route().map(|r| r.target()),
            Some(RouteTarget::NatGateway("nat-1"))
        );
        assert_eq!(rtb.routes_to_nat("nat-1").count(), 1);
        let endpoints: Vec<&str> = rtb.endpoint_routes().map(|(id, _)| id).collect();
        assert_eq!(endpoints, vec!["vpce-1"]);
    }
}
