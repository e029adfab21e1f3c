//! EC2 subnet data model, as returned by `describe-subnets`.

use serde::{Deserialize, Serialize};

/// An EC2 subnet. Lives in exactly one VPC and one availability zone.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    pub subnet_id: String,
    pub vpc_id: String,
    pub availability_zone: String,
}
