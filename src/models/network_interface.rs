//! Elastic network interface data model, as returned by
//! `describe-network-interfaces`.

use serde::{Deserialize, Serialize};

/// Public address association of an interface.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct InterfaceAssociation {
    pub public_ip: Option<String>,
    pub ip_owner_id: Option<String>,
}

/// An elastic network interface (ENI).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterface {
    pub network_interface_id: String,
    pub subnet_id: String,
    pub vpc_id: String,
    pub availability_zone: String,
    pub association: Option<InterfaceAssociation>,
}

impl NetworkInterface {
    /// True when the interface has no public address associated.
    pub fn is_private(&self) -> bool {
        self.association
            .as_ref()
            .and_then(|a| a.public_ip.as_ref())
            .is_none()
    }
}
