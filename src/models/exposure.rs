//! Classification enums produced by the audit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Public/private exposure of a subnet or of a whole (VPC, zone) pair.
///
/// Variants are ordered `Private < HalfPublic < Public`, so folding a set of
/// classifications with `min` lets any private subnet dominate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExposureClass {
    Private,
    HalfPublic,
    Public,
}

impl ExposureClass {
    /// An interface endpoint in a fully public zone is paid for but unused.
    pub fn is_actionable(&self) -> bool {
        matches!(self, ExposureClass::Public)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureClass::Private => "PRIVATE",
            ExposureClass::HalfPublic => "HALF_PUBLIC",
            ExposureClass::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for ExposureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Managed service behind a gateway VPC endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointKind {
    ObjectStore,
    KeyValueStore,
    Unclassified,
}

impl EndpointKind {
    /// Classify by the last label of a service name such as
    /// `com.amazonaws.ap-northeast-1.s3`.
    pub fn from_service_name(service_name: &str) -> EndpointKind {
        match service_name.rsplit('.').next() {
            Some("s3") => EndpointKind::ObjectStore,
            Some("dynamodb") => EndpointKind::KeyValueStore,
            _ => EndpointKind::Unclassified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::ObjectStore => "OBJECT_STORE",
            EndpointKind::KeyValueStore => "KEY_VALUE_STORE",
            EndpointKind::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
