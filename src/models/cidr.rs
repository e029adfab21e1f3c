//! IPv4 CIDR block used as a route destination.
//!
//! Provides [`Cidr`] for parsing `DestinationCidrBlock` values and comparing
//! route specificity.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a network mask as u32.
///
/// # Examples
/// ```
/// use vpc_waste_audit::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// IPv4 address with prefix length, e.g. `10.0.0.0/16`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Cidr {
    /// The default route destination `0.0.0.0/0`.
    pub const DEFAULT_ROUTE: Cidr = Cidr {
        addr: Ipv4Addr::UNSPECIFIED,
        mask: 0,
    };

    /// Create a new [`Cidr`] from a string such as "10.0.0.0/24".
    pub fn new(addr_cidr: &str) -> Result<Cidr, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| format!("Invalid address/mask '{addr_cidr}'"))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| format!("Invalid address {addr}"))?;
        let mask: u8 = mask.parse()?;
        if mask > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(Cidr { addr, mask })
    }

    /// True for `0.0.0.0/0`.
    pub fn is_default_route(&self) -> bool {
        *self == Cidr::DEFAULT_ROUTE
    }

    /// True if `ip` falls inside this block.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        // mask is validated on construction, 0..=32 always yields a mask
        let mask = get_cidr_mask(self.mask).unwrap_or(0);
        u32::from(ip) & mask == u32::from(self.addr) & mask
    }

    /// True if this block is a strict subset of `other`.
    pub fn is_more_specific_than(&self, other: &Cidr) -> bool {
        self.mask > other.mask && other.contains(self.addr)
    }
}

impl FromStr for Cidr {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cidr::new(s)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR '{s}': {e}")))
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_cidr_new() {
        let cidr = Cidr::new(" 10.1.0.0/16 ").unwrap();
        assert_eq!(cidr.addr, Ipv4Addr::new(10, 1, 0, 0));
        assert_eq!(cidr.mask, 16);
        assert_eq!(cidr.to_string(), "10.1.0.0/16");
        assert!(Cidr::new("10.1.0.0").is_err());
        assert!(Cidr::new("10.1.0.0/33").is_err());
        assert!(Cidr::new("pl-61a54008").is_err());
    }

    #[test]
    fn test_default_route() {
        assert!(Cidr::new("0.0.0.0/0").unwrap().is_default_route());
        assert!(!Cidr::new("10.0.0.0/8").unwrap().is_default_route());
        assert!(Cidr::DEFAULT_ROUTE.contains(Ipv4Addr::new(52, 219, 0, 1)));
    }

    #[test]
    fn test_more_specific() {
        let vpc = Cidr::new("10.0.0.0/16").unwrap();
        let subnet = Cidr::new("10.0.10.0/24").unwrap();
        let other = Cidr::new("192.168.0.0/24").unwrap();

        assert!(subnet.is_more_specific_than(&vpc));
        assert!(subnet.is_more_specific_than(&Cidr::DEFAULT_ROUTE));
        assert!(!vpc.is_more_specific_than(&subnet));
        assert!(!vpc.is_more_specific_than(&vpc));
        assert!(!other.is_more_specific_than(&vpc));
    }

    #[test]
    fn test_serde_string() {
        let cidr: Cidr = serde_json::from_str("\"0.0.0.0/0\"").unwrap();
        assert!(cidr.is_default_route());
        assert_eq!(serde_json::to_string(&cidr).unwrap(), "\"0.0.0.0/0\"");
        assert!(serde_json::from_str::<Cidr>("\"nope\"").is_err());
    }
}
