//! Per-(VPC, zone) exposure aggregation with memoization.

use super::classifier::classify_subnet;
use crate::aws::Ec2Api;
use crate::models::ExposureClass;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Memo key: one availability zone of one VPC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneKey {
    pub vpc_id: String,
    pub zone: String,
}

impl ZoneKey {
    pub fn new(vpc_id: &str, zone: &str) -> Self {
        ZoneKey {
            vpc_id: vpc_id.to_string(),
            zone: zone.to_string(),
        }
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vpc_id, self.zone)
    }
}

/// Fold subnet classifications into one zone classification.
///
/// Any private subnet makes the zone private, otherwise any half-public subnet
/// makes it half-public. An empty zone is private.
pub fn fold_exposure<I>(classes: I) -> ExposureClass
where
    I: IntoIterator<Item = ExposureClass>,
{
    classes.into_iter().min().unwrap_or(ExposureClass::Private)
}

/// Result of one aggregation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneExposure {
    pub exposure: ExposureClass,
    /// Answered from the memo without touching the zone's subnets.
    pub cached: bool,
}

/// Aggregates zone exposure, computing each (VPC, zone) at most once.
///
/// The aggregate depends only on the zone's subnets, so the stored value is
/// valid for every endpoint that later asks about the same zone. Entries are
/// never evicted.
#[derive(Debug, Default)]
pub struct ZoneAggregator {
    memo: HashMap<ZoneKey, ExposureClass>,
}

impl ZoneAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized aggregate for `key`. On a miss, `classify_zone` produces the
    /// subnet classifications to fold.
    pub fn aggregate_with<F>(
        &mut self,
        key: &ZoneKey,
        classify_zone: F,
    ) -> Result<ZoneExposure, Box<dyn Error>>
    where
        F: FnOnce() -> Result<Vec<ExposureClass>, Box<dyn Error>>,
    {
        if let Some(exposure) = self.memo.get(key) {
            log::debug!("zone {key} already checked: {exposure}");
            return Ok(ZoneExposure {
                exposure: *exposure,
                cached: true,
            });
        }
        let classes = classify_zone()?;
        let exposure = fold_exposure(classes.iter().copied());
        log::debug!(
            "zone {key}: {count} subnet(s) => {exposure}",
            count = classes.len()
        );
        self.memo.insert(key.clone(), exposure);
        Ok(ZoneExposure {
            exposure,
            cached: false,
        })
    }

    /// Memoized aggregate for `key`, listing and classifying the zone's
    /// subnets through `api` on a miss.
    pub fn aggregate(
        &mut self,
        api: &dyn Ec2Api,
        key: &ZoneKey,
    ) -> Result<ZoneExposure, Box<dyn Error>> {
        self.aggregate_with(key, || {
            let subnets = api.list_subnets(&key.vpc_id, &key.zone)?;
            subnets
                .iter()
                .map(|subnet| classify_subnet(api, subnet))
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}
