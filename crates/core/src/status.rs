//! Availability tags shared between the registry, the ledger, and the cache.

use crate::types::DbId;

/// Cache key holding a car's availability tag.
pub fn status_key(car_id: DbId) -> String {
    format!("asset_status:{car_id}")
}

/// Availability tag stored in the status cache.
///
/// A derived, best-effort projection of `Car.is_rented`. The cache may be
/// stale or absent; only the registry's flag is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityTag {
    Available,
    Rented,
}

impl AvailabilityTag {
    pub fn from_rented(is_rented: bool) -> Self {
        if is_rented {
            Self::Rented
        } else {
            Self::Available
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
        }
    }

    /// Parse a cached value. Unknown values yield `None` and are treated as
    /// a miss by callers.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "rented" => Some(Self::Rented),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_key_uses_asset_prefix() {
        assert_eq!(status_key(42), "asset_status:42");
    }

    #[test]
    fn tags_round_trip_through_their_string_form() {
        for tag in [AvailabilityTag::Available, AvailabilityTag::Rented] {
            assert_eq!(AvailabilityTag::parse(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn unknown_values_parse_as_none() {
        assert_eq!(AvailabilityTag::parse("reserved"), None);
        assert_eq!(AvailabilityTag::parse(""), None);
    }

    #[test]
    fn from_rented_maps_the_flag() {
        assert_eq!(AvailabilityTag::from_rented(true), AvailabilityTag::Rented);
        assert_eq!(
            AvailabilityTag::from_rented(false),
            AvailabilityTag::Available
        );
    }
}
