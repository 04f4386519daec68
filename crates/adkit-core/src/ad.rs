//! Ad vocabulary: types, sizes, and the opaque served payload
//!
//! `AdType` and `AdSize` are fixed registries. Their `all()` tables are
//! process-wide immutable constants; adding a new entry must never change
//! the meaning of an existing one (append-only evolution).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior of an ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    /// A standard advertisement
    Regular,
    /// A rewarded video; users are typically awarded in-app currency for
    /// viewing this type of ad
    Incentivized,
}

impl AdType {
    /// Stable label string identifying this ad type
    pub fn label(&self) -> &'static str {
        match self {
            AdType::Regular => "regular",
            AdType::Incentivized => "incentivized",
        }
    }

    /// All known ad types, in registry order
    pub fn all() -> &'static [AdType] {
        &[AdType::Regular, AdType::Incentivized]
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named ad slot dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdSize {
    /// 320x50 banner
    Banner,
    /// 728x90 leaderboard
    Leaderboard,
    /// 300x250 medium rectangle
    Mrec,
    /// Full-screen interstitial (no fixed pixel dimensions)
    Interstitial,
}

impl AdSize {
    /// Stable label string identifying this size
    pub fn label(&self) -> &'static str {
        match self {
            AdSize::Banner => "banner",
            AdSize::Leaderboard => "leaderboard",
            AdSize::Mrec => "mrec",
            AdSize::Interstitial => "interstitial",
        }
    }

    /// Pixel dimensions as (width, height)
    ///
    /// Returns `None` for full-screen sizes, which have no fixed
    /// dimensions of their own.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            AdSize::Banner => Some((320, 50)),
            AdSize::Leaderboard => Some((728, 90)),
            AdSize::Mrec => Some((300, 250)),
            AdSize::Interstitial => None,
        }
    }

    /// All known ad sizes, in registry order
    pub fn all() -> &'static [AdSize] {
        &[
            AdSize::Banner,
            AdSize::Leaderboard,
            AdSize::Mrec,
            AdSize::Interstitial,
        ]
    }
}

impl fmt::Display for AdSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unique identifier of a served ad payload
///
/// Assigned by the ad server (or the canned server) when the ad is
/// served; an `AdUnit` uses it to check that a payload offered to
/// `render` is the one it actually loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdId(pub u64);

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ad-{}", self.0)
    }
}

/// An opaque served ad payload
///
/// The core never inspects `creative`; it belongs to whatever rendering
/// layer sits on top. Payloads are replaced on every successful load,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    /// Unique payload identifier
    pub id: AdId,
    /// Size this ad was served for
    pub size: AdSize,
    /// Type this ad was served for
    pub ad_type: AdType,
    /// Opaque creative content
    pub creative: serde_json::Value,
    /// When the ad server produced this payload
    pub served_at: DateTime<Utc>,
}

impl Ad {
    /// Create a new ad payload
    pub fn new(id: AdId, size: AdSize, ad_type: AdType, creative: serde_json::Value) -> Self {
        Self {
            id,
            size,
            ad_type,
            creative,
            served_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_registry_is_ordered_and_stable() {
        let all = AdType::all();
        assert_eq!(all, &[AdType::Regular, AdType::Incentivized]);
        assert_eq!(all[0].label(), "regular");
        assert_eq!(all[1].label(), "incentivized");
    }

    #[test]
    fn test_size_dimensions() {
        assert_eq!(AdSize::Banner.dimensions(), Some((320, 50)));
        assert_eq!(AdSize::Leaderboard.dimensions(), Some((728, 90)));
        assert_eq!(AdSize::Mrec.dimensions(), Some((300, 250)));
        assert_eq!(AdSize::Interstitial.dimensions(), None);
    }

    #[test]
    fn test_ad_serde_round_trip() {
        let ad = Ad::new(
            AdId(7),
            AdSize::Banner,
            AdType::Regular,
            serde_json::json!({ "markup": "<div/>" }),
        );

        let json = serde_json::to_string(&ad).unwrap();
        let back: Ad = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ad);
    }
}
