use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::DomainError;

/// Channel a customer orders through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Talabat,
    Careem,
    Noon,
    Deliveroo,
    DineIn,
}

impl Platform {
    pub const ALL: [Platform; 5] =
        [Self::Talabat, Self::Careem, Self::Noon, Self::Deliveroo, Self::DineIn];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Talabat => "talabat",
            Self::Careem => "careem",
            Self::Noon => "noon",
            Self::Deliveroo => "deliveroo",
            Self::DineIn => "dine-in",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Talabat => "Talabat",
            Self::Careem => "Careem",
            Self::Noon => "Noon",
            Self::Deliveroo => "Deliveroo",
            Self::DineIn => "Dine-in",
        }
    }

    pub fn is_delivery(self) -> bool {
        !matches!(self, Self::DineIn)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "talabat" => Ok(Self::Talabat),
            "careem" => Ok(Self::Careem),
            "noon" => Ok(Self::Noon),
            "deliveroo" => Ok(Self::Deliveroo),
            "dine-in" | "dine_in" | "dinein" => Ok(Self::DineIn),
            other => Err(DomainError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Optional platform restriction applied before aggregation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    pub fn matches(self, platform: Platform) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == platform,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::All => "All Platforms",
            Self::Only(platform) => platform.display_name(),
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(platform) => platform.fmt(f),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl From<Platform> for PlatformFilter {
    fn from(platform: Platform) -> Self {
        Self::Only(platform)
    }
}

impl Serialize for PlatformFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Key of the per-platform menu tables. `All` holds the cross-platform aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuPlatform {
    Talabat,
    Careem,
    Noon,
    Deliveroo,
    All,
}

impl MenuPlatform {
    pub const LISTED: [MenuPlatform; 4] =
        [Self::Talabat, Self::Careem, Self::Noon, Self::Deliveroo];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Talabat => "Talabat",
            Self::Careem => "Careem",
            Self::Noon => "Noon",
            Self::Deliveroo => "Deliveroo",
            Self::All => "All Platforms",
        }
    }
}

impl TryFrom<PlatformFilter> for MenuPlatform {
    type Error = DomainError;

    fn try_from(filter: PlatformFilter) -> Result<Self, Self::Error> {
        match filter {
            PlatformFilter::All => Ok(Self::All),
            PlatformFilter::Only(Platform::Talabat) => Ok(Self::Talabat),
            PlatformFilter::Only(Platform::Careem) => Ok(Self::Careem),
            PlatformFilter::Only(Platform::Noon) => Ok(Self::Noon),
            PlatformFilter::Only(Platform::Deliveroo) => Ok(Self::Deliveroo),
            PlatformFilter::Only(Platform::DineIn) => {
                Err(DomainError::PlatformNotListed(Platform::DineIn))
            }
        }
    }
}
