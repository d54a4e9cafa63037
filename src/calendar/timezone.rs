use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// The zone attached to rewritten events as a `TZID` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(Tz);

impl Timezone {
    pub const fn new(tz: Tz) -> Self {
        Self(tz)
    }

    pub fn id(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(DEFAULT_TIMEZONE)
    }
}

impl FromStr for Timezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Self)
            .map_err(|_| format!("Unknown timezone: {s}"))
    }
}

impl Display for Timezone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl<'de> serde::Deserialize<'de> for Timezone {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;

        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether a rewrite adds `TZID` to events that already have one.
///
/// `Always` repeats what the feed has always done, including duplicate `TZID`s when a feed is
/// rewritten twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimezonePolicy {
    #[default]
    Always,
    IfAbsent,
}
