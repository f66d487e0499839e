//! Dialog policy: the allow-lists and business rules the validators apply.
//!
//! Every knob is configuration rather than a constant so the engine can be
//! exercised with alternate policies. `Policy::default()` is the production
//! policy for a Manhattan dining concierge.
//!
//! # Example
//!
//! ```toml
//! locations = ["manhattan", "nyc"]
//! cuisines = ["italian", "thai"]
//!
//! [party_size]
//! min = 1
//! max = 12
//!
//! [closed_hours]
//! start = 1
//! end = 7
//!
//! [time_zone]
//! name = "America/Chicago"
//! ```
//!
//! Omitted keys keep their default value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::ReferenceZone;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Errors loading or validating a policy.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse policy: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid policy value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Top-level dialog policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Accepted spellings of the dining location (compared lower-cased).
    pub locations: Vec<String>,
    /// Words that mark an utterance as a request for help rather than a location.
    pub help_triggers: Vec<String>,
    /// Supported cuisines (compared lower-cased, echoed capitalized).
    pub cuisines: Vec<String>,
    /// Consumer email domains accepted for delivery.
    pub email_domains: Vec<String>,
    pub party_size: PartySize,
    pub closed_hours: ClosedHours,
    pub time_zone: TimeZoneConfig,
}

/// `[party_size]` section: inclusive bounds on the number of diners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartySize {
    pub min: u32,
    pub max: u32,
}

/// `[closed_hours]` section: half-open window `[start, end)` of hours
/// during which no reservation is taken, regardless of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClosedHours {
    pub start: u8,
    pub end: u8,
}

impl ClosedHours {
    pub fn contains(&self, hour: u8) -> bool {
        self.start <= hour && hour < self.end
    }
}

/// `[time_zone]` section: the reference zone "today" and "now" are read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeZoneConfig {
    /// IANA zone name, e.g. `America/New_York`.
    pub name: String,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

const DEFAULT_LOCATIONS: &[&str] = &["manhattan", "new york", "nyc", "new york city", "ny"];

const DEFAULT_HELP_TRIGGERS: &[&str] = &[
    "nearby",
    "places",
    "restaurant",
    "food",
    "eat",
    "dine",
    "dinner",
    "lunch",
    "breakfast",
    "suggestions",
    "help",
    "hungry",
    "recommend",
];

const DEFAULT_CUISINES: &[&str] = &["chinese", "italian", "japanese", "mexican", "indian"];

const DEFAULT_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
    "protonmail.com",
    "nyu.edu",
    "hotmail.co.uk",
    "yahoo.co.uk",
    "live.com",
    "msn.com",
    "me.com",
    "mac.com",
    "googlemail.com",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            locations: owned(DEFAULT_LOCATIONS),
            help_triggers: owned(DEFAULT_HELP_TRIGGERS),
            cuisines: owned(DEFAULT_CUISINES),
            email_domains: owned(DEFAULT_EMAIL_DOMAINS),
            party_size: PartySize::default(),
            closed_hours: ClosedHours::default(),
            time_zone: TimeZoneConfig::default(),
        }
    }
}

impl Default for PartySize {
    fn default() -> Self {
        PartySize { min: 1, max: 20 }
    }
}

impl Default for ClosedHours {
    fn default() -> Self {
        ClosedHours { start: 2, end: 6 }
    }
}

impl Default for TimeZoneConfig {
    fn default() -> Self {
        TimeZoneConfig {
            name: "America/New_York".to_string(),
        }
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

impl Policy {
    /// Parse a TOML policy, normalize its lists and validate it.
    pub fn from_toml_str(content: &str) -> Result<Policy, ConfigError> {
        let policy: Policy = toml::from_str(content)?;
        let policy = policy.normalized();
        policy.validate()?;
        Ok(policy)
    }

    /// Read a TOML policy file from `path`.
    pub fn load(path: &Path) -> Result<Policy, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Policy::from_toml_str(&content)
    }

    /// Trim and lower-case every allow-list entry, dropping blanks.
    pub fn normalized(mut self) -> Policy {
        for list in [
            &mut self.locations,
            &mut self.help_triggers,
            &mut self.cuisines,
            &mut self.email_domains,
        ] {
            *list = list
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        self
    }

    /// Check that the policy can actually be satisfied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locations.is_empty() {
            return Err(ConfigError::invalid("locations", "at least one location is required"));
        }
        if self.cuisines.is_empty() {
            return Err(ConfigError::invalid("cuisines", "at least one cuisine is required"));
        }
        if self.email_domains.is_empty() {
            return Err(ConfigError::invalid(
                "email_domains",
                "at least one email domain is required",
            ));
        }
        if self.party_size.min < 1 {
            return Err(ConfigError::invalid("party_size.min", "must be at least 1"));
        }
        if self.party_size.min > self.party_size.max {
            return Err(ConfigError::invalid(
                "party_size",
                format!(
                    "min ({}) is greater than max ({})",
                    self.party_size.min, self.party_size.max
                ),
            ));
        }
        if self.closed_hours.end > 24 || self.closed_hours.start >= self.closed_hours.end {
            return Err(ConfigError::invalid(
                "closed_hours",
                format!(
                    "expected 0 <= start < end <= 24, got start = {}, end = {}",
                    self.closed_hours.start, self.closed_hours.end
                ),
            ));
        }
        self.reference_zone()?;
        Ok(())
    }

    /// The reference time zone described by `[time_zone]`.
    pub fn reference_zone(&self) -> Result<ReferenceZone, ConfigError> {
        ReferenceZone::parse(&self.time_zone.name).map_err(|e| {
            ConfigError::invalid("time_zone.name", format!("'{}': {}", self.time_zone.name, e))
        })
    }

    /// Render the policy back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
