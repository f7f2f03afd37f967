//! Report timezone resolution
//!
//! Events land on the calendar date they start on, and that date depends on
//! the zone a report is written for. Each run settles on one zone, taking the
//! first of:
//!
//! 1. `--utc`
//! 2. `--timezone <NAME>`
//! 3. `timezone:` in the configuration file
//! 4. the `TZ` environment variable
//! 5. the operating system's zone
//! 6. UTC
//!
//! A bad name given explicitly (1-3) is an error; a bad `TZ` or system value
//! is skipped.

use crate::error::{CalreportError, Result};
use chrono_tz::Tz;
use tracing::debug;

/// Environment variable consulted after the explicit settings
pub const TZ_ENV: &str = "TZ";

/// Which setting decided the report timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneSource {
    UtcFlag,
    Flag,
    Config,
    Environment,
    System,
    Fallback,
}

/// The timezone a run reports in
#[derive(Debug, Clone, PartialEq)]
pub struct TimezoneConfig {
    pub tz: Tz,
    pub source: TimezoneSource,
}

impl TimezoneConfig {
    /// Pick the report timezone from flags, configuration and the host
    pub fn resolve(cli_tz: Option<&str>, config_tz: Option<&str>, utc: bool) -> Result<Self> {
        Self::resolve_with(
            cli_tz,
            config_tz,
            utc,
            || std::env::var(TZ_ENV).ok(),
            system_zone_name,
        )
    }

    /// [`TimezoneConfig::resolve`] with the host lookups supplied by the caller
    pub fn resolve_with(
        cli_tz: Option<&str>,
        config_tz: Option<&str>,
        utc: bool,
        env_tz: impl FnOnce() -> Option<String>,
        os_tz: impl FnOnce() -> Option<String>,
    ) -> Result<Self> {
        if utc {
            return Ok(Self::from_source(Tz::UTC, TimezoneSource::UtcFlag));
        }
        if let Some(name) = cli_tz {
            return parse_zone(name, "--timezone")
                .map(|tz| Self::from_source(tz, TimezoneSource::Flag));
        }
        if let Some(name) = config_tz {
            return parse_zone(name, "the configuration file")
                .map(|tz| Self::from_source(tz, TimezoneSource::Config));
        }

        let host = [
            (env_tz(), TimezoneSource::Environment),
            (os_tz(), TimezoneSource::System),
        ];
        for (name, source) in host {
            let Some(name) = name.filter(|n| !n.is_empty()) else {
                continue;
            };
            match name.parse::<Tz>() {
                Ok(tz) => return Ok(Self::from_source(tz, source)),
                Err(_) => debug!("Ignoring unknown {:?} timezone '{}'", source, name),
            }
        }

        Ok(Self::from_source(Tz::UTC, TimezoneSource::Fallback))
    }

    fn from_source(tz: Tz, source: TimezoneSource) -> Self {
        Self { tz, source }
    }

    pub fn display_name(&self) -> &str {
        self.tz.name()
    }
}

fn parse_zone(name: &str, origin: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| {
        CalreportError::InvalidTimezone(format!(
            "'{name}' from {origin}; expected an IANA name such as 'America/Chicago' or 'UTC'"
        ))
    })
}

fn system_zone_name() -> Option<String> {
    iana_time_zone::get_timezone()
        .map_err(|e| debug!("No system timezone available: {}", e))
        .ok()
}
