//! Poller configuration from the environment.

use driftwatch_types::AccessMethod;
use std::env::VarError;
use std::time::Duration;
use tracing::warn;

/// Intervals and access method for the polling loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Sleep between device-info passes.
    pub info_interval: Duration,
    /// Sleep between throughput passes.
    pub throughput_interval: Duration,
    /// Sleep between configuration-drift passes.
    pub config_interval: Duration,
    /// Spacing of the two counter samples inside one throughput measurement.
    pub sample_interval: Duration,
    /// How the info and throughput loops talk to devices.
    pub method: AccessMethod,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            info_interval: Duration::from_secs(3600),
            throughput_interval: Duration::from_secs(60),
            config_interval: Duration::from_secs(3600),
            sample_interval: Duration::from_secs(1),
            method: AccessMethod::Snmp,
        }
    }
}

impl PollSettings {
    /// Reads settings from `DRIFTWATCH_*` environment variables, falling back
    /// to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            info_interval: duration_from(
                "DRIFTWATCH_INFO_INTERVAL_SECS",
                std::env::var("DRIFTWATCH_INFO_INTERVAL_SECS"),
                defaults.info_interval,
            ),
            throughput_interval: duration_from(
                "DRIFTWATCH_THROUGHPUT_INTERVAL_SECS",
                std::env::var("DRIFTWATCH_THROUGHPUT_INTERVAL_SECS"),
                defaults.throughput_interval,
            ),
            config_interval: duration_from(
                "DRIFTWATCH_CONFIG_INTERVAL_SECS",
                std::env::var("DRIFTWATCH_CONFIG_INTERVAL_SECS"),
                defaults.config_interval,
            ),
            sample_interval: duration_from(
                "DRIFTWATCH_SAMPLE_INTERVAL_SECS",
                std::env::var("DRIFTWATCH_SAMPLE_INTERVAL_SECS"),
                defaults.sample_interval,
            ),
            method: method_from(std::env::var("DRIFTWATCH_METHOD"), defaults.method),
        }
    }
}

fn duration_from(name: &str, raw: Result<String, VarError>, default: Duration) -> Duration {
    match raw {
        Ok(value) => match value.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(name, value, "unparsable interval, using default");
                default
            }
        },
        Err(_) => default,
    }
}

fn method_from(raw: Result<String, VarError>, default: AccessMethod) -> AccessMethod {
    match raw {
        Ok(value) => match value.parse::<AccessMethod>() {
            Ok(method) => method,
            Err(_) => {
                warn!(value, "unknown access method, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PollSettings::default();
        assert_eq!(settings.info_interval, Duration::from_secs(3600));
        assert_eq!(settings.throughput_interval, Duration::from_secs(60));
        assert_eq!(settings.config_interval, Duration::from_secs(3600));
        assert_eq!(settings.sample_interval, Duration::from_secs(1));
        assert_eq!(settings.method, AccessMethod::Snmp);
    }

    #[test]
    fn test_duration_parsing() {
        let default = Duration::from_secs(60);
        assert_eq!(
            duration_from("X", Ok("90".to_string()), default),
            Duration::from_secs(90)
        );
        assert_eq!(duration_from("X", Ok("soon".to_string()), default), default);
        assert_eq!(duration_from("X", Err(VarError::NotPresent), default), default);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            method_from(Ok("cli".to_string()), AccessMethod::Snmp),
            AccessMethod::Cli
        );
        assert_eq!(
            method_from(Ok("carrier-pigeon".to_string()), AccessMethod::Snmp),
            AccessMethod::Snmp
        );
        assert_eq!(
            method_from(Err(VarError::NotPresent), AccessMethod::Snmp),
            AccessMethod::Snmp
        );
    }
}
