use std::path::PathBuf;

use crate::reporter::ReportFormat;

pub const ENV_VERBOSE: &str = "LOAD_SAMPLER_VERBOSE";
pub const ENV_PRETTY: &str = "LOAD_SAMPLER_PRETTY";
pub const ENV_LOG_FILE: &str = "LOAD_SAMPLER_LOG_FILE";
pub const ENV_REPORT: &str = "LOAD_SAMPLER_REPORT";

pub const fn project_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

pub const fn server_identifier() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}

/// Settings that are read from the environment,
/// as the sampler command line is reserved for its positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub verbose: bool,
    pub pretty: bool,
    pub log_file: Option<PathBuf>,
    pub report: ReportFormat,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let report = match lookup(ENV_REPORT) {
            Some(value) => value.parse().unwrap_or_else(|err| {
                eprintln!("ignore {ENV_REPORT}: {err}");
                ReportFormat::default()
            }),
            None => ReportFormat::default(),
        };

        Self {
            verbose: lookup(ENV_VERBOSE).is_some_and(|v| parse_flag(&v)),
            pretty: lookup(ENV_PRETTY).is_some_and(|v| parse_flag(&v)),
            log_file: lookup(ENV_LOG_FILE)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            report,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
