//! Command line glue shared by the sampler binaries.
//!
//! Both binaries take exactly three positional arguments:
//! `<port> <interval_ns> <size>`. Anything that does not parse
//! is fatal before any request is made (exit status 1).

use std::ffi::OsString;

use clap::{CommandFactory as _, FromArgMatches as _, Parser, error::ErrorKind};
use rama::telemetry::tracing;

use crate::{
    client::{Sampler, new_web_client},
    config::{RunConfig, Workload},
    runner::run_loop,
    sample::Summary,
    utils::env::EnvSettings,
};

/// Exit status used for invalid command line arguments.
pub const EXIT_USAGE: i32 = 1;

#[derive(Debug, Clone, Parser, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct SamplerArgs {
    /// port of the target server on localhost (used verbatim in the target URL)
    #[arg(value_name = "port")]
    pub port: String,

    /// pause after every request, in nanoseconds
    #[arg(value_name = "interval_ns")]
    pub interval_ns: u64,

    /// problem size sent to the target as query parameter
    #[arg(value_name = "size")]
    pub size: u32,
}

/// One line usage text, as printed on invalid arguments.
pub fn usage(program: &str, workload: Workload) -> String {
    format!(
        "Usage: {program} <port> <interval_ns> <{}>",
        workload.size_arg_name()
    )
}

/// Parse the sampler arguments, `argv` including the program name.
pub fn try_parse_args_from<I, T>(workload: Workload, argv: I) -> Result<SamplerArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = SamplerArgs::command()
        .mut_arg("size", |arg| arg.value_name(workload.size_arg_name()))
        .about(match workload {
            Workload::MatrixMultiplication => {
                "Time matrix-multiplication requests and report their average execution time"
            }
            Workload::TableGenerator => "Fire table-generation requests until terminated",
        });
    let matches = cmd.try_get_matches_from_mut(argv)?;
    SamplerArgs::from_arg_matches(&matches).map_err(|err| err.format(&mut cmd))
}

/// Parse the process arguments or exit with [`EXIT_USAGE`].
///
/// Help and version requests keep their regular clap behaviour.
pub fn parse_args_or_exit(workload: Workload) -> SamplerArgs {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let program = argv
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| workload.to_string());

    match try_parse_args_from(workload, argv) {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                eprintln!("{err}");
                eprintln!("{}", usage(&program, workload));
                std::process::exit(EXIT_USAGE);
            }
        },
    }
}

/// Run a workload in its default mode against `localhost:<port>`.
///
/// Returns the summary for bounded workloads, unbounded ones never return.
pub async fn exec(workload: Workload, args: SamplerArgs, settings: &EnvSettings) -> Option<Summary> {
    let cfg = RunConfig::new(workload, args.port, args.interval_ns, args.size);
    let sampler = Sampler::new(new_web_client(), cfg.target_url());

    tracing::debug!(?cfg, report = ?settings.report, "sampler configured");

    let mut reporter = settings.report.stdio_reporter();
    run_loop(&cfg, &sampler, reporter.as_mut()).await
}
