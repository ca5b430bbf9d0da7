#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

use load_sampler_lib::{
    cli,
    config::Workload,
    utils::{
        env::EnvSettings,
        telemetry::{TelemetryConfig, init_tracing},
    },
};
use rama::error::BoxError;

#[cfg(target_family = "unix")]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Fires table-generation requests until the process is killed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BoxError> {
    let args = cli::parse_args_or_exit(Workload::TableGenerator);

    let settings = EnvSettings::from_env();
    init_tracing(TelemetryConfig {
        verbose: settings.verbose,
        pretty: settings.pretty,
        output: settings.log_file.as_deref(),
    })?;

    // never returns: the loop only ends by external termination
    cli::exec(Workload::TableGenerator, args, &settings).await;
    Ok(())
}
