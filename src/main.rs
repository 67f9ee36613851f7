use braintree_bridge::config::{BridgeConfig, DEFAULT_CURRENCY_CODE, SlotPolicy};
use braintree_bridge::infrastructure::sandbox::SandboxGateways;
use braintree_bridge::interfaces::csv::call_reader::CallReader;
use braintree_bridge::interfaces::runner::ScriptRunner;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bridge call script (CSV: op,arg1,arg2,arg3,arg4)
    input: PathBuf,

    /// Currency code sent with Google Pay and Apple Pay requests
    #[arg(long, default_value = DEFAULT_CURRENCY_CODE)]
    currency: String,

    /// What to do when a flow starts while the same flow is still pending
    #[arg(long, value_enum, default_value_t = SlotPolicy::RejectWhenArmed)]
    slot_policy: SlotPolicy,

    /// Make the sandbox report Google Pay as unavailable
    #[arg(long)]
    google_pay_unavailable: bool,

    /// Make the sandbox report Apple Pay as unavailable
    #[arg(long)]
    apple_pay_unavailable: bool,

    /// Make sandbox device-data collection fail with this message
    #[arg(long)]
    device_data_error: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time(),
        )
        .init();

    let config = BridgeConfig::default()
        .with_currency_code(cli.currency)
        .with_slot_policy(cli.slot_policy);

    let mut sandbox = SandboxGateways::new()
        .with_google_pay_ready(!cli.google_pay_unavailable)
        .with_apple_pay_ready(!cli.apple_pay_unavailable);
    if let Some(message) = cli.device_data_error {
        sandbox = sandbox.with_device_data_failure(message);
    }

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CallReader::new(file);

    let stdout = io::stdout();
    let runner = ScriptRunner::new(&sandbox, config, stdout.lock());
    runner.run(reader.calls()).await.into_diagnostic()?;

    Ok(())
}
