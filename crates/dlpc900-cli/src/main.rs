//! `dlpc900`: set a DLP6500/DLP9000 pattern sequence from a saved
//! channel/mode preset table.
//!
//! # Usage
//!
//! ```bash
//! dlpc900 red green --modes default --nrepeats 4 --triggered
//! ```

mod args;
mod error;
mod sequence;

use clap::Parser;
use dlpc900_config::Document;
use dlpc900_core::Driver;
use dlpc900_lut::LutController;
use dlpc900_transport::HidApiTransport;
use dlpc900_upload::UploadOrchestrator;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{args::Args, error::CliError};

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "dlpc900 failed");
            std::process::ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let doc = Document::load(&args.config)?;
    let request = sequence::build_request(args, &doc)?;

    if args.verbose {
        tracing::info!(
            channels = ?args.channels,
            modes = ?args.modes,
            patterns = request.stored_indices.len(),
            triggered = args.triggered,
            "resolved pattern sequence"
        );
    }

    let transport = match &doc.hid_device_path {
        Some(path) => HidApiTransport::open_path(path)?,
        None => HidApiTransport::open_first()?,
    };

    let driver = Driver::new(transport);
    let controller = LutController::new(driver);
    let mut orchestrator = UploadOrchestrator::new(controller);
    orchestrator.set_pre_stored_sequence(&request)?;

    tracing::info!(patterns = request.stored_indices.len(), "programmed DMD pattern sequence");
    Ok(())
}
