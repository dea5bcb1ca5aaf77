//! TGF CLI - Order fulfillment tools.
//!
//! # Usage
//!
//! ```bash
//! # Format order numbers for sequence 1234, FFL receiver, two groups
//! tgf order-number 1234 --receiver ffl --groups 2
//!
//! # Show how an order splits into shipment groups
//! tgf split order.yaml
//!
//! # Render the CRM deals for an order
//! tgf deals order.json --submitted-at 2025-06-02T15:30:00Z
//!
//! # Apply a distributor response to a deal
//! tgf reconcile deal.json --response rsr-response.json
//! ```
//!
//! Input files may be JSON or YAML (by extension). Results are written to
//! stdout as JSON; logs go to stderr (`RUST_LOG`, default `info`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tgf_core::{HoldType, ReceiverType};
use tgf_fulfillment::HoldDecision;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tgf")]
#[command(author, version, about = "TGF order fulfillment tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format order numbers for a sequence
    OrderNumber {
        /// Sequence number from the order counter
        sequence: i64,

        /// Receiver type (`individual`, `company`, `ffl`)
        #[arg(short, long, default_value = "individual")]
        receiver: ReceiverType,

        /// Number of shipment groups to print numbers for
        #[arg(short, long, default_value_t = 1)]
        groups: usize,
    },
    /// Split an order into shipment groups
    Split {
        /// Order file (JSON or YAML)
        order: PathBuf,
    },
    /// Render CRM deals for an order
    Deals {
        /// Order file (JSON or YAML)
        order: PathBuf,

        /// Submission time stamped on the deals (RFC 3339, default: now)
        #[arg(long)]
        submitted_at: Option<DateTime<Utc>>,

        /// Compliance hold applied to groups with FFL items
        #[arg(long, value_enum, requires = "hold_reason")]
        hold: Option<HoldArg>,

        /// Reason recorded with the hold
        #[arg(long)]
        hold_reason: Option<String>,

        /// Print CRM request bodies instead of deal records
        #[arg(long)]
        payload: bool,
    },
    /// Apply a distributor response to a deal record
    Reconcile {
        /// Deal record file (JSON or YAML), as printed by `tgf deals`
        deal: PathBuf,

        /// Raw distributor response body; omit to leave the deal unchanged
        #[arg(short, long)]
        response: Option<PathBuf>,

        /// When the response was received (RFC 3339, default: now)
        #[arg(long)]
        received_at: Option<DateTime<Utc>>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HoldArg {
    FflNotOnFile,
    GunCountRule,
}

impl From<HoldArg> for HoldType {
    fn from(arg: HoldArg) -> Self {
        match arg {
            HoldArg::FflNotOnFile => Self::FflNotOnFile,
            HoldArg::GunCountRule => Self::GunCountRule,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::OrderNumber {
            sequence,
            receiver,
            groups,
        } => commands::number::print_numbers(sequence, receiver, groups)?,
        Commands::Split { order } => commands::split::split_order(&order).await?,
        Commands::Deals {
            order,
            submitted_at,
            hold,
            hold_reason,
            payload,
        } => {
            let hold = hold.zip(hold_reason).map(|(hold_type, reason)| HoldDecision {
                hold_type: hold_type.into(),
                reason,
            });
            let submitted_at = submitted_at.unwrap_or_else(Utc::now);
            commands::split::render_deals(&order, submitted_at, hold.as_ref(), payload).await?;
        }
        Commands::Reconcile {
            deal,
            response,
            received_at,
        } => {
            let received_at = received_at.unwrap_or_else(Utc::now);
            commands::reconcile::reconcile(&deal, response.as_deref(), received_at).await?;
        }
    }
    Ok(())
}
