use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod util;

#[derive(Parser)]
#[command(
    name = "voucherbot",
    version,
    about = "VoucherBot CLI: check housing-voucher chat messages for caseworker handoffs"
)]
struct Cli {
    /// API base URL
    #[arg(
        long,
        env = "VOUCHERBOT_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    /// Contact directory JSON file (built-in directory when omitted)
    #[arg(long, env = "VOUCHERBOT_CONTACTS_PATH")]
    contacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Decide whether a chat message needs a human caseworker
    Detect {
        /// Raw user message
        #[arg(long)]
        message: String,
        /// Voucher program from the session (e.g. "CityFHEPS", "Section 8", "HASA")
        #[arg(long)]
        program: Option<String>,
        /// Borough from the session (e.g. "Brooklyn", "staten island")
        #[arg(long)]
        borough: Option<String>,
        /// Also render the user-facing reply
        #[arg(long)]
        reply: bool,
    },
    /// Resolve the contact for a program and borough
    Resolve {
        #[arg(long)]
        program: Option<String>,
        #[arg(long)]
        borough: Option<String>,
        /// Route as a discrimination case
        #[arg(long)]
        discrimination: bool,
        /// Prefer the program's borough office for discrimination cases
        #[arg(long)]
        borough_office: bool,
    },
    /// Render the handoff notice for a reason
    Format {
        /// "user_request" or "discrimination_case"
        #[arg(long)]
        reason: String,
        #[arg(long)]
        program: Option<String>,
        #[arg(long)]
        borough: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Detect {
            message,
            program,
            borough,
            reply,
        } => {
            let detector = util::load_detector(cli.contacts.as_deref());
            commands::detect::run(
                &detector,
                &message,
                program.as_deref(),
                borough.as_deref(),
                reply,
            )
        }
        Commands::Resolve {
            program,
            borough,
            discrimination,
            borough_office,
        } => {
            let detector = util::load_detector(cli.contacts.as_deref());
            commands::resolve::run(
                detector.directory(),
                program.as_deref(),
                borough.as_deref(),
                discrimination,
                borough_office,
            )
        }
        Commands::Format {
            reason,
            program,
            borough,
        } => {
            let detector = util::load_detector(cli.contacts.as_deref());
            commands::format::run(
                &detector,
                &reason,
                program.as_deref(),
                borough.as_deref(),
            )
        }
    };

    std::process::exit(code);
}
