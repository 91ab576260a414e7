//! wadjet CLI: access-scoped knowledge-graph analytics reports.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use wadjet::dashboard::Dashboard;
use wadjet::gateway::MemoryGateway;
use wadjet::model::DashboardFilters;

#[derive(Parser)]
#[command(name = "wadjet", version, about = "Access-scoped knowledge-graph analytics")]
struct Cli {
    /// Path to the JSON store document to report over.
    #[arg(long, global = true, default_value = "wadjet-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a report for a requester.
    Report {
        /// Requesting user id.
        #[arg(long)]
        requester: String,

        /// Window start (RFC 3339, inclusive).
        #[arg(long)]
        start: Option<String>,

        /// Window end (RFC 3339, inclusive).
        #[arg(long)]
        end: Option<String>,

        /// Scope type: all, ontology, organization, group.
        #[arg(long, default_value = "all")]
        scope: String,

        /// Scope id (required for every scope type except `all`).
        #[arg(long)]
        scope_id: Option<String>,

        /// Emit the report as pretty-printed JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Summarize the store document.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = MemoryGateway::load(&cli.store).into_diagnostic()?;

    match cli.command {
        Commands::Report {
            requester,
            start,
            end,
            scope,
            scope_id,
            json,
        } => {
            let filters = DashboardFilters::from_request(
                start.as_deref(),
                end.as_deref(),
                Some(&scope),
                scope_id.as_deref(),
            )
            .into_diagnostic()?;

            let report = Dashboard::new(&store)
                .report(&requester, &filters)
                .into_diagnostic()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            } else {
                print!("{report}");
            }
        }

        Commands::Info => {
            println!("wadjet store at {}", cli.store.display());
            println!("  projects:      {}", store.projects.len());
            println!("  groups:        {}", store.groups.len());
            println!("  organizations: {}", store.organizations.len());
            println!("  individuals:   {}", store.individuals.len());
            println!("  comments:      {}", store.comments.len());
            println!("  role grants:   {}", store.roles.len());
        }
    }

    Ok(())
}
