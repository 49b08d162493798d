//! ODESI browse scraper — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use odesi_browse::CATEGORIES;
use odesi_browse_cli::config::RunSettings;
use odesi_browse_cli::{render_summary, ScrapeArgs};

#[derive(Parser)]
#[command(
    name = "odesi-browse",
    about = "Scrape ODESI survey series and surveys into an Excel workbook",
    version
)]
struct Cli {
    /// Print the run summary as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape categories and export them (default).
    Scrape {
        /// Category to scrape. Can be repeated; defaults to the full catalog.
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Output workbook. Also reads ODESI_OUTPUT.
        #[arg(short, long)]
        output: Option<String>,

        /// Seconds between requests. Also reads ODESI_DELAY.
        #[arg(long)]
        delay: Option<f64>,

        /// Add a random extra of up to this many seconds to each delay.
        #[arg(long)]
        jitter: Option<f64>,

        /// Browse API endpoint. Also reads ODESI_BASE_URL.
        #[arg(long)]
        base_url: Option<String>,

        /// Per-request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Number of series to list in the summary.
        #[arg(long)]
        top: Option<usize>,
    },

    /// List the built-in categories.
    Categories,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   odesi-browse completions bash > ~/.local/share/bash-completion/completions/odesi-browse
    ///   odesi-browse completions zsh > ~/.zfunc/_odesi-browse
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Scrape {
        categories: Vec::new(),
        output: None,
        delay: None,
        jitter: None,
        base_url: None,
        timeout: None,
        top: None,
    }) {
        Commands::Scrape {
            categories,
            output,
            delay,
            jitter,
            base_url,
            timeout,
            top,
        } => {
            let args = ScrapeArgs {
                categories,
                output,
                delay,
                jitter,
                base_url,
                timeout,
                top,
            };
            let settings = RunSettings::resolve(&args)?;
            let summary = odesi_browse_cli::run(&settings).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", render_summary(&summary));
            }
        }

        Commands::Categories => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&CATEGORIES)?);
            } else {
                for category in CATEGORIES {
                    println!("{category}");
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "odesi-browse", &mut std::io::stdout());
        }
    }

    Ok(())
}
