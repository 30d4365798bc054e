use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stemma_svg::{
    Credentials, Exporter, FailurePolicy, GraphRenderer, OutputLayout, RepositoryClient,
};

#[derive(Parser)]
#[command(
    name = "stemma-svg",
    about = "Render the collation graph of every section in a tradition as SVG"
)]
struct Cli {
    /// URL to tradition repository
    #[arg(long, short = 'r', help_heading = "Repository connection")]
    repository: String,

    /// HTTP basic auth username for tradition repository
    #[arg(long, short = 'u', help_heading = "Repository connection")]
    username: Option<String>,

    /// HTTP basic auth password for tradition repository
    #[arg(long, short = 'p', help_heading = "Repository connection")]
    password: Option<String>,

    /// ID of tradition to process
    #[arg(long, short = 't')]
    tradition_id: String,

    /// Turn on verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Directory holding the data_<timestamp> output directories
    /// [default: <executable dir>/../public/data]
    #[arg(long, short = 'o')]
    output_root: Option<PathBuf>,

    /// Command that turns DOT on stdin into SVG on stdout
    #[arg(long, default_value = "dot -Tsvg")]
    renderer: String,

    /// Log and skip sections whose graph cannot be fetched, rendered or saved
    #[arg(long)]
    keep_going: bool,

    /// Timestamp to use when generating data directory
    timestamp: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base = match cli.output_root {
        Some(path) => path,
        None => OutputLayout::default_base().unwrap_or_else(|e| {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }),
    };
    let layout = OutputLayout::new(base, &cli.timestamp);

    let renderer = GraphRenderer::from_command_line(&cli.renderer).unwrap_or_else(|| {
        eprintln!("ERROR: --renderer must name a command");
        std::process::exit(1);
    });

    let credentials = Credentials::from_options(cli.username.as_deref(), cli.password.as_deref());
    let client = RepositoryClient::new(&cli.repository, &cli.tradition_id, credentials);

    let policy = if cli.keep_going {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };

    let run_dir = layout.run_dir().display().to_string();
    let exporter = Exporter::new(client, renderer, layout).with_policy(policy);

    let sections = exporter.sections().await.unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    });
    println!("{run_dir}");

    let summary = exporter.export_sections(&sections).await.unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    });
    if summary.failed > 0 {
        eprintln!(
            "ERROR: {} of {} sections with lemma text failed",
            summary.failed,
            summary.failed + summary.rendered
        );
        std::process::exit(1);
    }

    println!("Done generating SVGs");
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "stemma_svg=info"
    } else {
        "stemma_svg=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
