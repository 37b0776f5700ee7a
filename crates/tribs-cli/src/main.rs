mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tribs",
    version,
    about = "Tributary seismic weight takeoff from annotated structural drawings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute seismic weight rows for every scaled page of a drawing
    Analyze {
        /// Path to PDF or an annotation dump (JSON) from `tribs annotations --raw`
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// JSON options file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the full report to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// List the individual overlap shapes behind each row
        #[arg(long)]
        show_intersections: bool,

        /// Fail when two elements of one type share a label on a page
        #[arg(long)]
        reject_duplicates: bool,

        /// Drop rows for area/element pairs that do not overlap
        #[arg(long)]
        nonzero_only: bool,
    },
    /// Show the normalized (real-world) annotations of each page
    Annotations {
        /// Path to PDF or annotation dump (JSON)
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Dump the raw annotations as read from the document instead
        #[arg(long)]
        raw: bool,
    },
    /// Parse an EFFECTIVE SEISMIC WEIGHT CRITERIA text block
    Criteria {
        /// Text file holding the criteria block
        file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Parse a scale label such as 1'-6" into inches
    Scale {
        text: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input_file,
            output,
            config,
            out,
            show_intersections,
            reject_duplicates,
            nonzero_only,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            input_file,
            output_format: output,
            config,
            out,
            show_intersections,
            reject_duplicates,
            nonzero_only,
        }),
        Commands::Annotations {
            input_file,
            output,
            raw,
        } => commands::annotations::run(input_file, &output, raw),
        Commands::Criteria { file, output } => commands::criteria::run(&file, &output),
        Commands::Scale { text } => commands::scale::run(&text),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
