use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an explain document and print it back normalised
    Parse {
        #[arg(long, help = "Explain JSON file path")]
        file: PathBuf,

        #[arg(
            long,
            help = "If specified, writes the normalised JSON to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    /// Print the headline metrics of an explain document
    Summary {
        #[arg(long, help = "Explain JSON file path")]
        file: PathBuf,

        #[arg(long, help = "If set, prints the summary as JSON instead of a table")]
        json: bool,
    },
    /// Analyse an explain document and report findings; fails on error findings
    Check {
        #[arg(long, help = "Explain JSON file path")]
        file: PathBuf,

        #[arg(long, help = "Slow query threshold in milliseconds")]
        slow_ms: Option<u64>,

        #[arg(
            long,
            help = "If specified, writes the JSON analysis to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    /// Split a batch of explain documents into slow and fast queries
    Monitor {
        #[arg(long = "file", required = true, num_args = 1.., help = "Explain JSON file paths")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Slow query threshold in milliseconds")]
        slow_ms: Option<u64>,

        #[arg(long, help = "If set, prints the report as JSON instead of a table")]
        json: bool,
    },
    /// Compare explain documents captured before and after building an index
    Compare {
        #[arg(long, help = "Explain JSON captured before the change")]
        before: PathBuf,

        #[arg(long, help = "Explain JSON captured after the change")]
        after: PathBuf,

        #[arg(long, help = "Index key pattern as JSON, e.g. '{\"trip_time\": 1}'")]
        index: Option<String>,

        #[arg(long, help = "Query name; defaults to the file stem of --before")]
        name: Option<String>,

        #[arg(
            long,
            help = "File or directory to write the benchmark record to instead of stdout"
        )]
        output: Option<PathBuf>,
    },
}
