mod commands;

use camino::Utf8PathBuf;
use clap::Parser;
use kifu_parse::ParseOptions;
use kifu_patterns::{MergeOptions, MergePolicy};
use kifu_tree::printer::PrintOptions;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Reads, checks and mines SGF game records.
#[derive(Parser)]
#[command(version)]
enum Options {
    /// Parses records and reports every problem found in them.
    Check {
        #[arg(required = true)]
        files: Vec<Utf8PathBuf>,
        /// Place the stones on a board while reading.
        #[arg(long)]
        play: bool,
        /// Keep comment properties.
        #[arg(long)]
        comments: bool,
        /// Stop reading a file once a line reaches this many moves.
        #[arg(long)]
        move_limit: Option<u32>,
        /// One line per problem instead of a source excerpt.
        #[arg(long)]
        short: bool,
    },
    /// Reads a record and writes it back out in normalized form.
    Print {
        file: Utf8PathBuf,
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        #[arg(long, default_value_t = 10)]
        moves_per_line: usize,
        /// Label the moves of every branching node.
        #[arg(long)]
        labels: bool,
    },
    /// Merges the openings of many records into one pattern tree.
    Patterns {
        #[arg(required = true)]
        files: Vec<Utf8PathBuf>,
        #[arg(long)]
        handicap: u8,
        #[arg(long, default_value_t = 19)]
        size: u32,
        /// Deepest move merged from each record.
        #[arg(long)]
        move_limit: Option<u32>,
        /// Most new nodes a single line of a record may add.
        #[arg(long)]
        node_limit: Option<u32>,
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        /// Leave the patterns untouched by records that fail to merge.
        #[arg(long)]
        all_or_nothing: bool,
    },
    /// Counts properties, results, ranks and players over many records.
    Stats {
        #[arg(required = true)]
        files: Vec<Utf8PathBuf>,
    },
    /// Lists the known SGF properties.
    Properties {
        /// Read the shipped table again and report what it holds.
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match Options::parse() {
        Options::Check { files, play, comments, move_limit, short } => {
            let options = ParseOptions { comments, play, move_limit, ..ParseOptions::default() };
            commands::check(&files, &options, short)
        }
        Options::Print { file, output, moves_per_line, labels } => {
            commands::print(&file, output.as_deref(), &PrintOptions { moves_per_line }, labels)
        }
        Options::Patterns {
            files,
            handicap,
            size,
            move_limit,
            node_limit,
            output,
            all_or_nothing,
        } => {
            let policy =
                if all_or_nothing { MergePolicy::AllOrNothing } else { MergePolicy::Partial };
            let merge = MergeOptions { move_limit, node_limit, policy };
            commands::patterns(&files, size, handicap, &merge, output.as_deref())
        }
        Options::Stats { files } => commands::stats(&files),
        Options::Properties { verify } => commands::properties(verify),
    }
}
