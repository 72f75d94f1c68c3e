use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_END_YEAR, DEFAULT_START_YEAR};

#[derive(Parser)]
#[command(name = "surftemp-processor")]
#[command(about = "Wide-to-long reshaper for country-level annual surface temperature data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reshape a wide temperature CSV into long-format Parquet
    Process {
        #[arg(short, long, help = "Input CSV file with one column per year")]
        input_file: PathBuf,

        #[arg(
            short,
            long,
            help = "Output Parquet file path [default: output/surftemp-long-{YYMMDD}.parquet]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_START_YEAR)]
        start_year: i32,

        #[arg(long, default_value_t = DEFAULT_END_YEAR)]
        end_year: i32,

        #[arg(long, default_value = "F", help = "Prefix of the year columns")]
        year_prefix: String,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        #[arg(long, default_value = "false", help = "Memory-map the input file")]
        use_mmap: bool,

        #[arg(long, default_value = "false", help = "Run all stages but skip the write")]
        validate_only: bool,

        #[arg(long, help = "Write the run summary as JSON to this path")]
        report_file: Option<PathBuf>,
    },

    /// Run the load, clean and reshape stages without writing output
    Validate {
        #[arg(short, long, help = "Input CSV file with one column per year")]
        input_file: PathBuf,

        #[arg(long, default_value_t = DEFAULT_START_YEAR)]
        start_year: i32,

        #[arg(long, default_value_t = DEFAULT_END_YEAR)]
        end_year: i32,

        #[arg(long, default_value = "F", help = "Prefix of the year columns")]
        year_prefix: String,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
