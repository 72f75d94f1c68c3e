use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{ReshapeConfig, ReshapePipeline};
use crate::utils::filename::generate_default_parquet_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            input_file,
            output_file,
            start_year,
            end_year,
            year_prefix,
            compression,
            max_workers,
            chunk_size,
            use_mmap,
            validate_only,
            report_file,
        } => {
            let output_file: PathBuf =
                output_file.unwrap_or_else(generate_default_parquet_filename);

            println!("Reshaping temperature data...");
            println!("Input file: {}", input_file.display());
            println!("Output file: {}", output_file.display());
            println!("Year range: {}..={}", start_year, end_year);

            let mut config = ReshapeConfig::new(input_file, output_file.clone())
                .with_year_range(start_year, end_year);
            config.year_prefix = year_prefix;
            config.compression = compression;
            config.max_workers = max_workers;
            config.chunk_size = chunk_size;
            config.use_mmap = use_mmap;

            let pipeline = ReshapePipeline::new(config)?;
            let progress = ProgressReporter::new_spinner("Processing data...", false);

            if validate_only {
                let (observations, cleaning) = pipeline.run_stages(Some(&progress))?;
                progress.finish_with_message(&format!(
                    "Derived {} observations",
                    observations.len()
                ));
                print_cleaning_summary(&cleaning);
                println!("Validation complete - no output file written");
                return Ok(());
            }

            // Create output directory if it doesn't exist
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let summary = pipeline.run(Some(&progress))?;
            progress.finish_with_message(&format!(
                "Wrote {} observations",
                summary.observations_written
            ));

            print_cleaning_summary(&summary.cleaning);

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&output_file)?;
            println!("\n{}", file_info.summary());

            // Read a few rows back to show the long layout
            let samples = writer.read_sample_observations(&output_file, 5)?;
            if !samples.is_empty() {
                println!("\nSample rows:");
                for obs in &samples {
                    match obs.temperature {
                        Some(t) => println!(
                            "  {} {} ({}) {}: {:.3}",
                            obs.object_id, obs.country, obs.iso3, obs.year, t
                        ),
                        None => println!(
                            "  {} {} ({}) {}: missing",
                            obs.object_id, obs.country, obs.iso3, obs.year
                        ),
                    }
                }
            }

            if let Some(report_path) = report_file {
                let file = std::fs::File::create(&report_path)?;
                serde_json::to_writer_pretty(file, &summary).map_err(|e| {
                    crate::error::ProcessingError::Config(format!(
                        "failed to serialize run summary: {}",
                        e
                    ))
                })?;
                println!("\nRun summary written to {}", report_path.display());
            }

            println!("\nProcessing complete!");
        }

        Commands::Validate {
            input_file,
            start_year,
            end_year,
            year_prefix,
            max_workers,
        } => {
            println!("Validating temperature data...");
            println!("Input file: {}", input_file.display());

            let mut config = ReshapeConfig::new(input_file, PathBuf::from("unused.parquet"))
                .with_year_range(start_year, end_year);
            config.year_prefix = year_prefix;
            config.max_workers = max_workers;

            let pipeline = ReshapePipeline::new(config)?;
            let progress = ProgressReporter::new_spinner("Validating data...", false);

            let (observations, cleaning) = pipeline.run_stages(Some(&progress))?;
            progress.finish_with_message("Validation complete");

            print_cleaning_summary(&cleaning);
            println!("Derived observations: {}", observations.len());
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                let observations = writer.read_sample_observations(&file, sample)?;
                println!("\nSample Records (showing {} records):", observations.len());
                for (i, obs) in observations.iter().enumerate() {
                    match obs.temperature {
                        Some(t) => println!(
                            "{}. {} ({}) year {}: {:.3}",
                            i + 1,
                            obs.country,
                            obs.iso3,
                            obs.year,
                            t
                        ),
                        None => println!(
                            "{}. {} ({}) year {}: missing",
                            i + 1,
                            obs.country,
                            obs.iso3,
                            obs.year
                        ),
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_cleaning_summary(cleaning: &crate::processors::CleaningReport) {
    println!("\nCleaning Summary:");
    println!("- Rows read: {}", cleaning.rows_in);
    println!("- ISO2 codes filled: {}", cleaning.iso2_filled);
    println!("- All-missing rows dropped: {}", cleaning.rows_dropped);
    println!("- Rows kept: {}", cleaning.rows_out);
}
