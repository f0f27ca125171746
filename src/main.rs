//! `allegro-spider` command line.
//!
//! Parses flags, sets up logging and hands the run to [`allegro_spider::run_spider`].

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use allegro_spider::initialization::init_logger_with;
use allegro_spider::{run_spider, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level_filter(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_spider(opt).await {
        Ok(report) => {
            println!(
                "Saved {} product{} to {} in {:.1}s",
                report.products,
                if report.products == 1 { "" } else { "s" },
                report.output.display(),
                report.elapsed_seconds
            );
            if report.cancelled {
                println!("Run was interrupted, the results are partial");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("allegro_spider error: {:#}", e);
            process::exit(1);
        }
    }
}
