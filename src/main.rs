use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use telegram_deb::cli::Args;
use telegram_deb::{Pipeline, SearchPathLocator};

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(real_main(args)) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<()> {
    let options = args
        .into_options()
        .context("failed to determine output directory")?;
    let locator = SearchPathLocator::new();

    let mut pipeline = Pipeline::new(options, &locator);
    pipeline.run().await?;
    Ok(())
}
