#![deny(rustdoc::broken_intra_doc_links, rustdoc::bare_urls, rust_2018_idioms)]

use clap::Parser;
use tracing::error;

use imageset_sync::{
    config::{Args, Commands},
    images::ImageTable,
    pipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Args {
        log_level,
        log_format,
        command,
    } = Args::parse();

    log_format.try_init(log_level)?;

    match &command {
        Commands::Sync(args) => {
            if let Err(error) = pipeline::sync(args).await {
                error!(%error, "sync failed");
                std::process::exit(1);
            }
        }
        Commands::Images { source } => {
            let images = pipeline::list_images(&reqwest::Client::new(), source).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ImageTable::from_records(&images))?
            );
        }
        Commands::Manifests { source, release } => {
            let images = pipeline::list_images(&reqwest::Client::new(), source).await?;
            print!(
                "{}",
                pipeline::render_manifests(&images, release, &source.architecture)?
            );
        }
    }

    Ok(())
}
