use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use officemap::cli::{Cli, Command};
use officemap::{Dashboard, GsiLocator, OfficeMapConfig, render, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = OfficeMapConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose)?;

    let locator = GsiLocator::new(&config.search)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            // Leave room for the search itself to time out first.
            let request_timeout = Duration::from_secs(config.search.timeout_seconds + 5);

            let dashboard = Arc::new(Dashboard::start(&config, Arc::new(locator))?);
            web::run(&config.server, dashboard, request_timeout).await
        }
        Command::Render { place, output } => {
            let object = render(&locator, &place, &config.map)
                .await
                .with_context(|| format!("Failed to render '{place}'"))?;

            match output {
                Some(path) => {
                    std::fs::write(&path, object.to_html())
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "Wrote {} markers for '{}' to {}",
                        object.marker_count(),
                        place,
                        path.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&object)?),
            }
            Ok(())
        }
    }
}
