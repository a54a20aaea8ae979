use clap::Parser;
use color_eyre::Result;

use jobhunt::cli::{self, Args};
use jobhunt::config::Config;
use jobhunt::logging;
use jobhunt::tracker::Tracker;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  let _guard = logging::init(&Config::data_dir()?.join("logs"), config.log.filter.as_deref())?;
  tracing::debug!(backend = ?config.store.backend, "starting");

  let tracker = Tracker::from_config(&config)?;

  let mut stdout = std::io::stdout().lock();
  cli::run(args.command, &tracker, &mut stdout).await
}
