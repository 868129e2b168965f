use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use image_fetcher::{input, logging, Config, Downloader};

/// Download images, skipping content already saved.
#[derive(Debug, Parser)]
#[command(name = "image-fetcher", version)]
#[command(about = "Fetch images from URLs into a local directory, skipping duplicates", long_about = None)]
struct Cli {
    /// Image URLs; each argument may hold several comma separated URLs.
    /// Prompts on stdin when omitted.
    urls: Vec<String>,

    /// TOML file with `output_dir`, `timeout_secs` and `user_agent`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to save images into.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log fetch details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }

        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        Ok(config)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    tracing::debug!(?config, "loaded config");

    let urls = if cli.urls.is_empty() {
        println!("Welcome to the Image Fetcher");
        println!("A tool for mindfully collecting images from the web\n");

        input::prompt_urls(&mut io::stdin().lock(), &mut io::stdout()).context("read URLs")?
    } else {
        cli.urls.iter().flat_map(|arg| input::parse_url_list(arg)).collect()
    };

    let mut downloader = Downloader::new(&config)
        .with_context(|| format!("prepare output directory {}", config.output_dir.display()))?;

    let report = downloader.download_all_with(&urls, |entry| println!("{entry}"));

    println!("\n{report}");
    println!("Connection strengthened. Community enriched.");

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("image-fetcher error: {:#}", err);
        process::exit(1);
    }
}
