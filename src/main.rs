//! related-posts
//!
//! Computes related documents for a directory of posts and prints them, or
//! splices them into an already generated site.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tf_idf_related::render::DEFAULT_MARKER;
use tf_idf_related::{discover, RelatedConfig, RelatedEngine, SiteWriter, TemplateRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Related documents by TF-IDF and Tanimoto correlation
#[derive(Parser, Debug)]
#[command(name = "related-posts", version, about)]
struct Cli {
    /// directory holding the source documents
    source: PathBuf,

    /// site YAML file; its `related:` section overrides the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// built site; every marker in it is replaced
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// placeholder replaced in the built site
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// list template; defaults to `<SOURCE>/<LAYOUTS_DIR>/related.html`, then the built-in one
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// layouts directory under SOURCE searched for `related.html`
    #[arg(long, default_value = "_layouts")]
    layouts_dir: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[arg(long)]
    max_count: Option<usize>,

    #[arg(long, allow_hyphen_values = true)]
    min_score: Option<f64>,

    #[arg(long)]
    accuracy: Option<f64>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn related_config(&self) -> Result<RelatedConfig> {
        let mut config = match &self.config {
            Some(path) => RelatedConfig::from_site_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RelatedConfig::default(),
        };
        if let Some(max_count) = self.max_count {
            config = config.with_max_count(max_count);
        }
        if let Some(min_score) = self.min_score {
            config = config.with_min_score(min_score);
        }
        if let Some(accuracy) = self.accuracy {
            config = config.with_accuracy(accuracy);
        }
        config.validate()?;
        Ok(config)
    }

    fn renderer(&self) -> Result<TemplateRenderer> {
        let renderer = match &self.template {
            Some(path) => TemplateRenderer::from_file(path)
                .with_context(|| format!("loading template {}", path.display()))?,
            None => TemplateRenderer::for_layouts(self.source.join(&self.layouts_dir))?,
        };
        Ok(renderer)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = cli.related_config()?;

    let sources = discover(&cli.source)
        .with_context(|| format!("reading sources from {}", cli.source.display()))?;
    let batch: Vec<(&str, &str, &str)> = sources
        .iter()
        .map(|d| (d.url.as_str(), d.title.as_str(), d.content.as_str()))
        .collect();
    let mut engine = RelatedEngine::new();
    engine.add_documents(&batch);
    info!(documents = engine.doc_num(), "sources ingested");

    let posts = match &cli.destination {
        Some(destination) => {
            let renderer = cli.renderer()?;
            let writer = SiteWriter::new(destination).with_marker(cli.marker.as_str());
            engine
                .publish(&config, &renderer, &writer)
                .with_context(|| format!("publishing into {}", destination.display()))?
        }
        None => engine.build(&config)?,
    };

    match cli.format {
        Format::Text => print!("{posts}"),
        Format::Json => println!("{}", posts.to_json_pretty()?),
    }
    Ok(())
}
