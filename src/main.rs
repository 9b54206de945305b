mod article;
mod config;
mod convert;
mod docx;
mod error;
mod index;
mod parser;
mod prompt;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing::debug;

use config::Config;
use prompt::ConsoleAnswers;

#[derive(Parser)]
#[command(
    name = "docx2article",
    about = "Convert a Word document into a site article and list it in index.json"
)]
struct Cli {
    /// Word document (.docx) to convert
    document: Option<PathBuf>,

    #[command(flatten)]
    config: Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(document) = cli.document else {
        println!("{}", Cli::command().render_usage());
        return Ok(());
    };

    let mut answers = ConsoleAnswers::stdio();
    let today = chrono::Local::now().date_naive();
    let outcome = convert::run(&cli.config, &document, &mut answers, today)?;
    debug!(
        "{} blocks in {}; {} lists {} articles",
        outcome.blocks,
        outcome.article_path.display(),
        outcome.index_path.display(),
        outcome.indexed
    );
    Ok(())
}
