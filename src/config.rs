use std::path::{Path, PathBuf};

use clap::Args;

const INDEX_FILE: &str = "index.json";

/// Where articles and the site index live.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Directory holding <id>.json article files and index.json
    #[arg(long, env = "ARTICLES_DIR", default_value = "articles")]
    pub articles_dir: PathBuf,
}

impl Config {
    pub fn articles_dir(&self) -> &Path {
        &self.articles_dir
    }

    pub fn article_path(&self, id: &str) -> PathBuf {
        self.articles_dir.join(format!("{}.json", id))
    }

    pub fn index_path(&self) -> PathBuf {
        self.articles_dir.join(INDEX_FILE)
    }
}
