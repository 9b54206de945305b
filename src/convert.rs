use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::article::{Article, IndexEntry};
use crate::config::Config;
use crate::error::ConvertError;
use crate::index;
use crate::parser;
use crate::prompt::{self, AnswerSource};

/// What a successful run produced.
#[derive(Debug)]
pub struct Outcome {
    pub article_path: PathBuf,
    pub index_path: PathBuf,
    pub blocks: usize,
    pub indexed: usize,
}

/// Parse `document`, ask for metadata, write `<id>.json`, then update the index.
///
/// The document is parsed before any prompt so an unreadable file costs the operator
/// nothing. The article is written before the index; a failed index write leaves it in place.
pub fn run(
    config: &Config,
    document: &Path,
    answers: &mut dyn AnswerSource,
    today: NaiveDate,
) -> Result<Outcome, ConvertError> {
    let blocks = parser::parse_document(document)?;
    let meta = prompt::collect_metadata(answers, today).map_err(ConvertError::Prompt)?;

    let article = Article::new(&meta, blocks);
    let article_path = config.article_path(&meta.id);
    fs::create_dir_all(config.articles_dir())
        .map_err(|e| ConvertError::output_write(config.articles_dir(), e))?;
    article.save(&article_path)?;
    println!("Article JSON saved as: {}", article_path.display());

    let index_path = config.index_path();
    let indexed = index::upsert_entry(&index_path, &IndexEntry::from(&meta))?;
    println!("index.json updated with new article.");
    info!("{} now lists {} articles", index_path.display(), indexed);

    println!("Done! Your article and index.json are now updated.");
    Ok(Outcome {
        article_path,
        index_path,
        blocks: article.blocks.len(),
        indexed,
    })
}
