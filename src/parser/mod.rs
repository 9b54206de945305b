pub mod blocks;

use std::path::Path;

use tracing::info;

use crate::docx;
use crate::error::ConvertError;
use blocks::Block;

/// Two-pass pipeline: docx → styled paragraphs → content blocks.
pub fn parse_document(path: &Path) -> Result<Vec<Block>, ConvertError> {
    let paragraphs = docx::read_paragraphs(path).map_err(|source| ConvertError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;
    let count = paragraphs.len();
    let blocks = blocks::classify_paragraphs(paragraphs);
    info!("Parsed {} paragraphs into {} blocks from {}", count, blocks.len(), path.display());
    Ok(blocks)
}
