use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::parser::blocks::Block;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub src: String,
    pub alt: String,
    pub caption: String,
}

/// Everything the operator supplies about an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub id: String,
    pub date: String,
    pub category: String,
    pub author: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub pdf: Option<String>,
    pub cover: Option<Cover>,
}

/// Full article record, stored as `<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub id: String,
    pub date: String,
    pub category: String,
    pub author: String,
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
}

/// Summary of an article as listed in `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub title: String,
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub excerpt: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
}

impl Article {
    pub fn new(meta: &Metadata, blocks: Vec<Block>) -> Self {
        Self {
            title: meta.title.clone(),
            id: meta.id.clone(),
            date: meta.date.clone(),
            category: meta.category.clone(),
            author: meta.author.clone(),
            blocks,
            pdf: meta.pdf.clone(),
            cover: meta.cover.clone(),
        }
    }

    /// Write as pretty-printed JSON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), ConvertError> {
        write_json(path, self)
    }
}

impl From<&Metadata> for IndexEntry {
    fn from(meta: &Metadata) -> Self {
        Self {
            id: meta.id.clone(),
            title: meta.title.clone(),
            date: meta.date.clone(),
            category: meta.category.clone(),
            tags: meta.tags.clone(),
            excerpt: meta.excerpt.clone(),
            author: meta.author.clone(),
            pdf: meta.pdf.clone(),
            cover: meta.cover.clone(),
        }
    }
}

/// Two-space indented JSON; non-ASCII text is written as-is.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConvertError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ConvertError::output_write(path, e))?;
    fs::write(path, json).map_err(|e| ConvertError::output_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Metadata {
        Metadata {
            title: "Tenant Rights in 2024".into(),
            id: "tenant-rights-2024".into(),
            date: "2024-03-01".into(),
            category: "Legal Corner".into(),
            author: "Dana Ruiz".into(),
            excerpt: "What changed this year.".into(),
            tags: vec!["housing".into(), "law".into()],
            pdf: None,
            cover: None,
        }
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(Article::new(&meta(), Vec::new())).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("pdf"));
        assert!(!obj.contains_key("cover"));
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "id", "date", "category", "author", "blocks"]);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        let mut m = meta();
        m.pdf = Some("docs/tenant.pdf".into());
        m.cover = Some(Cover {
            src: "img/cover.jpg".into(),
            alt: String::new(),
            caption: "Café on Main Street".into(),
        });
        let article = Article::new(
            &m,
            vec![
                Block::Heading { text: "Überblick".into() },
                Block::OrderedList { items: vec!["one".into(), "two".into()] },
            ],
        );
        article.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Café on Main Street"));
        assert!(raw.contains("\n  \"title\""));
        let loaded: Article = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded, article);
    }

    #[test]
    fn index_entry_from_metadata() {
        let entry = IndexEntry::from(&meta());
        assert_eq!(entry.id, "tenant-rights-2024");
        assert_eq!(entry.tags, ["housing", "law"]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["excerpt"], "What changed this year.");
        assert!(json.get("cover").is_none());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("a.json");
        let err = Article::new(&meta(), Vec::new()).save(&path).unwrap_err();
        assert!(matches!(err, ConvertError::OutputWrite { .. }));
    }
}
