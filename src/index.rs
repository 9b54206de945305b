use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::article::{write_json, IndexEntry};
use crate::error::{ConvertError, IndexParseError};

const ARTICLES: &str = "articles";

/// The site-wide article list. Existing entries and extra top-level keys are kept as read,
/// in the order they were read.
#[derive(Debug)]
pub struct Index {
    articles: Vec<Value>,
    /// Top-level object; its `articles` slot is a placeholder marking where the list goes.
    rest: Map<String, Value>,
}

impl Default for Index {
    fn default() -> Self {
        let mut rest = Map::new();
        rest.insert(ARTICLES.to_string(), Value::Null);
        Index {
            articles: Vec::new(),
            rest,
        }
    }
}

impl Serialize for Index {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rest.len()))?;
        for (key, value) in &self.rest {
            if key == ARTICLES {
                map.serialize_entry(key, &self.articles)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl Index {
    /// Read an index file. A missing file is an empty index; an unreadable one is logged
    /// and replaced by an empty index.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(index)) => index,
            Ok(None) => {
                debug!("No index at {}, starting a new one", path.display());
                Index::default()
            }
            Err(e) => {
                warn!("Error reading {}; starting new: {}", path.display(), e);
                Index::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>, IndexParseError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let Value::Object(mut rest) = serde_json::from_str::<Value>(&raw)? else {
            return Err(IndexParseError::NotAnObject);
        };
        let articles = match rest.get_mut(ARTICLES) {
            Some(Value::Array(articles)) => std::mem::take(articles),
            _ => {
                warn!("{} has no articles list; starting with an empty one", path.display());
                Vec::new()
            }
        };
        // An existing key keeps its position; a missing one goes last.
        rest.insert(ARTICLES.to_string(), Value::Null);
        Ok(Some(Index { articles, rest }))
    }

    pub fn articles(&self) -> &[Value] {
        &self.articles
    }

    /// Drop every entry with the same id, then put the new entry first.
    pub fn upsert(&mut self, entry: &IndexEntry) -> serde_json::Result<()> {
        let value = serde_json::to_value(entry)?;
        let before = self.articles.len();
        self.articles
            .retain(|a| a.get("id").and_then(Value::as_str) != Some(entry.id.as_str()));
        if self.articles.len() < before {
            debug!("Replacing {} existing entry for {}", before - self.articles.len(), entry.id);
        }
        self.articles.insert(0, value);
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConvertError> {
        write_json(path, self)
    }
}

/// Load, upsert and rewrite the index at `path`. Returns the number of listed articles.
pub fn upsert_entry(path: &Path, entry: &IndexEntry) -> Result<usize, ConvertError> {
    let mut index = Index::load(path);
    index
        .upsert(entry)
        .map_err(|e| ConvertError::output_write(path, e))?;
    index.save(path)?;
    Ok(index.articles().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, title: &str) -> IndexEntry {
        IndexEntry {
            id: id.into(),
            title: title.into(),
            date: "2024-05-01".into(),
            category: "News & Updates".into(),
            tags: Vec::new(),
            excerpt: "Short summary".into(),
            author: "Sam Lee".into(),
            pdf: None,
            cover: None,
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn missing_file_creates_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        assert_eq!(upsert_entry(&path, &entry("a", "A")).unwrap(), 1);
        let index = read_json(&path);
        assert_eq!(index["articles"].as_array().unwrap().len(), 1);
        assert_eq!(index["articles"][0]["id"], "a");
        assert_eq!(index["articles"][0]["tags"], json!([]));
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, "{ \"articles\": [ oops").unwrap();
        assert_eq!(upsert_entry(&path, &entry("a", "A")).unwrap(), 1);
        assert_eq!(read_json(&path)["articles"][0]["id"], "a");
    }

    #[test]
    fn non_object_top_level_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, r#"[{"id": "old"}]"#).unwrap();
        upsert_entry(&path, &entry("a", "A")).unwrap();
        assert_eq!(read_json(&path), json!({ "articles": [serde_json::to_value(entry("a", "A")).unwrap()] }));
    }

    #[test]
    fn articles_not_a_list_is_reset_keeping_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, r#"{"articles": "nope", "site": "Tenants United"}"#).unwrap();
        upsert_entry(&path, &entry("a", "A")).unwrap();
        let index = read_json(&path);
        assert_eq!(index["site"], "Tenants United");
        assert_eq!(index["articles"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn top_level_key_order_survives_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, r#"{"site": "S", "articles": [], "updated": "2024-01-01"}"#).unwrap();
        upsert_entry(&path, &entry("a", "A")).unwrap();
        let index = read_json(&path);
        let keys: Vec<&str> = index.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["site", "articles", "updated"]);

        fs::write(&path, r#"{"site": "S"}"#).unwrap();
        upsert_entry(&path, &entry("a", "A")).unwrap();
        let index = read_json(&path);
        let keys: Vec<&str> = index.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["site", "articles"]);
    }

    #[test]
    fn existing_id_is_replaced_and_moved_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(
            &path,
            json!({
                "articles": [
                    { "id": "y", "title": "Other" },
                    { "id": "x", "title": "Old", "pdf": "old.pdf", "legacy": true },
                    { "id": "z", "title": "Third" },
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(upsert_entry(&path, &entry("x", "New")).unwrap(), 3);
        let articles = read_json(&path)["articles"].as_array().unwrap().clone();
        let ids: Vec<&str> = articles.iter().map(|a| a["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
        assert_eq!(articles[0]["title"], "New");
        // replaced wholesale, nothing carried over from the old entry
        assert!(articles[0].get("pdf").is_none());
        assert!(articles[0].get("legacy").is_none());
        assert_eq!(articles[1], json!({ "id": "y", "title": "Other" }));
    }

    #[test]
    fn duplicate_ids_all_removed() {
        let mut index = Index::default();
        index.articles = vec![json!({"id": "x"}), json!({"id": "x"}), json!("stray")];
        index.upsert(&entry("x", "Only")).unwrap();
        assert_eq!(index.articles().len(), 2);
        assert_eq!(index.articles()[0]["title"], "Only");
        assert_eq!(index.articles()[1], json!("stray"));
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the index file should be
        let path = dir.path().join("index.json");
        fs::create_dir(&path).unwrap();
        let err = upsert_entry(&path, &entry("a", "A")).unwrap_err();
        assert!(matches!(err, ConvertError::OutputWrite { .. }));
    }
}
