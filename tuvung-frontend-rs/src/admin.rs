//! Content editing: field-level saves of a vocabulary item with a
//! one-generation backup, and the rollback that replays it.
//!
//! Backups are a tagged record list stored next to the item under
//! `revision_backup`. A field's record is created on the first save that
//! touches it and kept as-is by later saves, so a rollback always restores
//! the value the item had before editing began. Who may edit is the identity
//! layer's business; this layer only insists on a signed-in user.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tansu::{DocumentStore, StoreError};
use vocab_utils::Level;

use crate::Tuvung;

/// Editable columns of a vocabulary item, serialized as the wire field name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VocabField {
    Kanji,
    Furigana,
    Meaning,
    Example,
    ExampleMeaning,
    SoundUrl,
}

impl VocabField {
    pub fn as_str(self) -> &'static str {
        match self {
            VocabField::Kanji => "kanji",
            VocabField::Furigana => "furigana",
            VocabField::Meaning => "meaning",
            VocabField::Example => "example",
            VocabField::ExampleMeaning => "example_meaning",
            VocabField::SoundUrl => "sound_url",
        }
    }
}

/// One field's pre-edit value, kept until a rollback consumes it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BackupRecord {
    pub field: VocabField,
    pub old_value: String,
    pub new_value: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("editing requires a signed-in user")]
    SignInRequired,
    #[error("content store failed")]
    Store(#[from] StoreError),
    #[error("no vocabulary item stored at {0}")]
    ItemNotFound(String),
    #[error("stored item does not decode")]
    Decode(#[source] serde_json::Error),
}

const BACKUP_KEY: &str = "revision_backup";

/// Stored location of one item. Indices are 0-based array positions in the
/// stored tree, unlike the 1-based numbers the study pages navigate by.
fn item_path(level: Level, chapter_index: usize, lesson_index: usize, item_index: usize) -> String {
    format!(
        "vocabulary_data/{level}/{chapter_index}/lessonList/{lesson_index}/vocabularyList/{item_index}"
    )
}

fn stored_backups(item: &Map<String, Value>) -> Result<Vec<BackupRecord>, AdminError> {
    match item.get(BACKUP_KEY) {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(AdminError::Decode),
    }
}

impl<S: DocumentStore> Tuvung<S> {
    /// Overwrite the given fields of one stored item, recording each field's
    /// previous value the first time it is touched. Fields whose new value
    /// equals the stored one are skipped; an all-skipped save writes nothing.
    pub async fn save_vocabulary_fields(
        &self,
        level: Level,
        chapter_index: usize,
        lesson_index: usize,
        item_index: usize,
        changes: &BTreeMap<VocabField, String>,
    ) -> Result<(), AdminError> {
        if self.user_id.is_none() {
            return Err(AdminError::SignInRequired);
        }
        let path = item_path(level, chapter_index, lesson_index, item_index);
        let item = self.read_item(&path).await?;
        let mut backups = stored_backups(&item)?;

        let mut fields = Map::new();
        for (&field, new_value) in changes {
            let old_value = item
                .get(field.as_str())
                .and_then(Value::as_str)
                .unwrap_or_default();
            if old_value == new_value.as_str() {
                continue;
            }
            if !backups.iter().any(|record| record.field == field) {
                backups.push(BackupRecord {
                    field,
                    old_value: old_value.to_string(),
                    new_value: new_value.clone(),
                    saved_at: Utc::now(),
                });
            }
            fields.insert(field.as_str().to_string(), json!(new_value));
        }
        if fields.is_empty() {
            return Ok(());
        }
        fields.insert(
            BACKUP_KEY.to_string(),
            serde_json::to_value(&backups).map_err(AdminError::Decode)?,
        );

        self.store
            .update(&path, fields)
            .await
            .inspect_err(|e| log::error!("Error saving fields at {path}: {e:?}"))?;
        self.invalidate_level(level);
        Ok(())
    }

    /// Restore every backed-up field to its pre-edit value and clear the
    /// backup. `Ok(false)` when there is nothing to roll back.
    pub async fn rollback_vocabulary(
        &self,
        level: Level,
        chapter_index: usize,
        lesson_index: usize,
        item_index: usize,
    ) -> Result<bool, AdminError> {
        if self.user_id.is_none() {
            return Err(AdminError::SignInRequired);
        }
        let path = item_path(level, chapter_index, lesson_index, item_index);
        let item = self.read_item(&path).await?;
        let backups = stored_backups(&item)?;
        if backups.is_empty() {
            return Ok(false);
        }

        let mut fields = Map::new();
        for record in backups.iter().rev() {
            fields.insert(record.field.as_str().to_string(), json!(record.old_value));
        }
        fields.insert(BACKUP_KEY.to_string(), Value::Null);

        self.store
            .update(&path, fields)
            .await
            .inspect_err(|e| log::error!("Error rolling back {path}: {e:?}"))?;
        self.invalidate_level(level);
        Ok(true)
    }

    async fn read_item(&self, path: &str) -> Result<Map<String, Value>, AdminError> {
        let value = self
            .store
            .get(path)
            .await
            .inspect_err(|e| log::error!("Error reading item at {path}: {e:?}"))?;
        match value {
            Some(Value::Object(item)) => Ok(item),
            _ => Err(AdminError::ItemNotFound(path.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use tansu::memory::MemoryStore;

    fn seeded_store() -> MemoryStore {
        MemoryStore::from_value(json!({
            "vocabulary_data": {
                "N5": [{
                    "chapter_number": 1,
                    "chapter_name": "Chương 1",
                    "level_id": "N5",
                    "lessonList": [{
                        "lesson_id": 11,
                        "lesson_number": 1,
                        "lesson_name": "Bài 1",
                        "vocabularyList": [{
                            "lesson": "Bài 1",
                            "vocabulary_id": 1,
                            "kanji": "水",
                            "furigana": "みず",
                            "meaning": "nước"
                        }]
                    }]
                }]
            }
        }))
    }

    fn changes(pairs: &[(VocabField, &str)]) -> BTreeMap<VocabField, String> {
        pairs
            .iter()
            .map(|(field, value)| (*field, value.to_string()))
            .collect()
    }

    fn item_snapshot(store: &MemoryStore) -> Value {
        block_on(store.get("vocabulary_data/N5/0/lessonList/0/vocabularyList/0"))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_save_overwrites_and_records_backup() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[(VocabField::Meaning, "nước lạnh")]),
        ))
        .unwrap();

        let item = item_snapshot(&store);
        assert_eq!(item["meaning"], json!("nước lạnh"));
        let backups: Vec<BackupRecord> =
            serde_json::from_value(item["revision_backup"].clone()).unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].field, VocabField::Meaning);
        assert_eq!(backups[0].old_value, "nước");
        assert_eq!(backups[0].new_value, "nước lạnh");
    }

    #[test]
    fn test_second_save_keeps_the_original_backup() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[(VocabField::Meaning, "nước lạnh")]),
        ))
        .unwrap();
        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[(VocabField::Meaning, "nước nóng")]),
        ))
        .unwrap();

        let item = item_snapshot(&store);
        assert_eq!(item["meaning"], json!("nước nóng"));
        let backups: Vec<BackupRecord> =
            serde_json::from_value(item["revision_backup"].clone()).unwrap();
        assert_eq!(backups.len(), 1);
        // the backup still points at the pre-edit value
        assert_eq!(backups[0].old_value, "nước");
    }

    #[test]
    fn test_rollback_restores_and_clears() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[
                (VocabField::Meaning, "sai"),
                (VocabField::Furigana, "すい"),
            ]),
        ))
        .unwrap();

        let rolled = block_on(app.rollback_vocabulary(Level::N5, 0, 0, 0)).unwrap();
        assert!(rolled);

        let item = item_snapshot(&store);
        assert_eq!(item["meaning"], json!("nước"));
        assert_eq!(item["furigana"], json!("みず"));
        assert!(item.get("revision_backup").is_none());

        // nothing left to roll back
        let rolled = block_on(app.rollback_vocabulary(Level::N5, 0, 0, 0)).unwrap();
        assert!(!rolled);
    }

    #[test]
    fn test_unchanged_fields_write_nothing() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[(VocabField::Meaning, "nước")]),
        ))
        .unwrap();

        let item = item_snapshot(&store);
        assert!(item.get("revision_backup").is_none());
        assert!(!block_on(app.rollback_vocabulary(Level::N5, 0, 0, 0)).unwrap());
    }

    #[test]
    fn test_save_refreshes_the_content_cache() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        let before = block_on(app.lesson(Level::N5, 1, 1)).unwrap().unwrap();
        assert_eq!(before.vocabulary_list[0].meaning, "nước");

        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[(VocabField::Meaning, "nước lạnh")]),
        ))
        .unwrap();

        let after = block_on(app.lesson(Level::N5, 1, 1)).unwrap().unwrap();
        assert_eq!(after.vocabulary_list[0].meaning, "nước lạnh");
    }

    #[test]
    fn test_missing_item_is_reported() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        let err = block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            9,
            &changes(&[(VocabField::Meaning, "x")]),
        ))
        .unwrap_err();
        assert!(matches!(err, AdminError::ItemNotFound(_)));
    }

    #[test]
    fn test_editing_signed_out_is_rejected() {
        let app = Tuvung::new(seeded_store(), None);
        assert!(matches!(
            block_on(app.save_vocabulary_fields(
                Level::N5,
                0,
                0,
                0,
                &changes(&[(VocabField::Meaning, "x")]),
            )),
            Err(AdminError::SignInRequired)
        ));
        assert!(matches!(
            block_on(app.rollback_vocabulary(Level::N5, 0, 0, 0)),
            Err(AdminError::SignInRequired)
        ));
    }

    #[test]
    fn test_setting_a_previously_empty_field() {
        let store = seeded_store();
        let app = Tuvung::new(&store, Some("admin".to_string()));
        block_on(app.save_vocabulary_fields(
            Level::N5,
            0,
            0,
            0,
            &changes(&[(VocabField::Example, "水を飲みます")]),
        ))
        .unwrap();

        let item = item_snapshot(&store);
        assert_eq!(item["example"], json!("水を飲みます"));

        block_on(app.rollback_vocabulary(Level::N5, 0, 0, 0)).unwrap();
        let item = item_snapshot(&store);
        // the field did not exist before the edit, so it rolls back to empty
        assert_eq!(item["example"], json!(""));
    }
}
