//! Repository for saved scripts.
//!
//! Scripts live in a per-user subcollection at `users/{uid}/scripts/{id}`.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use scribo_models::{SavedScript, Source};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue, ToFirestoreValue, Value};

/// Repository for saved-script documents.
pub struct ScriptRepository {
    client: FirestoreClient,
}

impl ScriptRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn collection(user_id: &str) -> String {
        format!("users/{}/scripts", user_id)
    }

    /// Persist a script for a user.
    pub async fn save(&self, user_id: &str, script: &SavedScript) -> FirestoreResult<()> {
        let collection = Self::collection(user_id);
        let doc_id = script.id.to_string();
        let fields = script_to_fields(script);

        self.client
            .with_retry("save_script", || {
                self.client
                    .create_document(&collection, &doc_id, fields.clone())
            })
            .await?;

        info!(user_id = %user_id, script_id = %doc_id, "Saved script");
        Ok(())
    }

    /// Fetch a single script, or None if it does not exist.
    pub async fn get(&self, user_id: &str, script_id: Uuid) -> FirestoreResult<Option<SavedScript>> {
        let collection = Self::collection(user_id);
        let doc = self
            .client
            .get_document(&collection, &script_id.to_string())
            .await?;

        doc.map(|d| script_from_document(&d)).transpose()
    }

    /// List a user's scripts, newest first.
    pub async fn list(&self, user_id: &str, page_size: Option<u32>) -> FirestoreResult<Vec<SavedScript>> {
        let collection = Self::collection(user_id);
        let response = self
            .client
            .list_documents(&collection, page_size, None)
            .await?;

        let mut scripts: Vec<SavedScript> = response
            .documents
            .unwrap_or_default()
            .iter()
            .filter_map(|d| script_from_document(d).ok())
            .collect();

        scripts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(scripts)
    }

    /// Rename a script. Fails with NotFound for a missing document.
    pub async fn rename(&self, user_id: &str, script_id: Uuid, title: &str) -> FirestoreResult<()> {
        let collection = Self::collection(user_id);
        self.client
            .update_document(
                &collection,
                &script_id.to_string(),
                title_fields(title),
                Some(vec!["title".to_string()]),
            )
            .await?;
        info!(user_id = %user_id, script_id = %script_id, "Renamed script");
        Ok(())
    }

    /// Delete a script. Idempotent.
    pub async fn delete(&self, user_id: &str, script_id: Uuid) -> FirestoreResult<()> {
        let collection = Self::collection(user_id);
        self.client
            .delete_document(&collection, &script_id.to_string())
            .await?;
        info!(user_id = %user_id, script_id = %script_id, "Deleted script");
        Ok(())
    }
}

/// The write body for a title-only update; the update mask keeps the
/// rest of the document untouched.
fn title_fields(title: &str) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), title.to_firestore_value());
    fields
}

fn script_to_fields(script: &SavedScript) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), script.title.to_firestore_value());
    fields.insert(
        "video_idea".to_string(),
        script.video_idea.to_firestore_value(),
    );
    fields.insert("script".to_string(), script.script.to_firestore_value());
    fields.insert(
        "created_at".to_string(),
        script.created_at.to_firestore_value(),
    );

    let sources: Vec<HashMap<String, String>> = script
        .sources
        .iter()
        .map(|s| {
            let mut m = HashMap::new();
            m.insert("title".to_string(), s.title.clone());
            m.insert("link".to_string(), s.link.clone());
            m.insert("snippet".to_string(), s.snippet.clone());
            m
        })
        .collect();
    fields.insert("sources".to_string(), sources.to_firestore_value());

    fields
}

fn script_from_document(doc: &Document) -> FirestoreResult<SavedScript> {
    let id = doc
        .doc_id()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| FirestoreError::invalid_response("script document has no valid id"))?;

    let get_string = |field: &str| -> FirestoreResult<String> {
        doc.get(field)
            .and_then(String::from_firestore_value)
            .ok_or_else(|| {
                FirestoreError::invalid_response(format!("script field missing: {}", field))
            })
    };

    let created_at = doc
        .get("created_at")
        .and_then(chrono::DateTime::from_firestore_value)
        .ok_or_else(|| FirestoreError::invalid_response("script field missing: created_at"))?;

    let sources = match doc.get("sources") {
        Some(Value::ArrayValue(arr)) => arr
            .values
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(source_from_value)
            .collect(),
        _ => Vec::new(),
    };

    Ok(SavedScript {
        id,
        title: get_string("title")?,
        video_idea: get_string("video_idea")?,
        script: get_string("script")?,
        sources,
        created_at,
    })
}

fn source_from_value(value: &Value) -> Option<Source> {
    let Value::MapValue(map) = value else {
        return None;
    };
    let fields = map.fields.as_ref()?;
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(String::from_firestore_value)
            .unwrap_or_default()
    };
    Some(Source {
        title: text("title"),
        link: text("link"),
        snippet: text("snippet"),
    })
}
