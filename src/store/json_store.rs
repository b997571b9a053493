//! Schema store over a key-value backend
//!
//! The whole collection is one JSON array of schemas under a single key.
//! Every mutation is a read-modify-write of that array.

use tracing::{debug, info, warn};

use super::backend::{check_key, KeyValueBackend};
use super::errors::StoreResult;
use crate::schema::FormSchema;

/// Key the collection lives under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "formBuilder_forms";

/// Create/read/update/delete of named form schemas.
pub trait SchemaStore {
    /// All stored schemas, in stored order.
    fn list_schemas(&self) -> Vec<FormSchema>;

    /// Inserts the schema, or replaces the stored schema with the same id
    /// in place.
    fn save_schema(&mut self, schema: &FormSchema) -> StoreResult<()>;

    /// Removes the schema with this id. Unknown ids are ignored.
    fn delete_schema(&mut self, id: &str) -> StoreResult<()>;

    /// The schema with this id, if stored.
    fn get_schema(&self, id: &str) -> Option<FormSchema> {
        self.list_schemas().into_iter().find(|s| s.id == id)
    }
}

/// Schema store persisting a JSON array through a backend.
#[derive(Debug)]
pub struct JsonSchemaStore<B: KeyValueBackend> {
    backend: B,
    key: String,
}

impl<B: KeyValueBackend> JsonSchemaStore<B> {
    /// Opens the store over `backend`, keeping the collection under `key`.
    pub fn open(backend: B, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        check_key(&key)?;
        info!(key = %key, "schema store opened");
        Ok(Self { backend, key })
    }

    /// Opens the store under [`DEFAULT_STORAGE_KEY`].
    pub fn open_default(backend: B) -> StoreResult<Self> {
        Self::open(backend, DEFAULT_STORAGE_KEY)
    }

    /// Closes the store and hands back its backend.
    pub fn close(self) -> B {
        debug!(key = %self.key, "schema store closed");
        self.backend
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn write_all(&mut self, schemas: &[FormSchema]) -> StoreResult<()> {
        let content = serde_json::to_string(schemas)?;
        self.backend.write(&self.key, &content)
    }
}

impl<B: KeyValueBackend> SchemaStore for JsonSchemaStore<B> {
    fn list_schemas(&self) -> Vec<FormSchema> {
        let content = match self.backend.read(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read stored schemas");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(schemas) => schemas,
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored schemas are unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn save_schema(&mut self, schema: &FormSchema) -> StoreResult<()> {
        let mut schemas = self.list_schemas();

        match schemas.iter_mut().find(|s| s.id == schema.id) {
            Some(existing) => *existing = schema.clone(),
            None => schemas.push(schema.clone()),
        }

        self.write_all(&schemas)?;
        info!(schema_id = %schema.id, fields = schema.fields.len(), "schema saved");
        Ok(())
    }

    fn delete_schema(&mut self, id: &str) -> StoreResult<()> {
        let mut schemas = self.list_schemas();
        let before = schemas.len();
        schemas.retain(|s| s.id != id);

        if schemas.len() == before {
            debug!(schema_id = %id, "delete of unknown schema ignored");
            return Ok(());
        }

        self.write_all(&schemas)?;
        info!(schema_id = %id, "schema deleted");
        Ok(())
    }
}
