use async_trait::async_trait;
use jigsaw_core::Result;

/// Port for persisting workspace documents
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a document, replacing any previous one with the same id
    async fn save(&self, id: &str, document: &str) -> Result<()>;

    /// Retrieve a document by workspace id
    async fn load(&self, id: &str) -> Result<Option<String>>;

    /// Delete a document. Deleting a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// List stored workspace ids in ascending order
    async fn list(&self) -> Result<Vec<String>>;
}
