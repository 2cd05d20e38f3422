use crate::db::{ContentStore, CredentialStore, MemoryStore, PgStore};
use std::sync::Arc;

/// Shared handles registered as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentStore>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(content: Arc<dyn ContentStore>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            content,
            credentials,
        }
    }

    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }
}
