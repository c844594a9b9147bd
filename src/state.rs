use crate::store::MemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
}

impl axum::extract::FromRef<AppState> for Arc<MemoryStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
