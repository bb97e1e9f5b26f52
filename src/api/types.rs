//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::model::{LoadedModel, ModelStore};

/// Shared context for all routes and middleware.
///
/// Holds the model loaded at startup; cloning shares the same instance.
#[derive(Clone)]
pub struct ApiContext {
    pub model: Arc<LoadedModel>,
}

impl ApiContext {
    pub fn new(store: &ModelStore) -> Self {
        Self {
            model: store.handle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::AlignmentPolicy;
    use crate::model::store::sample_model;

    #[test]
    fn clones_share_the_loaded_model() {
        let store = ModelStore::from_model(sample_model(AlignmentPolicy::Strict));
        let ctx = ApiContext::new(&store);
        let other = ctx.clone();
        let again = ApiContext::new(&store);
        assert!(Arc::ptr_eq(&ctx.model, &other.model));
        assert!(Arc::ptr_eq(&ctx.model, &again.model));
    }
}
