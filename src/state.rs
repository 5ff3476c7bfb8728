use crate::client::OfferApi;
use crate::store::AppStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AppStore>,
    pub api: Arc<dyn OfferApi>,
}

impl AppState {
    pub fn new(api: Arc<dyn OfferApi>) -> Self {
        Self {
            store: Arc::new(AppStore::new(Arc::clone(&api))),
            api,
        }
    }
}
