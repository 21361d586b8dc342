/// Registry constructor for the Tidal backend
use crate::backend::TidalBackend;
use crate::helper::HelperClient;
use async_trait::async_trait;
use soul_directory::{Backend, BackendContext, BackendFactory};
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug, Clone)]
pub struct TidalFactory {
    helper_url: Url,
    title: String,
}

impl TidalFactory {
    pub fn new(helper_url: Url, title: impl Into<String>) -> Self {
        Self {
            helper_url,
            title: title.into(),
        }
    }
}

#[async_trait]
impl BackendFactory for TidalFactory {
    fn title(&self) -> &str {
        &self.title
    }

    async fn create(&self, ctx: BackendContext) -> soul_directory::Result<Arc<dyn Backend>> {
        let helper = HelperClient::new(self.helper_url.clone())?;
        info!(
            helper = %self.helper_url,
            callback = %ctx.callback_url("/"),
            "Tidal backend ready"
        );
        Ok(Arc::new(TidalBackend::new(ctx, helper)))
    }
}
