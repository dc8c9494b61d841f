use std::sync::Arc;

use crate::{services::ImageSearch, BotConfig};

/// Shared by every handler invocation; holds nothing mutable
#[derive(Clone)]
pub struct RequestContext {
    pub config: Arc<BotConfig>,
    pub search: Arc<dyn ImageSearch>,
}
