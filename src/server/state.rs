use std::sync::Arc;

use crate::{
    Result,
    config::FilterConfig,
    filter::{Dimension, TextFilter},
    token::ConfiguredIssuer,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub filter: Arc<TextFilter<ConfiguredIssuer>>,
    pub player_width: Dimension,
    pub player_height: Dimension,
}

impl AppState {
    pub fn new(config: &FilterConfig) -> Result<Self> {
        let issuer = ConfiguredIssuer::from_config(config)?;
        Ok(Self {
            filter: Arc::new(TextFilter::from_config(config, issuer)),
            player_width: config.player_width,
            player_height: config.player_height,
        })
    }
}
