use super::{
    EmbedBuilder, FilterContext, FilterOutcome, LinkRewriter, ModeResolver, RenderMode,
};
use crate::{config::FilterConfig, token::TokenIssuer};

/// Per-invocation entry point: resolve the mode once, then rewrite links.
pub struct TextFilter<I> {
    resolver: ModeResolver,
    rewriter: LinkRewriter<I>,
}

impl<I: TokenIssuer> TextFilter<I> {
    pub fn new(resolver: ModeResolver, rewriter: LinkRewriter<I>) -> Self {
        Self { resolver, rewriter }
    }

    pub fn from_config(config: &FilterConfig, issuer: I) -> Self {
        Self::new(
            ModeResolver::new(&config.audio_suffixes),
            LinkRewriter::new(
                issuer,
                config.account_id.clone(),
                EmbedBuilder::new(config.audio_height, config.labels.audio_recording.clone()),
            )
            .with_concurrency(config.token_concurrency),
        )
    }

    pub fn resolve_mode(&self, context: &FilterContext) -> RenderMode {
        self.resolver.resolve(context.course_identifier.as_deref())
    }

    pub async fn filter(&self, text: &str, context: &FilterContext) -> FilterOutcome {
        let mode = self.resolve_mode(context);
        self.rewriter
            .rewrite(
                text,
                mode,
                context.player_width,
                context.player_height,
                &context.user,
            )
            .await
    }

    pub fn rewriter(&self) -> &LinkRewriter<I> {
        &self.rewriter
    }
}
