pub mod context;
pub mod embed;
pub mod mode;
pub mod patterns;
pub mod processor;
pub mod rewriter;

pub use context::{Dimension, FilterContext, UserInfo};
pub use embed::EmbedBuilder;
pub use mode::{ModeResolver, RenderMode};
pub use patterns::{LinkMatch, LinkPattern};
pub use processor::TextFilter;
pub use rewriter::{
    DEFAULT_ISSUE_CONCURRENCY, FailureReport, FilterOutcome, LinkRewriter, MatchFailure,
};
