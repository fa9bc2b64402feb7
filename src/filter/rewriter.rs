use futures::stream::{self, StreamExt};
use serde::Serialize;

use super::{
    Dimension, EmbedBuilder, LinkMatch, LinkPattern, RenderMode, UserInfo,
    patterns::{WATCH_MARKER, is_attribute_value},
};
use crate::{
    IssueError,
    token::{TokenIssuer, TokenPayload},
};

/// A link left untouched because no token could be issued for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    pub pattern: LinkPattern,
    pub host: String,
    pub video_id: String,
    /// The original text that was kept in place.
    pub fragment: String,
    pub error: IssueError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub text: String,
    pub mode: RenderMode,
    pub rewritten: usize,
    pub failures: Vec<MatchFailure>,
}

impl FilterOutcome {
    fn unchanged(text: &str, mode: RenderMode) -> Self {
        Self {
            text: text.to_string(),
            mode,
            rewritten: 0,
            failures: Vec::new(),
        }
    }

    pub fn matched(&self) -> usize {
        self.rewritten + self.failures.len()
    }

    pub fn is_unchanged(&self) -> bool {
        self.rewritten == 0
    }
}

/// Serializable view of a failure for callers outside the crate.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub pattern: LinkPattern,
    pub host: String,
    pub video_id: String,
    pub code: &'static str,
    pub reason: String,
}

impl From<&MatchFailure> for FailureReport {
    fn from(failure: &MatchFailure) -> Self {
        Self {
            pattern: failure.pattern,
            host: failure.host.clone(),
            video_id: failure.video_id.clone(),
            code: failure.error.code(),
            reason: failure.error.to_string(),
        }
    }
}

/// Text split by whether a later pass may still rewrite it.
#[derive(Debug)]
enum Segment {
    Open(String),
    /// Generated markup or a link kept after a failed issuance.
    Sealed(String),
}

/// Token requests kept pending at once when nothing else is configured.
pub const DEFAULT_ISSUE_CONCURRENCY: usize = 8;

/// Replaces watch links with player embeds, one token per link.
pub struct LinkRewriter<I> {
    issuer: I,
    account_id: Option<String>,
    embeds: EmbedBuilder,
    concurrency: usize,
}

impl<I: TokenIssuer> LinkRewriter<I> {
    pub fn new(issuer: I, account_id: Option<String>, embeds: EmbedBuilder) -> Self {
        Self {
            issuer,
            account_id,
            embeds,
            concurrency: DEFAULT_ISSUE_CONCURRENCY,
        }
    }

    /// Cap the number of token requests pending at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// Rewrite anchor-wrapped links, then bare links, in `text`.
    ///
    /// Never fails: a link whose token cannot be issued stays as it was and
    /// is listed in [`FilterOutcome::failures`].
    pub async fn rewrite(
        &self,
        text: &str,
        mode: RenderMode,
        width: Dimension,
        height: Dimension,
        user: &UserInfo,
    ) -> FilterOutcome {
        if text.is_empty() || !text.contains(WATCH_MARKER) {
            return FilterOutcome::unchanged(text, mode);
        }

        let mut outcome = FilterOutcome::unchanged("", mode);
        let mut segments = vec![Segment::Open(text.to_string())];

        for pattern in LinkPattern::ORDERED {
            let mut next = Vec::with_capacity(segments.len());
            for segment in segments {
                match segment {
                    Segment::Open(chunk) => {
                        let pieces = self
                            .rewrite_chunk(&chunk, pattern, mode, width, height, user, &mut outcome)
                            .await;
                        next.extend(pieces);
                    }
                    sealed => next.push(sealed),
                }
            }
            segments = next;
        }

        outcome.text = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Open(s) | Segment::Sealed(s) => s,
            })
            .collect();

        tracing::debug!(
            "Rewrote {} of {} watch link(s) in {:?} mode",
            outcome.rewritten,
            outcome.matched(),
            mode
        );

        outcome
    }

    #[allow(clippy::too_many_arguments)]
    async fn rewrite_chunk(
        &self,
        chunk: &str,
        pattern: LinkPattern,
        mode: RenderMode,
        width: Dimension,
        height: Dimension,
        user: &UserInfo,
        outcome: &mut FilterOutcome,
    ) -> Vec<Segment> {
        let mut links = pattern.find_all(chunk);
        if pattern == LinkPattern::Plain {
            // A URL used as an attribute value belongs to markup this filter did not match.
            links.retain(|link| !is_attribute_value(chunk, link));
        }
        if links.is_empty() {
            return vec![Segment::Open(chunk.to_string())];
        }

        let requests: Vec<_> = links.iter().map(|link| self.issue_token(link, user)).collect();
        let tokens: Vec<_> = stream::iter(requests)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut pieces = Vec::with_capacity(links.len() * 2 + 1);
        let mut cursor = 0;
        for (link, token) in links.into_iter().zip(tokens) {
            if link.range.start > cursor {
                pieces.push(Segment::Open(chunk[cursor..link.range.start].to_string()));
            }
            cursor = link.range.end;

            match token {
                Ok(token) => {
                    pieces.push(Segment::Sealed(
                        self.embeds.build(&link, mode, width, height, &token),
                    ));
                    outcome.rewritten += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        "Leaving {:?} link to video {} on {} unmodified: {}",
                        pattern,
                        link.video_id,
                        link.host,
                        error
                    );
                    outcome.failures.push(MatchFailure {
                        pattern,
                        host: link.host,
                        video_id: link.video_id,
                        fragment: link.full_match.clone(),
                        error,
                    });
                    pieces.push(Segment::Sealed(link.full_match));
                }
            }
        }
        if cursor < chunk.len() {
            pieces.push(Segment::Open(chunk[cursor..].to_string()));
        }

        pieces
    }

    async fn issue_token(&self, link: &LinkMatch, user: &UserInfo) -> Result<String, IssueError> {
        let Some(account_id) = self.account_id.as_deref() else {
            return Err(IssueError::MissingAccountId);
        };
        let payload = TokenPayload::new(&link.video_id, user);
        self.issuer.issue(account_id, &payload).await
    }
}
