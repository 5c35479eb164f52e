//! Infinite-scroll pagination.
//!
//! [`ScrollController`] is a two-flag state machine (`loading`, `has_more`).
//! A load is started by handing out a [`LoadTicket`]; only one ticket can be
//! outstanding, so a second trigger while loading is a no-op. Completions are
//! matched against the controller's generation and silently dropped once the
//! view has been reset.

use crate::store::FeedStore;
use codefeed_core::{new_id, CoreError, Difficulty, FeedConfig, Post, PostKind, ProblemState};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fraction of the scrollable height past which the last post counts as visible.
pub const LOAD_THRESHOLD: f32 = 0.95;

/// A paged source of older posts.
pub trait PageSource: Send + Sync {
    /// Fetches page `page` (zero-based). Returning fewer than `page_size`
    /// posts signals that the source is exhausted.
    fn fetch_page(
        &self,
        page: u32,
        page_size: usize,
    ) -> BoxFuture<'static, Result<Vec<Post>, CoreError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub page: u32,
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { count: usize, exhausted: bool },
    /// The ticket belonged to a previous generation
    Stale,
}

#[derive(Debug, Clone)]
pub struct ScrollController {
    page_size: usize,
    page: u32,
    loading: bool,
    has_more: bool,
    generation: u64,
}

impl ScrollController {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
            loading: false,
            has_more: true,
            generation: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Viewport notification for the last rendered post.
    pub fn on_viewport(&mut self, last_item_visible: bool) -> Option<LoadTicket> {
        if !last_item_visible {
            return None;
        }
        self.request_load()
    }

    /// Scroll notification carrying the relative vertical offset (0.0 to 1.0).
    pub fn on_scroll(&mut self, relative_y: f32) -> Option<LoadTicket> {
        self.on_viewport(relative_y >= LOAD_THRESHOLD)
    }

    /// Starts a load unless one is in flight or the source is exhausted.
    pub fn request_load(&mut self) -> Option<LoadTicket> {
        if self.loading {
            debug!("Load already in flight, ignoring trigger");
            return None;
        }
        if !self.has_more {
            return None;
        }

        self.loading = true;
        Some(LoadTicket {
            generation: self.generation,
            page: self.page,
            page_size: self.page_size,
        })
    }

    /// Applies the result of a load started with `ticket`.
    pub fn complete<E>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Post>, E>,
        store: &mut FeedStore,
    ) -> Result<LoadOutcome, E> {
        if ticket.generation != self.generation {
            warn!(
                "Dropping page {} from generation {}, current generation is {}",
                ticket.page, ticket.generation, self.generation
            );
            return Ok(LoadOutcome::Stale);
        }

        self.loading = false;
        let batch = result?;

        let exhausted = batch.len() < ticket.page_size;
        let count = store.append_batch(batch);
        self.page += 1;
        if exhausted {
            self.has_more = false;
        }
        info!(
            "Loaded page {} with {} posts{}",
            ticket.page,
            count,
            if exhausted { " (end of feed)" } else { "" }
        );

        Ok(LoadOutcome::Appended { count, exhausted })
    }

    /// Invalidates any load in flight, e.g. when the view goes away.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Cancels in-flight work and starts over from the first page.
    pub fn reset(&mut self) {
        self.cancel();
        self.page = 0;
        self.has_more = true;
    }
}

const AUTHORS: [&str; 6] = [
    "Grace Hopper",
    "Linus T.",
    "Margaret H.",
    "Ken T.",
    "Barbara L.",
    "Dennis R.",
];

const TAGS: [&str; 6] = ["rust", "algorithms", "webdev", "career", "dp", "graphs"];

const PROBLEMS: [&str; 4] = [
    "Write a function that reverses a linked list in place",
    "Find the longest palindromic substring of a string",
    "Return the number of islands in a grid of land and water",
    "Merge overlapping intervals and return the sorted result",
];

/// Generates plausible posts after a simulated network delay.
#[derive(Debug, Clone)]
pub struct SyntheticPageSource {
    delay: Duration,
    max_pages: Option<u32>,
}

impl SyntheticPageSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_pages: None,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.load_delay()).with_max_pages(config.max_pages)
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn generate(&self, page: u32, page_size: usize) -> Vec<Post> {
        if self.max_pages.is_some_and(|max| page >= max) {
            return Vec::new();
        }

        let mut rng = fastrand::Rng::new();
        (0..page_size)
            .map(|index| synthetic_post(&mut rng, page, index))
            .collect()
    }
}

impl PageSource for SyntheticPageSource {
    fn fetch_page(
        &self,
        page: u32,
        page_size: usize,
    ) -> BoxFuture<'static, Result<Vec<Post>, CoreError>> {
        let source = self.clone();
        async move {
            tokio::time::sleep(source.delay).await;
            Ok(source.generate(page, page_size))
        }
        .boxed()
    }
}

fn synthetic_post(rng: &mut fastrand::Rng, page: u32, index: usize) -> Post {
    let author = AUTHORS[rng.usize(..AUTHORS.len())];
    let difficulty = Difficulty::ALL[rng.usize(..Difficulty::ALL.len())];
    let (content, kind) = match rng.u8(..5) {
        0 => (
            format!("Shipping day {} of my coding streak!", page * 10 + index as u32),
            PostKind::Status,
        ),
        1 => (
            "Just finished this one, the trick was memoizing the subproblems.".to_string(),
            PostKind::ChallengeCompletion {
                challenge_title: format!("Weekly challenge #{}", page + 1),
                difficulty,
            },
        ),
        2 => (
            "Some notes on what I learned this week.".to_string(),
            PostKind::Blog {
                title: format!("Notes from page {}", page + 1),
            },
        ),
        3 => (
            PROBLEMS[rng.usize(..PROBLEMS.len())].to_string(),
            PostKind::Problem(ProblemState::new(difficulty)),
        ),
        _ => (
            "Whiteboard from today's pairing session".to_string(),
            PostKind::Media {
                media_url: format!("https://picsum.photos/seed/{}/600/400", rng.u32(..)),
            },
        ),
    };

    Post {
        id: new_id(),
        author: author.to_string(),
        author_id: None,
        content,
        timestamp: format!("{}h ago", (page as usize + 1) * 24 + index),
        likes: rng.u32(..200),
        liked: false,
        bookmarked: false,
        show_comments: false,
        comments: Vec::new(),
        kind,
        tags: vec![TAGS[rng.usize(..TAGS.len())].to_string()],
        attachments: Vec::new(),
    }
}
