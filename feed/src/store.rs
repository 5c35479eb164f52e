//! In-memory feed and the interaction reducer.
//!
//! Every interaction targets a single post by id. An id that is no longer in
//! the feed is not an error: the call reports [`Transition::Missing`] and the
//! feed is left untouched. Validation failures return a [`FeedError`] and
//! likewise leave the feed untouched.

use codefeed_core::{
    display_timestamp, new_id, Comment, FeedError, NewPost, Post, PostKind, ProblemSolved,
    ProblemState, SessionContext, Verification,
};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The targeted post was found and updated
    Applied,
    /// No post with that id; nothing changed
    Missing,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Snapshot handed to a verifier. The result is only applied while the
/// problem's draft still matches `solution`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub post_id: String,
    pub problem: String,
    pub solution: String,
}

#[derive(Debug, Clone, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
    comment_drafts: HashMap<String, String>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn comment_draft(&self, post_id: &str) -> &str {
        self.comment_drafts
            .get(post_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn update<F>(&mut self, id: &str, action: &str, apply: F) -> Transition
    where
        F: FnOnce(&mut Post),
    {
        match self.posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                apply(post);
                debug!("{} applied to post {}", action, id);
                Transition::Applied
            }
            None => {
                debug!("{} ignored, post {} is gone", action, id);
                Transition::Missing
            }
        }
    }

    /// Publishes a post authored by the session user at the head of the feed.
    pub fn create_post(
        &mut self,
        session: &SessionContext,
        draft: NewPost,
    ) -> Result<String, FeedError> {
        let content = draft.content.trim();
        if content.is_empty() {
            return Err(FeedError::EmptyContent);
        }
        match &draft.kind {
            PostKind::Blog { title } if title.trim().is_empty() => {
                return Err(FeedError::MissingField {
                    field: "blog title".to_string(),
                })
            }
            PostKind::Media { media_url } if media_url.trim().is_empty() => {
                return Err(FeedError::MissingField {
                    field: "media URL".to_string(),
                })
            }
            PostKind::ChallengeCompletion {
                challenge_title, ..
            } if challenge_title.trim().is_empty() => {
                return Err(FeedError::MissingField {
                    field: "challenge title".to_string(),
                })
            }
            _ => {}
        }

        let post = Post {
            id: new_id(),
            author: session.display_name.clone(),
            author_id: Some(session.user_id.clone()),
            content: content.to_string(),
            timestamp: display_timestamp(),
            likes: 0,
            liked: false,
            bookmarked: false,
            show_comments: false,
            comments: Vec::new(),
            kind: draft.kind,
            tags: draft
                .tags
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            attachments: draft.attachments,
        };
        let id = post.id.clone();
        debug!("Created {} post {}", post.kind.label(), id);
        self.posts.insert(0, post);
        Ok(id)
    }

    /// Appends a batch at the tail, keeping the order of existing posts.
    pub fn append_batch(&mut self, batch: Vec<Post>) -> usize {
        let count = batch.len();
        self.posts.extend(batch);
        count
    }

    pub fn like(&mut self, id: &str) -> Transition {
        self.update(id, "like", |post| {
            if post.liked {
                post.likes = post.likes.saturating_sub(1);
            } else {
                post.likes += 1;
            }
            post.liked = !post.liked;
        })
    }

    pub fn bookmark(&mut self, id: &str) -> Transition {
        self.update(id, "bookmark", |post| post.bookmarked = !post.bookmarked)
    }

    pub fn toggle_comments(&mut self, id: &str) -> Transition {
        self.update(id, "toggle comments", |post| {
            post.show_comments = !post.show_comments
        })
    }

    pub fn set_comment_draft(&mut self, id: &str, text: impl Into<String>) -> Transition {
        if self.get(id).is_none() {
            return Transition::Missing;
        }
        self.comment_drafts.insert(id.to_string(), text.into());
        Transition::Applied
    }

    /// Appends the post's pending comment draft as a new comment.
    pub fn add_comment(
        &mut self,
        id: &str,
        session: &SessionContext,
    ) -> Result<Transition, FeedError> {
        if self.get(id).is_none() {
            return Ok(Transition::Missing);
        }
        let content = self.comment_draft(id).trim().to_string();
        if content.is_empty() {
            return Err(FeedError::EmptyComment {
                post_id: id.to_string(),
            });
        }

        let comment = Comment {
            id: new_id(),
            author: session.display_name.clone(),
            author_id: Some(session.user_id.clone()),
            content,
            timestamp: display_timestamp(),
        };
        let transition = self.update(id, "add comment", |post| post.comments.push(comment));
        self.comment_drafts.remove(id);
        Ok(transition)
    }

    /// Removes the post together with its embedded comments and draft.
    pub fn delete_post(&mut self, id: &str) -> Transition {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        self.comment_drafts.remove(id);
        if self.posts.len() < before {
            debug!("Deleted post {}", id);
            Transition::Applied
        } else {
            Transition::Missing
        }
    }

    pub fn delete_comment(&mut self, post_id: &str, comment_id: &str) -> Transition {
        let Some(post) = self.posts.iter_mut().find(|post| post.id == post_id) else {
            return Transition::Missing;
        };
        let before = post.comments.len();
        post.comments.retain(|comment| comment.id != comment_id);
        if post.comments.len() < before {
            debug!("Deleted comment {} from post {}", comment_id, post_id);
            Transition::Applied
        } else {
            Transition::Missing
        }
    }

    pub fn edit_post(&mut self, id: &str, content: &str) -> Result<Transition, FeedError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::EmptyContent);
        }
        Ok(self.update(id, "edit", |post| post.content = content.to_string()))
    }

    pub fn toggle_solution_input(&mut self, id: &str) -> Transition {
        let Some(problem) = self.problem_mut(id) else {
            return Transition::Missing;
        };
        problem.show_solution_editor = !problem.show_solution_editor;
        problem.verification = Verification::Unverified;
        Transition::Applied
    }

    pub fn solution_change(&mut self, id: &str, text: impl Into<String>) -> Transition {
        let Some(problem) = self.problem_mut(id) else {
            return Transition::Missing;
        };
        problem.solution_draft = text.into();
        problem.verification = Verification::Unverified;
        Transition::Applied
    }

    /// Marks the problem's current draft as under verification.
    ///
    /// Returns `Ok(None)` when the post is gone.
    pub fn begin_verification(
        &mut self,
        id: &str,
    ) -> Result<Option<VerificationRequest>, FeedError> {
        let Some(post) = self.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        let problem_text = post.content.clone();
        let Some(problem) = post.problem_mut() else {
            return Err(FeedError::NotAProblem {
                post_id: id.to_string(),
            });
        };
        if problem.solution_draft.trim().is_empty() {
            return Err(FeedError::EmptySolution {
                post_id: id.to_string(),
            });
        }

        problem.verification = Verification::Pending(problem.solution_draft.clone());
        Ok(Some(VerificationRequest {
            post_id: id.to_string(),
            problem: problem_text,
            solution: problem.solution_draft.clone(),
        }))
    }

    /// Applies a verifier verdict. Verdicts for a draft that has since been
    /// edited or reset are dropped and reported as [`Transition::Missing`].
    pub fn record_verification(&mut self, id: &str, solution: &str, passed: bool) -> Transition {
        let Some(problem) = self.problem_mut(id) else {
            return Transition::Missing;
        };
        if problem.verification != Verification::Pending(solution.to_string()) {
            debug!("Dropping stale verification result for post {}", id);
            return Transition::Missing;
        }
        problem.verification = if passed {
            Verification::Passed(solution.to_string())
        } else {
            Verification::Failed(solution.to_string())
        };
        Transition::Applied
    }

    /// Returns a pending verification to idle after the judge itself failed.
    pub fn abandon_verification(&mut self, id: &str, solution: &str) -> Transition {
        let Some(problem) = self.problem_mut(id) else {
            return Transition::Missing;
        };
        if problem.verification != Verification::Pending(solution.to_string()) {
            return Transition::Missing;
        }
        problem.verification = Verification::Unverified;
        Transition::Applied
    }

    /// Accepts `solution` for the problem, provided it passed verification.
    ///
    /// Returns the event for the backend, or `Ok(None)` when the post is gone.
    pub fn solve_problem(
        &mut self,
        id: &str,
        solution: &str,
        session: &SessionContext,
    ) -> Result<Option<ProblemSolved>, FeedError> {
        let Some(problem) = self.problem_lookup(id)? else {
            return Ok(None);
        };
        if solution.trim().is_empty() {
            return Err(FeedError::EmptySolution {
                post_id: id.to_string(),
            });
        }
        if !problem.verification.passed_for(solution) {
            return Err(FeedError::NotVerified {
                post_id: id.to_string(),
            });
        }

        problem.solved = true;
        problem.solutions.push(solution.to_string());
        problem.solution_draft.clear();
        problem.show_solution_editor = true;
        problem.verification = Verification::Unverified;
        debug!(
            "Problem {} solved ({} accepted solutions)",
            id,
            problem.solutions.len()
        );

        Ok(Some(ProblemSolved {
            user_id: session.user_id.clone(),
            post_id: id.to_string(),
            difficulty: problem.difficulty,
        }))
    }

    pub fn bookmarked(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|post| post.bookmarked)
    }

    /// Case-insensitive match over content, author and tags, in feed order.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.posts.iter().collect();
        }
        self.posts
            .iter()
            .filter(|post| {
                post.content.to_lowercase().contains(&query)
                    || post.author.to_lowercase().contains(&query)
                    || post
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&query))
            })
            .collect()
    }

    fn problem_mut(&mut self, id: &str) -> Option<&mut ProblemState> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .and_then(Post::problem_mut)
    }

    fn problem_lookup(
        &mut self,
        id: &str,
    ) -> Result<Option<&mut ProblemState>, FeedError> {
        match self.posts.iter_mut().find(|post| post.id == id) {
            None => Ok(None),
            Some(post) => match post.problem_mut() {
                Some(problem) => Ok(Some(problem)),
                None => Err(FeedError::NotAProblem {
                    post_id: id.to_string(),
                }),
            },
        }
    }
}
