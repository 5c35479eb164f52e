use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generates an opaque identifier for posts and comments.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Human-readable creation time. Only ever displayed, never compared.
pub fn display_timestamp() -> String {
    Utc::now().format("%b %e, %Y %H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Points awarded for solving a problem of this difficulty.
    pub fn points(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub author_id: Option<String>,
    pub content: String,
    pub timestamp: String,
}

/// Outcome of the most recent verification run for a problem's solution draft.
///
/// Each non-idle state carries the exact solution text it refers to, so a
/// result can only ever gate that text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum Verification {
    #[default]
    Unverified,
    Pending(String),
    Passed(String),
    Failed(String),
}

impl Verification {
    pub fn is_pending(&self) -> bool {
        matches!(self, Verification::Pending(_))
    }

    pub fn passed_for(&self, text: &str) -> bool {
        matches!(self, Verification::Passed(verified) if verified == text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemState {
    pub difficulty: Difficulty,
    pub solved: bool,
    pub solution_draft: String,
    pub show_solution_editor: bool,
    pub solutions: Vec<String>,
    #[serde(default)]
    pub verification: Verification,
}

impl ProblemState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            solved: false,
            solution_draft: String::new(),
            show_solution_editor: false,
            solutions: Vec::new(),
            verification: Verification::Unverified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostKind {
    Status,
    ChallengeCompletion {
        challenge_title: String,
        difficulty: Difficulty,
    },
    Blog {
        title: String,
    },
    Problem(ProblemState),
    Media {
        media_url: String,
    },
}

impl PostKind {
    pub fn label(&self) -> &'static str {
        match self {
            PostKind::Status => "status",
            PostKind::ChallengeCompletion { .. } => "challenge",
            PostKind::Blog { .. } => "blog",
            PostKind::Problem(_) => "problem",
            PostKind::Media { .. } => "media",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub author_id: Option<String>,
    pub content: String,
    pub timestamp: String,
    pub likes: u32,
    pub liked: bool,
    pub bookmarked: bool,
    pub show_comments: bool,
    pub comments: Vec<Comment>,
    pub kind: PostKind,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl Post {
    pub fn problem(&self) -> Option<&ProblemState> {
        match &self.kind {
            PostKind::Problem(problem) => Some(problem),
            _ => None,
        }
    }

    pub fn problem_mut(&mut self) -> Option<&mut ProblemState> {
        match &mut self.kind {
            PostKind::Problem(problem) => Some(problem),
            _ => None,
        }
    }
}

/// Input for a user-authored post before it receives identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub kind: PostKind,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl NewPost {
    pub fn status(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: PostKind::Status,
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn problem(content: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            content: content.into(),
            kind: PostKind::Problem(ProblemState::new(difficulty)),
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// The signed-in user, passed explicitly to every operation that needs authorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: String,
    pub display_name: String,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Emitted when a problem is marked solved; the backend turns it into points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSolved {
    pub user_id: String,
    pub post_id: String,
    pub difficulty: Difficulty,
}
