mod notifications;
mod view;

pub use notifications::{Level, Notification, Notifications};

use codefeed_core::{
    AppConfig, Comment, CoreError, Difficulty, ErrorExt, ErrorRecovery, ErrorReporter, NewPost,
    Post, PostKind, ProblemSolved, SessionContext,
};
use database::{Database, LeaderboardEntry, SolvedNotification};
use feed::{FeedPage, FeedStore, LoadOutcome, LoadTicket, PageSource, VerificationRequest};
use iced::widget::scrollable;
use iced::{Command, Subscription};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use verifier::{verify_within, SolutionVerifier};

const LEADERBOARD_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub enum Message {
    ComposerKindSelected(ComposerKind),
    ComposerContentChanged(String),
    ComposerTitleChanged(String),
    ComposerDifficultySelected(Difficulty),
    ComposerTagsChanged(String),
    PublishPost,
    Like(String),
    Bookmark(String),
    ToggleComments(String),
    CommentDraftChanged(String, String),
    AddComment(String),
    DeletePost(String),
    DeleteComment(String, String),
    StartEdit(String),
    EditChanged(String),
    SaveEdit,
    CancelEdit,
    ToggleSolutionInput(String),
    SolutionChanged(String, String),
    VerifySolution(String),
    VerificationFinished(VerificationRequest, Result<bool, Arc<CoreError>>),
    SubmitSolution(String),
    SolveRecorded(Result<Option<u32>, Arc<CoreError>>),
    SearchChanged(String),
    ToggleBookmarks,
    Scrolled(scrollable::Viewport),
    LoadMore,
    Refresh,
    PageLoaded(LoadTicket, Result<Vec<Post>, Arc<CoreError>>),
    PointsLoaded(Result<u32, Arc<CoreError>>),
    LeaderboardLoaded(Result<Vec<LeaderboardEntry>, Arc<CoreError>>),
    SolvedInserted(SolvedNotification),
    SolverProfileLoaded(SolvedNotification, Result<SessionContext, Arc<CoreError>>),
    DismissNotification(u64),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerKind {
    #[default]
    Status,
    Problem,
    Blog,
    Media,
}

#[derive(Debug)]
struct Composer {
    kind: ComposerKind,
    content: String,
    /// Blog title or media URL, depending on `kind`
    title: String,
    difficulty: Difficulty,
    tags: String,
}

impl Default for Composer {
    fn default() -> Self {
        Self {
            kind: ComposerKind::Status,
            content: String::new(),
            title: String::new(),
            difficulty: Difficulty::Easy,
            tags: String::new(),
        }
    }
}

impl Composer {
    fn to_new_post(&self) -> NewPost {
        let kind = match self.kind {
            ComposerKind::Status => PostKind::Status,
            ComposerKind::Problem => {
                PostKind::Problem(codefeed_core::ProblemState::new(self.difficulty))
            }
            ComposerKind::Blog => PostKind::Blog {
                title: self.title.trim().to_string(),
            },
            ComposerKind::Media => PostKind::Media {
                media_url: self.title.trim().to_string(),
            },
        };
        NewPost {
            content: self.content.clone(),
            kind,
            tags: self.tags.split(',').map(str::to_string).collect(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct EditState {
    post_id: String,
    text: String,
}

/// Collaborators the feed view is built with.
pub struct AppContext {
    pub config: AppConfig,
    pub session: SessionContext,
    pub database: Database,
    pub verifier: Arc<dyn SolutionVerifier>,
    pub source: Arc<dyn PageSource>,
}

pub struct App {
    session: SessionContext,
    database: Database,
    verifier: Arc<dyn SolutionVerifier>,
    verify_timeout: Duration,
    source: Arc<dyn PageSource>,
    page: FeedPage,
    composer: Composer,
    editing: Option<EditState>,
    search: String,
    show_bookmarks: bool,
    points: u32,
    leaderboard: Vec<LeaderboardEntry>,
    notifications: Notifications,
    reporter: ErrorReporter,
}

impl App {
    pub fn new(context: AppContext) -> (Self, Command<Message>) {
        let AppContext {
            config,
            session,
            database,
            verifier,
            source,
        } = context;

        let mut app = Self {
            session,
            database,
            verifier,
            verify_timeout: Duration::from_secs(config.verifier.timeout_secs),
            source,
            page: FeedPage::from_config(&config.feed),
            composer: Composer::default(),
            editing: None,
            search: String::new(),
            show_bookmarks: false,
            points: 0,
            leaderboard: Vec::new(),
            notifications: Notifications::new(Duration::from_secs(config.ui.notification_secs)),
            reporter: ErrorReporter::new(),
        };

        let mut commands = vec![app.profile_command()];
        if let Some(ticket) = app.page.scroll.request_load() {
            commands.push(app.load_command(ticket));
        }
        (app, Command::batch(commands))
    }

    pub fn page(&self) -> &FeedPage {
        &self.page
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let solved = solved_feed(&self.database);
        if self.notifications.is_empty() {
            solved
        } else {
            Subscription::batch([
                solved,
                iced::time::every(Duration::from_millis(500)).map(|_| Message::Tick),
            ])
        }
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ComposerKindSelected(kind) => self.composer.kind = kind,
            Message::ComposerContentChanged(content) => self.composer.content = content,
            Message::ComposerTitleChanged(title) => self.composer.title = title,
            Message::ComposerDifficultySelected(difficulty) => {
                self.composer.difficulty = difficulty
            }
            Message::ComposerTagsChanged(tags) => self.composer.tags = tags,
            Message::PublishPost => {
                match self
                    .page
                    .store
                    .create_post(&self.session, self.composer.to_new_post())
                {
                    Ok(_) => {
                        self.composer = Composer::default();
                        self.notifications.push(Level::Success, "Post published.");
                    }
                    Err(e) => self.report(&e.into()),
                }
            }
            Message::Like(id) => {
                self.page.store.like(&id);
            }
            Message::Bookmark(id) => {
                self.page.store.bookmark(&id);
            }
            Message::ToggleComments(id) => {
                self.page.store.toggle_comments(&id);
            }
            Message::CommentDraftChanged(id, text) => {
                self.page.store.set_comment_draft(&id, text);
            }
            Message::AddComment(id) => {
                if let Err(e) = self.page.store.add_comment(&id, &self.session) {
                    self.report(&e.into());
                }
            }
            Message::DeletePost(id) => {
                if self.page.store.delete_post(&id).is_applied() {
                    if self.editing.as_ref().is_some_and(|edit| edit.post_id == id) {
                        self.editing = None;
                    }
                    self.notifications.push(Level::Info, "Post deleted.");
                }
            }
            Message::DeleteComment(post_id, comment_id) => {
                let allowed = self.page.store.get(&post_id).is_some_and(|post| {
                    post.comments
                        .iter()
                        .find(|comment| comment.id == comment_id)
                        .is_some_and(|comment| may_delete_comment(&self.session, post, comment))
                });
                if allowed {
                    self.page.store.delete_comment(&post_id, &comment_id);
                } else {
                    debug!("Ignoring delete of comment {} by a non-author", comment_id);
                }
            }
            Message::StartEdit(id) => {
                if let Some(post) = self.page.store.get(&id) {
                    self.editing = Some(EditState {
                        post_id: id,
                        text: post.content.clone(),
                    });
                }
            }
            Message::EditChanged(text) => {
                if let Some(edit) = &mut self.editing {
                    edit.text = text;
                }
            }
            Message::SaveEdit => {
                if let Some(edit) = self.editing.take() {
                    match self.page.store.edit_post(&edit.post_id, &edit.text) {
                        Ok(_) => {
                            self.notifications.push(Level::Success, "Post updated.");
                        }
                        Err(e) => {
                            self.report(&e.into());
                            self.editing = Some(edit);
                        }
                    }
                }
            }
            Message::CancelEdit => self.editing = None,
            Message::ToggleSolutionInput(id) => {
                self.page.store.toggle_solution_input(&id);
            }
            Message::SolutionChanged(id, text) => {
                self.page.store.solution_change(&id, text);
            }
            Message::VerifySolution(id) => match self.page.store.begin_verification(&id) {
                Ok(Some(request)) => return self.verify_command(request),
                Ok(None) => {}
                Err(e) => self.report(&e.into()),
            },
            Message::VerificationFinished(request, result) => {
                self.finish_verification(request, result)
            }
            Message::SubmitSolution(id) => {
                let solution = self
                    .page
                    .store
                    .get(&id)
                    .and_then(Post::problem)
                    .map(|problem| problem.solution_draft.clone())
                    .unwrap_or_default();
                match self.page.store.solve_problem(&id, &solution, &self.session) {
                    Ok(Some(event)) => {
                        self.notifications.push(Level::Success, "Problem solved!");
                        return self.record_solved_command(event);
                    }
                    Ok(None) => {}
                    Err(e) => self.report(&e.into()),
                }
            }
            Message::SolveRecorded(result) => match result {
                Ok(Some(total)) => {
                    self.points = total;
                    return self.leaderboard_command();
                }
                Ok(None) => {}
                Err(e) => self.report(&e),
            },
            Message::SearchChanged(query) => self.search = query,
            Message::ToggleBookmarks => self.show_bookmarks = !self.show_bookmarks,
            Message::Scrolled(viewport) => {
                if let Some(ticket) = self.page.scroll.on_scroll(viewport.relative_offset().y) {
                    return self.load_command(ticket);
                }
            }
            Message::LoadMore => {
                if let Some(ticket) = self.page.scroll.on_viewport(true) {
                    return self.load_command(ticket);
                }
            }
            Message::Refresh => {
                info!("Refreshing feed");
                self.page.scroll.reset();
                self.page.store = FeedStore::new();
                self.editing = None;
                if let Some(ticket) = self.page.scroll.request_load() {
                    return self.load_command(ticket);
                }
            }
            Message::PageLoaded(ticket, result) => {
                match self
                    .page
                    .scroll
                    .complete(ticket, result, &mut self.page.store)
                {
                    Ok(LoadOutcome::Appended {
                        exhausted: true, ..
                    }) => {
                        self.notifications
                            .push(Level::Info, "You're all caught up.");
                    }
                    Ok(_) => {}
                    Err(e) => self.report(&e),
                }
            }
            Message::PointsLoaded(result) => match result {
                Ok(total) => {
                    self.points = total;
                    return self.leaderboard_command();
                }
                Err(e) => self.report(&e),
            },
            Message::LeaderboardLoaded(result) => match result {
                Ok(entries) => self.leaderboard = entries,
                Err(e) => self.report(&e),
            },
            Message::SolvedInserted(solved) => {
                if solved.user_id == self.session.user_id {
                    return self.points_command();
                }
                return Command::batch([self.leaderboard_command(), self.solver_command(solved)]);
            }
            Message::SolverProfileLoaded(solved, result) => {
                let name = match result {
                    Ok(profile) => profile.display_name,
                    Err(e) => {
                        debug!("No profile for solver {}: {}", solved.user_id, e);
                        solved.user_id.clone()
                    }
                };
                self.notifications.push(
                    Level::Info,
                    format!(
                        "{} solved a {} problem (+{} points)",
                        name, solved.difficulty, solved.points
                    ),
                );
            }
            Message::DismissNotification(id) => self.notifications.dismiss(id),
            Message::Tick => self.notifications.expire(Instant::now()),
        }
        Command::none()
    }

    fn finish_verification(
        &mut self,
        request: VerificationRequest,
        result: Result<bool, Arc<CoreError>>,
    ) {
        match result {
            Ok(passed) => {
                let applied = self
                    .page
                    .store
                    .record_verification(&request.post_id, &request.solution, passed)
                    .is_applied();
                if !applied {
                    debug!("Verification for post {} no longer relevant", request.post_id);
                } else if passed {
                    self.notifications.push(
                        Level::Success,
                        "Solution verified! You can submit it now.",
                    );
                } else {
                    self.notifications
                        .push(Level::Info, "Your solution did not pass verification.");
                }
            }
            Err(e) => {
                self.page
                    .store
                    .abandon_verification(&request.post_id, &request.solution);
                self.report(&e);
            }
        }
    }

    fn report(&mut self, error: &CoreError) {
        match error {
            CoreError::Feed(_) => self.reporter.report_warning(error),
            _ => self.reporter.report_error(error),
        }
        self.notifications
            .push(Level::Error, error.user_friendly_message());
    }

    fn load_command(&self, ticket: LoadTicket) -> Command<Message> {
        debug!("Requesting page {}", ticket.page);
        Command::perform(
            self.source.fetch_page(ticket.page, ticket.page_size),
            move |result| Message::PageLoaded(ticket, result.map_err(Arc::new)),
        )
    }

    fn verify_command(&self, request: VerificationRequest) -> Command<Message> {
        let verdict = verify_within(
            self.verifier.as_ref(),
            &request.problem,
            &request.solution,
            self.verify_timeout,
        );
        Command::perform(verdict, move |result| {
            Message::VerificationFinished(request, result.map_err(Arc::new))
        })
    }

    fn record_solved_command(&self, event: ProblemSolved) -> Command<Message> {
        let database = self.database.clone();
        Command::perform(
            async move {
                ErrorRecovery::run(|| {
                    let database = database.clone();
                    let event = event.clone();
                    async move { database.record_solved(&event).await }
                })
                .await
                .into_result()
            },
            |result| Message::SolveRecorded(result.map_err(Arc::new)),
        )
    }

    fn profile_command(&self) -> Command<Message> {
        let database = self.database.clone();
        let session = self.session.clone();
        Command::perform(
            async move {
                database.upsert_profile(&session).await?;
                database.points_total(&session.user_id).await
            },
            |result| Message::PointsLoaded(result.map_err(Arc::new)),
        )
    }

    fn points_command(&self) -> Command<Message> {
        let database = self.database.clone();
        let user_id = self.session.user_id.clone();
        Command::perform(
            async move { database.points_total(&user_id).await },
            |result| Message::PointsLoaded(result.map_err(Arc::new)),
        )
    }

    fn solver_command(&self, solved: SolvedNotification) -> Command<Message> {
        let database = self.database.clone();
        let user_id = solved.user_id.clone();
        Command::perform(
            async move { database.get_profile(&user_id).await },
            move |result| Message::SolverProfileLoaded(solved, result.map_err(Arc::new)),
        )
    }

    fn leaderboard_command(&self) -> Command<Message> {
        let database = self.database.clone();
        Command::perform(
            async move { database.leaderboard(LEADERBOARD_SIZE).await },
            |result| Message::LeaderboardLoaded(result.map_err(Arc::new)),
        )
    }
}

fn is_own(session: &SessionContext, author_id: Option<&str>) -> bool {
    author_id == Some(session.user_id.as_str())
}

/// A comment can be removed by its author or by the author of the post.
fn may_delete_comment(session: &SessionContext, post: &Post, comment: &Comment) -> bool {
    is_own(session, comment.author_id.as_deref()) || is_own(session, post.author_id.as_deref())
}

/// Solved-problem inserts from the backend, for every user.
fn solved_feed(database: &Database) -> Subscription<Message> {
    struct SolvedFeed;

    iced::subscription::unfold(
        std::any::TypeId::of::<SolvedFeed>(),
        database.subscribe_solved(),
        |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(solved) => return (Message::SolvedInserted(solved), receiver),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Solved feed fell behind, {} inserts skipped", skipped);
                    }
                    Err(RecvError::Closed) => std::future::pending::<()>().await,
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed::SyntheticPageSource;
    use futures::future::BoxFuture;
    use futures::FutureExt;

    struct FixedVerifier(bool);

    impl SolutionVerifier for FixedVerifier {
        fn verify(&self, _: &str, _: &str) -> BoxFuture<'static, Result<bool, CoreError>> {
            let verdict = self.0;
            async move { Ok(verdict) }.boxed()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn app() -> App {
        let config = AppConfig::default();
        let context = AppContext {
            session: config.session.to_context(),
            database: Database::new("sqlite://unused.db".to_string()),
            verifier: Arc::new(FixedVerifier(true)),
            source: Arc::new(SyntheticPageSource::new(Duration::ZERO)),
            config,
        };
        let (app, _) = App::new(context);
        app
    }

    fn first_ticket(app: &App) -> LoadTicket {
        LoadTicket {
            generation: 0,
            page: 0,
            page_size: app.page.scroll.page_size(),
        }
    }

    fn publish_problem(app: &mut App) -> String {
        app.update(Message::ComposerKindSelected(ComposerKind::Problem));
        app.update(Message::ComposerContentChanged(
            "Write a function to calculate the fibonacci sequence".to_string(),
        ));
        app.update(Message::PublishPost);
        app.page.store.posts()[0].id.clone()
    }

    #[test]
    fn test_initial_load_is_in_flight() {
        let mut app = app();
        assert!(app.page().scroll.is_loading());

        // Triggers while the first page is loading are ignored
        app.update(Message::LoadMore);
        app.update(Message::LoadMore);

        let batch = SyntheticPageSource::new(Duration::ZERO).generate(0, 5);
        app.update(Message::PageLoaded(first_ticket(&app), Ok(batch)));
        assert_eq!(app.page().store.len(), 5);
        assert!(!app.page().scroll.is_loading());
    }

    #[test]
    fn test_short_page_ends_feed_and_saved_edit_notifies() {
        let mut app = app();
        let batch = SyntheticPageSource::new(Duration::ZERO).generate(0, 2);
        app.update(Message::PageLoaded(first_ticket(&app), Ok(batch)));
        assert!(!app.page().scroll.has_more());

        app.update(Message::ComposerContentChanged("draft".to_string()));
        app.update(Message::PublishPost);
        let id = app.page.store.posts()[0].id.clone();
        app.update(Message::StartEdit(id.clone()));
        app.update(Message::EditChanged("final".to_string()));
        app.update(Message::SaveEdit);

        assert!(app.editing.is_none());
        assert_eq!(app.page().store.get(&id).unwrap().content, "final");
        let messages: Vec<_> = app.notifications().iter().map(|n| n.message.clone()).collect();
        assert_eq!(
            messages,
            vec![
                "You're all caught up.".to_string(),
                "Post published.".to_string(),
                "Post updated.".to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_page_load_notifies() {
        let mut app = app();
        let ticket = first_ticket(&app);
        app.update(Message::PageLoaded(
            ticket,
            Err(Arc::new(CoreError::Timeout { seconds: 5 })),
        ));

        assert!(app.page().store.is_empty());
        assert!(!app.page().scroll.is_loading());
        assert!(app
            .notifications()
            .iter()
            .any(|n| n.level == Level::Error));
    }

    #[test]
    fn test_refresh_drops_in_flight_page() {
        let mut app = app();
        let stale = first_ticket(&app);
        app.update(Message::Refresh);

        let batch = SyntheticPageSource::new(Duration::ZERO).generate(0, 5);
        app.update(Message::PageLoaded(stale, Ok(batch)));
        assert!(app.page().store.is_empty());
        assert!(app.page().scroll.is_loading());
    }

    #[test]
    fn test_empty_post_shows_validation_error() {
        let mut app = app();
        app.update(Message::ComposerContentChanged("   ".to_string()));
        app.update(Message::PublishPost);

        assert!(app.page().store.is_empty());
        let messages: Vec<_> = app.notifications().iter().map(|n| n.message.clone()).collect();
        assert_eq!(messages, vec!["Post content cannot be empty.".to_string()]);
    }

    #[test]
    fn test_failed_edit_keeps_editor_open() {
        let mut app = app();
        app.update(Message::ComposerContentChanged("original".to_string()));
        app.update(Message::PublishPost);
        let id = app.page.store.posts()[0].id.clone();

        app.update(Message::StartEdit(id.clone()));
        app.update(Message::EditChanged("  ".to_string()));
        app.update(Message::SaveEdit);

        assert!(app.editing.is_some());
        assert_eq!(app.page().store.get(&id).unwrap().content, "original");
    }

    #[test]
    fn test_verify_then_submit_solves_problem() {
        let mut app = app();
        let id = publish_problem(&mut app);
        let solution = "function fib(n) { return n; }".to_string();

        app.update(Message::ToggleSolutionInput(id.clone()));
        app.update(Message::SolutionChanged(id.clone(), solution.clone()));

        // Submitting before verification is rejected
        app.update(Message::SubmitSolution(id.clone()));
        assert!(!app.page().store.get(&id).unwrap().problem().unwrap().solved);

        app.update(Message::VerifySolution(id.clone()));
        let request = VerificationRequest {
            post_id: id.clone(),
            problem: "Write a function to calculate the fibonacci sequence".to_string(),
            solution: solution.clone(),
        };
        app.update(Message::VerificationFinished(request, Ok(true)));
        app.update(Message::SubmitSolution(id.clone()));

        let problem = app.page().store.get(&id).unwrap().problem().unwrap();
        assert!(problem.solved);
        assert_eq!(problem.solutions, vec![solution]);
    }

    #[test]
    fn test_judge_failure_resets_pending_verification() {
        let mut app = app();
        let id = publish_problem(&mut app);
        app.update(Message::SolutionChanged(id.clone(), "let x = fib(2);".to_string()));
        app.update(Message::VerifySolution(id.clone()));

        let request = VerificationRequest {
            post_id: id.clone(),
            problem: String::new(),
            solution: "let x = fib(2);".to_string(),
        };
        app.update(Message::VerificationFinished(
            request,
            Err(Arc::new(CoreError::Timeout { seconds: 30 })),
        ));

        let problem = app.page().store.get(&id).unwrap().problem().unwrap();
        assert!(!problem.verification.is_pending());
        assert!(app
            .notifications()
            .iter()
            .any(|n| n.level == Level::Error));
    }

    #[test]
    fn test_peer_solve_is_announced() {
        let mut app = app();
        let solved = SolvedNotification {
            user_id: "u-ada".to_string(),
            post_id: "p1".to_string(),
            difficulty: Difficulty::Hard,
            points: 30,
        };

        app.update(Message::SolvedInserted(solved.clone()));
        assert!(app.notifications().is_empty());

        app.update(Message::SolverProfileLoaded(
            solved,
            Ok(SessionContext::new("u-ada", "Ada")),
        ));
        let messages: Vec<_> = app.notifications().iter().map(|n| n.message.clone()).collect();
        assert_eq!(messages, vec!["Ada solved a hard problem (+30 points)".to_string()]);
    }

    #[test]
    fn test_own_solve_is_not_announced() {
        let mut app = app();
        let own = SolvedNotification {
            user_id: app.session.user_id.clone(),
            post_id: "p1".to_string(),
            difficulty: Difficulty::Easy,
            points: 10,
        };
        app.update(Message::SolvedInserted(own));
        assert!(app.notifications().is_empty());

        app.update(Message::PointsLoaded(Ok(10)));
        assert_eq!(app.points(), 10);
    }

    #[test]
    fn test_comment_delete_requires_authorship() {
        let mut app = app();
        let other = SessionContext::new("u-ada", "Ada");
        let post_id = app
            .page
            .store
            .create_post(&other, NewPost::status("Ada's post"))
            .unwrap();
        app.page.store.set_comment_draft(&post_id, "first");
        app.page.store.add_comment(&post_id, &other).unwrap();
        let theirs = app.page.store.get(&post_id).unwrap().comments[0].id.clone();

        app.update(Message::DeleteComment(post_id.clone(), theirs.clone()));
        assert_eq!(app.page().store.get(&post_id).unwrap().comments.len(), 1);

        app.update(Message::CommentDraftChanged(post_id.clone(), "mine".to_string()));
        app.update(Message::AddComment(post_id.clone()));
        let mine = app.page.store.get(&post_id).unwrap().comments[1].id.clone();
        app.update(Message::DeleteComment(post_id.clone(), mine));

        let post = app.page().store.get(&post_id).unwrap();
        let remaining: Vec<_> = post.comments.iter().map(|c| c.id.clone()).collect();
        assert_eq!(remaining, vec![theirs]);
    }

    #[test]
    fn test_post_author_may_moderate_comments() {
        let me = SessionContext::new("u-me", "Me");
        let other = SessionContext::new("u-ada", "Ada");
        let mut store = FeedStore::new();
        let post_id = store.create_post(&me, NewPost::status("my post")).unwrap();
        store.set_comment_draft(&post_id, "hello");
        store.add_comment(&post_id, &other).unwrap();

        let post = store.get(&post_id).unwrap();
        assert!(may_delete_comment(&me, post, &post.comments[0]));
        assert!(!may_delete_comment(&SessionContext::new("u-x", "X"), post, &post.comments[0]));
    }

    #[test]
    fn test_solve_recorded_updates_points() {
        let mut app = app();
        app.update(Message::SolveRecorded(Ok(Some(30))));
        assert_eq!(app.points(), 30);
    }
}
