use crate::notifications::Level;
use crate::{is_own, may_delete_comment, App, ComposerKind, Message};
use codefeed_core::{Difficulty, Post, PostKind, ProblemState, Verification};
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Element, Length};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("Codefeed").size(24),
            text(format!(
                "{} · {} points",
                self.session.display_name, self.points
            ))
            .size(14),
            text_input("Search posts", &self.search)
                .on_input(Message::SearchChanged)
                .width(Length::Fixed(240.0)),
            button(if self.show_bookmarks {
                "All posts"
            } else {
                "Bookmarks"
            })
            .on_press(Message::ToggleBookmarks),
            button("Refresh").on_press(Message::Refresh),
        ]
        .spacing(16)
        .align_items(Alignment::Center);

        let mut posts = self.page.store.search(&self.search);
        if self.show_bookmarks {
            posts.retain(|post| post.bookmarked);
        }

        let mut list = Column::new().spacing(12).padding(4);
        if posts.is_empty() && !self.page.scroll.is_loading() {
            list = list.push(text("No posts to show").size(16));
        }
        for post in posts {
            list = list.push(self.post_card(post));
        }

        let footer: Element<'_, Message> = if self.page.scroll.is_loading() {
            text("Loading more posts...").size(14).into()
        } else if self.page.scroll.has_more() {
            button("Load more").on_press(Message::LoadMore).into()
        } else {
            text("You're all caught up").size(14).into()
        };
        list = list.push(footer);

        let feed = scrollable(list)
            .on_scroll(Message::Scrolled)
            .height(Length::Fill);

        let main_column = column![self.composer_view(), feed]
            .spacing(16)
            .width(Length::FillPortion(3));

        let body = row![main_column, self.leaderboard_view()].spacing(20);

        container(column![header, self.notifications_view(), body].spacing(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn notifications_view(&self) -> Element<'_, Message> {
        let mut list = Column::new().spacing(4);
        for notification in self.notifications.iter() {
            let marker = match notification.level {
                Level::Info => "ℹ",
                Level::Success => "✓",
                Level::Error => "✗",
            };
            list = list.push(
                row![
                    text(format!("{} {}", marker, notification.message)).size(14),
                    button("Dismiss").on_press(Message::DismissNotification(notification.id)),
                ]
                .spacing(8)
                .align_items(Alignment::Center),
            );
        }
        list.into()
    }

    fn composer_view(&self) -> Element<'_, Message> {
        let kinds = [
            (ComposerKind::Status, "Status"),
            (ComposerKind::Problem, "Problem"),
            (ComposerKind::Blog, "Blog"),
            (ComposerKind::Media, "Media"),
        ];
        let mut kind_row = Row::new().spacing(8);
        for (kind, label) in kinds {
            let selector = if self.composer.kind == kind {
                button(text(format!("[{}]", label)))
            } else {
                button(label).on_press(Message::ComposerKindSelected(kind))
            };
            kind_row = kind_row.push(selector);
        }

        let mut composer = column![
            kind_row,
            text_input("What are you working on?", &self.composer.content)
                .on_input(Message::ComposerContentChanged)
                .on_submit(Message::PublishPost),
        ]
        .spacing(8);

        match self.composer.kind {
            ComposerKind::Blog => {
                composer = composer.push(
                    text_input("Blog title", &self.composer.title)
                        .on_input(Message::ComposerTitleChanged),
                );
            }
            ComposerKind::Media => {
                composer = composer.push(
                    text_input("Media URL", &self.composer.title)
                        .on_input(Message::ComposerTitleChanged),
                );
            }
            ComposerKind::Problem => {
                let mut difficulties = Row::new().spacing(8);
                for difficulty in Difficulty::ALL {
                    let selector = if self.composer.difficulty == difficulty {
                        button(text(format!("[{}]", difficulty)))
                    } else {
                        button(text(difficulty.label()))
                            .on_press(Message::ComposerDifficultySelected(difficulty))
                    };
                    difficulties = difficulties.push(selector);
                }
                composer = composer.push(difficulties);
            }
            ComposerKind::Status => {}
        }

        composer
            .push(
                row![
                    text_input("Tags, comma separated", &self.composer.tags)
                        .on_input(Message::ComposerTagsChanged),
                    button("Publish").on_press(Message::PublishPost),
                ]
                .spacing(8),
            )
            .into()
    }

    fn post_card<'a>(&'a self, post: &'a Post) -> Element<'a, Message> {
        let mut card = Column::new().spacing(8);

        card = card.push(
            row![
                text(&post.author).size(16),
                text(&post.timestamp).size(12),
                text(post.kind.label()).size(12),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        );

        match &post.kind {
            PostKind::Blog { title } => card = card.push(text(title).size(18)),
            PostKind::ChallengeCompletion {
                challenge_title,
                difficulty,
            } => {
                card = card.push(
                    text(format!("Completed {} ({})", challenge_title, difficulty)).size(14),
                )
            }
            PostKind::Media { media_url } => card = card.push(text(media_url).size(12)),
            PostKind::Status | PostKind::Problem(_) => {}
        }

        match self.editing.as_ref().filter(|edit| edit.post_id == post.id) {
            Some(edit) => {
                card = card.push(
                    row![
                        text_input("Edit post", &edit.text)
                            .on_input(Message::EditChanged)
                            .on_submit(Message::SaveEdit),
                        button("Save").on_press(Message::SaveEdit),
                        button("Cancel").on_press(Message::CancelEdit),
                    ]
                    .spacing(8),
                );
            }
            None => card = card.push(text(&post.content).size(14)),
        }

        if !post.tags.is_empty() {
            let tags: Vec<String> = post.tags.iter().map(|tag| format!("#{}", tag)).collect();
            card = card.push(text(tags.join(" ")).size(12));
        }
        for attachment in &post.attachments {
            let label = format!("📎 {} ({})", attachment.name, attachment.url);
            card = card.push(text(label).size(12));
        }

        if let PostKind::Problem(problem) = &post.kind {
            card = card.push(problem_section(&post.id, problem));
        }

        let own_post = is_own(&self.session, post.author_id.as_deref());
        let mut actions = row![
            button(text(format!(
                "{} {}",
                if post.liked { "♥" } else { "♡" },
                post.likes
            )))
            .on_press(Message::Like(post.id.clone())),
            button(if post.bookmarked {
                "Bookmarked"
            } else {
                "Bookmark"
            })
            .on_press(Message::Bookmark(post.id.clone())),
            button(text(format!("Comments ({})", post.comments.len())))
                .on_press(Message::ToggleComments(post.id.clone())),
        ]
        .spacing(8);
        if own_post {
            actions = actions
                .push(button("Edit").on_press(Message::StartEdit(post.id.clone())))
                .push(button("Delete").on_press(Message::DeletePost(post.id.clone())));
        }
        card = card.push(actions);

        if post.show_comments {
            card = card.push(self.comments_view(post));
        }

        container(card).padding(12).width(Length::Fill).into()
    }

    fn comments_view<'a>(&'a self, post: &'a Post) -> Element<'a, Message> {
        let mut comments = Column::new().spacing(6);
        for comment in &post.comments {
            let mut line = row![
                text(&comment.author).size(12),
                text(&comment.content).size(12),
                text(&comment.timestamp).size(10),
            ]
            .spacing(8)
            .align_items(Alignment::Center);
            if may_delete_comment(&self.session, post, comment) {
                line = line.push(
                    button("Delete")
                        .on_press(Message::DeleteComment(post.id.clone(), comment.id.clone())),
                );
            }
            comments = comments.push(line);
        }

        let post_id = post.id.clone();
        comments
            .push(
                row![
                    text_input("Add a comment", self.page.store.comment_draft(&post.id))
                        .on_input(move |draft| Message::CommentDraftChanged(post_id.clone(), draft))
                        .on_submit(Message::AddComment(post.id.clone())),
                    button("Post").on_press(Message::AddComment(post.id.clone())),
                ]
                .spacing(8),
            )
            .into()
    }

    fn leaderboard_view(&self) -> Element<'_, Message> {
        let mut board = column![text("Leaderboard").size(18)].spacing(6);
        if self.leaderboard.is_empty() {
            board = board.push(text("No solved problems yet").size(12));
        }
        for (rank, entry) in self.leaderboard.iter().enumerate() {
            board = board.push(
                text(format!(
                    "{}. {} · {} pts · {} solved",
                    rank + 1,
                    entry.display_name,
                    entry.points,
                    entry.solved
                ))
                .size(12),
            );
        }
        container(board)
            .width(Length::FillPortion(1))
            .padding(12)
            .into()
    }
}

fn problem_section<'a>(post_id: &str, problem: &'a ProblemState) -> Element<'a, Message> {
    let status = if problem.solved { " · Solved" } else { "" };
    let heading = format!("Difficulty: {}{}", problem.difficulty, status);
    let mut section = column![text(heading).size(12)].spacing(6);

    for (index, solution) in problem.solutions.iter().enumerate() {
        section = section.push(text(format!("Solution {}: {}", index + 1, solution)).size(12));
    }

    let toggle_label = if problem.show_solution_editor {
        "Hide solution editor"
    } else {
        "Write a solution"
    };
    section = section.push(
        button(toggle_label).on_press(Message::ToggleSolutionInput(post_id.to_string())),
    );

    if !problem.show_solution_editor {
        return section.into();
    }

    let input_id = post_id.to_string();
    let verdict = match &problem.verification {
        Verification::Unverified => "Not verified",
        Verification::Pending(_) => "Verifying...",
        Verification::Passed(_) => "Verified",
        Verification::Failed(_) => "Did not pass verification",
    };

    let mut verify = button("Verify");
    if !problem.verification.is_pending() {
        verify = verify.on_press(Message::VerifySolution(post_id.to_string()));
    }
    let mut submit = button("Submit");
    if problem.verification.passed_for(&problem.solution_draft) {
        submit = submit.on_press(Message::SubmitSolution(post_id.to_string()));
    }

    section
        .push(
            text_input("Your solution", &problem.solution_draft)
                .on_input(move |draft| Message::SolutionChanged(input_id.clone(), draft)),
        )
        .push(
            row![verify, submit, text(verdict).size(12)]
                .spacing(8)
                .align_items(Alignment::Center),
        )
        .into()
}
