mod templates;

use askama::Template;

use crate::{
    avatar::{self, AvatarSize},
    github::{Actor, EventKind, FeedEvent},
    http::AvatarSource,
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{kind} {id} has no `{field}` in its payload")]
    MissingField {
        kind: EventKind,
        id: String,
        field: &'static str,
    },
    #[error("failed to render event text: {0}")]
    Template(#[from] askama::Error),
}

/// Output for one event: the avatar escape sequence (possibly empty) and the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub avatar: String,
    pub text: String,
}

fn require<'a, T: ?Sized>(
    event: &FeedEvent,
    value: Option<&'a T>,
    field: &'static str,
) -> Result<&'a T, RenderError> {
    value.ok_or_else(|| RenderError::MissingField {
        kind: event.kind.clone(),
        id: event.id.clone(),
        field,
    })
}

/// Builds the event text. `Ok(None)` for event kinds that aren't displayed.
pub fn describe(event: &FeedEvent) -> Result<Option<String>, RenderError> {
    let user = event.actor.login.as_str();
    let repo = event.repo.name.as_str();
    let created_at = event.created_at.as_str();
    let payload = &event.payload;

    let text = match &event.kind {
        EventKind::PullRequestReviewComment => {
            let pr = require(event, payload.pull_request.as_ref(), "pull_request")?;
            templates::ReviewComment {
                user,
                repo,
                created_at,
                number: pr.number,
            }
            .render()?
        }
        EventKind::PullRequest => {
            let pr = require(event, payload.pull_request.as_ref(), "pull_request")?;
            let state = require(event, pr.state.as_deref(), "pull_request.state")?;
            let title = require(event, pr.title.as_deref(), "pull_request.title")?;
            if state == "open" {
                templates::PullRequestOpened {
                    user,
                    repo,
                    created_at,
                    number: pr.number,
                    title,
                    body: pr.body.as_deref().unwrap_or_default(),
                }
                .render()?
            } else {
                templates::PullRequestClosed {
                    user,
                    repo,
                    created_at,
                    number: pr.number,
                    title,
                }
                .render()?
            }
        }
        EventKind::IssueComment => {
            let issue = require(event, payload.issue.as_ref(), "issue")?;
            let comment = require(event, payload.comment.as_ref(), "comment")?;
            let body = require(event, comment.body.as_deref(), "comment.body")?;
            let group = if issue.is_pull_request() {
                "pull request"
            } else {
                "issue"
            };
            templates::IssueComment {
                user,
                repo,
                created_at,
                group,
                number: issue.number,
                body,
            }
            .render()?
        }
        EventKind::Issues => {
            let action = require(event, payload.action.as_deref(), "action")?;
            let issue = require(event, payload.issue.as_ref(), "issue")?;
            let title = require(event, issue.title.as_deref(), "issue.title")?;
            templates::Issue {
                user,
                repo,
                created_at,
                action,
                number: issue.number,
                title,
            }
            .render()?
        }
        EventKind::CommitComment => {
            let comment = require(event, payload.comment.as_ref(), "comment")?;
            templates::CommitComment {
                user,
                repo,
                created_at,
                body: require(event, comment.body.as_deref(), "comment.body")?,
            }
            .render()?
        }
        EventKind::Watch => templates::Watch {
            user,
            repo,
            created_at,
        }
        .render()?,
        EventKind::Fork => {
            if let Some(forkee) = &payload.forkee {
                tracing::debug!(
                    forkee = forkee.full_name.as_str(),
                    "{} forked {} into {}",
                    user,
                    repo,
                    forkee.html_url
                );
            }
            templates::Fork {
                user,
                repo,
                created_at,
            }
            .render()?
        }
        EventKind::Delete => templates::Delete {
            user,
            repo,
            created_at,
            reference: require(event, payload.reference.as_deref(), "ref")?,
        }
        .render()?,
        EventKind::Push => templates::Push {
            user,
            repo,
            created_at,
            size: *require(event, payload.size.as_ref(), "size")?,
            reference: require(event, payload.reference.as_deref(), "ref")?,
        }
        .render()?,
        EventKind::Create => {
            let ref_type = require(event, payload.ref_type.as_deref(), "ref_type")?;
            if ref_type == "repository" {
                templates::CreateRepository {
                    user,
                    repo,
                    created_at,
                }
                .render()?
            } else {
                templates::CreateRef {
                    user,
                    repo,
                    created_at,
                    ref_type,
                    reference: require(event, payload.reference.as_deref(), "ref")?,
                }
                .render()?
            }
        }
        EventKind::Public => templates::Public {
            user,
            repo,
            created_at,
        }
        .render()?,
        EventKind::Member => {
            let action = require(event, payload.action.as_deref(), "action")?;
            let member = require(event, payload.member.as_ref(), "member")?;
            templates::Member {
                user,
                repo,
                created_at,
                action,
                member: &member.login,
            }
            .render()?
        }
        EventKind::Other(_) => return Ok(None),
    };

    Ok(Some(text))
}

#[derive(Debug, Clone)]
pub struct Renderer<A> {
    avatars: A,
    size: AvatarSize,
}

impl<A> Renderer<A>
where
    A: AvatarSource,
{
    pub fn new(avatars: A, size: AvatarSize) -> Self {
        Self { avatars, size }
    }

    /// Describes the event and, for displayed kinds, downloads and encodes
    /// the actor's avatar. Avatars are fetched on every call.
    pub async fn render(&self, event: &FeedEvent) -> Result<Option<Rendered>, RenderError> {
        let text = match describe(event)? {
            Some(text) => text,
            None => return Ok(None),
        };
        let avatar = self.avatar(&event.actor).await;
        Ok(Some(Rendered { avatar, text }))
    }

    async fn avatar(&self, actor: &Actor) -> String {
        let url = match actor.avatar_url() {
            Some(url) => url,
            None => return String::new(),
        };
        match self.avatars.fetch_avatar(url).await {
            Ok(image) => avatar::encode(&image, &self.size),
            Err(err) => {
                tracing::warn!(
                    actor = actor.login.as_str(),
                    "Failed to fetch avatar, printing without it: {}",
                    err
                );
                String::new()
            }
        }
    }
}
