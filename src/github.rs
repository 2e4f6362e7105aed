use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PullRequestReviewComment,
    PullRequest,
    IssueComment,
    Issues,
    CommitComment,
    Watch,
    Fork,
    Delete,
    Push,
    Create,
    Public,
    Member,
    Other(String),
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "PullRequestReviewCommentEvent" => Self::PullRequestReviewComment,
            "PullRequestEvent" => Self::PullRequest,
            "IssueCommentEvent" => Self::IssueComment,
            "IssuesEvent" => Self::Issues,
            "CommitCommentEvent" => Self::CommitComment,
            "WatchEvent" => Self::Watch,
            "ForkEvent" => Self::Fork,
            "DeleteEvent" => Self::Delete,
            "PushEvent" => Self::Push,
            "CreateEvent" => Self::Create,
            "PublicEvent" => Self::Public,
            "MemberEvent" => Self::Member,
            _ => Self::Other(tag),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::PullRequestReviewComment => "PullRequestReviewCommentEvent",
            Self::PullRequest => "PullRequestEvent",
            Self::IssueComment => "IssueCommentEvent",
            Self::Issues => "IssuesEvent",
            Self::CommitComment => "CommitCommentEvent",
            Self::Watch => "WatchEvent",
            Self::Fork => "ForkEvent",
            Self::Delete => "DeleteEvent",
            Self::Push => "PushEvent",
            Self::Create => "CreateEvent",
            Self::Public => "PublicEvent",
            Self::Member => "MemberEvent",
            Self::Other(tag) => tag.as_str(),
        };
        f.write_str(tag)
    }
}

/// One entry of `/users/:user/received_events`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FeedEvent {
    pub id: String,
    #[serde(rename = "type", deserialize_with = "deserialize_kind")]
    pub kind: EventKind,
    pub actor: Actor,
    pub repo: Repo,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub public: bool,
    pub created_at: String,
}

fn deserialize_kind<'de, D>(de: D) -> Result<EventKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <String as serde::Deserialize>::deserialize(de).map(EventKind::from)
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Actor {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub display_login: Option<String>,
    #[serde(default)]
    pub gravatar_id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Actor {
    /// Avatar URL, if the API sent a non-empty one.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Union of everything the event types put into `payload`.
///
/// Which fields are present depends on the event kind, so all of them are
/// optional and absence is kept as `None`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Payload {
    pub action: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub ref_type: Option<String>,
    pub master_branch: Option<String>,
    pub description: Option<String>,
    pub pusher_type: Option<String>,
    pub size: Option<u64>,
    pub forkee: Option<Forkee>,
    pub pull_request: Option<PullRequest>,
    pub comment: Option<Comment>,
    pub issue: Option<Issue>,
    pub member: Option<Member>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub state: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequestLink>,
}

impl Issue {
    /// GitHub models pull requests as issues carrying a `pull_request` link.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PullRequestLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub diff_url: Option<String>,
    #[serde(default)]
    pub patch_url: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Comment {
    pub body: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Member {
    pub login: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Forkee {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub forks_url: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub display_login: Option<String>,
    #[serde(default)]
    pub gravatar_id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub site_admin: bool,
}
