use askama::Template;

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} reviewed pull request {{ number }} on {{ repo }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct ReviewComment<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub number: u64,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} opened pull request {{ number }} on {{ repo }}\n{{ title }}\n{{ body }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct PullRequestOpened<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub number: u64,
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} closed pull request {{ number }} on {{ repo }}\n{{ title }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct PullRequestClosed<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub number: u64,
    pub title: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} commented on {{ group }} {{ number }} on {{ repo }}\n{{ body }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct IssueComment<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub group: &'a str,
    pub number: u64,
    pub body: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} {{ action }} issue {{ number }} on {{ repo }}\n{{ title }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct Issue<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub action: &'a str,
    pub number: u64,
    pub title: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} commented on {{ repo }}\n{{ body }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct CommitComment<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Template)]
#[template(source = "{{ user }} starred {{ repo }} at {{ created_at }}\n\n", ext = "txt")]
pub struct Watch<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
}

#[derive(Debug, Template)]
#[template(source = "{{ user }} forked {{ repo }} at {{ created_at }}\n\n", ext = "txt")]
pub struct Fork<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
}

// Repo and timestamp are printed back to back, with no separator.
#[derive(Debug, Template)]
#[template(
    source = "{{ user }} deleted branch {{ reference }} at {{ repo }}{{ created_at }}\n\n",
    ext = "txt"
)]
pub struct Delete<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub reference: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} pushed {{ size }} new commit(s) to {{ reference }} at {{ repo }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct Push<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub size: u64,
    pub reference: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} created repository {{ repo }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct CreateRepository<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} created {{ ref_type }} {{ reference }} at {{ repo }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct CreateRef<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub ref_type: &'a str,
    pub reference: &'a str,
}

#[derive(Debug, Template)]
#[template(source = "{{ user }} made {{ repo }} public at {{ created_at }}\n\n", ext = "txt")]
pub struct Public<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
}

#[derive(Debug, Template)]
#[template(
    source = "{{ user }} {{ action }} {{ member }} as a collaborator to {{ repo }} at {{ created_at }}\n\n",
    ext = "txt"
)]
pub struct Member<'a> {
    pub user: &'a str,
    pub repo: &'a str,
    pub created_at: &'a str,
    pub action: &'a str,
    pub member: &'a str,
}
