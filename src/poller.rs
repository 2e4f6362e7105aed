use std::{io::Write, time::Instant};

use color_eyre::eyre::{self, WrapErr as _};
use tracing::Instrument as _;

use crate::{
    filter::TextFilter,
    github::{EventKind, FeedEvent},
    http::{AvatarSource, FeedSource},
    render::Renderer,
};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub printed: usize,
    pub filtered: usize,
    pub skipped: usize,
    pub failed_pages: usize,
}

impl Summary {
    /// True when none of the `pages` requested pages could be fetched.
    pub fn all_failed(&self, pages: u32) -> bool {
        pages > 0 && self.failed_pages == pages as usize
    }
}

#[derive(Debug)]
pub struct Poller<F, A> {
    source: F,
    renderer: Renderer<A>,
    filter: TextFilter,
}

impl<F, A> Poller<F, A>
where
    F: FeedSource,
    A: AvatarSource,
{
    pub fn new(source: F, renderer: Renderer<A>, filter: TextFilter) -> Self {
        Self {
            source,
            renderer,
            filter,
        }
    }

    /// Prints pages `1..=pages` of `user`'s received events to `out`.
    ///
    /// Failed pages and bad events are logged and skipped; only a failed
    /// write to `out` aborts the run.
    pub async fn run<W: Write>(&self, user: &str, pages: u32, out: &mut W) -> eyre::Result<Summary> {
        let mut summary = Summary::default();

        for page in 1..=pages {
            let span = tracing::info_span!("page", user, page);
            let more = self
                .process_page(user, page, out, &mut summary)
                .instrument(span)
                .await?;
            if !more {
                break;
            }
        }

        Ok(summary)
    }

    /// Returns `false` once the feed has no more events.
    async fn process_page<W: Write>(
        &self,
        user: &str,
        page: u32,
        out: &mut W,
        summary: &mut Summary,
    ) -> eyre::Result<bool> {
        let started = Instant::now();
        let items = self.source.fetch_page(user, page).await;
        tracing::info!(
            "request GitHub API /users/:user/received_events cost ({:?})",
            started.elapsed()
        );

        let items = match items {
            Ok(items) => items,
            Err(err) => {
                tracing::error!("Failed to fetch page {}: {}", page, err);
                summary.failed_pages += 1;
                return Ok(true);
            }
        };
        if items.is_empty() {
            tracing::debug!("Page {} is empty, stopping", page);
            return Ok(false);
        }

        for item in items {
            // Unsupported kinds are dropped on the tag alone, whatever else the item holds.
            if let Some(tag) = item.get("type").and_then(serde_json::Value::as_str) {
                if let EventKind::Other(tag) = EventKind::from(tag.to_string()) {
                    tracing::debug!("Skipping unsupported {}", tag);
                    summary.skipped += 1;
                    continue;
                }
            }

            let event: FeedEvent = match serde_json::from_value(item) {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("Skipping malformed event: {}", err);
                    summary.skipped += 1;
                    continue;
                }
            };

            let rendered = match self.renderer.render(&event).await {
                Ok(Some(rendered)) => rendered,
                Ok(None) => {
                    summary.skipped += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(event.id = event.id.as_str(), "Skipping event: {}", err);
                    summary.skipped += 1;
                    continue;
                }
            };

            if !self.filter.allows(&rendered.text) {
                summary.filtered += 1;
                continue;
            }

            out.write_all(rendered.avatar.as_bytes())
                .and_then(|()| out.write_all(rendered.text.as_bytes()))
                .and_then(|()| out.flush())
                .wrap_err("Failed to write event to output")?;
            summary.printed += 1;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, io};

    use futures::future::{self, FutureExt as _, LocalBoxFuture};

    use super::*;
    use crate::{
        avatar::AvatarSize,
        http::FetchError,
        render::tests::FakeAvatars,
    };

    /// Serves canned pages; pages that aren't listed fail.
    #[derive(Debug, Default)]
    struct FakeFeed {
        pages: HashMap<u32, Vec<serde_json::Value>>,
        requested: RefCell<Vec<(String, u32)>>,
    }

    impl FakeFeed {
        fn page(mut self, page: u32, items: Vec<serde_json::Value>) -> Self {
            self.pages.insert(page, items);
            self
        }
    }

    impl FeedSource for FakeFeed {
        fn fetch_page<'a>(
            &'a self,
            user: &'a str,
            page: u32,
        ) -> LocalBoxFuture<'a, Result<Vec<serde_json::Value>, FetchError>> {
            self.requested.borrow_mut().push((user.to_string(), page));
            let res = self.pages.get(&page).cloned().ok_or_else(|| FetchError::Status {
                url: format!("fake://{}/{}", user, page),
                status: 502,
                message: "Bad Gateway".into(),
            });
            future::ready(res).boxed_local()
        }
    }

    fn item(kind: &str, login: &str, repo: &str, payload: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "1",
            "type": kind,
            "actor": {
                "id": 1,
                "login": login,
                "avatar_url": format!("https://avatars.example/{}", login)
            },
            "repo": {"id": 2, "name": repo},
            "payload": payload,
            "public": true,
            "created_at": "T"
        })
    }

    fn poller(feed: FakeFeed, include: Option<&str>, exclude: Option<&str>) -> Poller<FakeFeed, FakeAvatars> {
        let avatars = FakeAvatars::with("https://avatars.example/alice", &[0xFF]);
        Poller::new(
            feed,
            Renderer::new(avatars, AvatarSize::default()),
            TextFilter::new(include, exclude).unwrap(),
        )
    }

    async fn run(poller: &Poller<FakeFeed, FakeAvatars>, pages: u32) -> (String, Summary) {
        let mut out = Vec::new();
        let summary = poller.run("alice", pages, &mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[actix_rt::test]
    async fn prints_watch_event_with_avatar() {
        let feed = FakeFeed::default().page(
            1,
            vec![item("WatchEvent", "alice", "alice/demo", serde_json::json!({"action": "started"}))],
        );
        let (out, summary) = run(&poller(feed, None, None), 1).await;

        assert_eq!(
            out,
            "\x1b]1337;File=inline=1;width=32px;height=32px:/w==\x07alice starred alice/demo at T\n\n"
        );
        assert_eq!(
            summary,
            Summary {
                printed: 1,
                ..Summary::default()
            }
        );
    }

    #[actix_rt::test]
    async fn keeps_input_order_across_pages() {
        let feed = FakeFeed::default()
            .page(
                1,
                vec![
                    item("ForkEvent", "alice", "a/one", serde_json::json!({})),
                    item("PublicEvent", "alice", "a/two", serde_json::json!({})),
                ],
            )
            .page(2, vec![item("WatchEvent", "alice", "a/three", serde_json::json!({}))]);
        let p = poller(feed, None, None);
        let (out, summary) = run(&p, 2).await;

        let one = out.find("a/one").unwrap();
        let two = out.find("a/two").unwrap();
        let three = out.find("a/three").unwrap();
        assert!(one < two && two < three);
        assert_eq!(summary.printed, 3);
        assert_eq!(
            *p.source.requested.borrow(),
            vec![("alice".to_string(), 1), ("alice".to_string(), 2)]
        );
    }

    #[actix_rt::test]
    async fn skips_bad_and_unknown_events() {
        let feed = FakeFeed::default().page(
            1,
            vec![
                serde_json::json!({"type": "WatchEvent", "id": "broken"}),
                item("GollumEvent", "alice", "a/wiki", serde_json::json!({})),
                item("PushEvent", "alice", "a/push", serde_json::json!({"ref": "main"})),
                item("WatchEvent", "alice", "a/ok", serde_json::json!({})),
            ],
        );
        let (out, summary) = run(&poller(feed, None, None), 1).await;

        assert!(out.ends_with("alice starred a/ok at T\n\n"));
        assert!(!out.contains("a/wiki"));
        assert!(!out.contains("a/push"));
        assert_eq!(summary.printed, 1);
        assert_eq!(summary.skipped, 3);
    }

    #[actix_rt::test]
    async fn failed_page_is_skipped() {
        let feed = FakeFeed::default()
            .page(2, vec![item("WatchEvent", "alice", "a/two", serde_json::json!({}))]);
        let p = poller(feed, None, None);
        let (out, summary) = run(&p, 2).await;

        assert!(out.contains("a/two"));
        assert_eq!(summary.failed_pages, 1);
        assert_eq!(summary.printed, 1);
    }

    #[actix_rt::test]
    async fn empty_page_stops_the_run() {
        let feed = FakeFeed::default()
            .page(1, vec![item("WatchEvent", "alice", "a/one", serde_json::json!({}))])
            .page(2, vec![])
            .page(3, vec![item("WatchEvent", "alice", "a/three", serde_json::json!({}))]);
        let p = poller(feed, None, None);
        let (out, _) = run(&p, 5).await;

        assert!(!out.contains("a/three"));
        assert_eq!(p.source.requested.borrow().len(), 2);
    }

    #[actix_rt::test]
    async fn applies_filter_with_exclude_precedence() {
        let items = vec![
            item("WatchEvent", "alice", "a/foo", serde_json::json!({})),
            item("WatchEvent", "alice", "a/foobar", serde_json::json!({})),
            item("WatchEvent", "alice", "a/qux", serde_json::json!({})),
        ];
        let feed = FakeFeed::default().page(1, items);
        let (out, summary) = run(&poller(feed, Some("foo"), Some("bar")), 1).await;

        assert!(out.contains("starred a/foo at"));
        assert!(!out.contains("a/foobar"));
        assert!(!out.contains("a/qux"));
        assert_eq!(summary.printed, 1);
        assert_eq!(summary.filtered, 2);
    }

    #[actix_rt::test]
    async fn unknown_avatar_prints_text_only() {
        let feed = FakeFeed::default()
            .page(1, vec![item("WatchEvent", "bob", "bob/demo", serde_json::json!({}))]);
        let (out, _) = run(&poller(feed, None, None), 1).await;

        assert_eq!(out, "bob starred bob/demo at T\n\n");
    }

    #[actix_rt::test]
    async fn unknown_kind_skipped_even_when_malformed() {
        let feed = FakeFeed::default().page(
            1,
            vec![
                serde_json::json!({"id": "7", "type": "GollumEvent", "actor": {"login": "alice"}}),
                item("WatchEvent", "alice", "a/ok", serde_json::json!({})),
            ],
        );
        let (out, summary) = run(&poller(feed, None, None), 1).await;

        assert_eq!(
            out,
            "\x1b]1337;File=inline=1;width=32px;height=32px:/w==\x07alice starred a/ok at T\n\n"
        );
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn all_failed_needs_every_page_to_fail() {
        let summary = Summary {
            failed_pages: 3,
            ..Summary::default()
        };
        assert!(summary.all_failed(3));
        assert!(!summary.all_failed(4));
        assert!(!Summary::default().all_failed(0));
        assert!(!Summary::default().all_failed(2));
    }

    #[actix_rt::test]
    async fn every_page_failing_is_reported() {
        let (_, summary) = run(&poller(FakeFeed::default(), None, None), 2).await;

        assert_eq!(summary.failed_pages, 2);
        assert!(summary.all_failed(2));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[actix_rt::test]
    async fn write_failure_aborts() {
        let feed = FakeFeed::default()
            .page(1, vec![item("WatchEvent", "alice", "a/one", serde_json::json!({}))]);
        let res = poller(feed, None, None).run("alice", 1, &mut BrokenPipe).await;

        assert!(res.is_err());
    }
}
