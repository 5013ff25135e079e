// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runs a [`PageContext`] as a single tokio task.
//!
//! Requests, navigation and delayed flash stages all arrive on one channel, so they are
//! processed strictly one at a time in arrival order.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use super::PageContext;
use crate::highlight::{FlashPlan, FlashStage};
use crate::model::{Document, NodeId};
use crate::protocol::{PageRequest, PageResponse};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeerError {
    #[error("no document context is listening")]
    Unavailable,
}

enum PageEvent {
    Request { request: PageRequest, reply: oneshot::Sender<PageResponse> },
    Flash { generation: u64, marker: NodeId, stage: FlashStage },
    Navigate(Document),
    Snapshot(oneshot::Sender<Document>),
}

/// Cloneable sender side of a running page.
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: UnboundedSender<PageEvent>,
}

impl PageHandle {
    pub async fn send(&self, request: PageRequest) -> Result<PageResponse, PeerError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(PageEvent::Request { request, reply })
            .map_err(|_| PeerError::Unavailable)?;
        response.await.map_err(|_| PeerError::Unavailable)
    }

    pub fn navigate(&self, document: Document) -> Result<(), PeerError> {
        self.tx.send(PageEvent::Navigate(document)).map_err(|_| PeerError::Unavailable)
    }

    /// A copy of the page's current document.
    pub async fn snapshot(&self) -> Result<Document, PeerError> {
        let (reply, document) = oneshot::channel();
        self.tx.send(PageEvent::Snapshot(reply)).map_err(|_| PeerError::Unavailable)?;
        document.await.map_err(|_| PeerError::Unavailable)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawns the page task. The task ends (yielding the context back) once every handle is dropped.
pub fn spawn_page(context: PageContext) -> (PageHandle, JoinHandle<PageContext>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let timers = tx.downgrade();
    let task = tokio::spawn(run(context, rx, timers));
    (PageHandle { tx }, task)
}

async fn run(
    mut context: PageContext,
    mut events: UnboundedReceiver<PageEvent>,
    timers: WeakUnboundedSender<PageEvent>,
) -> PageContext {
    while let Some(event) = events.recv().await {
        match event {
            PageEvent::Request { request, reply } => {
                let handled = context.handle(request);
                if let Some(plan) = handled.flash {
                    schedule_flash(plan, context.generation(), &timers);
                }
                if reply.send(handled.response).is_err() {
                    debug!("requester went away before the response was sent");
                }
            }
            PageEvent::Flash { generation, marker, stage } => {
                if generation != context.generation() {
                    debug!(%marker, ?stage, generation, "flash stage for replaced document ignored");
                } else if !context.apply_flash(marker, stage) {
                    debug!(%marker, ?stage, "flash stage for inactive marker ignored");
                }
            }
            PageEvent::Navigate(document) => context.navigate(document),
            PageEvent::Snapshot(reply) => {
                let _ = reply.send(context.document().clone());
            }
        }
    }
    context
}

fn schedule_flash(plan: FlashPlan, generation: u64, timers: &WeakUnboundedSender<PageEvent>) {
    for step in plan.steps {
        let timers = timers.clone();
        tokio::spawn(async move {
            tokio::time::sleep(step.delay).await;
            if let Some(tx) = timers.upgrade() {
                let _ = tx.send(PageEvent::Flash {
                    generation,
                    marker: plan.marker,
                    stage: step.stage,
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{spawn_page, PeerError};
    use crate::format::parse_html;
    use crate::page::PageContext;
    use crate::protocol::{PageRequest, PageResponse};

    fn context() -> PageContext {
        PageContext::new(parse_html("<body><p>The cat sat on the mat.</p></body>", None))
    }

    fn marker_background(document: &crate::model::Document) -> Option<String> {
        let marker = document.element_by_id(crate::highlight::MARKER_ID)?;
        document.element(marker)?.style().get("background-color").map(str::to_owned)
    }

    #[tokio::test(start_paused = true)]
    async fn requests_are_answered_in_order() {
        let (page, _task) = spawn_page(context());

        let response = page
            .send(PageRequest::SearchWords { searchword: "at".to_owned() })
            .await
            .expect("search");
        let PageResponse::Results(results) = response else {
            panic!("expected results, got {response:?}");
        };
        assert_eq!(results.results.total_occurrences, 3);

        let response = page
            .send(PageRequest::HighlightWord { index: 2, searchword: "at".to_owned() })
            .await
            .expect("highlight");
        assert_eq!(response, PageResponse::success(true));
    }

    #[tokio::test(start_paused = true)]
    async fn flash_runs_two_stages_after_highlight() {
        let (page, _task) = spawn_page(context());
        page.send(PageRequest::HighlightWord { index: 0, searchword: "cat".to_owned() })
            .await
            .expect("highlight");

        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffff00"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffeb3b"));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffff00"));
    }

    #[tokio::test(start_paused = true)]
    async fn flash_from_before_navigation_is_ignored() {
        let html = "<body><p>The cat sat on the mat.</p></body>";
        let (page, _task) = spawn_page(context());
        page.send(PageRequest::HighlightWord { index: 0, searchword: "cat".to_owned() })
            .await
            .expect("highlight");

        tokio::time::sleep(Duration::from_millis(50)).await;
        page.navigate(parse_html(html, None)).expect("navigate");
        page.send(PageRequest::HighlightWord { index: 0, searchword: "cat".to_owned() })
            .await
            .expect("highlight after navigation");

        // t=120: the first emphasis (t=100) belonged to the old document.
        tokio::time::sleep(Duration::from_millis(70)).await;
        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffff00"));

        // t=200: the new emphasis (t=150) applies.
        tokio::time::sleep(Duration::from_millis(80)).await;
        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffeb3b"));

        // t=320: the old steady stage (t=300) does not cut the new emphasis short.
        tokio::time::sleep(Duration::from_millis(120)).await;
        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffeb3b"));

        tokio::time::sleep(Duration::from_millis(80)).await;
        let document = page.snapshot().await.expect("snapshot");
        assert_eq!(marker_background(&document).as_deref(), Some("#ffff00"));
    }

    #[tokio::test]
    async fn dropping_every_handle_stops_the_task() {
        let (page, task) = spawn_page(context());
        page.send(PageRequest::ToggleShortcut { enabled: true }).await.expect("toggle");
        drop(page);

        let context = task.await.expect("join");
        assert!(context.shortcut_enabled());
    }

    #[tokio::test]
    async fn aborted_page_is_unavailable() {
        let (page, task) = spawn_page(context());
        task.abort();
        let _ = task.await;

        assert!(page.is_closed());
        assert_eq!(page.send(PageRequest::Scrape).await, Err(PeerError::Unavailable));
    }

    #[tokio::test]
    async fn navigation_resets_the_session() {
        let (page, _task) = spawn_page(context());
        page.send(PageRequest::SearchWords { searchword: "cat".to_owned() })
            .await
            .expect("search");
        page.navigate(parse_html("<body><p>dog</p></body>", None)).expect("navigate");

        let response = page
            .send(PageRequest::HighlightWord { index: 0, searchword: "cat".to_owned() })
            .await
            .expect("highlight");
        assert_eq!(response, PageResponse::success(false));
    }
}
