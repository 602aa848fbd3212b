//! Terminal input merged with tick and render timers on a background task.
//!
//! [`EventReader::new`] reads crossterm's `EventStream`; [`EventReader::spawn`]
//! accepts any stream of terminal events so the merge can be driven from
//! tests.

use std::io;
use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    /// Housekeeping tick (toast expiry).
    Tick,
    Render,
}

/// Keep key presses and resizes. Releases, repeats, mouse, focus and
/// paste input have no binding in the app.
fn translate(event: &TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(*key)),
        TermEvent::Resize(..) => Some(Event::Resize),
        _ => None,
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Read the real terminal.
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        Self::spawn(EventStream::new(), tick_rate, render_rate)
    }

    /// Merge `input` with timers firing every `tick_rate` and
    /// `render_rate`. The reader stops when `input` ends, when the
    /// receiver is dropped or on [`EventReader::stop`].
    pub fn spawn<I>(mut input: I, tick_rate: Duration, render_rate: Duration) -> Self
    where
        I: Stream<Item = io::Result<TermEvent>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut tick = time::interval(tick_rate);
            let mut render = time::interval(render_rate);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            render.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = token.cancelled() => break,
                    _ = tick.tick() => Event::Tick,
                    _ = render.tick() => Event::Render,
                    next = input.next() => match next {
                        Some(Ok(raw)) => match translate(&raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(err)) => {
                            warn!(%err, "terminal input error");
                            continue;
                        }
                        None => {
                            debug!("terminal input closed");
                            break;
                        }
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
