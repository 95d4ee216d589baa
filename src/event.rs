use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::system::snapshot::UtilizationSnapshot;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Refresh(UtilizationSnapshot),
}

/// Single queue the render loop blocks on. Terminal input is pumped in by an
/// internal task; other producers (the refresher) get a clone of the sender.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let input_tx = tx.clone();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(maybe_event) = reader.next().await {
                let evt = match maybe_event {
                    Ok(evt) => evt,
                    Err(err) => {
                        tracing::warn!(%err, "terminal input stream failed");
                        break;
                    }
                };
                let mapped = match evt {
                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                    _ => None,
                };
                if let Some(e) = mapped
                    && input_tx.send(e).is_err()
                {
                    break;
                }
            }
        });

        Self {
            tx,
            rx,
            _task: task,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
