use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
}

/// Forwards terminal input over a channel. Cadence is not produced here:
/// the run loop races `next()` against its own refresh deadline, so an
/// input-wait timeout is simply "no state change this tick".
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(maybe_event) = reader.next().await {
                let mapped = match maybe_event {
                    Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                    Ok(CrosstermEvent::Resize(_, _)) => Some(Event::Resize),
                    Ok(_) => None,
                    Err(_) => break,
                };
                if let Some(event) = mapped
                    && tx.send(event).is_err()
                {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
