use crossterm::event::{self, Event as TermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// How long the input reader blocks before checking for shutdown
const INPUT_POLL_WINDOW: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Error(String),
}

/// Merges terminal input and a render tick into one event stream.
///
/// crossterm reads are blocking, so they run on the blocking pool while
/// a plain async task drives the tick. Both feed the same channel; the
/// input reader notices a dropped receiver within one poll window.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tick_task: JoinHandle<()>,
    _input_task: JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tick_task = tokio::spawn({
            let tx = tx.clone();
            async move {
                let mut ticker = tokio::time::interval(tick_rate);
                loop {
                    ticker.tick().await;
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                }
            }
        });

        let _input_task = tokio::task::spawn_blocking(move || {
            loop {
                match event::poll(INPUT_POLL_WINDOW) {
                    Ok(true) => match event::read() {
                        Ok(TermEvent::Key(key)) => {
                            if tx.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        // Resize, mouse and focus events are not used
                        Ok(_) => {}
                        Err(e) => {
                            error!("Failed to read terminal event: {}", e);
                            let _ = tx.send(Event::Error(format!("Terminal read error: {}", e)));
                        }
                    },
                    Ok(false) => {
                        if tx.is_closed() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to poll terminal events: {}", e);
                        if tx.send(Event::Error(format!("Terminal poll error: {}", e))).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("Input reader stopped");
        });

        Self {
            rx,
            tick_task,
            _input_task,
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.tick_task.abort();
    }
}
