//! Cooperative event loop: one message at a time through the reducer,
//! effects spawned onto the tokio runtime, and results fed back over a
//! flume channel alongside terminal input.

use std::io;
use std::sync::Arc;

use crossterm::event::{self as ct_event, Event};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::app::App;
use crate::effect::Effect;
use crate::executor::Collaborators;
use crate::message::Message;
use crate::{reducer, ui};

pub struct Scheduler {
    handle: Handle,
    collaborators: Arc<Collaborators>,
    tx: flume::Sender<Message>,
}

impl Scheduler {
    pub fn new(handle: Handle, collaborators: Arc<Collaborators>, tx: flume::Sender<Message>) -> Self {
        Self {
            handle,
            collaborators,
            tx,
        }
    }

    /// Spawn every effect without waiting. There is no cancellation and no
    /// timeout here; a stuck call only delays its own message.
    pub fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let collaborators = Arc::clone(&self.collaborators);
            let tx = self.tx.clone();
            self.handle.spawn(async move {
                let msg = collaborators.execute(effect).await;
                // Receiver gone means the loop has exited.
                let _ = tx.send_async(msg).await;
            });
        }
    }
}

/// Forward terminal input into the message channel from a dedicated thread.
pub fn spawn_input(tx: flume::Sender<Message>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || loop {
        let msg = match ct_event::read() {
            Ok(Event::Key(key)) => Message::Key(key),
            Ok(Event::Resize(width, height)) => Message::Resize { width, height },
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "terminal input failed");
                break;
            }
        };
        if tx.send(msg).is_err() {
            break;
        }
    })
}

/// Draw, wait for the next message, reduce, dispatch. Messages already
/// queued are reduced before the next draw.
pub fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    scheduler: &Scheduler,
    rx: &flume::Receiver<Message>,
) -> io::Result<()> {
    let size = terminal.size()?;
    reducer::update(
        app,
        Message::Resize {
            width: size.width,
            height: size.height,
        },
    );
    scheduler.dispatch(reducer::init());
    info!("event loop started");

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Ok(first) = rx.recv() else {
            debug!("message channel closed");
            break;
        };
        let mut next = Some(first);
        while let Some(msg) = next {
            let effects = reducer::update(app, msg);
            scheduler.dispatch(effects);
            if app.should_quit {
                break;
            }
            next = rx.try_recv().ok();
        }
    }

    info!("event loop finished");
    Ok(())
}
