//! Background key listener.
//!
//! A reader thread samples terminal key presses and pushes `(tick, key)` pairs
//! into a channel, stamping each with the tick after the one currently
//! running. The loop calls [`InputSource::begin_tick`] once per tick and keeps
//! the latest key stamped for that tick; older samples are dropped. Nothing
//! blocks the loop: a key that is never read is simply overwritten.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::map::{map_key_event, should_quit};
use crate::types::Key;
use tui_retro_core::InputSource;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Producer half: stamps keys against the next tick.
#[derive(Clone)]
pub struct KeySender {
    tx: mpsc::UnboundedSender<(u64, Key)>,
    tick: Arc<AtomicU64>,
}

impl KeySender {
    /// Record `key` for the next tick. Returns false once the listener is gone.
    pub fn send(&self, key: Key) -> bool {
        let stamp = self.tick.load(Ordering::Acquire) + 1;
        self.tx.send((stamp, key)).is_ok()
    }
}

type QuitHook = Arc<dyn Fn() + Send + Sync>;

/// Consumer half, read by the loop through [`InputSource`].
pub struct KeyListener {
    rx: mpsc::UnboundedReceiver<(u64, Key)>,
    sender: KeySender,
    current: Option<Key>,
    pending: Option<(u64, Key)>,
    read_terminal: bool,
    on_quit: Option<QuitHook>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl KeyListener {
    /// Listener fed by a crossterm reader thread, started by `listen`.
    pub fn terminal() -> Self {
        let mut listener = Self::manual();
        listener.read_terminal = true;
        listener
    }

    /// Listener fed only through [`sender`](Self::sender).
    pub fn manual() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            sender: KeySender {
                tx,
                tick: Arc::new(AtomicU64::new(0)),
            },
            current: None,
            pending: None,
            read_terminal: false,
            on_quit: None,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Run `hook` on the reader thread when Ctrl+C is pressed.
    pub fn on_quit(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_quit = Some(Arc::new(hook));
        self
    }

    pub fn sender(&self) -> KeySender {
        self.sender.clone()
    }

    fn spawn_reader(&mut self) {
        let sender = self.sender.clone();
        let stop = Arc::clone(&self.stop);
        let on_quit = self.on_quit.clone();

        let spawned = thread::Builder::new()
            .name("retro-key-listener".to_string())
            .spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    match event::poll(POLL_INTERVAL) {
                        Ok(false) => continue,
                        Ok(true) => {}
                        Err(err) => {
                            warn!(?err, "key listener poll failed");
                            break;
                        }
                    }
                    let key = match event::read() {
                        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => key,
                        Ok(_) => continue,
                        Err(err) => {
                            warn!(?err, "key listener read failed");
                            break;
                        }
                    };
                    if should_quit(key) {
                        if let Some(hook) = &on_quit {
                            hook();
                        }
                        continue;
                    }
                    if let Some(key) = map_key_event(key) {
                        if !sender.send(key) {
                            break;
                        }
                    }
                }
                debug!("key listener stopped");
            });

        match spawned {
            Ok(handle) => self.worker = Some(handle),
            Err(err) => warn!(?err, "failed to start key listener"),
        }
    }
}

impl InputSource for KeyListener {
    fn listen(&mut self) {
        if self.read_terminal && self.worker.is_none() {
            self.spawn_reader();
        }
    }

    fn begin_tick(&mut self, tick: u64) {
        self.sender.tick.store(tick, Ordering::Release);
        self.current = None;

        if let Some((stamp, key)) = self.pending.take() {
            latch(tick, stamp, key, &mut self.current, &mut self.pending);
        }
        while let Ok((stamp, key)) = self.rx.try_recv() {
            latch(tick, stamp, key, &mut self.current, &mut self.pending);
        }
    }

    fn poll_key(&self) -> Option<Key> {
        self.current
    }
}

/// Keep a sample for `tick`, hold one for a later tick, drop anything older.
fn latch(
    tick: u64,
    stamp: u64,
    key: Key,
    current: &mut Option<Key>,
    pending: &mut Option<(u64, Key)>,
) {
    if stamp == tick {
        *current = Some(key);
    } else if stamp > tick {
        *pending = Some((stamp, key));
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Axis;

    #[test]
    fn key_pressed_during_a_tick_is_read_on_the_next() {
        let mut input = KeyListener::manual();
        let tx = input.sender();

        input.begin_tick(0);
        tx.send(Key::Left);
        assert_eq!(input.poll_key(), None);

        input.begin_tick(1);
        assert_eq!(input.poll_key(), Some(Key::Left));
        assert!(input.is_key_down(Key::Left));
        assert_eq!(input.axis(Axis::Horizontal), -1.0);

        input.begin_tick(2);
        assert_eq!(input.poll_key(), None);
    }

    #[test]
    fn latest_key_for_a_tick_wins() {
        let mut input = KeyListener::manual();
        let tx = input.sender();
        input.begin_tick(4);
        tx.send(Key::Up);
        tx.send(Key::Char('x'));
        input.begin_tick(5);
        assert_eq!(input.poll_key(), Some(Key::Char('x')));
    }

    #[test]
    fn stale_samples_are_discarded() {
        let mut input = KeyListener::manual();
        let tx = input.sender();
        input.begin_tick(0);
        tx.send(Key::Space);
        // The loop fell behind and skipped tick 1 entirely.
        input.begin_tick(2);
        assert_eq!(input.poll_key(), None);
    }

    #[test]
    fn manual_listener_never_spawns_a_reader() {
        let mut input = KeyListener::manual();
        input.listen();
        assert!(input.worker.is_none());
    }
}
