//! Document-level pointer dispatch with scoped subscriptions.
//!
//! A [`PointerSubscription`] unregisters its listener when dropped, so a
//! component that owns its subscription can never leave a dangling listener.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Screen cell rectangle used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && (column as u32) < self.x as u32 + self.width as u32
            && (row as u32) < self.y as u32 + self.height as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    pub column: u16,
    pub row: u16,
}

type Listener = Arc<dyn Fn(PointerPress) + Send + Sync>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: HashMap<u64, Listener>,
}

/// Shared click target every pointer press is dispatched through.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Arc<Mutex<HubInner>>,
}

impl std::fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> PointerSubscription
    where
        F: Fn(PointerPress) + Send + Sync + 'static,
    {
        let id = match self.inner.lock() {
            Ok(mut inner) => {
                let id = inner.next_id;
                inner.next_id += 1;
                inner.listeners.insert(id, Arc::new(listener));
                id
            }
            Err(_) => u64::MAX,
        };

        PointerSubscription {
            hub: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver a press to every registered listener.
    pub fn dispatch(&self, press: PointerPress) {
        // Listeners run outside the lock so they may subscribe or drop guards
        let listeners: Vec<Listener> = match self.inner.lock() {
            Ok(inner) => inner.listeners.values().cloned().collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(press);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.listeners.len())
            .unwrap_or(0)
    }
}

/// Registration guard returned by [`PointerHub::subscribe`].
#[derive(Debug)]
pub struct PointerSubscription {
    hub: Weak<Mutex<HubInner>>,
    id: u64,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            if let Ok(mut inner) = inner.lock() {
                inner.listeners.remove(&self.id);
            }
        }
    }
}
