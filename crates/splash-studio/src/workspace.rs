//! The area hosting the canvas, with resize notifications.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use splash_engine::coords::Viewport;

type Listener = Rc<dyn Fn(Viewport)>;

struct Inner {
    size: Cell<Viewport>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_id: Cell<u64>,
}

/// Host-owned workspace. Cloning yields another handle to the same workspace.
#[derive(Clone)]
pub struct Workspace {
    inner: Rc<Inner>,
}

impl Workspace {
    pub fn new(size: Viewport) -> Self {
        Self {
            inner: Rc::new(Inner {
                size: Cell::new(size),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.inner.size.get()
    }

    /// Registers `listener` for resize events until the returned guard drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(Viewport) + 'static) -> ResizeSubscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        ResizeSubscription { id, workspace: Rc::downgrade(&self.inner) }
    }

    /// Stores the new size and notifies every listener.
    pub fn resize(&self, size: Viewport) {
        self.inner.size.set(size);
        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<Listener> =
            self.inner.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        log::trace!("workspace resized to {}x{} ({} listener(s))", size.width, size.height, listeners.len());
        for listener in listeners {
            listener(size);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

/// Keeps a resize listener registered; dropping it unsubscribes.
pub struct ResizeSubscription {
    id: u64,
    workspace: Weak<Inner>,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.workspace.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_see_resizes_until_dropped() {
        let ws = Workspace::new(Viewport::new(800.0, 600.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = ws.subscribe(move |s| sink.borrow_mut().push(s.width));

        ws.resize(Viewport::new(640.0, 480.0));
        assert_eq!(ws.listener_count(), 1);
        drop(sub);
        ws.resize(Viewport::new(320.0, 240.0));

        assert_eq!(*seen.borrow(), vec![640.0]);
        assert_eq!(ws.listener_count(), 0);
        assert_eq!(ws.size(), Viewport::new(320.0, 240.0));
    }

    #[test]
    fn subscription_may_outlive_workspace() {
        let ws = Workspace::new(Viewport::new(1.0, 1.0));
        let sub = ws.subscribe(|_| {});
        drop(ws);
        drop(sub);
    }
}
