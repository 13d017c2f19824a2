use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

use crate::domain::notification::{Notification, NotificationId, Severity};

/// Where notifications are rendered (alert strip, toast stack, ...).
pub trait NotificationSurface {
    fn show(&self, notification: &Notification);
    fn dismiss(&self, id: NotificationId);
}

/// Deferred callbacks on the page's event loop.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Shows a message and schedules exactly one dismissal for it.
pub struct Notifier {
    surface: Rc<dyn NotificationSurface>,
    scheduler: Rc<dyn Scheduler>,
    timeout: Duration,
    next_id: Cell<u64>,
}

impl Notifier {
    pub fn new(surface: Rc<dyn NotificationSurface>, scheduler: Rc<dyn Scheduler>, timeout: Duration) -> Self {
        Self {
            surface,
            scheduler,
            timeout,
            next_id: Cell::new(1),
        }
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = NotificationId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let notification = Notification {
            id,
            message: message.into(),
            severity,
        };
        debug!(id = id.0, severity = ?severity, message = %notification.message, "Showing notification");
        self.surface.show(&notification);

        let surface = Rc::clone(&self.surface);
        self.scheduler
            .schedule(self.timeout, Box::new(move || surface.dismiss(id)));

        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Error)
    }

    /// The scheduler notifications are dismissed through; controllers reuse
    /// it for their own deferred work.
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        Rc::clone(&self.scheduler)
    }
}
