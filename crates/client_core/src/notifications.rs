use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak,
    },
    time::Duration,
};

use tokio::{runtime::Handle, sync::broadcast, time::Instant};
use tracing::{debug, warn};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
const CHANGE_CHANNEL_CAPACITY: usize = 64;

static GLOBAL: OnceLock<NotificationDispatcher> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationChange {
    Shown(Notification),
    Dismissed(NotificationId),
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    next_id: AtomicU64,
    default_duration: Duration,
    active: Mutex<Vec<Notification>>,
    changes: broadcast::Sender<NotificationChange>,
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_DURATION)
    }

    pub fn with_default_duration(default_duration: Duration) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(DispatcherInner {
                next_id: AtomicU64::new(1),
                default_duration,
                active: Mutex::new(Vec::new()),
                changes,
            }),
        }
    }

    pub fn global() -> &'static NotificationDispatcher {
        GLOBAL.get_or_init(NotificationDispatcher::new)
    }

    /// Installs `dispatcher` as the process-wide instance. Returns false when
    /// one was already installed or handed out.
    pub fn install_global(dispatcher: NotificationDispatcher) -> bool {
        GLOBAL.set(dispatcher).is_ok()
    }

    pub fn default_duration(&self) -> Duration {
        self.inner.default_duration
    }

    pub fn show(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
    ) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            duration: duration.unwrap_or(self.inner.default_duration),
        };
        debug!(%id, ?severity, message = %notification.message, "showing notification");

        lock_active(&self.inner).push(notification.clone());
        let _ = self
            .inner
            .changes
            .send(NotificationChange::Shown(notification.clone()));

        self.schedule_expiry(id, notification.duration);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Success, None)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Error, None)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Info, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Warning, None)
    }

    pub fn dismiss(&self, id: NotificationId) -> bool {
        dismiss_from(&self.inner, id)
    }

    pub fn active(&self) -> Vec<Notification> {
        lock_active(&self.inner).clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationChange> {
        self.inner.changes.subscribe()
    }

    fn schedule_expiry(&self, id: NotificationId, duration: Duration) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(%id, "no async runtime available; notification stays until dismissed");
            return;
        };

        let Some(deadline) = Instant::now().checked_add(duration) else {
            debug!(%id, ?duration, "notification never expires on its own");
            return;
        };
        let inner: Weak<DispatcherInner> = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = inner.upgrade() {
                dismiss_from(&inner, id);
            }
        });
    }
}

fn lock_active(inner: &DispatcherInner) -> MutexGuard<'_, Vec<Notification>> {
    inner.active.lock().unwrap_or_else(PoisonError::into_inner)
}

fn dismiss_from(inner: &DispatcherInner, id: NotificationId) -> bool {
    let removed = {
        let mut active = lock_active(inner);
        let before = active.len();
        active.retain(|notification| notification.id != id);
        active.len() != before
    };

    if removed {
        debug!(%id, "dismissed notification");
        let _ = inner.changes.send(NotificationChange::Dismissed(id));
    }
    removed
}
