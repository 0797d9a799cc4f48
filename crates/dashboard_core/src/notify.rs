use tokio::sync::broadcast;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// User-visible notification. Pure data; how it is rendered is up to the
/// shell hosting the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title, message)
    }

    fn new(kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Side-effecting notification sink. Implementations hold no dashboard
/// state and must not panic; dropped notifications are acceptable,
/// blocked ones are not.
pub trait NotificationDispatcher: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Routes toasts into the log stream at the level matching their kind.
pub struct TracingNotifier;

impl NotificationDispatcher for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Error => error!(title = %toast.title, "{}", toast.message),
            ToastKind::Success | ToastKind::Info => {
                info!(title = %toast.title, "{}", toast.message)
            }
        }
    }
}

/// Fans toasts out to subscribed shells over a broadcast channel. Send
/// errors mean no subscriber is listening and are ignored.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Toast>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }
}

impl NotificationDispatcher for BroadcastNotifier {
    fn notify(&self, toast: Toast) {
        let _ = self.tx.send(toast);
    }
}
