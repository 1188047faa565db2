//! User-facing notifications.

use mockall::automock;
use tracing::{info, warn};

/// Visual category of a notice, mirroring the toast styles a storefront
/// would render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Sink for human-readable outcomes of cart mutations and order
/// submissions. How notices are rendered is the embedder's concern.
#[automock]
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Notifier that forwards notices to the active tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => info!("{message}"),
            NoticeKind::Error => warn!("{message}"),
        }
    }
}
