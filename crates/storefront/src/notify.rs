//! Transient toast notifications.

use std::time::Duration;

use tokio::time::Instant;

/// Visual tone of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// A user-facing message that disappears after its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Emits toasts and forgets them once they expire.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    toasts: Vec<Toast>,
}

impl Notifier {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: Vec::new(),
        }
    }

    /// Emit a toast and return a copy for the host to display.
    ///
    /// Expired toasts are dropped first, so only live ones are retained.
    pub fn emit(&mut self, level: ToastLevel, message: impl Into<String>) -> Toast {
        let now = Instant::now();
        self.prune(now);
        let toast = Toast {
            message: message.into(),
            level,
            expires_at: now + self.ttl,
        };
        tracing::debug!(?level, message = %toast.message, "toast emitted");
        self.toasts.push(toast.clone());
        toast
    }

    /// Toasts that have not expired yet, oldest first.
    pub fn visible(&mut self) -> &[Toast] {
        self.prune(Instant::now());
        &self.toasts
    }

    fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(notifier: &mut Notifier) -> Vec<&str> {
        notifier
            .visible()
            .iter()
            .map(|toast| toast.message.as_str())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_after_ttl() {
        let mut notifier = Notifier::new(Duration::from_millis(3000));
        notifier.emit(ToastLevel::Success, "Added to cart");
        tokio::time::advance(Duration::from_millis(1000)).await;
        notifier.emit(ToastLevel::Info, "Second");
        assert_eq!(messages(&mut notifier), vec!["Added to cart", "Second"]);

        tokio::time::advance(Duration::from_millis(2500)).await;
        assert_eq!(messages(&mut notifier), vec!["Second"]);

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!(notifier.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_drops_expired_toasts() {
        let mut notifier = Notifier::new(Duration::from_secs(3));
        for i in 0..1000 {
            notifier.emit(ToastLevel::Info, format!("toast {i}"));
            tokio::time::advance(Duration::from_secs(10)).await;
        }
        assert_eq!(notifier.toasts.len(), 1);

        notifier.emit(ToastLevel::Info, "fresh");
        assert_eq!(notifier.toasts.len(), 1);
        assert_eq!(messages(&mut notifier), vec!["fresh"]);
    }
}
