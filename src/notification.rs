//! Diagnostics collected while walking a container tree.
//!
//! A member that cannot be decoded does not stop the unpack (unless the
//! unpacker runs in strict mode); it leaves a [`Notification`] behind and
//! the walk moves on to its next sibling. Messages start with the member's
//! path inside the tree so they can be matched against the output.
//!
//! After an unpack the caller can inspect
//! [`UnpackResult::notifications`](crate::unpack::UnpackResult).

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Texture data in a pixel format that has not been reverse-engineered.
    NotImplemented,
    /// Member written out, but with something odd about it.
    Warning,
    /// A member that failed to decode and was skipped.
    Error,
}

impl NotificationType {
    fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (Self::NotImplemented, 1) => "unsupported texture stream",
            (Self::NotImplemented, _) => "unsupported texture streams",
            (Self::Warning, 1) => "warning",
            (Self::Warning, _) => "warnings",
            (Self::Error, 1) => "skipped member",
            (Self::Error, _) => "skipped members",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Notifications of one unpack, in the order the members were visited.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.items.push(Notification::new(notification_type, message));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// All notifications of one severity.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// One-line count per severity, e.g. `2 skipped members, 1 warning`.
    ///
    /// Empty when there is nothing to report.
    pub fn summary(&self) -> String {
        [
            NotificationType::Error,
            NotificationType::NotImplemented,
            NotificationType::Warning,
        ]
        .into_iter()
        .filter_map(|nt| {
            let count = self.of_type(nt).len();
            (count > 0).then(|| format!("{count} {}", nt.noun(count)))
        })
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let n = Notification::new(NotificationType::Warning, "003.mpr: float frames");
        assert_eq!(n.notification_type, NotificationType::Warning);
        assert_eq!(n.message, "003.mpr: float frames");
    }

    #[test]
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.notify(NotificationType::Warning, "w1");
        c.notify(NotificationType::Error, "e1");
        c.notify(NotificationType::Warning, "w2");

        assert_eq!(c.len(), 3);
        assert_eq!(c.of_type(NotificationType::Warning).len(), 2);
        assert!(c.has_type(NotificationType::Error));
        assert!(!c.has_type(NotificationType::NotImplemented));
        let messages: Vec<_> = (&c).into_iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["w1", "e1", "w2"]);
    }

    #[test]
    fn test_summary() {
        let mut c = NotificationCollection::new();
        assert_eq!(c.summary(), "");

        c.notify(NotificationType::Warning, "w");
        assert_eq!(c.summary(), "1 warning");

        c.notify(NotificationType::Error, "e1");
        c.notify(NotificationType::Error, "e2");
        c.notify(NotificationType::NotImplemented, "tex");
        assert_eq!(
            c.summary(),
            "2 skipped members, 1 unsupported texture stream, 1 warning"
        );
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::NotImplemented, "00c.tex: pixel format 0x13");
        assert_eq!(format!("{}", n), "[NotImplemented] 00c.tex: pixel format 0x13");
    }
}
