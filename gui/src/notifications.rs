use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
    expires_at: Instant,
}

/// Transient messages shown above the feed.
#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
    lifetime: Duration,
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            lifetime,
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) -> u64 {
        self.push_at(level, message, Instant::now())
    }

    fn push_at(&mut self, level: Level, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            expires_at: now + self.lifetime,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|item| item.id != id);
    }

    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|item| item.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        let start = Instant::now();
        notifications.push_at(Level::Info, "first", start);
        notifications.push_at(Level::Error, "second", start + Duration::from_secs(2));

        notifications.expire(start + Duration::from_secs(3));
        assert_eq!(notifications.iter().count(), 2);

        notifications.expire(start + Duration::from_secs(5));
        let remaining: Vec<_> = notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(remaining, vec!["second"]);

        notifications.expire(start + Duration::from_secs(7));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        let first = notifications.push(Level::Success, "saved");
        notifications.push(Level::Info, "loading");

        notifications.dismiss(first);
        assert_eq!(notifications.iter().count(), 1);
        assert_eq!(notifications.iter().next().unwrap().level, Level::Info);
    }
}
