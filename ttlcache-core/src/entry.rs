use std::time::Instant;

/// A cached value together with its deadline
///
/// An entry without a deadline never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: String,
    expire_at: Option<Instant>,
}

impl Entry {
    /// Creates an entry that expires at `expire_at`
    pub fn new(value: impl Into<String>, expire_at: Instant) -> Self {
        Self {
            value: value.into(),
            expire_at: Some(expire_at),
        }
    }

    /// Creates an entry that never expires
    pub fn persistent(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expire_at: None,
        }
    }

    /// Returns the stored value as a string slice
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the deadline, or `None` for entries that never expire
    pub fn expire_at(&self) -> Option<Instant> {
        self.expire_at
    }

    /// Checks if this entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks if this entry is expired as of `now`
    ///
    /// Sweep passes evaluate every entry against the instant the pass started.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expire_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_entry_not_expired() {
        let entry = Entry::new("test_value", Instant::now() + Duration::from_secs(60));

        assert_eq!(entry.value(), "test_value");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expired() {
        let entry = Entry::new("test_value", Instant::now() - Duration::from_secs(1));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_deadline_itself_counts_as_expired() {
        let deadline = Instant::now();
        let entry = Entry::new("v", deadline);

        assert!(entry.is_expired_at(deadline));
        assert!(!entry.is_expired_at(deadline - Duration::from_millis(1)));
    }

    #[test]
    fn test_persistent_entry_never_expires() {
        let entry = Entry::persistent("forever");

        assert_eq!(entry.expire_at(), None);
        assert!(!entry.is_expired());
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(100 * 365 * 24 * 3600)));
    }
}
