//! # Notification topics.
//!
//! A [`Topic`] names a category of server-pushed notification
//! (`channel.follow`, `channel.cheer`, …). Topics are cheap to clone
//! (`Arc<str>` backed) and hash/compare by content, so they work directly as
//! routing and dedupe keys.

use std::fmt;
use std::sync::Arc;

/// Named category of server-pushed notification.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(Arc<str>);

impl Topic {
    /// Creates a topic from any string-ish value.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the topic name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", self.0)
    }
}

/// Well-known topic names used by the built-in features.
pub mod topics {
    /// A user followed the channel.
    pub const CHANNEL_FOLLOW: &str = "channel.follow";
    /// A user cheered bits.
    pub const CHANNEL_CHEER: &str = "channel.cheer";
    /// A user subscribed or was gifted a subscription.
    pub const CHANNEL_SUBSCRIBE: &str = "channel.subscribe";
    /// Another channel raided this channel.
    pub const CHANNEL_RAID: &str = "channel.raid";
    /// A moderation action happened (includes outgoing raid/unraid).
    pub const CHANNEL_MODERATE: &str = "channel.moderate";
    /// A hype train started.
    pub const HYPE_TRAIN_BEGIN: &str = "channel.hype_train.begin";
    /// A hype train advanced.
    pub const HYPE_TRAIN_PROGRESS: &str = "channel.hype_train.progress";
    /// A hype train ended.
    pub const HYPE_TRAIN_END: &str = "channel.hype_train.end";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_topics_hash_by_content() {
        let mut set = HashSet::new();
        set.insert(Topic::from(topics::CHANNEL_FOLLOW));
        assert!(set.contains(&Topic::from("channel.follow")));
        assert!(!set.contains(&Topic::from("channel.cheer")));
    }

    #[test]
    fn test_display_is_bare_name() {
        assert_eq!(Topic::from("channel.raid").to_string(), "channel.raid");
    }
}
