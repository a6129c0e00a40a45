//! # Declarative subscription descriptors.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::events::Topic;

/// One feature's declared interest in a server-side subscription.
///
/// Two features may declare the identical (topic, version, condition) tuple;
/// they collapse to a single server-side subscription. `owner` names the
/// declaring feature for diagnostics and is excluded from the dedupe key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionDescriptor {
    /// Notification category to subscribe to.
    pub topic: Topic,
    /// Topic schema version (e.g. `"2"`).
    pub version: String,
    /// Condition map sent with the create call; keys are unique, ordering is
    /// irrelevant to identity.
    pub condition: BTreeMap<String, String>,
    /// Declaring feature, diagnostics only.
    pub owner: Arc<str>,
}

impl SubscriptionDescriptor {
    /// Creates a descriptor with an empty condition.
    pub fn new(
        topic: impl Into<Topic>,
        version: impl Into<String>,
        owner: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            topic: topic.into(),
            version: version.into(),
            condition: BTreeMap::new(),
            owner: owner.into(),
        }
    }

    /// Adds one condition entry.
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.condition.insert(key.into(), value.into());
        self
    }

    /// Identity used for per-session dedupe; excludes `owner`.
    pub fn key(&self) -> SubscriptionKey {
        SubscriptionKey {
            topic: self.topic.clone(),
            version: self.version.clone(),
            condition: self
                .condition
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Dedupe identity of a subscription: (topic, version, condition).
///
/// The condition is stored as a sorted vec (`BTreeMap` iteration order), so
/// two descriptors with the same entries compare equal regardless of
/// insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    topic: Topic,
    version: String,
    condition: Vec<(String, String)>,
}
