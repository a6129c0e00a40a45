//! # Registrar port: the external create-subscription collaborator.
//!
//! The registrar is the HTTP-side collaborator that registers a
//! (topic, condition) pair for delivery to a session. The engine validates
//! requests *before* they reach the wire: an empty topic, version, condition,
//! or session id is a contract error and fails synchronously.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SubscriptionError;
use crate::events::Topic;

/// Fully-resolved create-subscription request.
#[derive(Clone, Debug)]
pub struct SubscriptionRequest {
    /// Notification category.
    pub topic: Topic,
    /// Topic schema version.
    pub version: String,
    /// Condition map; must be non-empty.
    pub condition: BTreeMap<String, String>,
    /// Session the subscription is scoped to.
    pub session_id: Arc<str>,
    /// Application client id.
    pub client_id: String,
    /// Account access token.
    pub access_token: String,
}

impl SubscriptionRequest {
    /// Validates the contract preconditions.
    ///
    /// Violations are configuration errors, signaled immediately rather than
    /// attempted over the wire.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.topic.as_str().is_empty() {
            return Err(SubscriptionError::InvalidRequest { field: "topic" });
        }
        if self.version.is_empty() {
            return Err(SubscriptionError::InvalidRequest { field: "version" });
        }
        if self.condition.is_empty() {
            return Err(SubscriptionError::InvalidRequest { field: "condition" });
        }
        if self.session_id.is_empty() {
            return Err(SubscriptionError::InvalidRequest { field: "session_id" });
        }
        Ok(())
    }
}

/// Server-side acknowledgement of a created subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionHandle {
    /// Server-assigned subscription id.
    pub id: String,
    /// Topic the subscription covers.
    pub topic: Topic,
}

/// Port over the subscription-creating HTTP collaborator.
#[async_trait]
pub trait Registrar: Send + Sync + 'static {
    /// Creates one server-side subscription tied to `req.session_id`.
    async fn create_subscription(
        &self,
        req: SubscriptionRequest,
    ) -> Result<SubscriptionHandle, SubscriptionError>;
}
