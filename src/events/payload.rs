//! # Typed payloads for the known topics.
//!
//! Field names follow the wire shape the transport delivers, so handlers can
//! decode a [`Notification`](super::Notification) payload directly with
//! [`Notification::decode`](super::Notification::decode). Unknown fields are
//! ignored; optional fields default so partial payloads still decode.

use serde::Deserialize;

/// Payload of `channel.follow` — a user followed the channel.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FollowPayload {
    /// Id of the follower.
    pub user_id: String,
    /// Login name of the follower.
    #[serde(default)]
    pub user_login: String,
    /// Display name of the follower.
    pub user_name: String,
    /// When the follow happened, as reported by the server.
    #[serde(default)]
    pub followed_at: Option<String>,
}

/// Payload of `channel.cheer` — a user cheered bits.
///
/// Anonymous cheers carry no user identity.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CheerPayload {
    /// Id of the cheering user, absent for anonymous cheers.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Display name of the cheering user, absent for anonymous cheers.
    #[serde(default)]
    pub user_name: Option<String>,
    /// True when the cheer was sent anonymously.
    #[serde(default)]
    pub is_anonymous: bool,
    /// Number of bits cheered.
    pub bits: u64,
    /// Chat message sent with the cheer.
    #[serde(default)]
    pub message: String,
}

/// Payload of `channel.subscribe` — a user subscribed or was gifted a sub.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SubscribePayload {
    /// Id of the subscriber.
    pub user_id: String,
    /// Display name of the subscriber.
    pub user_name: String,
    /// Subscription tier (`"1000"`, `"2000"`, `"3000"`).
    pub tier: String,
    /// True when the subscription was a gift.
    #[serde(default)]
    pub is_gift: bool,
    /// Display name of the gifter, when known.
    #[serde(default)]
    pub gifter_user_name: Option<String>,
}

/// Payload of `channel.raid` — another channel raided this one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RaidPayload {
    /// Id of the raiding channel.
    pub from_broadcaster_user_id: String,
    /// Display name of the raiding channel.
    pub from_broadcaster_user_name: String,
    /// Id of the raided channel.
    #[serde(default)]
    pub to_broadcaster_user_id: String,
    /// Display name of the raided channel.
    #[serde(default)]
    pub to_broadcaster_user_name: String,
    /// Number of viewers in the raid.
    pub viewers: u32,
}

/// Raid details embedded in a `channel.moderate` action.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModerateRaidInfo {
    /// Id of the raid target.
    pub user_id: String,
    /// Display name of the raid target.
    pub user_name: String,
    /// Viewer count at the time of the action, zero for `unraid`.
    #[serde(default)]
    pub viewer_count: u32,
}

/// Payload of `channel.moderate` — a moderation action on the channel.
///
/// Only the `raid`/`unraid` actions carry data the built-in features use;
/// everything else is routed untouched.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModerateActionPayload {
    /// Action name (`"raid"`, `"unraid"`, `"timeout"`, …).
    pub action: String,
    /// Raid details, present when `action == "raid"`.
    #[serde(default)]
    pub raid: Option<ModerateRaidInfo>,
    /// Unraid details, present when `action == "unraid"`.
    #[serde(default)]
    pub unraid: Option<ModerateRaidInfo>,
}

/// One contribution to a hype train.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HypeTrainContribution {
    /// Id of the contributing user.
    pub user_id: String,
    /// Display name of the contributing user.
    pub user_name: String,
    /// Contribution kind (`"bits"`, `"subscription"`, …).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Points contributed.
    pub total: u64,
}

/// Payload of the `channel.hype_train.*` topics.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HypeTrainPayload {
    /// Current hype train level.
    pub level: u32,
    /// Total points accumulated.
    pub total: u64,
    /// Points gathered towards the next level, when reported.
    #[serde(default)]
    pub progress: Option<u64>,
    /// Points needed for the next level, when reported.
    #[serde(default)]
    pub goal: Option<u64>,
    /// Top contributors so far.
    #[serde(default)]
    pub top_contributions: Vec<HypeTrainContribution>,
    /// Most recent contribution, when reported.
    #[serde(default)]
    pub last_contribution: Option<HypeTrainContribution>,
    /// Start timestamp, as reported by the server.
    #[serde(default)]
    pub started_at: Option<String>,
    /// End timestamp, only on `channel.hype_train.end`.
    #[serde(default)]
    pub ended_at: Option<String>,
}
