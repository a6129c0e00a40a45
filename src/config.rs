//! # Engine configuration.
//!
//! Plain data, validated at build/connect time rather than at construction.

use crate::logging::LogLevel;

/// Channel identity and credentials.
#[derive(Clone, Debug, Default)]
pub struct ChannelConfig {
    /// Numeric channel id; required before `connect()`.
    pub channel_id: String,
    /// Channel login name, used for chat addressing.
    pub channel_name: String,
    /// Application client id sent with subscription requests.
    pub client_id: String,
    /// Account access token sent with subscription requests.
    pub access_token: String,
}

/// Top-level engine configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Channel the engine operates on.
    pub channel: ChannelConfig,
    /// Max work items drained per `tick()` call.
    pub drain_batch: usize,
    /// Logging threshold.
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            drain_batch: 64,
            log_level: LogLevel::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.drain_batch, 64);
        assert_eq!(cfg.log_level, LogLevel::Warning);
        assert!(cfg.channel.channel_id.is_empty());
    }
}
