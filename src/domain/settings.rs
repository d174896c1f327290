//! Edge credentials and purge defaults, persisted as one document.

use serde::{Deserialize, Serialize};

/// Credentials and defaults for the remote purge API. Empty strings mean
/// "unset"; a fresh install starts with every field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSettingsRecord {
    pub secret_id: String,
    pub secret_key: String,
    pub zone_id: String,
    pub default_host: String,
}

impl EdgeSettingsRecord {
    /// First credential field still missing, checked in a stable order so
    /// operators can fix them one at a time.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.secret_id.trim().is_empty() {
            return Some("secret_id");
        }
        if self.secret_key.trim().is_empty() {
            return Some("secret_key");
        }
        if self.zone_id.trim().is_empty() {
            return Some("zone_id");
        }
        None
    }

    /// The configured default host, if any.
    pub fn configured_host(&self) -> Option<&str> {
        let host = self.default_host.trim();
        (!host.is_empty()).then_some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_reported_in_order() {
        let mut record = EdgeSettingsRecord::default();
        assert_eq!(record.first_missing_field(), Some("secret_id"));

        record.secret_id = "id".to_string();
        assert_eq!(record.first_missing_field(), Some("secret_key"));

        record.secret_key = "key".to_string();
        assert_eq!(record.first_missing_field(), Some("zone_id"));

        record.zone_id = "zone-1".to_string();
        assert_eq!(record.first_missing_field(), None);
    }

    #[test]
    fn blank_default_host_counts_as_unset() {
        let record = EdgeSettingsRecord {
            default_host: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(record.configured_host(), None);

        let record = EdgeSettingsRecord {
            default_host: "example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(record.configured_host(), Some("example.com"));
    }
}
