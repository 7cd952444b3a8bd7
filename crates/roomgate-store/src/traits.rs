//! Store trait definitions

use tracing::warn;

use crate::{AccessOverride, AuditEvent, OverrideKey, StoreResult};

/// Main store trait
///
/// The raw accessors are the whole contract with the backing key-value
/// store: `get_raw` returns an empty string for an absent key, `put_raw`
/// overwrites unconditionally.
pub trait OverrideStore: Send + Sync {
    // Access overrides

    /// Read the stored value for a key, empty when absent
    fn get_raw(&self, key: &str) -> StoreResult<String>;

    /// Store a value, replacing any previous one
    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()>;

    /// All stored entries as raw key/value pairs
    fn entries_raw(&self) -> StoreResult<Vec<(String, String)>>;

    /// Get the override recorded for a room and identity
    fn get_override(&self, key: &OverrideKey) -> StoreResult<Option<AccessOverride>> {
        let value = self.get_raw(&key.to_string())?;
        Ok(AccessOverride::from_value(&value))
    }

    /// Record an override for a room and identity
    fn set_override(&self, key: &OverrideKey, access: AccessOverride) -> StoreResult<()> {
        self.put_raw(&key.to_string(), access.as_value())
    }

    /// All recorded overrides; entries with unreadable keys are skipped
    fn list_overrides(&self) -> StoreResult<Vec<(OverrideKey, AccessOverride)>> {
        let mut overrides = Vec::new();
        for (key, value) in self.entries_raw()? {
            let Some(access) = AccessOverride::from_value(&value) else {
                continue;
            };
            match key.parse::<OverrideKey>() {
                Ok(key) => overrides.push((key, access)),
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable override"),
            }
        }
        Ok(overrides)
    }

    // Audit log

    /// Append an audit event
    fn append_audit(&self, event: AuditEvent) -> StoreResult<()>;

    /// Get recent audit events, newest first
    fn get_recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
