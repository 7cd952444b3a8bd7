//! In-memory store implementation

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{AuditEvent, OverrideStore, StoreResult};

/// Keeps everything in process memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    overrides: RwLock<BTreeMap<String, String>>,
    audit: RwLock<Vec<AuditEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverrideStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StoreResult<String> {
        let overrides = self.overrides.read().unwrap();
        Ok(overrides.get(key).cloned().unwrap_or_default())
    }

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut overrides = self.overrides.write().unwrap();
        overrides.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn entries_raw(&self) -> StoreResult<Vec<(String, String)>> {
        let overrides = self.overrides.read().unwrap();
        Ok(overrides
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn append_audit(&self, mut event: AuditEvent) -> StoreResult<()> {
        let mut audit = self.audit.write().unwrap();
        event.id = audit.len() as i64 + 1;
        audit.push(event);
        Ok(())
    }

    fn get_recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        let audit = self.audit.read().unwrap();
        Ok(audit.iter().rev().take(limit).cloned().collect())
    }

    fn is_healthy(&self) -> bool {
        !self.overrides.is_poisoned() && !self.audit.is_poisoned()
    }
}
