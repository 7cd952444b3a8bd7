//! Per-room access decisions

use roomgate_api::{Room, UserRole};
use roomgate_store::{AccessOverride, OverrideKey, OverrideStore};
use tracing::{debug, warn};

use crate::AclResolver;

/// Decides whether a user's role set may book a room.
///
/// Built once per filtering pass; the identity and tag union are computed
/// up front so each room costs one override lookup at most.
pub struct AccessEvaluator<'a> {
    resolver: AclResolver<'a>,
    store: &'a dyn OverrideStore,
    identity: String,
    user_tags: Vec<&'a str>,
}

impl<'a> AccessEvaluator<'a> {
    pub fn new(resolver: AclResolver<'a>, store: &'a dyn OverrideStore, roles: &[UserRole]) -> Self {
        Self {
            identity: resolver.composite_identity(roles),
            user_tags: resolver.tag_union(roles),
            resolver,
            store,
        }
    }

    /// Composite identity the overrides are keyed by
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Decide access to `room`, flagging it when it has no access mapping.
    ///
    /// First match wins:
    /// 1. a recorded override for this room and identity
    /// 2. no tags at all: unrestricted
    /// 3. room without a mapping: allowed, `missing_acl` set
    /// 4. allowed iff one of the user's tags equals the room's tag
    pub fn has_access(&self, room: &mut Room) -> bool {
        let key = OverrideKey::new(room.id, self.identity.as_str());
        match self.store.get_override(&key) {
            Ok(Some(access)) => return access == AccessOverride::Allow,
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Override lookup failed, ignoring");
            }
        }

        if self.user_tags.is_empty() {
            return true;
        }

        let Some(room_tag) = self.resolver.room_tag(room.only_code()) else {
            debug!(
                only_code = room.only_code(),
                room_id = %room.id,
                full_name = %format_args!("{}: {}", room.room_code, room.room_name),
                "room is missing ACL"
            );
            room.missing_acl = true;
            return true;
        };

        self.user_tags.iter().any(|tag| *tag == room_tag)
    }
}
