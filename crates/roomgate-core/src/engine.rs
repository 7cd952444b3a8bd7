//! Room search engine

use roomgate_api::{Booking, FilterReport, FilterRequest, Room, User};
use roomgate_config::Policy;
use roomgate_store::{AccessOverride, AuditEvent, AuditEventType, OverrideKey, OverrideStore};
use roomgate_util::{RequestId, RoomId, RoomgateError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

use crate::{
    annotate_equipment, assign_piano_counts, decorate_bookings, filter_rooms, AccessEvaluator,
    AclResolver, FilterSettings,
};

/// Ties the access tables and the override store together
pub struct RoomEngine {
    policy: Policy,
    store: Arc<dyn OverrideStore>,
}

impl RoomEngine {
    /// Create a new engine
    pub fn new(policy: Policy, store: Arc<dyn OverrideStore>) -> Self {
        log_policy_loaded(&policy, store.as_ref());
        info!(
            groups = policy.acl.group_count(),
            rooms = policy.acl.room_count(),
            pianos = policy.pianos.len(),
            "Room engine initialized"
        );

        Self { policy, store }
    }

    /// Get current policy
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Swap in freshly loaded tables
    pub fn reload_policy(&mut self, policy: Policy) {
        log_policy_loaded(&policy, self.store.as_ref());
        self.policy = policy;
        info!("Policy reloaded");
    }

    fn resolver(&self) -> AclResolver<'_> {
        AclResolver::new(&self.policy.acl)
    }

    /// Classify the user's roles against the configured ignorable role ids
    pub fn ingest_user(&self, user: &mut User) {
        self.resolver().classify_roles(&mut user.roles);
    }

    fn ingested(&self, user: &User) -> User {
        let mut user = user.clone();
        self.ingest_user(&mut user);
        user
    }

    /// Run one filtering pass over the rooms fetched for the queried date
    pub fn search(
        &self,
        user: &User,
        mut rooms: Vec<Room>,
        request: &FilterRequest,
        equipment: &HashMap<String, String>,
    ) -> FilterReport {
        let request_id = RequestId::new();
        let span = info_span!("search", request_id = %request_id, user = %user.id_code);
        let _guard = span.enter();

        let user = self.ingested(user);
        let resolver = self.resolver();

        assign_piano_counts(&mut rooms, &self.policy.pianos);

        let access = AccessEvaluator::new(resolver, self.store.as_ref(), &user.roles);
        debug!(identity = access.identity(), "Evaluating rooms");

        let settings = FilterSettings::from(&self.policy.service);
        let mut partition = filter_rooms(rooms, &access, request, &settings);

        annotate_equipment(&mut partition.available, equipment);
        annotate_equipment(&mut partition.conflicting, equipment);

        let unknown_groups = resolver.unknown_groups(&user, &self.policy.service.admin_contact);
        let has_crowdsource = partition.available.iter().any(|r| r.missing_acl);

        info!(
            available = partition.available.len(),
            conflicting = partition.conflicting.len(),
            notices = partition.long_booking_notices.len(),
            "Filtering pass complete"
        );

        FilterReport {
            request_id,
            available: partition.available,
            conflicting: partition.conflicting,
            long_booking_notices: partition.long_booking_notices,
            unknown_groups,
            has_crowdsource,
        }
    }

    /// Record whether the user's role set may book `room_id`.
    ///
    /// The override is keyed by the user's composite identity, so it applies
    /// to everyone holding the same roles.
    pub fn set_access(&self, room_id: RoomId, user: &User, allow: bool) -> roomgate_util::Result<()> {
        let user = self.ingested(user);
        let identity = self.resolver().composite_identity(&user.roles);
        let key = OverrideKey::new(room_id, identity);
        let access = AccessOverride::from_allowed(allow);

        let previous = self
            .store
            .get_override(&key)
            .map_err(|e| RoomgateError::store(e.to_string()))?;
        self.store
            .set_override(&key, access)
            .map_err(|e| RoomgateError::store(e.to_string()))?;

        info!(key = %key, access = %access, user = %user.id_code, "Access override recorded");

        if let Err(e) = self.store.append_audit(AuditEvent::new(AuditEventType::OverrideSet {
            key,
            access,
            previous,
            user: user.full_name,
        })) {
            warn!(error = %e, "Failed to append audit event");
        }

        Ok(())
    }

    /// The override recorded for a room and the user's role set, if any
    pub fn access_for(&self, room_id: RoomId, user: &User) -> roomgate_util::Result<Option<AccessOverride>> {
        let user = self.ingested(user);
        let key = OverrideKey::new(room_id, self.resolver().composite_identity(&user.roles));
        self.store
            .get_override(&key)
            .map_err(|e| RoomgateError::store(e.to_string()))
    }

    /// Every recorded override
    pub fn overrides(&self) -> roomgate_util::Result<Vec<(OverrideKey, AccessOverride)>> {
        self.store
            .list_overrides()
            .map_err(|e| RoomgateError::store(e.to_string()))
    }

    /// Recent audit events, newest first
    pub fn recent_audits(&self, limit: usize) -> roomgate_util::Result<Vec<AuditEvent>> {
        self.store
            .get_recent_audits(limit)
            .map_err(|e| RoomgateError::store(e.to_string()))
    }

    /// Decorate the user's own bookings for display
    pub fn decorate_bookings(&self, bookings: &mut [Booking]) {
        decorate_bookings(bookings, &self.policy.pianos);
    }
}

fn log_policy_loaded(policy: &Policy, store: &dyn OverrideStore) {
    let event = AuditEvent::new(AuditEventType::PolicyLoaded {
        group_count: policy.acl.group_count(),
        room_count: policy.acl.room_count(),
    });
    if let Err(e) = store.append_audit(event) {
        warn!(error = %e, "Failed to append audit event");
    }
}
