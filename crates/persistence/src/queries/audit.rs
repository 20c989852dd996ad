// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fleet_maint_audit::{
    Action, Actor, AuditEvent, AuditScope, Cause, EntityKind, StateSnapshot,
};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    tenant_id: i64,
    entity_kind: String,
    entity_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let entity_kind: EntityKind = EntityKind::parse(&self.entity_kind).ok_or_else(|| {
            PersistenceError::corrupt(
                "audit_events",
                format!("unknown entity kind '{}'", self.entity_kind),
            )
        })?;

        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent::new(
            AuditScope::new(self.tenant_id, entity_kind, self.entity_id),
            Actor::new(actor_data.id, actor_data.actor_type),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
        ))
    }
}

/// Retrieves the audit trail of one entity in event order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The tenant
/// * `entity_kind` - The kind of entity
/// * `entity_id` - The entity
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn get_entity_timeline(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    entity_kind: EntityKind,
    entity_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::tenant_id.eq(tenant_id))
        .filter(audit_events::entity_kind.eq(entity_kind.as_str()))
        .filter(audit_events::entity_id.eq(entity_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(AuditEventRow::into_event)
        .collect()
}

/// Retrieves every audit event of a tenant in event order.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn get_tenant_audit_events(
    conn: &mut SqliteConnection,
    tenant_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::tenant_id.eq(tenant_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(AuditEventRow::into_event)
        .collect()
}
