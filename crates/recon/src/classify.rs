use std::collections::BTreeSet;

use crate::error::ReconError;
use crate::model::{
    Classification, ClassifiedTables, ConflictRow, DeletionMarker, ExclusionReason, Group,
    NonConflictRow, CONFLICT_TYPE,
};

/// Both a deleted and a non-deleted marker were observed.
pub fn has_deleted_conflict(group: &Group) -> bool {
    has_marker(group, DeletionMarker::Deleted) && has_marker(group, DeletionMarker::Active)
}

/// At least one Active or Leave status was observed.
pub fn has_valid_status(group: &Group) -> bool {
    group.statuses.iter().any(|s| s.is_valid())
}

fn has_marker(group: &Group, marker: DeletionMarker) -> bool {
    group.markers.contains(&marker)
}

/// Distinct values, sorted, joined with ", ".
pub fn summarize<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a group was left out of the conflict table.
///
/// Callers only reach this for groups that failed the conflict test, so
/// `(true, true)` is an upstream defect and is reported as such.
pub fn exclusion_reason(
    deleted_conflict: bool,
    valid_status: bool,
) -> Result<ExclusionReason, ReconError> {
    match (deleted_conflict, valid_status) {
        (false, _) => Ok(ExclusionReason::NoDeletedFlagConflict),
        (true, false) => Ok(ExclusionReason::NoValidStatus),
        (true, true) => Err(ReconError::Invariant(
            "group with a deleted flag conflict and a valid status routed to non-conflicts".into(),
        )),
    }
}

/// Classify one group into its output row.
pub fn classify_group(group: &Group) -> Result<Classification, ReconError> {
    let deleted_conflict = has_deleted_conflict(group);
    let valid_status = has_valid_status(group);
    let status_summary = summarize(group.statuses.iter().map(|s| s.code()));

    if deleted_conflict && valid_status {
        return Ok(Classification::Conflict(ConflictRow {
            key: group.key.clone(),
            conflict_type: CONFLICT_TYPE,
            has_deleted: has_marker(group, DeletionMarker::Deleted),
            has_active: has_marker(group, DeletionMarker::Active),
            status_summary,
        }));
    }

    Ok(Classification::NonConflict(NonConflictRow {
        key: group.key.clone(),
        status_summary,
        deletion_marker_summary: summarize(group.markers.iter().map(|m| m.flag())),
        reason: exclusion_reason(deleted_conflict, valid_status)?,
    }))
}

/// Split groups into the conflict and non-conflict tables, preserving order.
pub fn classify(groups: &[Group]) -> Result<ClassifiedTables, ReconError> {
    let mut tables = ClassifiedTables::default();

    for group in groups {
        match classify_group(group)? {
            Classification::Conflict(row) => tables.conflicts.push(row),
            Classification::NonConflict(row) => tables.non_conflicts.push(row),
        }
    }

    log::debug!(
        "classified {} group(s): {} conflict(s), {} excluded",
        groups.len(),
        tables.conflicts.len(),
        tables.non_conflicts.len(),
    );

    Ok(tables)
}
