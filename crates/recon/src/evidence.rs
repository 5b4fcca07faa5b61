use std::collections::BTreeMap;

use crate::model::{ClassifiedTables, ReconSummary};

/// Compute summary statistics from classified tables.
pub fn compute_summary(total_records: usize, tables: &ClassifiedTables) -> ReconSummary {
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in &tables.non_conflicts {
        *reason_counts.entry(row.reason.to_string()).or_insert(0) += 1;
    }

    ReconSummary {
        total_records,
        total_groups: tables.conflicts.len() + tables.non_conflicts.len(),
        conflicts: tables.conflicts.len(),
        non_conflicts: tables.non_conflicts.len(),
        reason_counts,
    }
}
