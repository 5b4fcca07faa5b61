use std::collections::BTreeMap;

use crate::model::{Group, IdentityKey, RawRecord};

/// Group records by (empid, login_id, emp_type), keeping every marker and
/// status in encounter order. Groups come back in identity-key order.
pub fn group_records(records: &[RawRecord]) -> Vec<Group> {
    let mut groups: BTreeMap<IdentityKey, Group> = BTreeMap::new();

    for record in records {
        let group = groups.entry(record.key()).or_insert_with_key(|key| Group {
            key: key.clone(),
            markers: Vec::new(),
            statuses: Vec::new(),
        });
        group.markers.push(record.deletion_marker);
        group.statuses.push(record.status.clone());
    }

    log::debug!("grouped {} record(s) into {} group(s)", records.len(), groups.len());

    groups.into_values().collect()
}
