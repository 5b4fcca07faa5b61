use crate::aggregate::group_records;
use crate::classify::classify;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{RawRecord, ReconMeta, ReconResult};

/// Group, classify and summarize a record set.
pub fn run(records: &[RawRecord]) -> Result<ReconResult, ReconError> {
    run_named(None, records)
}

/// Same as [`run`], stamping the config name into the report metadata.
pub fn run_named(
    config_name: Option<&str>,
    records: &[RawRecord],
) -> Result<ReconResult, ReconError> {
    let groups = group_records(records);
    let tables = classify(&groups)?;
    let summary = compute_summary(records.len(), &tables);

    log::debug!(
        "recon done: {} record(s), {} group(s), {} conflict(s)",
        summary.total_records,
        summary.total_groups,
        summary.conflicts,
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config_name.map(str::to_string),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        tables,
    })
}
