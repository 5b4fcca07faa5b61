use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Employee identifier. Feeds carry it as either an integer or a string, so it
/// is kept verbatim. Integer ids sort numerically and before all other ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmpId(pub String);

impl EmpId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for EmpId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<i64>(), other.0.parse::<i64>()) {
            // Fall through to the text so "7" and "007" stay distinct keys.
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for EmpId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EmpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmpId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for EmpId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// Per-record deletion marker, encoded in feeds as `Y` (deleted) / `N` (active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeletionMarker {
    Deleted,
    Active,
}

impl DeletionMarker {
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "Y" => Some(Self::Deleted),
            "N" => Some(Self::Active),
            _ => None,
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Self::Deleted => "Y",
            Self::Active => "N",
        }
    }
}

impl fmt::Display for DeletionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// Employment status. `A` and `L` are recognized; anything else is carried
/// through literally and never counts as a valid status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Active,
    Leave,
    Other(String),
}

impl Status {
    pub fn from_code(code: &str) -> Self {
        match code {
            "A" => Self::Active,
            "L" => Self::Leave,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Active => "A",
            Self::Leave => "L",
            Self::Other(s) => s,
        }
    }

    /// Active or Leave.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Active | Self::Leave)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub empid: EmpId,
    pub login_id: String,
    pub emp_type: String,
    pub deletion_marker: DeletionMarker,
    pub status: Status,
}

impl RawRecord {
    pub fn key(&self) -> IdentityKey {
        IdentityKey {
            empid: self.empid.clone(),
            login_id: self.login_id.clone(),
            emp_type: self.emp_type.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Identity key = (empid, login_id, emp_type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IdentityKey {
    pub empid: EmpId,
    pub login_id: String,
    pub emp_type: String,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.empid, self.login_id, self.emp_type)
    }
}

/// All observations sharing one identity key, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: IdentityKey,
    pub markers: Vec<DeletionMarker>,
    pub statuses: Vec<Status>,
}

impl Group {
    pub fn record_count(&self) -> usize {
        self.markers.len()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Label written to `conflict_type` for every valid conflict.
pub const CONFLICT_TYPE: &str = "Deleted flag conflict with Active/Leave status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ExclusionReason {
    #[serde(rename = "No deleted flag conflict")]
    NoDeletedFlagConflict,
    #[serde(rename = "No Active/Leave status found")]
    NoValidStatus,
}

impl ExclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoDeletedFlagConflict => "No deleted flag conflict",
            Self::NoValidStatus => "No Active/Leave status found",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn serialize_yes_no<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(yes_no(*flag))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRow {
    #[serde(flatten)]
    pub key: IdentityKey,
    pub conflict_type: &'static str,
    #[serde(serialize_with = "serialize_yes_no")]
    pub has_deleted: bool,
    #[serde(serialize_with = "serialize_yes_no")]
    pub has_active: bool,
    pub status_summary: String,
}

impl ConflictRow {
    pub const COLUMNS: [&'static str; 7] = [
        "empid",
        "login_id",
        "emp_type",
        "conflict_type",
        "has_deleted",
        "has_active",
        "status_summary",
    ];

    pub fn to_record(&self) -> [&str; 7] {
        [
            self.key.empid.as_str(),
            &self.key.login_id,
            &self.key.emp_type,
            self.conflict_type,
            yes_no(self.has_deleted),
            yes_no(self.has_active),
            &self.status_summary,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonConflictRow {
    #[serde(flatten)]
    pub key: IdentityKey,
    pub status_summary: String,
    pub deletion_marker_summary: String,
    pub reason: ExclusionReason,
}

impl NonConflictRow {
    pub const COLUMNS: [&'static str; 6] = [
        "empid",
        "login_id",
        "emp_type",
        "status_summary",
        "deletion_marker_summary",
        "reason",
    ];

    pub fn to_record(&self) -> [&str; 6] {
        [
            self.key.empid.as_str(),
            &self.key.login_id,
            &self.key.emp_type,
            &self.status_summary,
            &self.deletion_marker_summary,
            self.reason.label(),
        ]
    }
}

/// Outcome for a single group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Conflict(ConflictRow),
    NonConflict(NonConflictRow),
}

/// The two output tables. Either may be empty; neither is ever absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedTables {
    pub conflicts: Vec<ConflictRow>,
    pub non_conflicts: Vec<NonConflictRow>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_records: usize,
    pub total_groups: usize,
    pub conflicts: usize,
    pub non_conflicts: usize,
    pub reason_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    #[serde(flatten)]
    pub tables: ClassifiedTables,
}
