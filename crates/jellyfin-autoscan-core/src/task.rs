//! Scheduled task records.

use serde::Deserialize;
use serde_json::Value;

/// Stable key of the library refresh task.
pub const REFRESH_LIBRARY_KEY: &str = "RefreshLibrary";

/// One entry of the scheduled task list, as returned by Jellyfin.
///
/// Only `Key` and `Id` are read. Both are kept as raw JSON values so a
/// missing field and a field of the wrong type stay distinguishable;
/// every other field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScheduledTaskRecord {
    #[serde(rename = "Key")]
    pub key: Option<Value>,

    #[serde(rename = "Id")]
    pub id: Option<Value>,
}

impl ScheduledTaskRecord {
    /// The task key, if present and a string.
    pub fn key(&self) -> Option<&str> {
        self.key.as_ref().and_then(Value::as_str)
    }

    /// The task instance id, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    /// Convert into a descriptor when both fields are strings.
    pub fn descriptor(&self) -> Option<TaskDescriptor> {
        Some(TaskDescriptor {
            key: self.key()?.to_string(),
            id: self.id()?.to_string(),
        })
    }
}

/// A scheduled task with a well-formed key and id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    /// Stable task key, e.g. `RefreshLibrary`.
    pub key: String,

    /// Instance id used to start the task.
    pub id: String,
}

/// Decode a scheduled task list response body.
///
/// Only the first JSON value is read; anything after it is ignored. A
/// top-level `null` is an empty list.
pub fn decode_task_list(body: &[u8]) -> Result<Vec<Option<ScheduledTaskRecord>>, serde_json::Error> {
    let mut values = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Vec<Option<ScheduledTaskRecord>>>>();
    // No value at all (empty or whitespace body) reports the EOF error.
    let first = values.next().unwrap_or_else(|| serde_json::from_slice(body));
    Ok(first?.unwrap_or_default())
}

/// Find the first task with the given key and a string id.
///
/// `None` entries (JSON `null` list elements) are skipped. A record whose
/// key matches but whose id is missing or not a string does not end the
/// scan.
pub fn find_task(records: &[Option<ScheduledTaskRecord>], key: &str) -> Option<TaskDescriptor> {
    records
        .iter()
        .flatten()
        .filter(|record| record.key() == Some(key))
        .find_map(ScheduledTaskRecord::descriptor)
}

/// Find the library refresh task.
pub fn find_refresh_library(records: &[Option<ScheduledTaskRecord>]) -> Option<TaskDescriptor> {
    find_task(records, REFRESH_LIBRARY_KEY)
}
