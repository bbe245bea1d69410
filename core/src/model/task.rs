use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TaskError};
use crate::time::{from_reference_seconds, seconds_until, to_reference_seconds};

/// How far in the future a freshly created task is due.
pub const NEW_TASK_DELAY_SECS: i64 = 3600;
/// Priority of a freshly created task, halfway between least and most urgent.
pub const DEFAULT_PRIORITY: f32 = 0.5;

/// Priorities must be finite and within `[0, 1]` to be stored.
pub fn is_valid_priority(priority: f32) -> bool {
    priority.is_finite() && (0.0..=1.0).contains(&priority)
}

/// Opaque task identifier. New ids are upper-case hyphenated v4 UUIDs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        TaskId(Uuid::new_v4().hyphenated().to_string().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, as shown in listings.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        TaskId(value)
    }
}

/// On-disk shape of a task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskRecord {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub name: String,
    /// Seconds since 2001-01-01T00:00:00Z
    #[serde(rename = "dueDate")]
    pub due_date: f64,
    pub priority: f32,
}

/// A to-do item. Equality is by id only; fields other than the id are freely mutable.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    pub name: String,
    pub due_date: DateTime<Utc>,
    /// 1.0 is most urgent, 0.0 least.
    pub priority: f32,
}

impl Task {
    pub fn new() -> Self {
        Self {
            id: TaskId::generate(),
            name: String::new(),
            due_date: Utc::now() + Duration::seconds(NEW_TASK_DELAY_SECS),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn with_details(name: impl Into<String>, due_date: DateTime<Utc>, priority: f32) -> Self {
        Self {
            id: TaskId::generate(),
            name: name.into(),
            due_date,
            priority,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// `priority * seconds until due`. Smaller is more urgent; overdue tasks go negative.
    pub fn weighted_score(&self) -> f64 {
        self.weighted_score_at(Utc::now())
    }

    pub fn weighted_score_at(&self, now: DateTime<Utc>) -> f64 {
        f64::from(self.priority) * seconds_until(self.due_date, now)
    }

    /// Orders by ascending weighted score, so the more urgent task is `Less`.
    pub fn compare(&self, other: &Task) -> Ordering {
        self.compare_at(other, Utc::now())
    }

    pub fn compare_at(&self, other: &Task, now: DateTime<Utc>) -> Ordering {
        self.weighted_score_at(now)
            .total_cmp(&other.weighted_score_at(now))
    }

    /// Display hue in degrees: 0 (red) for priority 1.0 up to 60 (yellow) for 0.0.
    pub fn urgency_hue(&self) -> f32 {
        (1.0 - self.priority.clamp(0.0, 1.0)) * 60.0
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            uuid: self.id.0.clone(),
            name: self.name.clone(),
            due_date: to_reference_seconds(self.due_date),
            priority: self.priority,
        }
    }

    /// Builds a task from an untyped JSON object, e.g. one element of the task file.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let record: TaskRecord = serde_json::from_value(value)
            .map_err(|e| TaskError::MalformedRecord(e.to_string()))?;
        Task::try_from(record)
    }
}

impl Default for Task {
    fn default() -> Self {
        Task::new()
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(record: TaskRecord) -> Result<Self> {
        if !is_valid_priority(record.priority) {
            return Err(TaskError::MalformedRecord(format!(
                "priority {} of task {} is outside [0, 1]",
                record.priority, record.uuid
            )));
        }
        let due_date = from_reference_seconds(record.due_date).ok_or_else(|| {
            TaskError::MalformedRecord(format!(
                "dueDate {} of task {} is out of range",
                record.due_date, record.uuid
            ))
        })?;

        Ok(Task {
            id: TaskId(record.uuid),
            name: record.name,
            due_date,
            priority: record.priority,
        })
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        task.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let before = Utc::now();
        let task = Task::new();
        let after = Utc::now();

        assert!(task.name.is_empty());
        assert_eq!(task.priority, 0.5);
        assert!(task.due_date >= before + Duration::hours(1));
        assert!(task.due_date <= after + Duration::hours(1));
        assert_eq!(task.id().as_str().len(), 36);
        assert_eq!(task.id().as_str(), task.id().as_str().to_uppercase());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Task::new().id(), Task::new().id());
    }

    #[test]
    fn test_equality_uses_id_only() {
        let a = Task::with_details("Write report", fixed_now(), 0.9);
        let mut b = a.clone();
        b.name = "Something else".to_string();
        b.priority = 0.1;
        b.due_date = fixed_now() - Duration::days(3);
        assert_eq!(a, b);

        let c = Task::with_details("Write report", fixed_now(), 0.9);
        assert_ne!(a, c);
    }

    #[test]
    fn test_weighted_score() {
        let now = fixed_now();
        let future = Task::with_details("a", now + Duration::hours(1), 0.9);
        assert!((future.weighted_score_at(now) - 3240.0).abs() < 1e-3);

        let overdue = Task::with_details("b", now - Duration::hours(1), 0.9);
        assert!((overdue.weighted_score_at(now) + 3240.0).abs() < 1e-3);

        let zero = Task::with_details("c", now + Duration::days(10), 0.0);
        assert_eq!(zero.weighted_score_at(now), 0.0);
    }

    #[test]
    fn test_compare_matches_score() {
        let now = fixed_now();
        let high = Task::with_details("high", now + Duration::hours(1), 0.9);
        let low = Task::with_details("low", now + Duration::hours(1), 0.1);

        // Same future due date: the lower priority has the smaller score
        assert_eq!(low.compare_at(&high, now), Ordering::Less);
        assert_eq!(high.compare_at(&low, now), Ordering::Greater);
        assert_eq!(high.compare_at(&high, now), Ordering::Equal);

        let late_high = Task::with_details("late high", now - Duration::hours(1), 0.9);
        let late_low = Task::with_details("late low", now - Duration::hours(1), 0.1);
        assert_eq!(late_high.compare_at(&late_low, now), Ordering::Less);
    }

    #[test]
    fn test_urgency_hue() {
        let mut task = Task::new();
        task.priority = 1.0;
        assert_eq!(task.urgency_hue(), 0.0);
        task.priority = 0.0;
        assert_eq!(task.urgency_hue(), 60.0);
        task.priority = 0.5;
        assert_eq!(task.urgency_hue(), 30.0);
    }

    #[test]
    fn test_record_uses_actual_due_date() {
        let due = Utc.with_ymd_and_hms(2001, 1, 2, 0, 0, 0).unwrap();
        let task = Task::with_details("Renew passport", due, 0.75);
        let record = task.to_record();

        assert_eq!(record.uuid, task.id().as_str());
        assert_eq!(record.name, "Renew passport");
        assert_eq!(record.due_date, 86_400.0);
        assert_eq!(record.priority, 0.75);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["UUID"], json!(task.id().as_str()));
        assert_eq!(value["dueDate"], json!(86_400.0));
        assert_eq!(value["priority"], json!(0.75));
    }

    #[test]
    fn test_record_round_trip() {
        let mut task = Task::new();
        task.name = "Call the plumber".to_string();
        task.priority = 0.3;

        let restored = Task::try_from(task.to_record()).unwrap();
        assert_eq!(restored, task);
        assert_eq!(restored.name, task.name);
        assert_eq!(restored.priority, task.priority);
        let drift = (restored.due_date - task.due_date).num_microseconds().unwrap().abs();
        assert!(drift <= 1, "due date drifted by {}us", drift);
    }

    #[test]
    fn test_from_value_accepts_integer_due_date_and_extra_keys() {
        let task = Task::from_value(json!({
            "UUID": "6F9619FF-8B86-D011-B42D-00C04FC964FF",
            "name": "Groceries",
            "dueDate": 500000000,
            "priority": 1,
            "notes": "ignored"
        }))
        .unwrap();
        assert_eq!(task.id().as_str(), "6F9619FF-8B86-D011-B42D-00C04FC964FF");
        assert_eq!(task.priority, 1.0);
        assert_eq!(task.due_date.timestamp(), 978_307_200 + 500_000_000);
    }

    #[test]
    fn test_from_value_rejects_malformed_records() {
        let cases = vec![
            json!({ "name": "no id", "dueDate": 0.0, "priority": 0.5 }),
            json!({ "UUID": 7, "name": "numeric id", "dueDate": 0.0, "priority": 0.5 }),
            json!({ "UUID": "a", "name": null, "dueDate": 0.0, "priority": 0.5 }),
            json!({ "UUID": "a", "name": "n", "dueDate": "tomorrow", "priority": 0.5 }),
            json!({ "UUID": "a", "name": "n", "dueDate": 0.0, "priority": "high" }),
            json!({ "UUID": "a", "name": "n", "dueDate": 0.0, "priority": 1.5 }),
            json!({ "UUID": "a", "name": "n", "dueDate": 1e300, "priority": 0.5 }),
            json!(["not", "an", "object"]),
        ];
        for case in cases {
            let err = Task::from_value(case.clone()).unwrap_err();
            assert!(
                matches!(err, TaskError::MalformedRecord(_)),
                "expected MalformedRecord for {}, got {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_short_id() {
        let id = TaskId::from("6F9619FF-8B86-D011");
        assert_eq!(id.short(), "6F9619FF");
        assert_eq!(TaskId::from("abc").short(), "abc");
    }
}
