//! In-memory storage: one insertion-ordered collection per resource plus
//! the issued bearer tokens.

use std::collections::HashMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::resource::Resource;

pub type Record = Map<String, Value>;

/// Query parameters compared for exact equality against record fields.
const EQUALITY_KEYS: [&str; 5] = ["employee_id", "company_id", "payroll_run_id", "status", "type"];

/// Record fields consulted, in order, for `start_date`/`end_date` bounds.
const DATE_KEYS: [&str; 4] = ["date", "start_date", "week_ending", "pay_date"];

/// Fields the server owns; client patches never overwrite them.
const RESERVED_KEYS: [&str; 2] = ["id", "created_at"];

static EMPTY: Collection = Collection { records: Vec::new() };

pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn merge(record: &mut Record, patch: Record) {
    for (key, value) in patch {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            record.insert(key, value);
        }
    }
}

/// Filters a list endpoint applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    equals: Vec<(String, String)>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl ListFilter {
    /// Build from raw query parameters; unknown keys and empty values are
    /// ignored.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let present = |key: &str| query.get(key).filter(|value| !value.is_empty()).cloned();
        let equals = EQUALITY_KEYS
            .iter()
            .filter_map(|key| present(key).map(|value| (key.to_string(), value)))
            .collect();
        Self {
            equals,
            start_date: present("start_date"),
            end_date: present("end_date"),
        }
    }

    pub fn field(key: &str, value: &str) -> Self {
        Self {
            equals: vec![(key.to_string(), value.to_string())],
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let fields_match = self
            .equals
            .iter()
            .all(|(key, expected)| record.get(key).map(text).as_deref() == Some(expected.as_str()));
        fields_match && self.in_window(record)
    }

    /// Records without any date field are not excluded by a window.
    fn in_window(&self, record: &Record) -> bool {
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(date) = DATE_KEYS
            .iter()
            .find_map(|key| record.get(*key).and_then(Value::as_str))
        else {
            return true;
        };
        let day = date.get(..10).unwrap_or(date);
        let after_start = self.start_date.as_deref().map_or(true, |start| day >= start);
        let before_end = self.end_date.as_deref().map_or(true, |end| day <= end);
        after_start && before_end
    }
}

/// Insertion-ordered records addressed by their `id` field.
#[derive(Debug, Default)]
pub struct Collection {
    records: Vec<Record>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn list(&self, filter: &ListFilter) -> Vec<Record> {
        self.records.iter().filter(|r| filter.matches(r)).cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.find(|record| record.get("id").and_then(Value::as_str) == Some(id))
    }

    pub fn find(&self, predicate: impl Fn(&Record) -> bool) -> Option<&Record> {
        self.records.iter().find(|record| predicate(record))
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.records
            .iter_mut()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
    }

    /// Store a new record under a fresh id, stamping `created_at`.
    pub fn insert(&mut self, mut record: Record, now: DateTime<Utc>) -> Record {
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        record.insert("created_at".to_string(), Value::String(timestamp(now)));
        self.records.push(record.clone());
        record
    }

    /// Shallow-merge `patch` into the record and stamp `updated_at`.
    pub fn update(&mut self, id: &str, patch: Record, now: DateTime<Utc>) -> Option<Record> {
        let record = self.get_mut(id)?;
        merge(record, patch);
        record.insert("updated_at".to_string(), Value::String(timestamp(now)));
        Some(record.clone())
    }

    /// Merge `patch`, then force `status` and stamp `stamp_field`.
    pub fn transition(
        &mut self,
        id: &str,
        status: &str,
        stamp_field: &str,
        patch: Record,
        now: DateTime<Utc>,
    ) -> Option<Record> {
        let record = self.get_mut(id)?;
        merge(record, patch);
        record.insert("status".to_string(), Value::String(status.to_string()));
        record.insert(stamp_field.to_string(), Value::String(timestamp(now)));
        Some(record.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records
            .retain(|record| record.get("id").and_then(Value::as_str) != Some(id));
        self.records.len() != before
    }
}

#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<Resource, Collection>,
    tokens: HashMap<String, DateTime<Utc>>,
}

impl Store {
    pub fn collection(&self, resource: Resource) -> &Collection {
        self.collections.get(&resource).unwrap_or(&EMPTY)
    }

    pub fn collection_mut(&mut self, resource: Resource) -> &mut Collection {
        self.collections.entry(resource).or_default()
    }

    /// Insert with the resource's create-time defaults applied.
    pub fn create(&mut self, resource: Resource, mut record: Record, now: DateTime<Utc>) -> Record {
        if let Some(status) = resource.initial_status() {
            record.insert("status".to_string(), Value::String(status.to_string()));
        }
        self.collection_mut(resource).insert(record, now)
    }

    /// Issue a token valid for `ttl`, dropping any that already expired.
    /// An expiry past the representable range saturates.
    pub fn issue_token(&mut self, ttl: Duration, now: DateTime<Utc>) -> String {
        self.tokens.retain(|_, expires_at| *expires_at > now);
        let token = Uuid::new_v4().to_string();
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.tokens.insert(token.clone(), expires_at);
        token
    }

    pub fn token_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.tokens
            .get(token)
            .is_some_and(|expires_at| *expires_at > now)
    }
}
