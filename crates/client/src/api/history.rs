//! Bounded record of failed backend calls.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::services::ServiceInfo;

/// Number of failures kept in memory.
pub const HISTORY_CAPACITY: usize = 10;

/// What was known about one failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCallRecord {
    pub service_name: String,
    pub description: String,
    /// Full URL that was requested (base URL + path).
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
    pub connection_steps: Vec<String>,
    /// Display form of the underlying error.
    pub original_error: String,
    /// HTTP status, when the backend answered at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ServiceCallRecord {
    #[must_use]
    pub fn new(
        service: &ServiceInfo,
        endpoint: impl Into<String>,
        original_error: impl Into<String>,
        status: Option<u16>,
    ) -> Self {
        Self {
            service_name: service.name.to_owned(),
            description: service.description.to_owned(),
            endpoint: endpoint.into(),
            timestamp: Utc::now(),
            connection_steps: service
                .connection_steps
                .iter()
                .map(|step| (*step).to_owned())
                .collect(),
            original_error: original_error.into(),
            status,
        }
    }
}

/// Most-recent-first ring of failure records.
#[derive(Debug, Clone)]
pub struct ServiceHistory {
    records: VecDeque<ServiceCallRecord>,
    capacity: usize,
}

impl Default for ServiceHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl ServiceHistory {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a failure, evicting the oldest once full.
    pub fn push(&mut self, record: ServiceCallRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> Vec<ServiceCallRecord> {
        self.records.iter().cloned().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ServiceCallRecord> {
        self.records.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Aggregate the retained records.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        let mut service_breakdown = BTreeMap::new();
        for record in &self.records {
            *service_breakdown
                .entry(record.service_name.clone())
                .or_insert(0) += 1;
        }
        ServiceStats {
            total_calls: self.records.len(),
            unique_services: service_breakdown.len(),
            service_breakdown,
            last_call: self.records.front().map(|record| record.timestamp),
        }
    }
}

/// Summary of retained failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub total_calls: usize,
    pub unique_services: usize,
    /// Failure count per service name.
    pub service_breakdown: BTreeMap<String, usize>,
    pub last_call: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::services::classify;

    fn record(path: &str, error: &str) -> ServiceCallRecord {
        ServiceCallRecord::new(classify(path), format!("http://api{path}"), error, None)
    }

    #[test]
    fn test_most_recent_first_and_capped() {
        let mut history = ServiceHistory::default();
        for i in 0..15 {
            history.push(record("/products", &format!("error {i}")));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let records = history.records();
        assert_eq!(records[0].original_error, "error 14");
        assert_eq!(records[9].original_error, "error 5");
        assert_eq!(history.latest().map(|r| r.original_error.as_str()), Some("error 14"));
    }

    #[test]
    fn test_stats() {
        let mut history = ServiceHistory::default();
        assert_eq!(history.stats().last_call, None);

        history.push(record("/products/1", "a"));
        history.push(record("/orders", "b"));
        history.push(record("/products/2", "c"));

        let stats = history.stats();
        assert_eq!(stats.total_calls, 3);
        assert_eq!(stats.unique_services, 2);
        assert_eq!(stats.service_breakdown["Product Catalog Service"], 2);
        assert_eq!(stats.service_breakdown["Order Management Service"], 1);
        assert_eq!(stats.last_call, history.latest().map(|r| r.timestamp));

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_record_wire_format() {
        let value = serde_json::to_value(record("/auth/login", "boom")).unwrap_or_default();
        assert_eq!(value["serviceName"], "Authentication Service");
        assert_eq!(value["endpoint"], "http://api/auth/login");
        assert_eq!(value["originalError"], "boom");
        assert_eq!(value["connectionSteps"].as_array().map(Vec::len), Some(4));
        assert!(value.get("status").is_none());
    }
}
