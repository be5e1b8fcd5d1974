//! Launch schedule types and filtering.
//!
//! The backend filters `/launch_schedule` server-side from query parameters;
//! the same filter can be applied locally to an already fetched list.

use crate::model::Location;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used in schedule query parameters and payloads.
pub const SCHEDULE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One scheduled launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchEntry {
    pub id: u64,
    pub site: String,
    pub date: NaiveDate,
    /// Local launch time, `HH:MM`.
    pub time: String,
    pub status: String,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub rocket: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
}

/// Optional constraints on the schedule. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleFilter {
    pub site: Option<Location>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ScheduleFilter {
    /// Query parameters for `/launch_schedule`, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(site) = self.site {
            pairs.push(("site", site.as_str().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format(SCHEDULE_DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format(SCHEDULE_DATE_FORMAT).to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        pairs
    }

    pub fn matches(&self, entry: &LaunchEntry) -> bool {
        self.site.is_none_or(|site| entry.site == site.as_str())
            && self.start_date.is_none_or(|start| entry.date >= start)
            && self.end_date.is_none_or(|end| entry.date <= end)
            && self.status.as_ref().is_none_or(|status| &entry.status == status)
    }

    /// Keeps matching entries, soonest first.
    pub fn apply(&self, entries: Vec<LaunchEntry>) -> Vec<LaunchEntry> {
        let mut kept: Vec<LaunchEntry> = entries.into_iter().filter(|e| self.matches(e)).collect();
        kept.sort_by(|a, b| (a.date, &a.time, a.id).cmp(&(b.date, &b.time, b.id)));
        kept
    }
}
