//! Metrics query parameters.
//!
//! Entries whose kind declares `has_metrics` can fetch time series from
//! `{resource_url}/metrics`. The parameters are validated before any request
//! is sent: at least one type, a start and an end are required, and start
//! must lie before end.
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use hcloud_entries::rest::MetricsParams;
//!
//! let end = Utc::now();
//! let params = MetricsParams::new()
//!     .metric_type("cpu")
//!     .metric_type("disk")
//!     .start(end - Duration::hours(1))
//!     .end(end)
//!     .step(60);
//!
//! let query = params.to_query().unwrap();
//! assert_eq!(query["type"], "cpu,disk");
//! assert_eq!(query["step"], "60");
//! ```

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::rest::errors::ResourceError;

/// Parameters of a metrics request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsParams {
    types: Vec<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    step: Option<u32>,
}

impl MetricsParams {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a metric type (`cpu`, `disk`, `network`, ...).
    #[must_use]
    pub fn metric_type(mut self, metric_type: impl Into<String>) -> Self {
        self.types.push(metric_type.into());
        self
    }

    /// Sets the start of the time range.
    #[must_use]
    pub const fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the end of the time range.
    #[must_use]
    pub const fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the resolution in seconds.
    #[must_use]
    pub const fn step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] if no type is given, a type
    /// is blank, start or end is missing, or start is not before end.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.types.is_empty() || self.types.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid("no metrics type given"));
        }
        let start = self.start.ok_or_else(|| invalid("no start time given"))?;
        let end = self.end.ok_or_else(|| invalid("no end time given"))?;
        if start >= end {
            return Err(invalid("start must be before end"));
        }
        Ok(())
    }

    /// Validates and serializes into query parameters.
    ///
    /// # Errors
    ///
    /// See [`MetricsParams::validate`].
    pub fn to_query(&self) -> Result<HashMap<String, String>, ResourceError> {
        self.validate()?;

        let mut query = HashMap::new();
        query.insert("type".to_string(), self.types.join(","));
        if let Some(start) = self.start {
            query.insert("start".to_string(), start.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        if let Some(end) = self.end {
            query.insert("end".to_string(), end.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        if let Some(step) = self.step {
            query.insert("step".to_string(), step.to_string());
        }
        Ok(query)
    }
}

fn invalid(reason: &str) -> ResourceError {
    ResourceError::InvalidInput {
        reason: reason.to_string(),
    }
}
