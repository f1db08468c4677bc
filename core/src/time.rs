// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Build a datetime from unix epoch seconds.
pub fn from_timestamp(secs: i64) -> Result<DateTime> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        Error::argument_invalid("timestamp is out of range").with_context(format!("secs: {secs}"))
    })
}

/// Add a std duration to a datetime.
pub fn add_duration(time: DateTime, d: std::time::Duration) -> Result<DateTime> {
    chrono::TimeDelta::from_std(d)
        .ok()
        .and_then(|delta| time.checked_add_signed(delta))
        .ok_or_else(|| {
            Error::argument_invalid("duration is out of range")
                .with_context(format!("duration: {d:?}"))
        })
}

/// Parse time from RFC3339.
///
/// All input time SHOULD follow [RFC3339](https://datatracker.ietf.org/doc/html/rfc3339).
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|e| {
            Error::unexpected("failed to parse RFC3339 time")
                .with_source(e)
                .with_context(format!("value: {s}"))
        })
}
