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

//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
///
/// Temp URL keys are long hex strings, so the visible edges are enough to
/// tell two keys apart in logs without leaking them. Passwords and tokens go
/// through [`Redact::hidden`] instead, which never shows any character.
pub struct Redact<'a> {
    value: &'a str,
    edges: bool,
}

impl<'a> Redact<'a> {
    /// Redact `value` entirely, only telling apart empty and set values.
    pub fn hidden(value: impl Into<Redact<'a>>) -> Self {
        let value: Redact<'a> = value.into();
        Redact {
            edges: false,
            ..value
        }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact { value, edges: true }
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::from(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact::from(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.value.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if !self.edges || length < 12 {
            f.write_str("***")
        } else {
            // Cut on char boundaries, secrets are not always ASCII.
            let head = self.value.char_indices().nth(3).map_or(0, |(i, _)| i);
            let tail = self.value.char_indices().rev().nth(2).map_or(0, |(i, _)| i);
            f.write_str(&self.value[..head])?;
            f.write_str("***")?;
            f.write_str(&self.value[tail..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        let key = "a".repeat(64) + "b";
        let cases = vec![
            ("my-key", "***"),
            ("", "EMPTY"),
            ("AwesomeProjectKey", "Awe***Key"),
            (key.as_str(), "aaa***aab"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact::from(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }

    #[test]
    fn test_redact_option() {
        let none: Option<String> = None;
        assert_eq!(format!("{:?}", Redact::from(&none)), "EMPTY");
    }

    #[test]
    fn test_redact_multibyte() {
        let cases = vec![
            ("ééééééééééééé", "ééé***ééé"),
            ("pa€€word-with-ü-ümlaut", "pa€***aut"),
            ("ééééééééé", "***"),
        ];

        for (input, expected) in cases {
            assert_eq!(format!("{:?}", Redact::from(input)), expected);
        }
    }

    #[test]
    fn test_redact_hidden() {
        let password = Some("pässwörd-ßß-long-enough".to_string());
        assert_eq!(format!("{:?}", Redact::hidden(&password)), "***");
        assert_eq!(format!("{:?}", Redact::hidden("")), "EMPTY");
        assert_eq!(format!("{:?}", Redact::hidden(&"a".repeat(64))), "***");
    }
}
