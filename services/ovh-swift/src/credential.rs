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

use ovhsign_core::utils::Redact;
use ovhsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential for OVH Swift temporary access: the temp url key shared with
/// the container (or account) metadata.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Temp url key used as the HMAC secret.
    pub temp_url_key: String,
}

impl Credential {
    /// Create a credential from a temp url key.
    pub fn new(temp_url_key: impl Into<String>) -> Self {
        Self {
            temp_url_key: temp_url_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("temp_url_key", &Redact::from(&self.temp_url_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.temp_url_key.is_empty()
    }
}
