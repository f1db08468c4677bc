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

use crate::constants::*;
use crate::temp_url;
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use log::debug;
use ovhsign_core::time::{add_duration, now, DateTime};
use ovhsign_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};
use std::time::Duration;

/// RequestSigner presigns Swift object requests with TempURL query
/// parameters.
///
/// The request URI must address the object on the storage cluster itself,
/// `https://storage.{region}.cloud.ovh.net/v1/AUTH_{project}/{container}/{object}`,
/// since its path is what the TempURL middleware verifies. Only query
/// signing exists for TempURL, so `expires_in` is mandatory.
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        parts: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential.filter(|c| c.is_valid()) else {
            return Err(Error::config_invalid(
                "no temp url key available to sign request",
            ));
        };
        let Some(expires_in) = expires_in else {
            return Err(Error::argument_invalid(
                "swift temp url requires an expiration, header signing is not supported",
            ));
        };

        let mut req = SigningRequest::build(parts)?;

        let code_path = req.path_percent_decoded().to_string();
        if !code_path.starts_with("/v1/") {
            return Err(Error::argument_invalid(
                "request path is not a swift object path",
            )
            .with_context(format!("path: {code_path}")));
        }

        let expires = add_duration(self.time.unwrap_or_else(now), expires_in)?.timestamp();
        let signature = temp_url::sign(&cred.temp_url_key, &req.method, expires, &code_path);
        debug!("signed {} {code_path} until {expires}", req.method);

        req.query_remove(TEMP_URL_SIG);
        req.query_remove(TEMP_URL_EXPIRES);
        req.query_push(TEMP_URL_SIG, signature);
        req.query_push(TEMP_URL_EXPIRES, expires.to_string());

        req.apply(parts)
    }
}
