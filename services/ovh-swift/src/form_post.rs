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

//! Swift FormPost signing.
//!
//! - [FormPost middleware](https://docs.openstack.org/swift/latest/api/form_post_middleware.html)

use crate::constants::*;
use crate::temp_url::require_temp_url_key;
use crate::{Config, EndpointResolver};
use log::debug;
use ovhsign_core::hash::hex_hmac_sha1;
use ovhsign_core::time::{now, DateTime};
use ovhsign_core::{Error, Result};

/// Limits of a FormPost upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPostOptions {
    /// URL the browser is redirected to after the upload, empty for none.
    pub redirect: String,
    /// Maximum number of files in one upload.
    pub max_file_count: u64,
    /// Maximum size of each file, in bytes.
    pub max_file_size: u64,
}

impl Default for FormPostOptions {
    fn default() -> Self {
        Self {
            redirect: String::new(),
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Everything a browser needs to upload directly into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPostForm {
    /// Form `action`: the object URL of the upload prefix.
    pub action: String,
    /// Hidden inputs in the order the middleware documents them.
    pub fields: Vec<(&'static str, String)>,
}

/// FormPostSigner authorizes bounded browser uploads.
///
/// Unlike TempURL, the expiration is validated eagerly and must lie in the
/// future.
#[derive(Debug, Clone, Copy)]
pub struct FormPostSigner<'a> {
    config: &'a Config,
    time: Option<DateTime>,
}

impl<'a> FormPostSigner<'a> {
    /// Create a signer for the given config.
    pub fn new(config: &'a Config) -> Self {
        Self { config, time: None }
    }

    /// Specify the current time.
    ///
    /// # Note
    ///
    /// We should always take current time to check expirations.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Compute the FormPost signature for uploads below `path`.
    ///
    /// Fails with `ConfigInvalid` if the temp url key is not set, then with
    /// `ArgumentInvalid` if `expires_at` is not in the future.
    pub fn signature(
        &self,
        path: &str,
        expires_at: DateTime,
        opts: &FormPostOptions,
    ) -> Result<String> {
        let key = require_temp_url_key(self.config)?;

        let now = self.time.unwrap_or_else(now);
        if expires_at <= now {
            return Err(Error::argument_invalid("expiration must be in the future")
                .with_context(format!("expires_at: {}", expires_at.to_rfc3339()))
                .with_context(format!("now: {}", now.to_rfc3339())));
        }

        let code_path = EndpointResolver::new(self.config).code_path(path);
        Ok(sign(key, &code_path, opts, expires_at.timestamp()))
    }

    /// Build the complete upload form for `path`.
    pub fn form(
        &self,
        path: &str,
        expires_at: DateTime,
        opts: &FormPostOptions,
    ) -> Result<FormPostForm> {
        let signature = self.signature(path, expires_at, opts)?;

        Ok(FormPostForm {
            action: EndpointResolver::new(self.config).resolve_object_url(path),
            fields: vec![
                ("redirect", opts.redirect.clone()),
                ("max_file_size", opts.max_file_size.to_string()),
                ("max_file_count", opts.max_file_count.to_string()),
                ("expires", expires_at.timestamp().to_string()),
                ("signature", signature),
            ],
        })
    }
}

/// Compute the FormPost signature.
///
/// The canonical string is
/// `{code_path}\n{redirect}\n{max_file_size}\n{max_file_count}\n{expires}`.
pub fn sign(key: &str, code_path: &str, opts: &FormPostOptions, expires: i64) -> String {
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}\n{}",
        code_path, opts.redirect, opts.max_file_size, opts.max_file_count, expires
    );
    debug!("form post string to sign: {string_to_sign:?}");

    hex_hmac_sha1(key.as_bytes(), string_to_sign.as_bytes())
}
