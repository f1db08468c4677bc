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

//! Swift TempURL signing.
//!
//! - [TempURL middleware](https://docs.openstack.org/swift/latest/api/temporary_url_middleware.html)
//! - [OVH: share an object via a temporary URL](https://help.ovhcloud.com/csm/en-public-cloud-storage-pcs-share-object-tempurl)

use crate::constants::*;
use crate::{Config, EndpointResolver};
use http::Method;
use log::debug;
use ovhsign_core::hash::hex_hmac_sha1;
use ovhsign_core::time::DateTime;
use ovhsign_core::{Error, Result};

/// Options of a temporary URL.
#[derive(Debug, Clone)]
pub struct TempUrlOptions {
    /// HTTP method the URL grants, `GET` by default.
    pub method: Method,
}

impl Default for TempUrlOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
        }
    }
}

impl TempUrlOptions {
    /// Options granting the given method.
    pub fn with_method(method: Method) -> Self {
        Self { method }
    }
}

/// TempUrlSigner builds time limited URLs for single objects.
///
/// Expirations are passed through untouched: a URL that is already expired
/// is still produced and the storage rejects it at use time.
#[derive(Debug, Clone, Copy)]
pub struct TempUrlSigner<'a> {
    config: &'a Config,
}

impl<'a> TempUrlSigner<'a> {
    /// Create a signer for the given config.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the temporary URL of the object at `path`.
    ///
    /// Fails with `ConfigInvalid` if the temp url key is not set.
    pub fn temporary_url(
        &self,
        path: &str,
        expires_at: DateTime,
        opts: &TempUrlOptions,
    ) -> Result<String> {
        let key = require_temp_url_key(self.config)?;

        let path = path.trim_start_matches('/');
        let resolver = EndpointResolver::new(self.config);
        let expires = expires_at.timestamp();
        let signature = sign(key, &opts.method, expires, &resolver.code_path(path));

        Ok(format!(
            "{}?{TEMP_URL_SIG}={signature}&{TEMP_URL_EXPIRES}={expires}",
            resolver.resolve_object_url(path)
        ))
    }
}

/// Compute the TempURL signature.
///
/// The canonical string is `{method}\n{expires}\n{code_path}` where
/// `expires` is in unix seconds and `code_path` is the
/// `/v1/AUTH_{project}/{container}/{object}` path.
pub fn sign(key: &str, method: &Method, expires: i64, code_path: &str) -> String {
    let string_to_sign = format!("{}\n{}\n{}", method.as_str(), expires, code_path);
    debug!("temp url string to sign: {string_to_sign:?}");

    hex_hmac_sha1(key.as_bytes(), string_to_sign.as_bytes())
}

/// Return the temp url key or the `ConfigInvalid` error naming the container.
pub(crate) fn require_temp_url_key(config: &Config) -> Result<&str> {
    config.temp_url_key().ok_or_else(|| {
        Error::config_invalid(format!(
            "no temp url key set for container {}",
            config.container_name()
        ))
        .with_context("provision one with set_temp_url_key before signing")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigOptions;
    use ovhsign_core::time::from_timestamp;
    use ovhsign_core::ErrorKind;
    use pretty_assertions::assert_eq;

    fn config(key: Option<&str>) -> Config {
        Config::new(ConfigOptions {
            auth_url: Some("https://auth.cloud.ovh.net/v3".to_string()),
            project_id: Some("AwesomeProject".to_string()),
            region: Some("TestingGround".to_string()),
            container_name: Some("my-container".to_string()),
            temp_url_key: key.map(|v| v.to_string()),
            ..Default::default()
        })
        .expect("config must be valid")
    }

    #[test]
    fn test_sign_golden_vector() {
        assert_eq!(
            sign(
                "my-key",
                &Method::GET,
                1700000000,
                "/v1/AUTH_AwesomeProject/my-container/hello.jpg"
            ),
            "11051f4f4a8298bdeafa98d2b98717273f6cf084"
        );
        assert_eq!(
            sign(
                "my-key",
                &Method::PUT,
                1700000000,
                "/v1/AUTH_AwesomeProject/my-container/hello.jpg"
            ),
            "c84fb44046b165b02d034b1b864bec04122a447b"
        );
    }

    #[test]
    fn test_temporary_url() -> Result<()> {
        let cfg = config(Some("my-key"));
        let url = TempUrlSigner::new(&cfg).temporary_url(
            "/hello.jpg",
            from_timestamp(1700000000)?,
            &TempUrlOptions::default(),
        )?;

        assert_eq!(
            url,
            "https://storage.TestingGround.cloud.ovh.net/v1/AUTH_AwesomeProject/my-container/hello.jpg?temp_url_sig=11051f4f4a8298bdeafa98d2b98717273f6cf084&temp_url_expires=1700000000"
        );
        Ok(())
    }

    #[test]
    fn test_temporary_url_custom_endpoint_keeps_code_path() -> Result<()> {
        let mut cfg = config(Some("my-key"));
        cfg.set_endpoint(Some("http://custom.endpoint/".to_string()));

        let url = TempUrlSigner::new(&cfg).temporary_url(
            "hello.jpg",
            from_timestamp(1700000000)?,
            &TempUrlOptions::with_method(Method::PUT),
        )?;

        assert_eq!(
            url,
            "http://custom.endpoint/hello.jpg?temp_url_sig=c84fb44046b165b02d034b1b864bec04122a447b&temp_url_expires=1700000000"
        );
        Ok(())
    }

    #[test]
    fn test_temporary_url_accepts_past_expiration() -> Result<()> {
        let cfg = config(Some("my-key"));
        let url = TempUrlSigner::new(&cfg).temporary_url(
            "hello.jpg",
            from_timestamp(1)?,
            &TempUrlOptions::default(),
        )?;

        assert!(url.ends_with("&temp_url_expires=1"));
        Ok(())
    }

    #[test]
    fn test_temporary_url_without_key() -> Result<()> {
        let cfg = config(None);
        let err = TempUrlSigner::new(&cfg)
            .temporary_url(
                "hello.jpg",
                from_timestamp(1700000000)?,
                &TempUrlOptions::default(),
            )
            .expect_err("must fail without key");

        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains("my-container"));
        Ok(())
    }
}
