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

//! Keystone v3 password authentication.
//!
//! - [Identity API v3: password authentication with scoped authorization](https://docs.openstack.org/api-ref/identity/v3/#password-authentication-with-scoped-authorization)

use crate::constants::*;
use crate::swift::status_error;
use crate::{Config, EndpointResolver};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use log::debug;
use ovhsign_core::time::{parse_rfc3339, DateTime};
use ovhsign_core::utils::Redact;
use ovhsign_core::{Context, Error, Result};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter};

/// Authenticated Keystone session.
#[derive(Clone)]
pub struct Session {
    /// Token sent as `X-Auth-Token` to the storage.
    pub token: String,
    /// Public object-store account URL for the configured region.
    pub storage_url: String,
    /// Expiration of the token, if Keystone reported one.
    pub expires_at: Option<DateTime>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &Redact::hidden(&self.token))
            .field("storage_url", &self.storage_url)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// KeystoneAuth exchanges user credentials for a project scoped token.
#[derive(Clone)]
pub struct KeystoneAuth {
    auth_url: String,
    user_domain: String,
    username: String,
    password: String,
    project_id: String,
    region: String,
    fallback_storage_url: String,
}

impl Debug for KeystoneAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoneAuth")
            .field("auth_url", &self.auth_url)
            .field("user_domain", &self.user_domain)
            .field("username", &self.username)
            .field("password", &Redact::hidden(&self.password))
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .finish()
    }
}

impl KeystoneAuth {
    /// Build the authenticator from config.
    ///
    /// Fails with `ConfigInvalid` when the user name or password is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (Some(username), Some(password)) = (config.username(), config.password()) else {
            return Err(Error::config_invalid(
                "username and password are required to authenticate against keystone",
            ));
        };

        Ok(Self {
            auth_url: config.auth_url().to_string(),
            user_domain: config.user_domain().to_string(),
            username: username.to_string(),
            password: password.to_string(),
            project_id: config.project_id().to_string(),
            region: config.region().to_string(),
            fallback_storage_url: EndpointResolver::new(config).account_url(),
        })
    }

    /// Authenticate and resolve the storage URL of the configured region.
    pub async fn authenticate(&self, ctx: &Context) -> Result<Session> {
        let url = format!("{}/auth/tokens", self.auth_url.trim_end_matches('/'));
        let body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": self.username,
                            "domain": { "name": self.user_domain },
                            "password": self.password,
                        }
                    }
                },
                "scope": {
                    "project": { "id": self.project_id }
                }
            }
        });
        let body = serde_json::to_vec(&body)
            .map_err(|e| Error::unexpected("failed to encode auth request").with_source(e))?;

        let req = http::Request::builder()
            .method(Method::POST)
            .uri(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))?;

        debug!("authenticating {} against {url}", self.username);
        let resp = ctx.http_send_as_string(req).await?;
        let status = resp.status();
        if status != StatusCode::CREATED {
            let err = if status.is_server_error() {
                status_error("keystone authentication", status, &url)
            } else {
                Error::credential_invalid(format!(
                    "keystone rejected the credentials with {status}"
                ))
                .with_context(format!("url: {url}"))
            };
            return Err(err.with_context(format!("response: {}", resp.body())));
        }

        let token = resp
            .headers()
            .get(X_SUBJECT_TOKEN)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::unexpected("keystone response has no subject token"))?
            .to_string();

        let parsed: TokenResponse = serde_json::from_str(resp.body())
            .map_err(|e| Error::unexpected("failed to parse keystone token").with_source(e))?;

        let storage_url = parsed
            .token
            .object_store_url(&self.region)
            .unwrap_or_else(|| {
                debug!(
                    "no object-store endpoint for region {} in catalog, using {}",
                    self.region, self.fallback_storage_url
                );
                self.fallback_storage_url.clone()
            });
        let expires_at = match parsed.token.expires_at.as_deref() {
            Some(v) => Some(parse_rfc3339(v)?),
            None => None,
        };

        Ok(Session {
            token,
            storage_url,
            expires_at,
        })
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct TokenResponse {
    token: Token,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct Token {
    expires_at: Option<String>,
    catalog: Vec<CatalogEntry>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct CatalogEntry {
    #[serde(rename = "type")]
    kind: String,
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct CatalogEndpoint {
    interface: String,
    region: String,
    url: String,
}

impl Token {
    /// Public object-store endpoint whose region starts with `region`,
    /// an exact match winning over a prefix one.
    fn object_store_url(&self, region: &str) -> Option<String> {
        let region = region.to_ascii_lowercase();
        let endpoints = self
            .catalog
            .iter()
            .filter(|e| e.kind == "object-store")
            .flat_map(|e| e.endpoints.iter())
            .filter(|e| e.interface == "public")
            .collect::<Vec<_>>();

        endpoints
            .iter()
            .find(|e| e.region.to_ascii_lowercase() == region)
            .or_else(|| {
                endpoints
                    .iter()
                    .find(|e| e.region.to_ascii_lowercase().starts_with(&region))
            })
            .map(|e| e.url.clone())
    }
}
