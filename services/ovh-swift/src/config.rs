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
use log::warn;
use ovhsign_core::utils::Redact;
use ovhsign_core::{Context, Error, Result};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// Raw, unvalidated options for an OVH Swift storage.
///
/// Every field is optional here, [`Config::new`] is where required fields
/// are enforced. Keys are accepted in camelCase so the options can be
/// deserialized straight from the host framework's disk definition.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOptions {
    /// Keystone identity endpoint, for example `https://auth.cloud.ovh.net/v3`.
    pub auth_url: Option<String>,
    /// Cloud project (tenant) id.
    pub project_id: Option<String>,
    /// Data-center region code such as `GRA` or `SBG`.
    pub region: Option<String>,
    /// User domain, defaults to `Default`.
    pub user_domain: Option<String>,
    /// OpenStack user name.
    pub username: Option<String>,
    /// OpenStack user password.
    pub password: Option<String>,
    /// Object container name.
    pub container_name: Option<String>,
    /// Shared secret for TempURL and FormPost signatures.
    pub temp_url_key: Option<String>,
    /// Custom endpoint replacing the templated storage URL.
    pub endpoint: Option<String>,
    /// Default object expiry in seconds applied on write.
    pub delete_after: Option<u64>,
    /// Prefix applied to every object path.
    pub prefix: Option<String>,
}

impl Debug for ConfigOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOptions")
            .field("auth_url", &self.auth_url)
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("user_domain", &self.user_domain)
            .field("username", &self.username)
            .field("password", &Redact::hidden(&self.password))
            .field("container_name", &self.container_name)
            .field("temp_url_key", &Redact::from(&self.temp_url_key))
            .field("endpoint", &self.endpoint)
            .field("delete_after", &self.delete_after)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl ConfigOptions {
    /// Load options from environment variables.
    ///
    /// Values already set take precedence over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        let get = |key: &str| envs.get(key).cloned();

        self.auth_url = self.auth_url.or_else(|| get(OVH_AUTH_URL));
        self.project_id = self.project_id.or_else(|| get(OVH_PROJECT_ID));
        self.region = self.region.or_else(|| get(OVH_REGION));
        self.user_domain = self.user_domain.or_else(|| get(OVH_USER_DOMAIN));
        self.username = self.username.or_else(|| get(OVH_USERNAME));
        self.password = self.password.or_else(|| get(OVH_PASSWORD));
        self.container_name = self.container_name.or_else(|| get(OVH_CONTAINER_NAME));
        self.temp_url_key = self.temp_url_key.or_else(|| get(OVH_TEMP_URL_KEY));
        self.endpoint = self.endpoint.or_else(|| get(OVH_CUSTOM_ENDPOINT));
        self.prefix = self.prefix.or_else(|| get(OVH_PREFIX));

        if self.delete_after.is_none() {
            if let Some(v) = get(OVH_DELETE_AFTER) {
                match v.parse::<u64>() {
                    Ok(secs) => self.delete_after = Some(secs),
                    Err(e) => warn!("ignoring invalid {OVH_DELETE_AFTER} {v:?}: {e}"),
                }
            }
        }

        self
    }
}

/// Validated configuration of an OVH Swift storage.
///
/// `auth_url`, `project_id`, `region` and `container_name` are guaranteed to
/// be non-empty. The temp url key and the custom endpoint are optional and
/// checked by the operations that need them.
#[derive(Clone)]
pub struct Config {
    auth_url: String,
    project_id: String,
    region: String,
    user_domain: String,
    username: Option<String>,
    password: Option<String>,
    container_name: String,
    temp_url_key: Option<String>,
    endpoint: Option<String>,
    delete_after: Option<u64>,
    prefix: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("auth_url", &self.auth_url)
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("user_domain", &self.user_domain)
            .field("username", &self.username)
            .field("password", &Redact::hidden(&self.password))
            .field("container_name", &self.container_name)
            .field("temp_url_key", &Redact::from(&self.temp_url_key))
            .field("endpoint", &self.endpoint)
            .field("delete_after", &self.delete_after)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl TryFrom<ConfigOptions> for Config {
    type Error = Error;

    fn try_from(opts: ConfigOptions) -> Result<Self> {
        Self::new(opts)
    }
}

impl Config {
    /// Validate options and build the config.
    ///
    /// Fails with `ConfigInvalid` listing every missing required key.
    pub fn new(opts: ConfigOptions) -> Result<Self> {
        let required = [
            ("authUrl", &opts.auth_url),
            ("projectId", &opts.project_id),
            ("region", &opts.region),
            ("containerName", &opts.container_name),
        ];
        let missing = required
            .iter()
            .filter(|(_, v)| v.as_deref().map_or(true, str::is_empty))
            .map(|(k, _)| *k)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(Error::config_invalid(format!(
                "the following keys must be provided: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            auth_url: opts.auth_url.unwrap_or_default(),
            project_id: opts.project_id.unwrap_or_default(),
            region: opts.region.unwrap_or_default(),
            user_domain: non_empty(opts.user_domain)
                .unwrap_or_else(|| DEFAULT_USER_DOMAIN.to_string()),
            username: non_empty(opts.username),
            password: non_empty(opts.password),
            container_name: opts.container_name.unwrap_or_default(),
            temp_url_key: non_empty(opts.temp_url_key),
            endpoint: non_empty(opts.endpoint),
            delete_after: opts.delete_after,
            prefix: non_empty(opts.prefix),
        })
    }

    /// Keystone identity endpoint.
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Cloud project id.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Region code.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// User domain used for Keystone authentication.
    pub fn user_domain(&self) -> &str {
        &self.user_domain
    }

    /// OpenStack user name, if configured.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// OpenStack password, if configured.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Container name.
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Temp url key, `None` when not provisioned yet.
    pub fn temp_url_key(&self) -> Option<&str> {
        self.temp_url_key.as_deref()
    }

    /// Custom endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Default object expiry in seconds.
    pub fn delete_after(&self) -> Option<u64> {
        self.delete_after
    }

    /// Path prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Replace the temp url key after it has been rotated on the container.
    ///
    /// Not synchronized: callers sharing the config across threads must
    /// serialize rotation with signing themselves.
    pub fn rotate_temp_url_key(&mut self, key: impl Into<String>) {
        self.temp_url_key = non_empty(Some(key.into()));
    }

    /// Replace the custom endpoint. `None` or an empty string restores the
    /// templated OVH URL.
    pub fn set_endpoint(&mut self, endpoint: Option<String>) {
        self.endpoint = non_empty(endpoint);
    }

    /// Strip the leading slash from `path` and prepend the configured prefix.
    pub fn apply_prefix(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{path}"),
            _ => path.to_string(),
        }
    }

    /// Inverse of [`Config::apply_prefix`] for object names read back from
    /// the container.
    pub fn remove_prefix<'a>(&self, location: &'a str) -> &'a str {
        match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => location
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(location),
            _ => location,
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|v| !v.is_empty())
}
