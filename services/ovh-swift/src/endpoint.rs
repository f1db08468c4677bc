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

use crate::Config;

/// EndpointResolver computes the public URLs of a container and its objects.
///
/// Resolution is pure string work: region, project id and container name are
/// interpolated verbatim.
#[derive(Debug, Clone, Copy)]
pub struct EndpointResolver<'a> {
    config: &'a Config,
}

impl<'a> EndpointResolver<'a> {
    /// Create a resolver for the given config.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Base URL of the container, always ending with exactly one `/`.
    ///
    /// A custom endpoint replaces the templated
    /// `https://storage.{region}.cloud.ovh.net/v1/AUTH_{project}/{container}/`
    /// URL entirely.
    pub fn resolve_base(&self) -> String {
        match self.config.endpoint() {
            Some(endpoint) => format!("{}/", endpoint.trim_end_matches('/')),
            None => format!("{}/{}/", self.account_url(), self.config.container_name()),
        }
    }

    /// Absolute URL of the object at `path`.
    pub fn resolve_object_url(&self, path: &str) -> String {
        let mut url = self.resolve_base();
        url.push_str(path.trim_start_matches('/'));
        url
    }

    /// Account URL on OVH's storage cluster, ignoring any custom endpoint.
    pub fn account_url(&self) -> String {
        format!(
            "https://storage.{}.cloud.ovh.net/v1/AUTH_{}",
            self.config.region(),
            self.config.project_id()
        )
    }

    /// Object path as the Swift middlewares see it, used in every canonical
    /// signing string: `/v1/AUTH_{project}/{container}/{path}`.
    pub fn code_path(&self, path: &str) -> String {
        format!(
            "/v1/AUTH_{}/{}/{}",
            self.config.project_id(),
            self.config.container_name(),
            path.trim_start_matches('/')
        )
    }
}
