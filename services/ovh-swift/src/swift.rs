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
use crate::container::{Container, Metadata};
use crate::keystone::{KeystoneAuth, Session};
use crate::Config;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use log::debug;
use ovhsign_core::utils::Redact;
use ovhsign_core::{Context, Error, Result};
use percent_encoding::utf8_percent_encode;
use std::fmt::{Debug, Formatter};

/// SwiftContainer talks to a Swift container over HTTP with an auth token.
#[derive(Clone)]
pub struct SwiftContainer {
    ctx: Context,
    storage_url: String,
    name: String,
    token: String,
}

impl Debug for SwiftContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwiftContainer")
            .field("storage_url", &self.storage_url)
            .field("name", &self.name)
            .field("token", &Redact::hidden(&self.token))
            .finish()
    }
}

impl SwiftContainer {
    /// Create a container client.
    ///
    /// `storage_url` is the account URL,
    /// `https://storage.{region}.cloud.ovh.net/v1/AUTH_{project}`.
    pub fn new(
        ctx: Context,
        storage_url: impl Into<String>,
        name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            storage_url: storage_url.into(),
            name: name.into(),
            token: token.into(),
        }
    }

    /// Create a container client from an authenticated Keystone session.
    pub fn from_session(ctx: Context, session: &Session, container_name: &str) -> Self {
        Self::new(ctx, &session.storage_url, container_name, &session.token)
    }

    /// Authenticate against Keystone and open the configured container.
    pub async fn connect(ctx: Context, config: &Config) -> Result<Self> {
        let session = KeystoneAuth::from_config(config)?
            .authenticate(&ctx)
            .await?;
        Ok(Self::from_session(ctx, &session, config.container_name()))
    }

    fn container_url(&self) -> String {
        format!(
            "{}/{}",
            self.storage_url.trim_end_matches('/'),
            utf8_percent_encode(&self.name, OBJECT_PATH_ENCODE_SET)
        )
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.container_url(),
            utf8_percent_encode(path.trim_start_matches('/'), OBJECT_PATH_ENCODE_SET)
        )
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
    ) -> Result<http::Response<Bytes>> {
        let mut req = http::Request::builder()
            .method(method.clone())
            .uri(url)
            .body(Bytes::new())?;
        req.headers_mut().extend(headers);
        req.headers_mut().insert(X_AUTH_TOKEN, {
            let mut value: http::HeaderValue = self.token.parse()?;
            value.set_sensitive(true);
            value
        });

        debug!("sending {method} {url}");
        self.ctx.http_send(req).await
    }
}

#[async_trait]
impl Container for SwiftContainer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn object_exists(&self, path: &str) -> Result<bool> {
        let url = self.object_url(path);
        let resp = self.send(Method::HEAD, &url, HeaderMap::new()).await?;

        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(status_error("HEAD object", status, &url)),
        }
    }

    async fn metadata(&self) -> Result<Metadata> {
        let url = self.container_url();
        let resp = self.send(Method::HEAD, &url, HeaderMap::new()).await?;

        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(parse_metadata(resp.headers())),
            StatusCode::NOT_FOUND => Err(Error::not_found(format!(
                "container {} does not exist",
                self.name
            ))),
            status => Err(status_error("HEAD container", status, &url)),
        }
    }

    async fn reset_metadata(&self, metadata: Metadata) -> Result<()> {
        let current = self.metadata().await?;

        let mut headers = HeaderMap::new();
        for key in current.keys() {
            if !metadata.keys().any(|k| k.eq_ignore_ascii_case(key)) {
                headers.insert(
                    http::HeaderName::try_from(format!(
                        "{X_REMOVE_CONTAINER_META_PREFIX}{}",
                        key.to_ascii_lowercase()
                    ))?,
                    http::HeaderValue::from_static("x"),
                );
            }
        }
        for (key, value) in &metadata {
            headers.insert(
                http::HeaderName::try_from(format!(
                    "{X_CONTAINER_META_PREFIX}{}",
                    key.to_ascii_lowercase()
                ))?,
                value.parse()?,
            );
        }

        let url = self.container_url();
        let resp = self.send(Method::POST, &url, headers).await?;
        match resp.status() {
            StatusCode::NO_CONTENT | StatusCode::OK | StatusCode::ACCEPTED => Ok(()),
            status => Err(status_error("POST container", status, &url)),
        }
    }
}

/// Collect `X-Container-Meta-*` headers, restoring the `Temp-Url-Key`
/// style casing Swift drops on the wire.
fn parse_metadata(headers: &HeaderMap) -> Metadata {
    headers
        .iter()
        .filter_map(|(k, v)| {
            let key = k.as_str().strip_prefix(X_CONTAINER_META_PREFIX)?;
            let value = v.to_str().ok()?;
            Some((title_case(key), value.to_string()))
        })
        .collect()
}

fn title_case(key: &str) -> String {
    key.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub(crate) fn status_error(op: &str, status: StatusCode, url: &str) -> Error {
    let err = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::credential_invalid(format!("{op} was refused with {status}"))
        }
        _ => Error::unexpected(format!("{op} failed with {status}")),
    };

    err.with_context(format!("url: {url}")).set_retryable(
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
    )
}
