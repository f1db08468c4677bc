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

use crate::{Error, Result};
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;
use std::borrow::Cow;
use std::mem;
use std::str::FromStr;

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, as sent on the wire.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Query pairs are form encoded again on the way out.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = if self.query.is_empty() {
                    self.path
                } else {
                    let query = form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(self.query.iter())
                        .finish();
                    format!("{}?{}", self.path, query)
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Cow<'_, str> {
        percent_encoding::percent_decode_str(&self.path).decode_utf8_lossy()
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Remove every query pair with the given key.
    pub fn query_remove(&mut self, key: &str) {
        self.query.retain(|(k, _)| k != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_and_apply_round_trip_query() -> Result<()> {
        let (mut parts, _) = http::Request::builder()
            .method(Method::PUT)
            .uri("https://storage.gra.cloud.ovh.net/v1/AUTH_p/c/hello%20world.txt?inline&filename=a%20b")
            .body(())?
            .into_parts();

        let mut req = SigningRequest::build(&mut parts)?;
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.path, "/v1/AUTH_p/c/hello%20world.txt");
        assert_eq!(req.path_percent_decoded(), "/v1/AUTH_p/c/hello world.txt");
        assert_eq!(
            req.query,
            vec![
                ("inline".to_string(), "".to_string()),
                ("filename".to_string(), "a b".to_string())
            ]
        );

        req.query_remove("inline");
        req.query_push("temp_url_expires", "1700000000");
        req.apply(&mut parts)?;

        assert_eq!(
            parts.uri.to_string(),
            "https://storage.gra.cloud.ovh.net/v1/AUTH_p/c/hello%20world.txt?filename=a+b&temp_url_expires=1700000000"
        );
        Ok(())
    }

    #[test]
    fn test_build_without_authority() {
        let (mut parts, _) = http::Request::builder()
            .uri("/v1/AUTH_p/c/hello")
            .body(())
            .expect("request must build")
            .into_parts();

        let err = SigningRequest::build(&mut parts).expect_err("must fail");
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }
}
