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

//! Signed URLs and FormPost signatures for OVH Swift object storage.
//!
//! This crate bundles [`ovhsign_core`] with the service crates behind
//! feature flags:
//!
//! - `ovh-swift`: [`ovh_swift`], TempURL, FormPost and container administration.
//! - `default-context`: [`default_context`], a [`Context`] reading the process
//!   environment and sending requests with `reqwest`.
//!
//! ```no_run
//! # async fn example() -> ovhsign::Result<()> {
//! use std::time::Duration;
//!
//! let signer = ovhsign::ovh_swift::default_signer();
//!
//! let req = http::Request::get(
//!     "https://storage.gra.cloud.ovh.net/v1/AUTH_project/my-container/hello.jpg",
//! )
//! .body(())?;
//! let (mut parts, _) = req.into_parts();
//! signer.sign(&mut parts, Some(Duration::from_secs(3600))).await?;
//! println!("{}", parts.uri);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use ovhsign_core::*;

/// Build a context reading the process environment and sending requests
/// with a default `reqwest::Client`.
#[cfg(feature = "default-context")]
pub fn default_context() -> Context {
    Context::new()
        .with_env(OsEnv)
        .with_http_send(ovhsign_http_send_reqwest::ReqwestHttpSend::default())
}

/// OVH Swift signing.
#[cfg(feature = "ovh-swift")]
pub mod ovh_swift;
