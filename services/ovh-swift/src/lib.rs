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

//! OVH Swift temporary access signing.
//!
//! This crate builds the public, existence-confirmed and signed URLs of an
//! OVH public cloud object storage container:
//!
//! - [`TempUrlSigner`] produces Swift TempURLs granting time limited access to one object.
//! - [`FormPostSigner`] authorizes bounded browser uploads through the FormPost middleware.
//! - [`RequestSigner`] presigns arbitrary [`http::Request`]s via [`ovhsign_core::Signer`].
//! - [`OvhSwiftAdapter`] composes them with a [`Container`] and applies the path prefix.
//!
//! Provisioning of the temp url key and CORS settings lives in
//! [`set_temp_url_key`] and [`set_cors_headers`], talking to the storage
//! through [`SwiftContainer`] after a [`KeystoneAuth`] login.
//!
//! ## Example
//!
//! ```no_run
//! use ovhsign_core::time::{add_duration, now};
//! use ovhsign_core::{Context, OsEnv, Result};
//! use ovhsign_ovh_swift::{Config, ConfigOptions, TempUrlOptions, TempUrlSigner};
//! use std::time::Duration;
//!
//! fn main() -> Result<()> {
//!     let ctx = Context::new().with_env(OsEnv);
//!     let config = Config::new(ConfigOptions::default().from_env(&ctx))?;
//!
//!     let expires_at = add_duration(now(), Duration::from_secs(3600))?;
//!     let url = TempUrlSigner::new(&config).temporary_url(
//!         "hello.jpg",
//!         expires_at,
//!         &TempUrlOptions::default(),
//!     )?;
//!     println!("{url}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;
pub use config::ConfigOptions;

mod credential;
pub use credential::Credential;

mod endpoint;
pub use endpoint::EndpointResolver;

pub mod temp_url;
pub use temp_url::TempUrlOptions;
pub use temp_url::TempUrlSigner;

pub mod form_post;
pub use form_post::FormPostForm;
pub use form_post::FormPostOptions;
pub use form_post::FormPostSigner;

mod sign_request;
pub use sign_request::RequestSigner;

mod container;
pub use container::Container;
pub use container::Metadata;
pub use container::META_ACCESS_CONTROL_ALLOW_ORIGIN;
pub use container::META_ACCESS_CONTROL_MAX_AGE;
pub use container::META_TEMP_URL_KEY;

mod swift;
pub use swift::SwiftContainer;

mod keystone;
pub use keystone::KeystoneAuth;
pub use keystone::Session;

mod admin;
pub use admin::generate_temp_url_key;
pub use admin::set_cors_headers;
pub use admin::set_temp_url_key;
pub use admin::KeyRotation;

mod adapter;
pub use adapter::OvhSwiftAdapter;
pub use adapter::WriteOptions;

mod provide_credential;
pub use provide_credential::*;
