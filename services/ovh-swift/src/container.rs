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

use async_trait::async_trait;
use ovhsign_core::Result;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Container metadata key holding the temp url key.
pub const META_TEMP_URL_KEY: &str = "Temp-Url-Key";
/// Container metadata key holding the CORS allowed origins.
pub const META_ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// Container metadata key holding the CORS preflight cache duration.
pub const META_ACCESS_CONTROL_MAX_AGE: &str = "Access-Control-Max-Age";

/// Container metadata, keyed by the names above.
pub type Metadata = BTreeMap<String, String>;

/// Container is the object store collaborator the signing layer relies on
/// for existence checks and metadata administration.
///
/// Implementations own their network behaviour. Errors they return are
/// propagated to callers unchanged.
#[async_trait]
pub trait Container: Debug + Send + Sync + 'static {
    /// Name of the container.
    fn name(&self) -> &str;

    /// Check whether an object exists at `path`.
    async fn object_exists(&self, path: &str) -> Result<bool>;

    /// Fetch the container metadata.
    async fn metadata(&self) -> Result<Metadata>;

    /// Replace the container metadata: keys absent from `metadata` are
    /// removed, every other key is set.
    async fn reset_metadata(&self, metadata: Metadata) -> Result<()>;
}

#[async_trait]
impl<T: Container + ?Sized> Container for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn object_exists(&self, path: &str) -> Result<bool> {
        (**self).object_exists(path).await
    }

    async fn metadata(&self) -> Result<Metadata> {
        (**self).metadata().await
    }

    async fn reset_metadata(&self, metadata: Metadata) -> Result<()> {
        (**self).reset_metadata(metadata).await
    }
}
