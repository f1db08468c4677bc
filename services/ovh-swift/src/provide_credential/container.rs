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

use crate::container::{Container, META_TEMP_URL_KEY};
use crate::Credential;
use async_trait::async_trait;
use log::debug;
use ovhsign_core::{Context, ProvideCredential, Result};

/// ContainerCredentialProvider reads the temp url key straight from the
/// container metadata.
///
/// This needs a container authorized to read metadata, typically a
/// [`SwiftContainer`](crate::SwiftContainer) opened with Keystone.
#[derive(Debug)]
pub struct ContainerCredentialProvider<C: Container> {
    container: C,
}

impl<C: Container> ContainerCredentialProvider<C> {
    /// Create a provider reading from `container`.
    pub fn new(container: C) -> Self {
        Self { container }
    }
}

#[async_trait]
impl<C: Container + Unpin> ProvideCredential for ContainerCredentialProvider<C> {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let metadata = self.container.metadata().await?;

        let key = metadata
            .get(META_TEMP_URL_KEY)
            .filter(|v| !v.is_empty())
            .map(Credential::new);
        if key.is_none() {
            debug!("container {} has no temp url key", self.container.name());
        }
        Ok(key)
    }
}
