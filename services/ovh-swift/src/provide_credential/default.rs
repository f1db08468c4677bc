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

use crate::provide_credential::EnvCredentialProvider;
use crate::Credential;
use async_trait::async_trait;
use ovhsign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

/// DefaultCredentialProvider will try to load credential from different sources.
///
/// Resolution order:
///
/// 1. Providers added with [`DefaultCredentialProvider::push`]
/// 2. Environment variables
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    extra: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider.
    pub fn new() -> Self {
        Self {
            extra: ProvideCredentialChain::new(),
        }
    }

    /// Add a provider tried before the environment.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        self.extra = self.extra.push(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(cred) = self.extra.provide_credential(ctx).await? {
            return Ok(Some(cred));
        }
        EnvCredentialProvider::new().provide_credential(ctx).await
    }
}
