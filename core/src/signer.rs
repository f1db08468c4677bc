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

use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Signer is the main struct used to sign the request.
///
/// It caches the last valid credential and only goes back to its provider
/// once that credential stops being valid.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    signer: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        signer: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            signer: Arc::new(signer),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Drop the cached credential so the next call reloads it.
    ///
    /// Call this after the temp url key has been rotated.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.credential.lock() {
            *guard = None;
        }
    }

    /// Signing request.
    pub async fn sign(
        &self,
        req: &mut http::request::Parts,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let credential = self
            .credential
            .lock()
            .map_err(|_| Error::unexpected("signer credential lock poisoned"))?
            .clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            let loaded = self.provider.provide_credential(&self.ctx).await?;
            *self
                .credential
                .lock()
                .map_err(|_| Error::unexpected("signer credential lock poisoned"))? =
                loaded.clone();
            loaded
        };

        self.signer
            .sign_request(&self.ctx, req, credential.as_ref(), expires_in)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential(String);

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[derive(Debug)]
    struct TestProvider(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl ProvideCredential for TestProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TestCredential("my-key".to_string())))
        }
    }

    #[derive(Debug)]
    struct TestSignRequest;

    #[async_trait::async_trait]
    impl SignRequest for TestSignRequest {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut http::request::Parts,
            credential: Option<&Self::Credential>,
            _: Option<Duration>,
        ) -> Result<()> {
            let cred = credential.ok_or_else(|| Error::credential_invalid("missing"))?;
            req.headers.insert("x-test-key", cred.0.parse()?);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_signer_caches_credential() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            TestProvider(calls.clone()),
            TestSignRequest,
        );

        for _ in 0..3 {
            let (mut parts, _) = http::Request::builder()
                .uri("https://example.com/hello")
                .body(())?
                .into_parts();
            signer.sign(&mut parts, None).await?;
            assert_eq!(parts.headers["x-test-key"], "my-key");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        signer.invalidate();
        let (mut parts, _) = http::Request::builder()
            .uri("https://example.com/hello")
            .body(())?
            .into_parts();
        signer.sign(&mut parts, None).await?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
