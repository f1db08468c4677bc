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

use crate::admin::{generate_temp_url_key, set_temp_url_key, KeyRotation};
use crate::constants::*;
use crate::container::Container;
use crate::{
    Config, EndpointResolver, FormPostForm, FormPostOptions, FormPostSigner, TempUrlOptions,
    TempUrlSigner,
};
use http::{HeaderMap, HeaderValue};
use log::debug;
use ovhsign_core::time::DateTime;
use ovhsign_core::{Error, Result};

/// Object expiry requested for a single write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Delete the object this many seconds after the write.
    pub delete_after: Option<u64>,
    /// Delete the object at this point in time.
    pub delete_at: Option<DateTime>,
}

/// OvhSwiftAdapter exposes the URL and signing operations of one OVH Swift
/// container.
///
/// Every path goes through the configured prefix first, so URLs and
/// signatures always address the same object.
#[derive(Debug)]
pub struct OvhSwiftAdapter<C: Container> {
    config: Config,
    container: C,
}

impl<C: Container> OvhSwiftAdapter<C> {
    /// Compose an adapter from a validated config and its container.
    pub fn new(config: Config, container: C) -> Self {
        Self { config, container }
    }

    /// Configuration of the adapter.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Container of the adapter.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Public URL of the object at `path`.
    pub fn url(&self, path: &str) -> String {
        EndpointResolver::new(&self.config).resolve_object_url(&self.config.apply_prefix(path))
    }

    /// Public URL of the object at `path`, after checking it exists.
    ///
    /// Fails with `NotFound` if the container has no such object. Errors of
    /// the container are returned unchanged.
    pub async fn url_confirm(&self, path: &str) -> Result<String> {
        let location = self.config.apply_prefix(path);
        if !self.container.object_exists(&location).await? {
            return Err(Error::not_found(format!("object {path} does not exist"))
                .with_context(format!("container: {}", self.container.name())));
        }

        Ok(EndpointResolver::new(&self.config).resolve_object_url(&location))
    }

    /// Temporary URL of the object at `path`, see [`TempUrlSigner`].
    pub fn temporary_url(
        &self,
        path: &str,
        expires_at: DateTime,
        opts: &TempUrlOptions,
    ) -> Result<String> {
        TempUrlSigner::new(&self.config).temporary_url(
            &self.config.apply_prefix(path),
            expires_at,
            opts,
        )
    }

    /// FormPost signature for uploads below `path`, see [`FormPostSigner`].
    pub fn form_post_signature(
        &self,
        path: &str,
        expires_at: DateTime,
        opts: &FormPostOptions,
    ) -> Result<String> {
        FormPostSigner::new(&self.config).signature(
            &self.config.apply_prefix(path),
            expires_at,
            opts,
        )
    }

    /// FormPost upload form for `path`, see [`FormPostSigner::form`].
    pub fn form_post_form(
        &self,
        path: &str,
        expires_at: DateTime,
        opts: &FormPostOptions,
    ) -> Result<FormPostForm> {
        FormPostSigner::new(&self.config).form(&self.config.apply_prefix(path), expires_at, opts)
    }

    /// Provision a fresh temp url key on the container and start signing
    /// with it.
    ///
    /// Without `force` a key already set on the container is kept and
    /// adopted instead.
    pub async fn rotate_temp_url_key(&mut self, force: bool) -> Result<KeyRotation> {
        let (rotation, key) =
            set_temp_url_key(&self.container, &generate_temp_url_key(), force).await?;

        self.config.rotate_temp_url_key(key);
        debug!(
            "temp url key of container {} is {rotation:?}",
            self.container.name()
        );
        Ok(rotation)
    }

    /// Swift object expiry headers for a write.
    ///
    /// An explicit `delete_after` wins over `delete_at`, which wins over the
    /// configured default `delete_after`.
    pub fn write_headers(&self, opts: &WriteOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(secs) = opts.delete_after {
            headers.insert(X_DELETE_AFTER, HeaderValue::from(secs));
        } else if let Some(at) = opts.delete_at {
            headers.insert(X_DELETE_AT, HeaderValue::from(at.timestamp()));
        } else if let Some(secs) = self.config.delete_after() {
            headers.insert(X_DELETE_AFTER, HeaderValue::from(secs));
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Metadata, META_TEMP_URL_KEY};
    use crate::ConfigOptions;
    use async_trait::async_trait;
    use ovhsign_core::time::from_timestamp;
    use ovhsign_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct MockContainer {
        objects: Vec<&'static str>,
        metadata: Mutex<Metadata>,
        metadata_reads: Mutex<usize>,
        probed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Container for MockContainer {
        fn name(&self) -> &str {
            "my-container"
        }

        async fn object_exists(&self, path: &str) -> Result<bool> {
            self.probed.lock().unwrap().push(path.to_string());
            Ok(self.objects.iter().any(|o| *o == path))
        }

        async fn metadata(&self) -> Result<Metadata> {
            *self.metadata_reads.lock().unwrap() += 1;
            Ok(self.metadata.lock().unwrap().clone())
        }

        async fn reset_metadata(&self, metadata: Metadata) -> Result<()> {
            *self.metadata.lock().unwrap() = metadata;
            Ok(())
        }
    }

    fn adapter(prefix: Option<&str>, objects: Vec<&'static str>) -> OvhSwiftAdapter<MockContainer> {
        let config = Config::new(ConfigOptions {
            auth_url: Some("https://auth.cloud.ovh.net/v3".to_string()),
            project_id: Some("AwesomeProject".to_string()),
            region: Some("TestingGround".to_string()),
            container_name: Some("my-container".to_string()),
            temp_url_key: Some("my-key".to_string()),
            prefix: prefix.map(|v| v.to_string()),
            delete_after: Some(86400),
            ..Default::default()
        })
        .expect("config must be valid");

        OvhSwiftAdapter::new(
            config,
            MockContainer {
                objects,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_url_confirm() -> Result<()> {
        let a = adapter(Some("tenant-a"), vec!["tenant-a/hello.jpg"]);

        assert_eq!(
            a.url_confirm("/hello.jpg").await?,
            "https://storage.TestingGround.cloud.ovh.net/v1/AUTH_AwesomeProject/my-container/tenant-a/hello.jpg"
        );

        let err = a.url_confirm("missing.jpg").await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("missing.jpg"));

        assert_eq!(
            *a.container().probed.lock().unwrap(),
            vec!["tenant-a/hello.jpg", "tenant-a/missing.jpg"]
        );
        Ok(())
    }

    #[test]
    fn test_temporary_url_with_prefix() -> Result<()> {
        let a = adapter(Some("tenant-a"), vec![]);

        let url = a.temporary_url(
            "hello.jpg",
            from_timestamp(1700000000)?,
            &TempUrlOptions::default(),
        )?;
        assert_eq!(
            url,
            "https://storage.TestingGround.cloud.ovh.net/v1/AUTH_AwesomeProject/my-container/tenant-a/hello.jpg?temp_url_sig=2287a03a017179ad825a51f6e26ad2af03c68fee&temp_url_expires=1700000000"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rotate_temp_url_key() -> Result<()> {
        let mut a = adapter(None, vec![]);

        assert_eq!(a.rotate_temp_url_key(false).await?, KeyRotation::Updated);
        let first = a.config().temp_url_key().map(str::to_string);
        assert_eq!(first.as_deref().map(str::len), Some(128));
        assert_eq!(
            a.container().metadata.lock().unwrap().get(META_TEMP_URL_KEY),
            first.as_ref()
        );

        assert_eq!(a.rotate_temp_url_key(false).await?, KeyRotation::Kept);
        assert_eq!(a.config().temp_url_key().map(str::to_string), first);
        // Kept keys are adopted from the read done before the update.
        assert_eq!(*a.container().metadata_reads.lock().unwrap(), 2);

        assert_eq!(a.rotate_temp_url_key(true).await?, KeyRotation::Updated);
        assert_ne!(a.config().temp_url_key().map(str::to_string), first);
        assert_eq!(*a.container().metadata_reads.lock().unwrap(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_rotate_adopts_key_provisioned_elsewhere() -> Result<()> {
        let mut a = adapter(None, vec![]);
        a.container().metadata.lock().unwrap().insert(
            META_TEMP_URL_KEY.to_string(),
            "provisioned-by-another-instance".to_string(),
        );

        assert_eq!(a.rotate_temp_url_key(false).await?, KeyRotation::Kept);
        assert_eq!(
            a.config().temp_url_key(),
            Some("provisioned-by-another-instance")
        );
        assert_eq!(*a.container().metadata_reads.lock().unwrap(), 1);
        Ok(())
    }

    #[test]
    fn test_write_headers() -> Result<()> {
        let a = adapter(None, vec![]);

        let headers = a.write_headers(&WriteOptions::default());
        assert_eq!(headers[X_DELETE_AFTER], "86400");
        assert!(headers.get(X_DELETE_AT).is_none());

        let headers = a.write_headers(&WriteOptions {
            delete_after: None,
            delete_at: Some(from_timestamp(1700000000)?),
        });
        assert_eq!(headers[X_DELETE_AT], "1700000000");
        assert!(headers.get(X_DELETE_AFTER).is_none());

        let headers = a.write_headers(&WriteOptions {
            delete_after: Some(60),
            delete_at: Some(from_timestamp(1700000000)?),
        });
        assert_eq!(headers[X_DELETE_AFTER], "60");
        assert!(headers.get(X_DELETE_AT).is_none());
        Ok(())
    }
}
