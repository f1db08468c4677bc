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

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use http::Method;
use ovhsign_core::time::{add_duration, from_timestamp, now};
use ovhsign_core::{Context, Error, ErrorKind, ProvideCredentialChain, Result, Signer};
use ovhsign_ovh_swift::{
    set_temp_url_key, Config, ConfigOptions, Container, ContainerCredentialProvider, Credential,
    FormPostOptions, KeyRotation, Metadata, OvhSwiftAdapter, RequestSigner,
    StaticCredentialProvider, TempUrlOptions, META_TEMP_URL_KEY,
};
use pretty_assertions::assert_eq;
use sha1::Sha1;

const T: i64 = 1700000000;

fn reference_hmac(key: &str, content: &str) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("hmac accepts any key");
    mac.update(content.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[derive(Debug, Default)]
struct MemoryContainer {
    objects: Vec<String>,
    metadata: Mutex<Metadata>,
    fail: bool,
}

#[async_trait]
impl Container for MemoryContainer {
    fn name(&self) -> &str {
        "my-container"
    }

    async fn object_exists(&self, path: &str) -> Result<bool> {
        if self.fail {
            return Err(Error::unexpected("bad response from storage").set_retryable(true));
        }
        Ok(self.objects.iter().any(|o| o == path))
    }

    async fn metadata(&self) -> Result<Metadata> {
        Ok(self.metadata.lock().unwrap().clone())
    }

    async fn reset_metadata(&self, metadata: Metadata) -> Result<()> {
        *self.metadata.lock().unwrap() = metadata;
        Ok(())
    }
}

fn options() -> ConfigOptions {
    ConfigOptions {
        auth_url: Some("https://auth.cloud.ovh.net/v3".to_string()),
        project_id: Some("AwesomeProject".to_string()),
        region: Some("TestingGround".to_string()),
        container_name: Some("my-container".to_string()),
        temp_url_key: Some("my-key".to_string()),
        ..Default::default()
    }
}

fn adapter(opts: ConfigOptions, container: MemoryContainer) -> OvhSwiftAdapter<MemoryContainer> {
    OvhSwiftAdapter::new(Config::new(opts).expect("config must be valid"), container)
}

#[test]
fn test_temporary_url_matches_reference_hmac() -> Result<()> {
    let a = adapter(options(), MemoryContainer::default());

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let expected = reference_hmac(
            "my-key",
            &format!("{method}\n{T}\n/v1/AUTH_AwesomeProject/my-container/hello.jpg"),
        );
        let url = a.temporary_url(
            "/hello.jpg",
            from_timestamp(T)?,
            &TempUrlOptions::with_method(method),
        )?;

        assert_eq!(
            url,
            format!(
                "https://storage.TestingGround.cloud.ovh.net/v1/AUTH_AwesomeProject/my-container/hello.jpg?temp_url_sig={expected}&temp_url_expires={T}"
            )
        );
    }
    Ok(())
}

#[test]
fn test_signing_is_idempotent() -> Result<()> {
    let a = adapter(options(), MemoryContainer::default());
    let expires_at = add_duration(now(), Duration::from_secs(3600))?;

    assert_eq!(
        a.temporary_url("hello.jpg", expires_at, &TempUrlOptions::default())?,
        a.temporary_url("hello.jpg", expires_at, &TempUrlOptions::default())?
    );
    assert_eq!(
        a.form_post_signature("uploads/", expires_at, &FormPostOptions::default())?,
        a.form_post_signature("uploads/", expires_at, &FormPostOptions::default())?
    );
    Ok(())
}

#[test]
fn test_form_post_matches_reference_hmac() -> Result<()> {
    let a = adapter(options(), MemoryContainer::default());
    let expires_at = add_duration(now(), Duration::from_secs(600))?;
    let expires = expires_at.timestamp();
    let opts = FormPostOptions {
        redirect: "https://example.com/done".to_string(),
        max_file_count: 3,
        max_file_size: 1024,
    };

    let expected = reference_hmac(
        "my-key",
        &format!(
            "/v1/AUTH_AwesomeProject/my-container/uploads/\nhttps://example.com/done\n1024\n3\n{expires}"
        ),
    );
    assert_eq!(a.form_post_signature("/uploads/", expires_at, &opts)?, expected);

    let form = a.form_post_form("uploads/", expires_at, &opts)?;
    assert_eq!(
        form.fields.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec!["redirect", "max_file_size", "max_file_count", "expires", "signature"]
    );
    assert_eq!(form.fields[4].1, expected);
    Ok(())
}

#[test]
fn test_missing_key_is_reported_before_anything_else() -> Result<()> {
    let a = adapter(
        ConfigOptions {
            temp_url_key: None,
            ..options()
        },
        MemoryContainer::default(),
    );

    let err = a
        .temporary_url("hello.jpg", from_timestamp(T)?, &TempUrlOptions::default())
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let err = a
        .form_post_signature("uploads/", from_timestamp(0)?, &FormPostOptions::default())
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    Ok(())
}

#[tokio::test]
async fn test_url_scenarios() -> Result<()> {
    let container = MemoryContainer {
        objects: vec!["hello".to_string()],
        ..Default::default()
    };
    let base = ConfigOptions {
        project_id: Some("projectId".to_string()),
        region: Some("region".to_string()),
        container_name: Some("container".to_string()),
        ..options()
    };

    let a = adapter(base.clone(), container);
    assert_eq!(
        a.url("hello"),
        "https://storage.region.cloud.ovh.net/v1/AUTH_projectId/container/hello"
    );
    assert_eq!(
        a.url_confirm("hello").await?,
        "https://storage.region.cloud.ovh.net/v1/AUTH_projectId/container/hello"
    );

    let a = adapter(
        ConfigOptions {
            endpoint: Some("http://custom.endpoint".to_string()),
            ..base
        },
        MemoryContainer::default(),
    );
    assert_eq!(a.url("hello"), "http://custom.endpoint/hello");
    let err = a.url_confirm("hello").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_url_confirm_propagates_container_errors() {
    let a = adapter(
        options(),
        MemoryContainer {
            fail: true,
            ..Default::default()
        },
    );

    let err = a.url_confirm("hello").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_signer_reads_key_from_container() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let container = Arc::new(MemoryContainer::default());
    assert_eq!(
        set_temp_url_key(&container, "my-key", false).await?,
        (KeyRotation::Updated, "my-key".to_string())
    );
    assert_eq!(container.metadata().await?[META_TEMP_URL_KEY], "my-key");

    let chain = ProvideCredentialChain::new()
        .push(ContainerCredentialProvider::new(container.clone()))
        .push(StaticCredentialProvider::new("fallback-key"));
    let signer: Signer<Credential> = Signer::new(Context::new(), chain, RequestSigner::new());

    let req = http::Request::builder()
        .method(Method::GET)
        .uri("https://storage.TestingGround.cloud.ovh.net/v1/AUTH_AwesomeProject/my-container/hello.jpg")
        .body(())?;
    let (mut parts, _) = req.into_parts();
    signer.sign(&mut parts, Some(Duration::from_secs(60))).await?;

    let query = parts.uri.query().expect("query must be set").to_string();
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(pairs[0].0, "temp_url_sig");
    assert_eq!(pairs[1].0, "temp_url_expires");

    let expected = reference_hmac(
        "my-key",
        &format!(
            "GET\n{}\n/v1/AUTH_AwesomeProject/my-container/hello.jpg",
            pairs[1].1
        ),
    );
    assert_eq!(pairs[0].1, expected);
    Ok(())
}
