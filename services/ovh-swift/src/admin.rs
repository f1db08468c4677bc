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

//! Administrative operations on the container metadata: temp url key
//! provisioning and CORS headers.

use crate::container::*;
use log::{debug, info};
use ovhsign_core::hash::hex_sha512;
use ovhsign_core::Result;
use rand::RngCore;

/// Outcome of a metadata update guarded by `force`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRotation {
    /// A value was already present and has been left untouched.
    Kept,
    /// The metadata has been rewritten with the new values.
    Updated,
}

/// Generate a fresh temp url key: the hex SHA-512 of 64 random bytes.
pub fn generate_temp_url_key() -> String {
    let mut seed = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut seed);
    hex_sha512(&seed)
}

/// Provision `key` as the temp url key of `container`.
///
/// An existing key is only replaced when `force` is set. CORS settings of the
/// container survive the rotation, every other metadata key is dropped.
///
/// Returns the key the container holds afterwards, the existing one when it
/// was kept.
pub async fn set_temp_url_key(
    container: &impl Container,
    key: &str,
    force: bool,
) -> Result<(KeyRotation, String)> {
    let current = container.metadata().await?;

    if !force {
        if let Some(existing) = current.get(META_TEMP_URL_KEY) {
            info!(
                "container {} already has a temp url key, keeping it",
                container.name()
            );
            return Ok((KeyRotation::Kept, existing.clone()));
        }
    }

    let mut metadata = pick(
        &current,
        &[META_ACCESS_CONTROL_ALLOW_ORIGIN, META_ACCESS_CONTROL_MAX_AGE],
    );
    metadata.insert(META_TEMP_URL_KEY.to_string(), key.to_string());

    container.reset_metadata(metadata).await?;
    debug!("temp url key of container {} rotated", container.name());
    Ok((KeyRotation::Updated, key.to_string()))
}

/// Configure the CORS headers of `container`.
///
/// `origins` are joined with spaces, an empty list allows every origin.
/// Existing CORS settings are only replaced when `force` is set. The temp url
/// key of the container survives the update.
pub async fn set_cors_headers(
    container: &impl Container,
    origins: &[String],
    max_age: u64,
    force: bool,
) -> Result<KeyRotation> {
    let current = container.metadata().await?;

    if !force
        && (current.contains_key(META_ACCESS_CONTROL_ALLOW_ORIGIN)
            || current.contains_key(META_ACCESS_CONTROL_MAX_AGE))
    {
        info!(
            "container {} already has CORS headers, keeping them",
            container.name()
        );
        return Ok(KeyRotation::Kept);
    }

    let allow_origin = if origins.is_empty() {
        "*".to_string()
    } else {
        origins.join(" ")
    };

    let mut metadata = pick(&current, &[META_TEMP_URL_KEY]);
    metadata.insert(META_ACCESS_CONTROL_ALLOW_ORIGIN.to_string(), allow_origin);
    metadata.insert(META_ACCESS_CONTROL_MAX_AGE.to_string(), max_age.to_string());

    container.reset_metadata(metadata).await?;
    debug!("CORS headers of container {} updated", container.name());
    Ok(KeyRotation::Updated)
}

fn pick(metadata: &Metadata, keys: &[&str]) -> Metadata {
    metadata
        .iter()
        .filter(|(k, _)| keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
