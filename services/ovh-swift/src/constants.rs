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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Env values used in OVH Swift.
pub const OVH_AUTH_URL: &str = "OVH_AUTH_URL";
pub const OVH_PROJECT_ID: &str = "OVH_PROJECT_ID";
pub const OVH_REGION: &str = "OVH_REGION";
pub const OVH_USER_DOMAIN: &str = "OVH_USER_DOMAIN";
pub const OVH_USERNAME: &str = "OVH_USERNAME";
pub const OVH_PASSWORD: &str = "OVH_PASSWORD";
pub const OVH_CONTAINER_NAME: &str = "OVH_CONTAINER_NAME";
pub const OVH_TEMP_URL_KEY: &str = "OVH_TEMP_URL_KEY";
pub const OVH_CUSTOM_ENDPOINT: &str = "OVH_CUSTOM_ENDPOINT";
pub const OVH_DELETE_AFTER: &str = "OVH_DELETE_AFTER";
pub const OVH_PREFIX: &str = "OVH_PREFIX";

pub const DEFAULT_USER_DOMAIN: &str = "Default";

// Swift TempURL query parameters.
pub const TEMP_URL_SIG: &str = "temp_url_sig";
pub const TEMP_URL_EXPIRES: &str = "temp_url_expires";

// Swift FormPost defaults.
pub const DEFAULT_MAX_FILE_COUNT: u64 = 1;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

// Headers used by Keystone and Swift.
pub const X_AUTH_TOKEN: &str = "x-auth-token";
pub const X_SUBJECT_TOKEN: &str = "x-subject-token";
pub const X_CONTAINER_META_PREFIX: &str = "x-container-meta-";
pub const X_REMOVE_CONTAINER_META_PREFIX: &str = "x-remove-container-meta-";
pub const X_DELETE_AFTER: &str = "x-delete-after";
pub const X_DELETE_AT: &str = "x-delete-at";

/// Characters escaped in object names when they are placed into a request
/// path. `/` stays as is since Swift object names use it as a pseudo
/// directory separator.
pub static OBJECT_PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');
