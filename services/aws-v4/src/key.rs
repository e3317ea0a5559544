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

use crate::constants::{ALGORITHM, AWS4_REQUEST};
use apisign_core::hash::{hex_hmac_sha256, hmac_sha256};
use apisign_core::time::{format_date, format_iso8601, DateTime};
use std::fmt;

/// SigningScope bounds where and when a derived signing key is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScope {
    /// Date in `YYYYMMDD`.
    pub date: String,
    /// Region of the target endpoint.
    pub region: String,
    /// Service name of the target endpoint.
    pub service: String,
}

impl SigningScope {
    /// Build the scope of a request signed at `time`.
    pub fn new(time: DateTime, region: &str, service: &str) -> Self {
        Self {
            date: format_date(time),
            region: region.to_string(),
            service: service.to_string(),
        }
    }
}

/// Renders the credential scope: `20240115/ap-northeast-1/execute-api/aws4_request`
impl fmt::Display for SigningScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date, self.region, self.service
        )
    }
}

/// Derive the signing key of `scope` from the secret access key.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// The key is only valid for this exact scope and must not outlive the signing call.
pub fn generate_signing_key(secret: &str, scope: &SigningScope) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), scope.date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), scope.region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), scope.service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20240115T100000Z
/// 20240115/ap-northeast-1/execute-api/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &SigningScope, canonical_request_hash: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{scope}\n{canonical_request_hash}",
        format_iso8601(time)
    )
}

/// Hex encoded HMAC-SHA256 of the string to sign under the signing key.
pub fn calculate_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}
