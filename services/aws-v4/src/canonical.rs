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

use crate::constants::AWS_QUERY_ENCODE_SET;
use apisign_core::hash::hex_sha256;
use apisign_core::{Result, SigningRequest};
use percent_encoding::utf8_percent_encode;
use std::fmt;

/// CanonicalRequest is the normalized form of a request that gets hashed into the
/// string to sign.
///
/// Two requests that mean the same thing produce the same canonical request no matter
/// how their headers were inserted or cased:
///
/// ```text
/// GET
/// /search
/// a=1&b=2
/// host:api.example.com
/// x-amz-content-sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// x-amz-date:20240115T100000Z
///
/// host;x-amz-content-sha256;x-amz-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    path: String,
    query: String,
    headers: Vec<(String, String)>,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request from a signing request and the hex encoded SHA256 of
    /// its body.
    ///
    /// Every header present on the request is signed. A header value or query component
    /// that is not UTF-8 fails with `EncodingInvalid`.
    pub fn build(req: &SigningRequest, payload_hash: &str) -> Result<Self> {
        let headers = canonicalize_headers(req)?;
        let signed_headers = headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        Ok(Self {
            method: req.method.as_str().to_string(),
            path: req.path.clone(),
            query: canonicalize_query(req.query_pairs()?),
            headers,
            signed_headers,
            payload_hash: payload_hash.to_string(),
        })
    }

    /// Semicolon separated, sorted, lowercase names of the signed headers.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Canonical query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hex encoded SHA256 of the body this request commits to.
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// Hex encoded SHA256 of the canonical request, the last line of the string to sign.
    pub fn hash(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        // Canonical headers end with their own newline, then the separator.
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        f.write_str(&self.payload_hash)
    }
}

/// Percent encode every key and value, then sort by key and value.
///
/// Sorting happens on the encoded form because that's what the verifier sees.
fn canonicalize_query(pairs: Vec<(String, String)>) -> String {
    let mut pairs = pairs
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();

    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (idx, (k, v)) in pairs.iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

/// Lowercase names, normalized values, sorted by name.
///
/// Repeated headers are folded into one entry with their values joined by `,` in the
/// order they were added.
fn canonicalize_headers(req: &SigningRequest) -> Result<Vec<(String, String)>> {
    let names = req.header_name_to_vec_sorted();

    let mut canonical = Vec::with_capacity(names.len());
    for name in names {
        let mut values = Vec::new();
        for value in req.headers.get_all(name) {
            let mut value = value.clone();
            SigningRequest::header_value_normalize(&mut value)?;
            values.push(std::str::from_utf8(value.as_bytes())?.to_string());
        }
        canonical.push((name.to_string(), values.join(",")));
    }

    Ok(canonical)
}
