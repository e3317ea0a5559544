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

use crate::{Error, Result};
use http::header::HeaderName;
use http::uri::Authority;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use log::debug;
use percent_encoding::percent_decode_str;

/// Signing context for request.
///
/// Built from a snapshot of `http::request::Parts` so that a failing signer never leaves
/// the caller's request half modified. Only the headers are written back by
/// [`SigningRequest::apply`]: method, path and query are sent exactly as the caller
/// built them.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP authority, if the uri carries one.
    pub authority: Option<Authority>,
    /// HTTP path, already percent encoded by the caller.
    pub path: String,
    /// Raw HTTP query without the leading `?`.
    pub query: String,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    ///
    /// A request without path is signed as `/`.
    pub fn build(parts: &http::request::Parts) -> Self {
        let path = match parts.uri.path() {
            "" => {
                debug!("request uri {} has no path, signing as /", parts.uri);
                "/".to_string()
            }
            v => v.to_string(),
        };

        SigningRequest {
            method: parts.method.clone(),
            authority: parts.uri.authority().cloned(),
            path,
            query: parts.uri.query().unwrap_or_default().to_string(),
            headers: parts.headers.clone(),
        }
    }

    /// Apply the signed headers back to http::request::Parts.
    pub fn apply(self, parts: &mut http::request::Parts) {
        parts.headers = self.headers;
    }

    /// Decode the raw query into key/value pairs, keeping their original order.
    ///
    /// `a=1&b` yields `[("a", "1"), ("b", "")]`. Percent escapes and `+` are decoded.
    ///
    /// A key or value that does not decode to valid UTF-8 is an encoding error: it can't
    /// be re-encoded the way the verifier sees it.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                Ok((query_decode(k)?, query_decode(v)?))
            })
            .collect()
    }

    /// Insert header if it's not present yet.
    pub fn header_insert_if_absent(&mut self, key: HeaderName, value: HeaderValue) {
        self.headers.entry(key).or_insert(value);
    }

    /// Normalize header value.
    ///
    /// Leading and trailing whitespace is trimmed and every inner run of spaces or tabs
    /// collapses to a single space. Sensitivity of the value is preserved.
    pub fn header_value_normalize(v: &mut HeaderValue) -> Result<()> {
        let bs = v.as_bytes();
        let is_ws = |b: &u8| *b == b' ' || *b == b'\t';

        // Fast path: nothing to trim, nothing to collapse.
        if !bs.first().is_some_and(is_ws)
            && !bs.last().is_some_and(is_ws)
            && !bs.windows(2).any(|w| is_ws(&w[0]) && is_ws(&w[1]))
            && !bs.contains(&b'\t')
        {
            return Ok(());
        }

        let mut normalized = Vec::with_capacity(bs.len());
        for word in bs.split(is_ws).filter(|w| !w.is_empty()) {
            if !normalized.is_empty() {
                normalized.push(b' ');
            }
            normalized.extend_from_slice(word);
        }

        let sensitive = v.is_sensitive();
        *v = HeaderValue::from_bytes(&normalized)?;
        v.set_sensitive(sensitive);
        Ok(())
    }

    /// Get header names as sorted vector.
    ///
    /// Names in `HeaderMap` are always lowercase, so the order is the byte order of the
    /// lowercased names.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}

/// Decode one query component, `+` as space.
fn query_decode(s: &str) -> Result<String> {
    let s = s.replace('+', " ");
    let v = percent_decode_str(&s).decode_utf8().map_err(|e| {
        Error::encoding_invalid("query parameter is not valid utf-8").with_source(e)
    })?;
    Ok(v.into_owned())
}
