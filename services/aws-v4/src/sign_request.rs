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

use crate::canonical::CanonicalRequest;
use crate::constants::{ALGORITHM, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::key::{calculate_signature, generate_signing_key, string_to_sign, SigningScope};
use crate::{Config, Credential};
use apisign_core::hash::hex_sha256;
use apisign_core::time::format_iso8601;
use apisign_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;

/// RequestSigner that implement AWS SigV4 header signing.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv.html)
///
/// One signer serves one service and region pair. It holds no credential and no key
/// between calls, so a single instance can sign from many threads at once.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a new signer for AWS V4.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Create a new signer from config.
    ///
    /// Both `service` and `region` must be set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let service = config
            .service
            .as_deref()
            .ok_or_else(|| Error::config_invalid("service is required for signing"))?;
        let region = config
            .region
            .as_deref()
            .ok_or_else(|| Error::config_invalid("region is required for signing"))?;

        Ok(Self::new(service, region))
    }

    /// Service this signer signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region this signer signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    fn check(&self, cred: &Credential) -> Result<()> {
        if self.service.is_empty() {
            return Err(Error::config_invalid("service must not be empty"));
        }
        if self.region.is_empty() {
            return Err(Error::config_invalid("region must not be empty"));
        }
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access key id and secret access key must not be empty",
            ));
        }
        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Parts,
        body: Option<&[u8]>,
        cred: &Self::Credential,
    ) -> Result<()> {
        // Refuse to hash anything with an unusable setup.
        self.check(cred)?;

        let now = ctx.now();
        let mut signed_req = SigningRequest::build(req);

        let payload_hash = hex_sha256(body.unwrap_or_default());

        // canonicalize context
        canonicalize_header(&mut signed_req, &format_iso8601(now), &payload_hash)?;

        // build canonical request and string to sign.
        let creq = CanonicalRequest::build(&signed_req, &payload_hash)?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20240115/<region>/<service>/aws4_request"
        let scope = SigningScope::new(now, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &creq.hash());
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(&cred.secret_access_key, &scope);
        let signature = calculate_signature(&signing_key, &string_to_sign);

        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id,
            creq.signed_headers(),
        ))
        .map_err(|e| {
            Error::request_invalid("failed to create authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req);
        Ok(())
    }
}

/// Prepare the headers that get signed.
///
/// A caller supplied `authorization` is a placeholder at best and never part of what
/// we sign. Date and content hash always describe this signing call, so they overwrite
/// whatever was there.
fn canonicalize_header(
    ctx: &mut SigningRequest,
    amz_date: &str,
    payload_hash: &str,
) -> Result<()> {
    if ctx.headers.remove(header::AUTHORIZATION).is_some() {
        debug!("dropped existing authorization header before signing");
    }

    // Insert HOST header if not present.
    if !ctx.headers.contains_key(header::HOST) {
        let Some(authority) = &ctx.authority else {
            return Err(Error::request_invalid(
                "request without host header or authority is invalid for signing",
            ));
        };
        // Userinfo is never part of the host a client sends.
        let host = match authority.port() {
            Some(port) => format!("{}:{}", authority.host(), port.as_str()),
            None => authority.host().to_string(),
        };
        let host = HeaderValue::from_str(&host)?;
        ctx.header_insert_if_absent(header::HOST, host);
    }

    ctx.headers
        .insert(X_AMZ_DATE, HeaderValue::from_str(amz_date)?);
    ctx.headers
        .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(payload_hash)?);

    Ok(())
}
