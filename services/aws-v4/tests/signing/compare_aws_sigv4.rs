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

//! Cross check against the AWS SDK signer.

use super::*;
use anyhow::Result;
use apisign_core::time::parse_rfc3339;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest, SigningSettings,
};
use aws_sigv4::sign::v4;
use http::{header, HeaderValue};
use pretty_assertions::assert_eq;
use std::time::SystemTime;

/// (name, request_builder)
type TestCase = (&'static str, fn() -> Request<&'static str>);

fn test_cases() -> Vec<TestCase> {
    vec![
        ("get_request", test_get_request),
        ("get_request_with_query", test_get_request_with_query),
        ("get_request_with_headers", test_get_request_with_headers),
        ("get_request_without_path", test_get_request_without_path),
        ("put_request", test_put_request),
        ("post_request_with_json", test_post_request_with_json),
    ]
}

fn test_get_request() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() = "http://127.0.0.1:9000/hello"
        .parse()
        .expect("url must be valid");

    req
}

fn test_get_request_with_query() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() =
        "http://127.0.0.1:9000/hello?list-type=2&max-keys=3&prefix=CI/&start-after=ExampleGuide.pdf"
            .parse()
            .expect("url must be valid");

    req
}

fn test_get_request_with_headers() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() = "https://api.example.com/prod/meals"
        .parse()
        .expect("url must be valid");
    req.headers_mut()
        .insert("x-api-key", "a".parse().expect("must be valid"));
    req.headers_mut()
        .insert("x-meal-type", "low carb".parse().expect("must be valid"));

    req
}

fn test_get_request_without_path() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() = "https://api.example.com"
        .parse()
        .expect("url must be valid");

    req
}

fn test_put_request() -> Request<&'static str> {
    let content = "Hello,World!";
    let mut req = Request::new(content);
    *req.method_mut() = http::Method::PUT;
    *req.uri_mut() = "http://127.0.0.1:9000/hello"
        .parse()
        .expect("url must be valid");

    req.headers_mut().insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&content.len().to_string()).expect("must be valid"),
    );

    req
}

fn test_post_request_with_json() -> Request<&'static str> {
    let content = r#"{"meal":"salad"}"#;
    let mut req = Request::new(content);
    *req.method_mut() = http::Method::POST;
    *req.uri_mut() = "https://api.example.com/prod/meals"
        .parse()
        .expect("url must be valid");

    req.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    req.headers_mut().insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&content.len().to_string()).expect("must be valid"),
    );

    req
}

#[track_caller]
fn compare_request(name: &str, l: &Request<&str>, r: &Request<&str>) {
    fn format_headers(req: &Request<&str>) -> Vec<String> {
        let mut hs = req
            .headers()
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v.to_str().expect("must be valid")))
            .collect::<Vec<_>>();

        // Insert host if original request doesn't have it.
        let host = format!(
            "host:{}",
            req.uri().authority().expect("authority must be set")
        );
        if !hs.contains(&host) {
            hs.push(host)
        }

        hs.sort();
        hs
    }

    assert_eq!(
        format_headers(l),
        format_headers(r),
        "{name} header mismatch"
    );

    fn format_query(req: &Request<&str>) -> Vec<String> {
        let query = req.uri().query().unwrap_or_default();
        let mut query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| format!("{}={}", &k, &v))
            .collect::<Vec<_>>();
        query.sort();
        query
    }

    assert_eq!(format_query(l), format_query(r), "{name} query mismatch");
}

#[test]
fn test() {
    for (name, req) in test_cases() {
        calculate(req).unwrap_or_else(|err| panic!("calculate {name} should pass: {err:?}"));
    }
}

fn calculate(req_fn: fn() -> Request<&'static str>) -> Result<()> {
    let ctx = fixed_context();
    let now = parse_rfc3339(SIGNING_TIME)?;

    let mut req = req_fn();
    let name = format!(
        "{} {} {:?}",
        req.method(),
        req.uri().path(),
        req.uri().query(),
    );

    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Double;
    ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    let id = Credentials::new(
        ACCESS_KEY_ID,
        SECRET_ACCESS_KEY,
        None,
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region(REGION)
        .name(SERVICE)
        .time(SystemTime::from(now))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), std::str::from_utf8(v.as_bytes()).unwrap())),
            SignableBody::Bytes(req.body().as_bytes()),
        )
        .unwrap(),
        &sp.into(),
    )?;
    let (aws_sig, _) = output.into_parts();
    aws_sig.apply_to_request_http1x(&mut req);
    let expected_req = req;

    let req = req_fn();
    let (mut parts, body) = req.into_parts();
    signer()
        .sign_request(&ctx, &mut parts, Some(body.as_bytes()), &credential())
        .expect("must apply success");
    let actual_req = Request::from_parts(parts, body);

    compare_request(&name, &expected_req, &actual_req);

    Ok(())
}
