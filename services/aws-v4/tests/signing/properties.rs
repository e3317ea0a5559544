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

use super::*;
use apisign_core::hash::hex_sha256;
use apisign_core::ErrorKind;
use std::sync::Arc;
use std::thread;
use test_case::test_case;

#[test]
fn test_signing_is_deterministic() {
    let mut a = parts("GET", "https://api.example.com/v1/foods?q=tea", &[]);
    let mut b = parts("GET", "https://api.example.com/v1/foods?q=tea", &[]);

    assert_eq!(sign(&mut a, None), sign(&mut b, None));
    assert_eq!(a.headers, b.headers);
}

#[test]
fn test_header_insertion_order_and_case_do_not_matter() {
    let mut a = parts(
        "GET",
        "https://api.example.com/",
        &[("X-Api-Key", "k"), ("Content-Type", "application/json")],
    );
    let mut b = parts(
        "GET",
        "https://api.example.com/",
        &[("content-type", "application/json"), ("x-api-key", "k")],
    );

    assert_eq!(sign(&mut a, None), sign(&mut b, None));
}

#[test]
fn test_query_order_does_not_matter() {
    let mut a = parts("GET", "https://api.example.com/search?b=2&a=1", &[]);
    let mut b = parts("GET", "https://api.example.com/search?a=1&b=2", &[]);

    assert_eq!(sign(&mut a, None), sign(&mut b, None));
}

#[test]
fn test_missing_and_empty_body_are_equivalent() {
    let mut a = parts("POST", "https://api.example.com/", &[]);
    let mut b = parts("POST", "https://api.example.com/", &[]);

    assert_eq!(sign(&mut a, None), sign(&mut b, Some(&[])));
}

#[test]
fn test_placeholders_do_not_leak_into_signature() {
    let mut clean = parts("GET", "https://api.example.com/", &[]);
    let mut dirty = parts(
        "GET",
        "https://api.example.com/",
        &[
            ("authorization", "placeholder"),
            ("x-amz-date", "19700101T000000Z"),
            ("x-amz-content-sha256", "UNSIGNED-PAYLOAD"),
        ],
    );

    assert_eq!(sign(&mut clean, None), sign(&mut dirty, None));
    assert_eq!(dirty.headers.get_all("authorization").iter().count(), 1);
}

#[test_case("PUT", "https://api.example.com/v1/foods", &[], b"tea"; "method")]
#[test_case("GET", "https://api.example.com/v1/food", &[], b"tea"; "path")]
#[test_case("GET", "https://api.example.com/v1/foods?q=tea", &[], b"tea"; "query")]
#[test_case("GET", "https://api.example.com/v1/foods", &[("x-api-key", "k")], b"tea"; "extra header")]
#[test_case("GET", "https://api.example.com/v1/foods", &[], b"coffee"; "body")]
#[test_case("GET", "https://api2.example.com/v1/foods", &[], b"tea"; "host")]
fn test_any_change_alters_signature(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) {
    let mut base = parts("GET", "https://api.example.com/v1/foods", &[]);
    let mut changed = parts(method, uri, headers);

    assert_ne!(
        signature_of(&sign(&mut base, Some(b"tea"))),
        signature_of(&sign(&mut changed, Some(body)))
    );
}

#[test]
fn test_body_change_is_detected() {
    let mut body = br#"{"meal":"salad"}"#.to_vec();
    let mut req = parts("POST", "https://api.example.com/prod/meals", &[]);
    let signed = sign(&mut req, Some(body.as_slice()));

    body[9] ^= 0x01;
    let committed = req.headers["x-amz-content-sha256"]
        .to_str()
        .expect("must be ascii");
    assert_ne!(committed, hex_sha256(&body));

    let mut resigned = parts("POST", "https://api.example.com/prod/meals", &[]);
    assert_ne!(
        signature_of(&signed),
        signature_of(&sign(&mut resigned, Some(body.as_slice())))
    );
}

#[test]
fn test_scope_change_alters_signature() {
    let ctx = fixed_context();
    let cred = credential();

    let mut a = parts("GET", "https://api.example.com/", &[]);
    let mut b = parts("GET", "https://api.example.com/", &[]);
    signer()
        .sign_request(&ctx, &mut a, None, &cred)
        .expect("sign request must succeed");
    RequestSigner::new(SERVICE, "us-east-1")
        .sign_request(&ctx, &mut b, None, &cred)
        .expect("sign request must succeed");

    let a = a.headers["authorization"].to_str().expect("must be ascii");
    let b = b.headers["authorization"].to_str().expect("must be ascii");
    assert!(b.contains("/us-east-1/execute-api/aws4_request"));
    assert_ne!(signature_of(a), signature_of(b));
}

#[test]
fn test_concurrent_signing() {
    let signer = Arc::new(signer());
    let ctx = fixed_context();
    let cred = credential();

    let mut expected = parts("GET", "https://api.example.com/", &[]);
    let expected = sign(&mut expected, None);

    thread::scope(|s| {
        let handles = (0..8)
            .map(|_| {
                let signer = signer.clone();
                let (ctx, cred) = (&ctx, &cred);
                s.spawn(move || {
                    let mut req = parts("GET", "https://api.example.com/", &[]);
                    signer
                        .sign_request(ctx, &mut req, None, cred)
                        .expect("sign request must succeed");
                    req.headers["authorization"]
                        .to_str()
                        .expect("must be ascii")
                        .to_string()
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().expect("thread must not panic"), expected);
        }
    });
}

#[test]
fn test_failed_signing_leaves_request_untouched() {
    let mut req = parts("GET", "/v1/meals", &[("x-api-key", "k")]);
    let before = req.headers.clone();

    let err = signer()
        .sign_request(&fixed_context(), &mut req, None, &credential())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(req.headers, before);
}

#[test]
fn test_invalid_utf8_query_is_rejected() {
    let mut req = parts("GET", "https://api.example.com/search?k=%FF", &[]);

    let err = signer()
        .sign_request(&fixed_context(), &mut req, None, &credential())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EncodingInvalid);
    assert!(req.headers.is_empty());
}
