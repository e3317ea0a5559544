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

use apisign_aws_v4::{Config, DefaultCredentialProvider, RequestSigner};
use apisign_core::{Context, ErrorKind, Signer, StaticEnv};
use std::collections::HashMap;

fn env_context(envs: &[(&str, &str)]) -> Context {
    Context::new().with_env(StaticEnv {
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    })
}

fn request() -> http::request::Parts {
    http::Request::get("https://api.example.com/")
        .body(())
        .expect("request must be valid")
        .into_parts()
        .0
}

#[tokio::test]
async fn test_signer_from_env() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = env_context(&[
        ("AWS_REGION", "ap-northeast-1"),
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
    ]);
    let config = Config::default().with_service("execute-api").from_env(&ctx);
    let builder = RequestSigner::from_config(&config)?;
    let signer = Signer::new(ctx, DefaultCredentialProvider::new(config), builder);

    let mut req = request();
    signer.sign(&mut req, None).await?;

    let authorization = req.headers["authorization"].to_str()?;
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(authorization.contains("/ap-northeast-1/execute-api/aws4_request"));
    Ok(())
}

#[tokio::test]
async fn test_signer_without_any_credential() -> anyhow::Result<()> {
    let ctx = env_context(&[("AWS_REGION", "ap-northeast-1")]);
    let config = Config::default().with_service("execute-api").from_env(&ctx);
    let builder = RequestSigner::from_config(&config)?;
    let signer = Signer::new(ctx, DefaultCredentialProvider::new(config), builder);

    let mut req = request();
    let err = signer.sign(&mut req, None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(req.headers.is_empty());
    Ok(())
}

#[test]
fn test_missing_region_is_config_error() {
    let config = Config::default()
        .with_service("execute-api")
        .from_env(&env_context(&[]));

    let err = RequestSigner::from_config(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}
