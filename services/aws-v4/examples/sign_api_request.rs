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
use apisign_core::{Context, OsEnv, Signer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = Context::new().with_env(OsEnv);

    // Region and keys come from AWS_REGION, AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY.
    let config = Config::default()
        .with_service("execute-api")
        .from_env(&ctx);
    println!("Using config: {config:?}");

    let builder = RequestSigner::from_config(&config)?;
    let signer = Signer::new(ctx, DefaultCredentialProvider::new(config), builder);

    let body = br#"{"meal":"salad","calories":320}"#;
    let mut req = http::Request::post("https://api.example.com/prod/meals")
        .header("content-type", "application/json")
        .body(())?
        .into_parts()
        .0;

    match signer.sign(&mut req, Some(body)).await {
        Ok(()) => {
            for (name, value) in &req.headers {
                println!("{name}: {value:?}");
            }
        }
        Err(err) if err.is_config_error() => {
            println!("Signing skipped, check your credentials and region: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
