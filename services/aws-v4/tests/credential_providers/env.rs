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

use apisign_aws_v4::EnvCredentialProvider;
use apisign_core::{Context, OsEnv, ProvideCredential};

#[tokio::test]
async fn test_env_provider_reads_process_env() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let cred = temp_env::async_with_vars(
        [
            ("AWS_ACCESS_KEY_ID", Some("process_key")),
            ("AWS_SECRET_ACCESS_KEY", Some("process_secret")),
        ],
        async {
            let ctx = Context::new().with_env(OsEnv);
            EnvCredentialProvider::new().provide_credential(&ctx).await
        },
    )
    .await?
    .expect("credential must be loaded");

    assert_eq!(cred.access_key_id, "process_key");
    assert_eq!(cred.secret_access_key, "process_secret");
    Ok(())
}

#[tokio::test]
async fn test_env_provider_ignores_process_env_by_default() -> anyhow::Result<()> {
    let cred = temp_env::async_with_vars(
        [
            ("AWS_ACCESS_KEY_ID", Some("process_key")),
            ("AWS_SECRET_ACCESS_KEY", Some("process_secret")),
        ],
        async {
            // Context::new() does not look at the process environment.
            EnvCredentialProvider::new()
                .provide_credential(&Context::new())
                .await
        },
    )
    .await?;

    assert!(cred.is_none());
    Ok(())
}
