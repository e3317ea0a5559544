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

//! AWS SigV4 signing for API requests.
//!
//! This crate signs HTTP requests for endpoints that verify AWS Signature
//! Version 4, such as Amazon API Gateway (`execute-api`).
//!
//! ## Quick Start
//!
//! ```no_run
//! use apisign_aws_v4::{Config, DefaultCredentialProvider, RequestSigner};
//! use apisign_core::{Context, OsEnv, Result, Signer};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new().with_env(OsEnv);
//!
//!     // Region and keys come from the environment, service from the caller.
//!     let config = Config::default()
//!         .with_service("execute-api")
//!         .from_env(&ctx);
//!
//!     let builder = RequestSigner::from_config(&config)?;
//!     let loader = DefaultCredentialProvider::new(config);
//!     let signer = Signer::new(ctx, loader, builder);
//!
//!     let body = br#"{"meal":"salad"}"#;
//!     let mut req = http::Request::post("https://api.example.com/prod/meals")
//!         .header("content-type", "application/json")
//!         .body(())
//!         .unwrap()
//!         .into_parts()
//!         .0;
//!
//!     signer.sign(&mut req, Some(body)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! ### Environment Variables
//!
//! ```bash
//! export AWS_ACCESS_KEY_ID=your-access-key-id
//! export AWS_SECRET_ACCESS_KEY=your-secret-access-key
//! export AWS_REGION=ap-northeast-1
//! ```
//!
//! ### Static Keys
//!
//! ```no_run
//! use apisign_aws_v4::StaticCredentialProvider;
//!
//! let loader = StaticCredentialProvider::new("your-access-key-id", "your-secret-access-key");
//! ```
//!
//! ## Building Blocks
//!
//! The signing steps are exposed on their own for callers that drive the
//! protocol by hand:
//!
//! - [`CanonicalRequest`]: the normalized request that gets hashed
//! - [`generate_signing_key`]: the HMAC key chain bound to a [`SigningScope`]
//! - [`string_to_sign`] and [`calculate_signature`]: the final signature

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod canonical;
pub use canonical::CanonicalRequest;

mod key;
pub use key::{calculate_signature, generate_signing_key, string_to_sign, SigningScope};

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;
