// Copyright 2025 the osvt authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Authentication using Identity API v3.
//!
//! Only [Password](struct.Password.html) authentication is supported.
//! Identity API v2 is not and will not be supported.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use async_trait::async_trait;
use chrono::{Duration, Local};
use log::{debug, error, trace};
use reqwest::{Client, RequestBuilder, Response, Url};
use tokio::sync::RwLock;

use super::client;
use super::protocol;
use super::{catalog, AuthType, Error, ErrorKind};

const MISSING_SUBJECT_HEADER: &str = "Missing X-Subject-Token header";
const INVALID_SUBJECT_HEADER: &str = "Invalid X-Subject-Token header";
// Required validity time in minutes. Here we refresh the token if it expires
// in 10 minutes or less.
const TOKEN_MIN_VALIDITY: i64 = 10;
// The only endpoint interface this tool consumes.
const PUBLIC_INTERFACE: &str = "public";

/// Plain authentication token without additional details.
#[derive(Clone)]
struct Token {
    value: String,
    body: protocol::Token,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut hasher = DefaultHasher::new();
        self.value.hash(&mut hasher);
        write!(
            f,
            "Token {{ value: hash({}), body: {:?} }}",
            hasher.finish(),
            self.body
        )
    }
}

/// Generic trait for authentication using Identity API V3.
pub trait Identity {
    /// Get a reference to the auth URL.
    fn auth_url(&self) -> &Url;
}

/// Password authentication using Identity API V3.
///
/// For any Identity authentication you need to know `auth_url`, which is an authentication endpoint
/// of the Identity service. For the Password authentication you also need:
/// 1. User name and password.
/// 2. Domain of the user.
/// 3. Name of the project to use.
/// 4. Domain of the project.
///
/// Only names are supported for the user, the project and their domains.
///
/// Start with creating a `Password` object using [new](#method.new), then add a project scope
/// with [with_project_scope](#method.with_project_scope):
///
/// ```rust,no_run
/// # async fn example() -> Result<(), osvt::Error> {
/// let auth = osvt::identity::Password::new(
///     "https://cloud.local/identity",
///     "admin",
///     "pa$$w0rd",
///     "Default",
/// )?
/// .with_project_scope("project1", "Default");
///
/// let session = osvt::Session::new(auth).await?;
/// # Ok(()) }
/// ```
///
/// If your cloud has several regions, pick one using [with_region](#method.with_region).
///
/// The authentication token is cached while it's still valid or until
/// [refresh](../trait.AuthType.html#tymethod.refresh) is called.
/// Clones of a `Password` start with an empty cache.
#[derive(Debug)]
pub struct Password {
    auth_url: Url,
    body: protocol::ProjectScopedAuthRoot,
    token_endpoint: String,
    region: Option<String>,
    cached_token: RwLock<Option<Token>>,
}

impl Identity for Password {
    fn auth_url(&self) -> &Url {
        &self.auth_url
    }
}

impl Password {
    /// Create a password authentication.
    pub fn new<U, S1, S2, S3>(
        auth_url: U,
        user_name: S1,
        password: S2,
        user_domain_name: S3,
    ) -> Result<Password, Error>
    where
        U: AsRef<str>,
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let mut auth_url = Url::parse(auth_url.as_ref()).map_err(|e| {
            Error::new(ErrorKind::InvalidInput, format!("invalid auth_url: {}", e))
        })?;

        let _ = auth_url
            .path_segments_mut()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "invalid auth_url: wrong schema?"))?
            .pop_if_empty();

        let token_endpoint = if auth_url.as_str().ends_with("/v3") {
            format!("{}/auth/tokens", auth_url)
        } else {
            format!("{}/v3/auth/tokens", auth_url)
        };

        let body = protocol::ProjectScopedAuthRoot::new(
            protocol::PasswordIdentity::new(user_name, password, user_domain_name),
            None,
        );

        Ok(Password {
            auth_url,
            body,
            token_endpoint,
            region: None,
            cached_token: RwLock::new(None),
        })
    }

    /// Scope authentication to the given project.
    ///
    /// This is required in the most cases.
    #[inline]
    pub fn set_project_scope<S1, S2>(&mut self, project_name: S1, project_domain_name: S2)
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.body.auth.scope = Some(protocol::ProjectScope::new(
            project_name,
            project_domain_name,
        ));
    }

    /// Scope authentication to the given project.
    #[inline]
    pub fn with_project_scope<S1, S2>(mut self, project_name: S1, project_domain_name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.set_project_scope(project_name, project_domain_name);
        self
    }

    /// Set a region for this authentication method.
    #[inline]
    pub fn with_region<S>(mut self, region: S) -> Self
    where
        S: Into<String>,
    {
        self.region = Some(region.into());
        self
    }

    /// User name.
    #[inline]
    pub fn user(&self) -> &str {
        &self.body.auth.identity.password.user.name
    }

    /// Project name (if project scoped).
    #[inline]
    pub fn project(&self) -> Option<&str> {
        self.body
            .auth
            .scope
            .as_ref()
            .map(|scope| scope.project.name.as_str())
    }

    /// Get the authentication token string.
    async fn get_token(&self, client: &Client) -> Result<String, Error> {
        self.refresh_token(client, false).await?;
        let guard = self.cached_token.read().await;
        // refresh_token unconditionally populates the token
        Ok(guard
            .as_ref()
            .expect("no token after successful refresh")
            .value
            .clone())
    }

    /// Refresh the token (if needed or forced).
    async fn refresh_token(&self, client: &Client, force: bool) -> Result<(), Error> {
        // This is executed on every request at least once, so it's important to start with a read
        // lock. We expect to hit this branch most of the time.
        if !force && token_alive(&self.cached_token.read().await) {
            return Ok(());
        }

        let mut lock = self.cached_token.write().await;
        // Additional check in case another task has updated the token while we were waiting for
        // the write lock.
        if !force && token_alive(&lock) {
            return Ok(());
        }

        debug!("Requesting a token for user {}", self.user());
        let resp = client
            .post(&self.token_endpoint)
            .json(&self.body)
            .send()
            .await?;
        *lock = Some(token_from_response(client::check(resp).await?).await?);
        Ok(())
    }

    #[cfg(test)]
    fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }
}

impl Clone for Password {
    fn clone(&self) -> Password {
        Password {
            auth_url: self.auth_url.clone(),
            body: self.body.clone(),
            token_endpoint: self.token_endpoint.clone(),
            region: self.region.clone(),
            cached_token: RwLock::new(None),
        }
    }
}

#[async_trait]
impl AuthType for Password {
    /// Authenticate a request by adding a token header to it.
    async fn authenticate(
        &self,
        client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, Error> {
        let token = self.get_token(client).await?;
        Ok(request.header("x-auth-token", token))
    }

    /// Get a URL for the requested service from the catalog.
    async fn get_endpoint(&self, client: &Client, service_type: &str) -> Result<Url, Error> {
        debug!(
            "Requesting a catalog endpoint for service '{}', region {:?}",
            service_type, self.region
        );
        self.refresh_token(client, false).await?;
        let guard = self.cached_token.read().await;
        let token = guard
            .as_ref()
            .expect("no token after successful refresh");
        catalog::extract_url(
            &token.body.catalog,
            service_type,
            PUBLIC_INTERFACE,
            self.region.as_deref(),
        )
    }

    /// Refresh the cached token and service catalog.
    async fn refresh(&self, client: &Client) -> Result<(), Error> {
        self.refresh_token(client, true).await
    }
}

#[inline]
fn token_alive(token: &impl Deref<Target = Option<Token>>) -> bool {
    if let Some(value) = token.deref() {
        let validity_time_left = value.body.expires_at.signed_duration_since(Local::now());
        trace!("Token is valid for {:?}", validity_time_left);
        validity_time_left > Duration::minutes(TOKEN_MIN_VALIDITY)
    } else {
        false
    }
}

async fn token_from_response(resp: Response) -> Result<Token, Error> {
    let value = match resp.headers().get("x-subject-token") {
        Some(hdr) => match hdr.to_str() {
            Ok(s) => Ok(s.to_string()),
            Err(e) => {
                error!(
                    "Invalid X-Subject-Token {:?} received from {}: {}",
                    hdr,
                    resp.url(),
                    e
                );
                Err(Error::new(
                    ErrorKind::InvalidResponse,
                    INVALID_SUBJECT_HEADER,
                ))
            }
        },
        None => {
            error!("No X-Subject-Token header received from {}", resp.url());
            Err(Error::new(
                ErrorKind::InvalidResponse,
                MISSING_SUBJECT_HEADER,
            ))
        }
    }?;

    let root = resp.json::<protocol::TokenRoot>().await?;
    debug!("Received a token expiring at {}", root.token.expires_at);
    trace!("Received catalog: {:?}", root.token.catalog);
    Ok(Token {
        value,
        body: root.token,
    })
}
