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

//! Session structure definition.

use log::trace;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use static_assertions::assert_impl_all;

use super::client::{AuthenticatedClient, RequestBuilder};
use super::services::ServiceType;
use super::url;
use super::{AuthType, Config, Error};

/// An OpenStack API session.
///
/// The session object serves as a wrapper around an [authentication
/// type](trait.AuthType.html), providing convenient methods to make HTTP requests against
/// services from the catalog.
///
/// # Note
///
/// All clones of one session share the same authentication.
#[derive(Debug, Clone)]
pub struct Session {
    client: AuthenticatedClient,
}

assert_impl_all!(Session: Send, Sync);

impl Session {
    /// Create a new session with a given authentication plugin.
    ///
    /// Authentication happens eagerly: the call fails if the credentials are rejected or
    /// the identity endpoint is unreachable.
    pub async fn new<Auth: AuthType + 'static>(auth_type: Auth) -> Result<Session, Error> {
        let client = AuthenticatedClient::new(Client::new(), auth_type).await?;
        Ok(Session { client })
    }

    /// Create a session from a credentials configuration.
    pub async fn from_config(config: &Config) -> Result<Session, Error> {
        Session::new(config.to_auth()?).await
    }

    /// Get a reference to the authentication type in use.
    #[inline]
    pub fn auth_type(&self) -> &dyn AuthType {
        self.client.auth_type()
    }

    /// Get a reference to the authenticated client in use.
    #[inline]
    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Construct an endpoint for the given service from the path.
    ///
    /// You won't need to use this call most of the time, since all request calls can fetch the
    /// endpoint automatically.
    pub async fn get_endpoint<Srv, I>(&self, service: Srv, path: I) -> Result<Url, Error>
    where
        Srv: ServiceType,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let endpoint = self.client.get_endpoint(service.catalog_type()).await?;
        Ok(url::extend(endpoint, path))
    }

    /// Start a GET request.
    ///
    /// Use this call if you need some advanced features of the resulting request builder.
    /// Otherwise use [get_json](#method.get_json).
    pub async fn get<Srv, I>(&self, service: Srv, path: I) -> Result<RequestBuilder, Error>
    where
        Srv: ServiceType,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let url = self.get_endpoint(service, path).await?;
        trace!("Sending HTTP GET request to {}", url);
        Ok(self.client.request(Method::GET, url))
    }

    /// Fetch a JSON using a GET request.
    ///
    /// ```rust,no_run
    /// # async fn example() -> Result<(), osvt::Error> {
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Deserialize)]
    /// pub struct VolumeType {
    ///     pub id: String,
    ///     pub name: String,
    /// }
    ///
    /// #[derive(Debug, Deserialize)]
    /// pub struct VolumeTypesRoot {
    ///     pub volume_types: Vec<VolumeType>,
    /// }
    ///
    /// let config = osvt::Config::from_file("config.yaml")?;
    /// let session = osvt::Session::from_config(&config).await?;
    ///
    /// let root: VolumeTypesRoot = session
    ///     .get_json(osvt::services::BLOCK_STORAGE, &["types"])
    ///     .await?;
    /// for vt in root.volume_types {
    ///     println!("ID = {}, Name = {}", vt.id, vt.name);
    /// }
    /// # Ok(()) }
    /// ```
    pub async fn get_json<Srv, I, T>(&self, service: Srv, path: I) -> Result<T, Error>
    where
        Srv: ServiceType,
        I: IntoIterator,
        I::Item: AsRef<str>,
        T: DeserializeOwned + Send,
    {
        self.get(service, path).await?.fetch_json().await
    }
}
