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

//! Support for the credentials configuration file.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use super::identity::Password;
use super::{Error, ErrorKind};

/// OpenStack credentials configuration.
///
/// All fields default to empty strings when missing from the file. No validation is done
/// here: empty or wrong values surface later as an authentication failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity (Keystone) endpoint used for authentication.
    #[serde(default)]
    pub auth_url: String,
    /// User name.
    #[serde(default)]
    pub username: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Name of the project (tenant) to scope the token to.
    #[serde(default)]
    pub project_name: String,
    /// Name of the domain of both the user and the project.
    #[serde(default)]
    pub domain_name: String,
    /// Region to pick endpoints from (all regions match when empty).
    #[serde(default)]
    pub region: String,
}

impl Config {
    /// Load a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("cannot open configuration file {}: {}", path.display(), e),
            )
        })?;
        serde_yaml::from_reader(file).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("cannot parse configuration file {}: {}", path.display(), e),
            )
        })
    }

    /// Create a password authentication from this configuration.
    pub fn to_auth(&self) -> Result<Password, Error> {
        let mut auth = Password::new(
            &self.auth_url,
            &self.username,
            &self.password,
            &self.domain_name,
        )?
        .with_project_scope(&self.project_name, &self.domain_name);
        if !self.region.is_empty() {
            auth = auth.with_region(&self.region);
        }
        Ok(auth)
    }
}
