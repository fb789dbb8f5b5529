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

//! Error and result types.

use std::error::Error as BaseError;
use std::fmt;

use reqwest::{Error as HttpClientError, StatusCode};

/// Kind of an error.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Authentication failure.
    ///
    /// Maps to HTTP 401.
    AuthenticationFailed,

    /// Access denied.
    ///
    /// Maps to HTTP 403.
    AccessDenied,

    /// Requested resource was not found.
    ///
    /// Maps to HTTP 404.
    ResourceNotFound,

    /// Requested service endpoint was not found in the catalog.
    EndpointNotFound,

    /// Conflict in the request.
    ///
    /// Maps to HTTP 409.
    Conflict,

    /// Invalid value in the configuration file.
    InvalidConfig,

    /// Invalid value passed to one of the calls.
    InvalidInput,

    /// Invalid response received from the server.
    InvalidResponse,

    /// Generic HTTP error.
    ProtocolError,

    /// Response received from the server is malformed.
    ///
    /// Maps to HTTP 5xx codes.
    InternalServerError,
}

/// Error from an OpenStack call.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::AuthenticationFailed => "Failed to authenticate",
            ErrorKind::AccessDenied => "Access to the resource is denied",
            ErrorKind::ResourceNotFound => "Requested resource was not found",
            ErrorKind::EndpointNotFound => "Requested endpoint was not found",
            ErrorKind::Conflict => "Request cannot be fulfilled due to a conflict",
            ErrorKind::InvalidConfig => "Configuration is invalid",
            ErrorKind::InvalidInput => "Input value(s) are invalid or missing",
            ErrorKind::InvalidResponse => "Response received from the server is malformed",
            ErrorKind::ProtocolError => "Error sending the request or reading the response",
            ErrorKind::InternalServerError => "Internal server error or bad gateway",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl Error {
    /// Create a new error of the provided kind.
    #[inline]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code, if any.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[inline]
    pub(crate) fn new_endpoint_not_found<D: fmt::Display>(service_type: D) -> Error {
        Error::new(
            ErrorKind::EndpointNotFound,
            format!("Endpoint for service {} was not found", service_type),
        )
    }

    #[inline]
    pub(crate) fn with_status(mut self, status: StatusCode) -> Error {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl BaseError for Error {}

impl From<StatusCode> for ErrorKind {
    fn from(value: StatusCode) -> ErrorKind {
        match value {
            StatusCode::UNAUTHORIZED => ErrorKind::AuthenticationFailed,
            StatusCode::FORBIDDEN => ErrorKind::AccessDenied,
            StatusCode::NOT_FOUND => ErrorKind::ResourceNotFound,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            c if c.is_client_error() => ErrorKind::InvalidInput,
            c if c.is_server_error() => ErrorKind::InternalServerError,
            _ => ErrorKind::ProtocolError,
        }
    }
}

impl From<HttpClientError> for Error {
    fn from(value: HttpClientError) -> Error {
        let kind = match value.status() {
            Some(status) => status.into(),
            None => ErrorKind::ProtocolError,
        };
        let status = value.status();
        Error {
            kind,
            message: value.to_string(),
            status,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Error {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Error parsing URL: {}", value),
        )
    }
}

#[cfg(test)]
mod test {
    use reqwest::StatusCode;

    use super::{Error, ErrorKind};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ErrorKind::from(StatusCode::UNAUTHORIZED),
            ErrorKind::AuthenticationFailed
        );
        assert_eq!(
            ErrorKind::from(StatusCode::FORBIDDEN),
            ErrorKind::AccessDenied
        );
        assert_eq!(
            ErrorKind::from(StatusCode::NOT_FOUND),
            ErrorKind::ResourceNotFound
        );
        assert_eq!(ErrorKind::from(StatusCode::CONFLICT), ErrorKind::Conflict);
        assert_eq!(
            ErrorKind::from(StatusCode::BAD_REQUEST),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ErrorKind::from(StatusCode::BAD_GATEWAY),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::InvalidConfig, "cannot open configuration file");
        assert_eq!(
            err.to_string(),
            "Configuration is invalid: cannot open configuration file"
        );
    }

    #[test]
    fn test_with_status() {
        let err = Error::new(StatusCode::NOT_FOUND.into(), "no such volume type")
            .with_status(StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_from_url_parse_error() {
        let parse_err = url::Url::parse("not a url").err().unwrap();
        let err = Error::from(parse_err);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.status().is_none());
    }
}
