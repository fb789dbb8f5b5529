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

//! Low-level code to work with the service catalog.

use log::{debug, error};
use reqwest::Url;

use super::protocol::{CatalogRecord, Endpoint};
use super::{Error, ErrorKind};

/// Find an endpoint in the service catalog.
pub fn find_endpoint<'c>(
    catalog: &'c [CatalogRecord],
    service_type: &str,
    endpoint_interface: &str,
    region: Option<&str>,
) -> Result<&'c Endpoint, Error> {
    let svc = match catalog.iter().find(|x| x.service_type == *service_type) {
        Some(s) => s,
        None => return Err(Error::new_endpoint_not_found(service_type)),
    };

    svc.endpoints
        .iter()
        .find(|x| {
            x.interface == *endpoint_interface && region.map(|rgn| x.region == rgn).unwrap_or(true)
        })
        .ok_or_else(|| Error::new_endpoint_not_found(service_type))
}

/// Extract a URL from the service catalog.
pub fn extract_url(
    catalog: &[CatalogRecord],
    service_type: &str,
    endpoint_interface: &str,
    region: Option<&str>,
) -> Result<Url, Error> {
    let endp = find_endpoint(catalog, service_type, endpoint_interface, region)?;
    debug!("Received {:?} for {}", endp, service_type);
    Url::parse(&endp.url).map_err(|e| {
        error!(
            "Invalid URL {} received from service catalog for service \
             '{}', interface '{}' from region {:?}: {}",
            endp.url, service_type, endpoint_interface, region, e
        );
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Invalid URL {} for {} - {}", endp.url, service_type, e),
        )
    })
}

#[cfg(test)]
pub mod test {
    use super::super::protocol::{CatalogRecord, Endpoint};
    use super::super::{Error, ErrorKind};

    fn demo_identity() -> CatalogRecord {
        CatalogRecord {
            service_type: String::from("identity"),
            endpoints: vec![
                Endpoint {
                    interface: String::from("public"),
                    region: String::from("RegionOne"),
                    url: String::from("https://host.one/identity"),
                },
                Endpoint {
                    interface: String::from("internal"),
                    region: String::from("RegionOne"),
                    url: String::from("http://192.168.22.1/identity"),
                },
                Endpoint {
                    interface: String::from("public"),
                    region: String::from("RegionTwo"),
                    url: String::from("https://host.two:5000"),
                },
            ],
        }
    }

    fn demo_block_storage() -> CatalogRecord {
        CatalogRecord {
            service_type: String::from("block-storage"),
            endpoints: vec![
                Endpoint {
                    interface: String::from("public"),
                    region: String::from("RegionOne"),
                    url: String::from("https://host.one/volume/v3"),
                },
                Endpoint {
                    interface: String::from("public"),
                    region: String::from("RegionTwo"),
                    url: String::from("https://host.two:8776/v3"),
                },
            ],
        }
    }

    pub fn demo_catalog() -> Vec<CatalogRecord> {
        vec![demo_identity(), demo_block_storage()]
    }

    fn find_endpoint<'a>(
        cat: &'a [CatalogRecord],
        service_type: &str,
        interface_type: &str,
        region: Option<&str>,
    ) -> Result<&'a Endpoint, Error> {
        super::find_endpoint(cat, service_type, interface_type, region)
    }

    #[test]
    fn test_find_endpoint() {
        let cat = demo_catalog();

        let e1 = find_endpoint(&cat, "identity", "public", None).unwrap();
        assert_eq!(&e1.url, "https://host.one/identity");

        let e2 = find_endpoint(&cat, "identity", "internal", None).unwrap();
        assert_eq!(&e2.url, "http://192.168.22.1/identity");

        let e3 = find_endpoint(&cat, "block-storage", "public", None).unwrap();
        assert_eq!(&e3.url, "https://host.one/volume/v3");
    }

    #[test]
    fn test_find_endpoint_with_region() {
        let cat = demo_catalog();

        let e1 = find_endpoint(&cat, "identity", "public", Some("RegionTwo")).unwrap();
        assert_eq!(&e1.url, "https://host.two:5000");

        let e2 = find_endpoint(&cat, "block-storage", "public", Some("RegionTwo")).unwrap();
        assert_eq!(&e2.url, "https://host.two:8776/v3");
    }

    fn assert_not_found(result: Result<&Endpoint, Error>) {
        let err = result.err().unwrap();
        if err.kind() != ErrorKind::EndpointNotFound {
            panic!("Unexpected error {}", err);
        }
    }

    #[test]
    fn test_find_endpoint_not_found() {
        let cat = demo_catalog();

        assert_not_found(find_endpoint(&cat, "foobar", "public", None));
        assert_not_found(find_endpoint(&cat, "identity", "public", Some("RegionFoo")));
        assert_not_found(find_endpoint(&cat, "block-storage", "internal", None));
        assert_not_found(find_endpoint(
            &cat,
            "identity",
            "internal",
            Some("RegionTwo"),
        ));
    }

    #[test]
    fn test_extract_url() {
        let cat = demo_catalog();
        let url = super::extract_url(&cat, "block-storage", "public", Some("RegionOne")).unwrap();
        assert_eq!(url.as_str(), "https://host.one/volume/v3");
    }

    #[test]
    fn test_extract_url_invalid() {
        let cat = vec![CatalogRecord {
            service_type: String::from("block-storage"),
            endpoints: vec![Endpoint {
                interface: String::from("public"),
                region: String::from("RegionOne"),
                url: String::from("not a url"),
            }],
        }];
        let err = super::extract_url(&cat, "block-storage", "public", None)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }
}
