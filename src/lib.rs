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

//! Minimal OpenStack client used by the `volume-types` tool.
//!
//! Implements the slice of an OpenStack client the tool needs: Identity V3
//! password authentication, service catalog lookup and a typed listing call
//! for Block Storage volume types.

#![crate_name = "osvt"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
#![deny(
    dead_code,
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_doc_comments,
    unused_import_braces,
    unused_parens,
    while_true
)]

mod auth;
mod catalog;
pub mod client;
mod common;
mod config;
mod error;
pub mod identity;
mod protocol;
pub mod services;
mod session;
mod url;
pub mod volumetypes;

pub use crate::auth::{AuthType, NoAuth};
pub use crate::config::Config;
pub use crate::error::{Error, ErrorKind};
pub use crate::session::Session;
