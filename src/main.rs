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

//! List volume types of an OpenStack Block Storage service.
//!
//! Credentials are read from `config.yaml` in the working directory. Pass
//! `--json` as the first argument to additionally print the records as JSON.

use std::env;
use std::process;

use log::error;

use osvt::volumetypes;
use osvt::{Config, Error, ErrorKind, Session};

const CONFIG_FILE: &str = "config.yaml";

/// Whether the first argument (after the program name) requests JSON output.
fn wants_json<I>(mut args: I) -> bool
where
    I: Iterator<Item = String>,
{
    args.nth(1).as_deref() == Some("--json")
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let json_output = wants_json(env::args());

    if let Err(err) = run(json_output).await {
        error!("{}", err);
        process::exit(1);
    }
}

async fn run(json_output: bool) -> Result<(), Error> {
    let config = Config::from_file(CONFIG_FILE)?;
    let session = Session::from_config(&config).await?;

    println!("Fetching volume types...");
    let types = volumetypes::list(&session).await?;

    print!("\n{}", volumetypes::render_listing(&types));

    if json_output {
        let rendered = serde_json::to_string_pretty(&types).map_err(|e| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("cannot serialize volume types: {}", e),
            )
        })?;
        println!("JSON output:");
        println!("{}", rendered);
    }

    Ok(())
}
