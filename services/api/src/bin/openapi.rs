//! services/api/src/bin/openapi.rs
//!
//! Writes the FutureMe OpenAPI document. Usage: `openapi [PATH|-]`.
//! The default path is `openapi.json`; `-` prints to stdout.

use futureme_api::web::rest::ApiDoc;
use std::io::Write;
use utoipa::OpenApi;

const DEFAULT_PATH: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = ApiDoc::openapi().to_pretty_json()?;
    let target = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_string());

    if target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(&target, document)?;
        eprintln!("OpenAPI document written to {}", target);
    }
    Ok(())
}
