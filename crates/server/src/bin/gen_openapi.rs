//! Print the OpenAPI document as JSON on stdout.
//!
//! Usage: `cargo run --bin gen_openapi > openapi.json`

use utoipa::OpenApi;

fn main() {
    let doc = server::openapi::ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&doc).expect("serialize OpenAPI document");
    println!("{json}");
}
