// build.rs

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Get the output directory set by Cargo
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    // Construct the path for the file where we'll write the build info
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    // Get the current UTC time
    let now = Utc::now();
    // Format the date/time string as desired
    let build_date = now.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let features = env::vars()
        .filter_map(|(k, _)| k.strip_prefix("CARGO_FEATURE_").map(|f| f.to_lowercase().replace('_', "-")))
        .collect::<Vec<_>>()
        .join(",");

    // Write the constants picked up by the demo binary
    fs::write(
        &dest_path,
        format!(
            "pub const BUILD_DATE: &str = \"{}\";\npub const BUILD_FEATURES: &str = \"{}\";\n",
            build_date, features
        ),
    ).expect("write build_info.rs");

    // Tell Cargo to re-run this build script only if build.rs itself changes
    // This ensures the build date is updated on new builds.
    println!("cargo:rerun-if-changed=build.rs");
}
