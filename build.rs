use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-env-changed=ZOOKEEPER_LIB_DIR");

    // Only the FFI connector needs the C client.
    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return Ok(());
    }

    if let Ok(dir) = env::var("ZOOKEEPER_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir);
    }
    println!("cargo:rustc-link-lib=zookeeper_mt");

    Ok(())
}
