/// Build script to load environment variables from .env file
/// This allows compile-time injection of the activation API URL

fn main() {
    println!("cargo:rerun-if-env-changed=SLIC_API_BASE_URL");

    // Load .env file from the crate root if it exists
    let Ok(path) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let env_path = std::path::Path::new(&path).join(".env");
    if !env_path.exists() {
        return;
    }
    println!("cargo:rerun-if-changed={}", env_path.display());

    // Read .env file manually (avoid extra dependencies in build script)
    let Ok(contents) = std::fs::read_to_string(&env_path) else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse KEY=VALUE format
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');

            if key == "SLIC_API_BASE_URL" && !value.is_empty() {
                println!("cargo:rustc-env={}={}", key, value);
                println!("cargo:warning=Building with activation API URL: {}", value);
            }
        }
    }
}
