use std::path::Path;

use anyhow::Context;

/// Loads the profile's env files, later files overriding earlier ones.
///
/// Runs before the tracing subscriber exists (the files may set `RUST_LOG`),
/// so the files actually loaded are returned for the caller to log.
pub fn load_environment() -> anyhow::Result<Vec<&'static str>> {
    let is_production =
        dotenvy::var("ROCKET_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".env"]
    };

    let mut loaded = Vec::new();
    for env_file in env_files {
        if load_env_file(env_file)? {
            loaded.push(env_file);
        }
    }

    Ok(loaded)
}

fn load_env_file(path: &str) -> anyhow::Result<bool> {
    if !Path::new(path).exists() {
        return Ok(false);
    }

    dotenvy::from_filename_override(path)
        .with_context(|| format!("Failed to load environment file {}", path))?;
    Ok(true)
}
