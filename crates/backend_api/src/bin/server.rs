use backend_api::{init_tracing, run_server, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Settings path from the environment, resolved against the workspace root
    let settings_raw = env::var("SETTINGS_PATH").unwrap_or_else(|_| "settings.json".to_string());
    let crate_root = env::current_dir()?;
    let workspace_root = find_workspace_root().unwrap_or_else(|| crate_root.clone());
    let settings_path = resolve_with_fallback(&settings_raw, &[&workspace_root, &crate_root]);

    let settings = settings_loader::load_settings_or_default(Some(&settings_path));

    // HOST / PORT win over the settings file
    let host = env::var("HOST").unwrap_or_else(|_| settings.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(settings.server.port);

    println!("Savings Calculator API Server");
    println!("=============================");
    println!("Workspace root: {}", workspace_root.display());
    println!("Settings path (resolved): {}", settings_path.display());
    println!("Listening on: {}:{}", host, port);
    println!();

    let state = Arc::new(AppState::new(settings));
    run_server(state, &host, port).await?;

    Ok(())
}

/// Find the Cargo workspace root by traversing up until a Cargo.toml that contains a [workspace] section.
fn find_workspace_root() -> Option<PathBuf> {
    let mut dir = env::current_dir().ok()?;
    for _ in 0..10 {
        let candidate = dir.join("Cargo.toml");
        if candidate.exists() {
            if let Ok(content) = std::fs::read_to_string(&candidate) {
                if content.contains("[workspace]") {
                    return Some(dir.clone());
                }
            }
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Resolve a raw path against a list of base directories, returning the first existing match,
/// or the path under the first base when none exists yet.
fn resolve_with_fallback(raw: &str, bases: &[&PathBuf]) -> PathBuf {
    let input = PathBuf::from(raw);
    if input.is_absolute() {
        return input;
    }
    for base in bases {
        let candidate = base.join(&input);
        if candidate.exists() {
            return candidate;
        }
    }
    match bases.first() {
        Some(base) => base.join(input),
        None => input,
    }
}
