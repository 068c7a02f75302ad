//! Startup text printed for the operator.

use std::fmt::Write;
use std::path::Path;

use url::Url;

use crate::config::Config;

/// Renders the startup banner: base URL, document root, example pages.
///
/// The URL always names `localhost` regardless of the bound interface.
pub fn render(config: &Config, root: &Path, port: u16) -> anyhow::Result<String> {
    let base = Url::parse(&format!("http://localhost:{port}/"))?;

    let mut out = String::new();
    writeln!(out, "Server running at {base}")?;
    writeln!(out, "Serving files from: {}", root.display())?;
    if config.enable_spa_fallback {
        writeln!(out, "Unknown paths fall back to /{}", config.index_file)?;
    }
    if config.enable_cors {
        writeln!(out, "CORS headers enabled")?;
    }

    writeln!(out, "\nAvailable pages:")?;
    writeln!(out, "  - {base}")?;
    for page in &config.example_pages {
        writeln!(out, "  - {}", base.join(page.trim_start_matches('/'))?)?;
    }

    write!(out, "\nPress Ctrl+C to stop the server")?;
    Ok(out)
}
