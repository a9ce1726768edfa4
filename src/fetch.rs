use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::settings::Settings;

/// wget arguments for mirroring `https://<domain>/<path>`, logging into `log_dir`.
pub fn wget_args(domain: &str, path: &str, log_dir: &Path) -> Vec<String> {
    vec![
        "--https-only".into(),
        "--tries=1".into(),
        format!("--output-file={}", log_dir.join("wget.log").display()),
        format!("--rejected-log={}", log_dir.join("wget.error.log").display()),
        "-nc".into(),
        "-c".into(),
        "--show-progress".into(),
        "-E".into(),
        "--compression=auto".into(),
        "--max-redirect=1".into(),
        format!("--accept-regex=^(https://{domain})?/{path}/*"),
        format!("--domains={domain}"),
        "--recursive".into(),
        "--no-parent".into(),
        format!("https://{domain}/{path}"),
    ]
}

/// Mirror the FAQ tree into `settings.mirror_dir`. A failing wget run is
/// only logged; whatever it managed to fetch is still walked.
pub fn retrieve(settings: &Settings, domain: &str, path: &str, log_dir: &Path) -> Result<()> {
    let args = wget_args(domain, path, log_dir);
    info!("Mirroring https://{}/{} with {}", domain, path, settings.wget);

    let status = Command::new(&settings.wget)
        .args(&args)
        .current_dir(&settings.mirror_dir)
        .status()
        .with_context(|| format!("failed to run {}", settings.wget))?;

    if !status.success() {
        warn!("{} exited with {}; continuing with partial mirror", settings.wget, status);
    }
    Ok(())
}
