use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::walker::FaqCollection;

/// Write each article to `<dir>/<id>.html`.
pub fn write_collection(faq: &FaqCollection, dir: &Path) -> Result<usize> {
    for (id, html) in &faq.articles {
        let path = dir.join(format!("{id}.html"));
        std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
        debug!("Wrote {}", path.display());
    }
    Ok(faq.len())
}
