use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest priority.
/// Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide default
    paths.push(PathBuf::from("/etc/quill/config.toml"));

    // 2. XDG / home
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/quill/config.toml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("quill/config.toml"));
    }

    // 3. Workspace-local
    paths.push(PathBuf::from(".quill/config.toml"));
    paths.push(PathBuf::from("quill.toml"));

    paths
}

/// Load configuration by merging all discovered TOML files.
/// The `extra` argument may provide an explicit path (e.g. `--config` CLI flag).
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let layer: toml::Value = toml::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            merge_toml(&mut merged, layer);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        let text = std::fs::read_to_string(p)
            .with_context(|| format!("reading {}", p.display()))?;
        let layer: toml::Value = toml::from_str(&text)
            .with_context(|| format!("parsing {}", p.display()))?;
        merge_toml(&mut merged, layer);
    }

    let config: Config = merged.try_into().unwrap_or_default();
    Ok(config)
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                let entry = d.entry(k).or_insert(toml::Value::Table(toml::map::Map::new()));
                merge_toml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
