use std::path::Path;

use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "mdcheck.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Root-relative files or directories to leave unchecked.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Load a config file. Errors are strings ready for display.
pub fn load(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    toml::from_str(&content)
        .map_err(|e| format!("TOML parse error in '{}': {}", path.display(), e))
}

/// Load `mdcheck.toml` from the checked root, when present.
pub fn discover(root: &Path) -> Result<Config, String> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load(&path)
    } else {
        Ok(Config::default())
    }
}
