use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::GameDefinition;

const SAMPLE_DEFINITION_RELATIVE_PATH: &str = "data/sample_game.json";

pub fn sample_definition_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SAMPLE_DEFINITION_RELATIVE_PATH)
}

pub fn load_sample_definition() -> Result<GameDefinition> {
    load_definition_from_path(sample_definition_path())
}

pub fn load_definition_from_path(path: impl AsRef<Path>) -> Result<GameDefinition> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot open game definition {}", path.display()))?;
    parse_definition(&text).with_context(|| format!("in game definition {}", path.display()))
}

/// Parses definition JSON and rejects it when any entity references an id the
/// definition never declares. Every dangling id is listed in the error.
pub fn parse_definition(text: &str) -> Result<GameDefinition> {
    let definition: GameDefinition =
        serde_json::from_str(text).context("definition is not valid JSON for a game")?;
    let missing = definition.dangling_references();
    if !missing.is_empty() {
        bail!("references undeclared {}", missing.join(", "));
    }
    Ok(definition)
}
