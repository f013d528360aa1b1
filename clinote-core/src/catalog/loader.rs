//! Catalog loading
//!
//! Parses catalog TOML from the embedded source, a string or a file. The
//! built-in catalog is compiled once and shared.

use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::catalog::{config::CatalogConfig, runtime::PatternCatalog, BUILTIN_CATALOG};
use crate::error::{Error, Result};

/// Compiled built-in catalog
static BUILTIN: OnceLock<Arc<PatternCatalog>> = OnceLock::new();

/// Shared handle to the built-in catalog, compiled on first use
pub(crate) fn builtin() -> Result<Arc<PatternCatalog>> {
    if let Some(catalog) = BUILTIN.get() {
        return Ok(Arc::clone(catalog));
    }
    let catalog = Arc::new(load_str(BUILTIN_CATALOG)?);
    Ok(Arc::clone(BUILTIN.get_or_init(|| catalog)))
}

/// Parse catalog TOML without compiling it
pub(crate) fn parse(source: &str) -> Result<CatalogConfig> {
    Ok(toml::from_str(source)?)
}

/// Parse and compile catalog TOML
pub(crate) fn load_str(source: &str) -> Result<PatternCatalog> {
    PatternCatalog::from_config(&parse(source)?)
}

/// Read, parse and compile a catalog file
pub(crate) fn load_file(path: &Path) -> Result<PatternCatalog> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&source)
}
