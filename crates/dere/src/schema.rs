//! Loading task schemas from TOML.
//!
//! ```toml
//! [[span]]
//! name = "Protein"
//!
//! [[frame]]
//! name = "Binding"
//!
//! [[frame.slot]]
//! name = "Theme"
//! types = ["Protein"]
//! ```

use std::{fs, path::Path};

use log::{debug, info};

use dere_core::schema::{SchemaDecl, TaskSpec};

use crate::error::DereError;

/// Build a schema from TOML text.
///
/// # Errors
///
/// Returns [`DereError::SchemaSyntax`] for malformed TOML and
/// [`DereError::Schema`] for inconsistent declarations.
pub fn parse_schema(source: &str) -> Result<TaskSpec, DereError> {
    let decl: SchemaDecl = toml::from_str(source)?;
    let spec = TaskSpec::from_decl(decl)?;
    debug!(
        span_types = spec.span_types().count(),
        frame_types = spec.frame_types().count();
        "Schema built"
    );
    Ok(spec)
}

/// Read and build a schema file.
///
/// # Errors
///
/// Returns [`DereError::Io`] if the file cannot be read, otherwise as
/// [`parse_schema`].
pub fn load_schema(path: &Path) -> Result<TaskSpec, DereError> {
    info!(path:% = path.display(); "Loading schema");
    let source = fs::read_to_string(path).map_err(|err| DereError::io(path, err))?;
    parse_schema(&source)
}
