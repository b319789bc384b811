//! The `dot` command: export the syntax tree as a Graphviz digraph.

use std::path::{Path, PathBuf};

use super::{parse_source, read_source, write_output};
use crate::error::DriverResult;
use crate::options::BuildOptions;

/// `foo.spl` becomes `foo.dot`; any other name gets `.dot` appended.
pub fn dot_path(source: &Path) -> PathBuf {
    if source.extension().is_some_and(|ext| ext == "spl") {
        source.with_extension("dot")
    } else {
        let mut name = source.as_os_str().to_os_string();
        name.push(".dot");
        PathBuf::from(name)
    }
}

pub fn dot_file(path: &Path, options: &BuildOptions) -> DriverResult<PathBuf> {
    let source = read_source(path)?;
    let program = parse_source(path, &source, options.color)?;
    let output = options.output.clone().unwrap_or_else(|| dot_path(path));
    write_output(&output, &spl_ir::dot::to_dot(&program))?;
    Ok(output)
}
