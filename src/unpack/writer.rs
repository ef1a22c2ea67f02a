//! Writing an unpack tree to the filesystem.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::node::{NodeKind, UnpackNode};
use super::UnpackResult;

/// Write `node` into `parent`, creating `parent/<node.name>`.
pub fn write_tree(node: &UnpackNode, parent: &Path) -> Result<()> {
    let path = parent.join(&node.name);
    match &node.kind {
        NodeKind::File(data) => fs::write(&path, data)?,
        NodeKind::Directory(children) => {
            fs::create_dir_all(&path)?;
            for child in children {
                write_tree(child, &path)?;
            }
        }
    }
    Ok(())
}

/// Write the members of an unpack result into `dir`, which is created if
/// missing. The root node's own name is not used.
pub fn write_result(result: &UnpackResult, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    for child in result.root.children() {
        write_tree(child, dir)?;
    }
    Ok(())
}
