//! In-memory output tree of an unpack run.

/// Contents of an [`UnpackNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory(Vec<UnpackNode>),
    File(Vec<u8>),
}

/// A named file or directory produced by the unpacker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackNode {
    pub name: String,
    pub kind: NodeKind,
}

impl UnpackNode {
    pub fn directory(name: impl Into<String>, children: Vec<UnpackNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory(children),
        }
    }

    pub fn file(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File(data),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[UnpackNode] {
        match &self.kind {
            NodeKind::Directory(children) => children.as_slice(),
            NodeKind::File(_) => &[],
        }
    }

    /// Data of a file; `None` for directories.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.kind {
            NodeKind::File(data) => Some(data.as_slice()),
            NodeKind::Directory(_) => None,
        }
    }

    /// Look up a descendant by a `/`-separated path relative to this node.
    pub fn find(&self, path: &str) -> Option<&UnpackNode> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| {
                node.children().iter().find(|child| child.name == part)
            })
    }

    /// Number of files in this subtree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File(_) => 1,
            NodeKind::Directory(children) => children.iter().map(Self::file_count).sum(),
        }
    }

    /// Names in this subtree, depth first, each indented two spaces per level
    /// below this node. This node itself is not listed.
    pub fn outline(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for child in self.children() {
            child.push_outline(0, &mut lines);
        }
        lines
    }

    fn push_outline(&self, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}{}", "  ".repeat(depth), self.name));
        for child in self.children() {
            child.push_outline(depth + 1, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UnpackNode {
        UnpackNode::directory(
            "root",
            vec![
                UnpackNode::directory(
                    "000.stm",
                    vec![UnpackNode::file("000.pm2", b"PM2".to_vec())],
                ),
                UnpackNode::file("001.dat", vec![1, 2, 3]),
            ],
        )
    }

    #[test]
    fn test_find() {
        let root = sample();
        assert_eq!(
            root.find("000.stm/000.pm2").and_then(UnpackNode::data),
            Some(&b"PM2"[..])
        );
        assert!(root.find("000.stm").unwrap().is_directory());
        assert!(root.find("000.stm/missing").is_none());
        assert_eq!(root.find("").map(|n| n.name.as_str()), Some("root"));
    }

    #[test]
    fn test_file_count_and_outline() {
        let root = sample();
        assert_eq!(root.file_count(), 2);
        assert_eq!(root.outline(), vec!["000.stm", "  000.pm2", "001.dat"]);
    }
}
