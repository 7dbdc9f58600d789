use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

const SKIPPED_DIRECTORIES: &[&str] = &[".git", "target", "node_modules", ".idea", ".vscode"];

/// Node of the explorer's file tree. Directory children are loaded lazily
/// the first time the directory is expanded.
#[derive(Debug, Clone)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub children: Vec<FileNode>,
    pub expanded: bool,
    loaded: bool,
}

impl FileNode {
    fn new(name: String, path: String, is_directory: bool) -> Self {
        Self {
            name,
            path,
            is_directory,
            children: Vec::new(),
            expanded: false,
            loaded: false,
        }
    }

    pub fn children_loaded(&self) -> bool {
        self.loaded
    }
}

/// Reads the top level of `root` into a tree, one directory deep.
pub fn build_tree(
    root: impl AsRef<Path>,
    ignored_directories: &[String],
) -> io::Result<Vec<FileNode>> {
    let normalized: Vec<String> = ignored_directories
        .iter()
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect();
    read_children(root.as_ref(), &normalized)
}

/// Expands or collapses the directory at `path`, loading its children on
/// first expansion. Returns whether anything changed.
pub fn toggle_directory(
    tree: &mut [FileNode],
    path: &str,
    ignored_directories: &[String],
) -> io::Result<bool> {
    let Some(node) = find_node_mut(tree, path) else {
        return Ok(false);
    };
    if !node.is_directory {
        return Ok(false);
    }

    if !node.loaded {
        node.children = read_children(Path::new(&node.path), ignored_directories)?;
        node.loaded = true;
    }
    node.expanded = !node.expanded;
    Ok(true)
}

pub fn find_node_mut<'a>(tree: &'a mut [FileNode], path: &str) -> Option<&'a mut FileNode> {
    for node in tree {
        if node.path == path {
            return Some(node);
        }
        if node.is_directory && path.starts_with(node.path.as_str()) {
            if let Some(found) = find_node_mut(&mut node.children, path) {
                return Some(found);
            }
        }
    }
    None
}

fn read_children(path: &Path, ignored: &[String]) -> io::Result<Vec<FileNode>> {
    let mut children = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => continue,
            Err(err) => return Err(err),
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => continue,
            Err(err) => return Err(err),
        };

        let is_directory = file_type.is_dir();
        let name = entry.file_name().to_string_lossy().to_string();
        if is_directory && should_skip(&name, ignored) {
            continue;
        }

        let path_string = entry.path().to_string_lossy().to_string();
        children.push(FileNode::new(name, path_string, is_directory));
    }

    children.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    Ok(children)
}

fn should_skip(name: &str, ignored: &[String]) -> bool {
    SKIPPED_DIRECTORIES
        .iter()
        .any(|skip| name.eq_ignore_ascii_case(skip))
        || ignored.iter().any(|entry| name.eq_ignore_ascii_case(entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sorted_shallow_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("B.txt"), "").unwrap();

        let tree = build_tree(dir.path(), &[]).unwrap();
        let names: Vec<&str> = tree.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "src", "a.txt", "B.txt"]);
        assert!(tree[0].is_directory);
        assert!(tree[0].children.is_empty());
        assert!(!tree[0].children_loaded());
    }

    #[test]
    fn skips_well_known_and_configured_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::create_dir(dir.path().join("keep")).unwrap();

        let tree = build_tree(dir.path(), &["build".to_string()]).unwrap();
        let names: Vec<&str> = tree.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["keep"]);
    }

    #[test]
    fn toggle_loads_children_once() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("inner.txt"), "").unwrap();

        let mut tree = build_tree(dir.path(), &[]).unwrap();
        let sub_path = tree[0].path.clone();

        assert!(toggle_directory(&mut tree, &sub_path, &[]).unwrap());
        let node = find_node_mut(&mut tree, &sub_path).unwrap();
        assert!(node.expanded);
        assert!(node.children_loaded());
        assert_eq!(node.children.len(), 1);

        assert!(toggle_directory(&mut tree, &sub_path, &[]).unwrap());
        let node = find_node_mut(&mut tree, &sub_path).unwrap();
        assert!(!node.expanded);
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn toggle_on_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("f.txt"), "").unwrap();

        let mut tree = build_tree(dir.path(), &[]).unwrap();
        let file_path = tree[0].path.clone();
        assert!(!toggle_directory(&mut tree, &file_path, &[]).unwrap());
    }
}
