//! Lazy depth-first discovery of package.json files
//!
//! The walker keeps a stack of open directory handles and yields one
//! manifest path per `next_manifest` call. `node_modules` directories are
//! never entered, and each real directory is visited at most once.

use crate::error::WalkError;
use crate::manifest::MANIFEST_FILENAME;
use std::collections::HashSet;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use tokio::fs::ReadDir;

/// Directory name skipped during traversal
pub const EXCLUDED_DIR: &str = "node_modules";

/// Depth-first stream of manifest paths below a root directory
pub struct PackageWalker {
    root: Option<PathBuf>,
    stack: Vec<(PathBuf, ReadDir)>,
    visited: HashSet<PathBuf>,
    follow_symlinks: bool,
}

enum EntryKind {
    Directory,
    File,
    Other,
}

impl PackageWalker {
    /// Create a walker rooted at `root`; nothing is read until the first `next_manifest`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            stack: Vec::new(),
            visited: HashSet::new(),
            follow_symlinks: false,
        }
    }

    /// Descend into symlinked directories and accept symlinked manifests
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Next manifest path, `None` once the tree is exhausted
    ///
    /// After an error the walk is over and later calls return `None`.
    pub async fn next_manifest(&mut self) -> Option<Result<PathBuf, WalkError>> {
        let result = self.advance().await;
        if matches!(result, Some(Err(_))) {
            self.stack.clear();
        }
        result
    }

    /// Drain the walker into a vector
    pub async fn collect(mut self) -> Result<Vec<PathBuf>, WalkError> {
        let mut paths = Vec::new();
        while let Some(path) = self.next_manifest().await {
            paths.push(path?);
        }
        Ok(paths)
    }

    async fn advance(&mut self) -> Option<Result<PathBuf, WalkError>> {
        if let Some(root) = self.root.take() {
            if let Err(e) = self.enter(root).await {
                return Some(Err(e));
            }
        }

        loop {
            let (dir, handle) = self.stack.last_mut()?;
            let next = handle.next_entry().await;
            let entry = match next {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    self.stack.pop();
                    continue;
                }
                Err(source) => return Some(Err(WalkError::read_dir(dir.clone(), source))),
            };

            let path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(source) => return Some(Err(WalkError::read_dir(dir.clone(), source))),
            };
            let name = entry.file_name();

            match self.classify(&path, file_type).await {
                EntryKind::Directory if name != EXCLUDED_DIR => {
                    if let Err(e) = self.enter(path).await {
                        return Some(Err(e));
                    }
                }
                EntryKind::File if name == MANIFEST_FILENAME => {
                    tracing::debug!(path = %path.display(), "found manifest");
                    return Some(Ok(path));
                }
                _ => {}
            }
        }
    }

    async fn classify(&self, path: &Path, file_type: FileType) -> EntryKind {
        if file_type.is_symlink() {
            if !self.follow_symlinks {
                return EntryKind::Other;
            }
            // Dangling links are skipped
            return match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
        }

        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    async fn enter(&mut self, dir: PathBuf) -> Result<(), WalkError> {
        let canonical = tokio::fs::canonicalize(&dir)
            .await
            .map_err(|e| WalkError::canonicalize(&dir, e))?;
        if !self.visited.insert(canonical) {
            tracing::debug!(dir = %dir.display(), "directory already visited");
            return Ok(());
        }

        let handle = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| WalkError::read_dir(&dir, e))?;
        self.stack.push((dir, handle));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_manifest(dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(MANIFEST_FILENAME);
        fs::write(&path, r#"{"name": "pkg"}"#).unwrap();
        path
    }

    async fn walk(root: &Path) -> Vec<PathBuf> {
        let mut paths = PackageWalker::new(root).collect().await.unwrap();
        paths.sort();
        paths
    }

    #[tokio::test]
    async fn test_empty_tree() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(walk(temp_dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_finds_nested_manifests() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let mut expected = vec![
            touch_manifest(root),
            touch_manifest(&root.join("packages/a")),
            touch_manifest(&root.join("packages/b")),
            touch_manifest(&root.join("apps/web/nested/deep")),
        ];
        expected.sort();

        assert_eq!(walk(root).await, expected);
    }

    #[tokio::test]
    async fn test_skips_node_modules_anywhere() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let kept = touch_manifest(&root.join("pkg-a"));
        touch_manifest(&root.join("node_modules/dep"));
        touch_manifest(&root.join("pkg-a/node_modules/dep"));
        touch_manifest(&root.join("pkg-a/node_modules"));

        assert_eq!(walk(root).await, vec![kept]);
    }

    #[tokio::test]
    async fn test_root_named_node_modules_is_walked() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join(EXCLUDED_DIR);
        let kept = touch_manifest(&root.join("dep"));

        assert_eq!(walk(&root).await, vec![kept]);
    }

    #[tokio::test]
    async fn test_ignores_similar_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json.bak"), "{}").unwrap();
        fs::write(root.join("Package.json"), "{}").unwrap();
        fs::create_dir_all(root.join("package.json.d")).unwrap();
        let kept = touch_manifest(&root.join("node_modules_old"));

        assert_eq!(walk(root).await, vec![kept]);
    }

    #[tokio::test]
    async fn test_directory_named_like_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let kept = touch_manifest(&root.join(MANIFEST_FILENAME));

        assert_eq!(walk(root).await, vec![kept]);
    }

    #[tokio::test]
    async fn test_missing_root_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut walker = PackageWalker::new(temp_dir.path().join("missing"));

        assert!(matches!(walker.next_manifest().await, Some(Err(_))));
        assert!(walker.next_manifest().await.is_none());
    }

    #[tokio::test]
    async fn test_yields_lazily() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch_manifest(&root.join("a"));
        touch_manifest(&root.join("b"));

        let mut walker = PackageWalker::new(root);
        assert!(walker.next_manifest().await.unwrap().is_ok());
        assert!(walker.next_manifest().await.unwrap().is_ok());
        assert!(walker.next_manifest().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_ignored_by_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("repo");
        let outside = temp_dir.path().join("outside");
        let kept = touch_manifest(&root.join("pkg"));
        touch_manifest(&outside);
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();

        assert_eq!(walk(&root).await, vec![kept]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_follow_symlinks_is_loop_safe() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        let kept = touch_manifest(&root.join("pkg"));
        std::os::unix::fs::symlink(root, root.join("pkg/loop")).unwrap();

        let paths = PackageWalker::new(root)
            .follow_symlinks(true)
            .collect()
            .await
            .unwrap();
        assert_eq!(paths, vec![kept]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_follow_symlinks_reaches_linked_package() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("repo");
        let outside = temp_dir.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        touch_manifest(&outside);
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();

        let paths = PackageWalker::new(&root)
            .follow_symlinks(true)
            .collect()
            .await
            .unwrap();
        assert_eq!(paths, vec![root.join("linked").join(MANIFEST_FILENAME)]);
    }
}
