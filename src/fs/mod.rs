//! The sandboxed filesystem that backs every file transfer command.
//!
//! All client supplied paths are *virtual*: `/` separated and rooted at the
//! sandbox root. This module maps them to absolute host paths, enforcing that
//! the canonical result never escapes the root, and performs the actual I/O
//! with [`tokio::fs`] primitives.

mod error;
pub use error::{Error, ErrorKind};

pub mod listing;
pub use listing::Fileinfo;

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::io::AsyncSeekExt;

/// Result type used by the filesystem operations in this module
pub type Result<T> = std::result::Result<T, Error>;

/// A filesystem rooted at a specific host directory. No operation can read,
/// write, list or traverse outside of the root: every incoming path is
/// canonicalized and checked for containment before any I/O happens.
///
/// For example, with the root set to `/srv/ftp`, a client asking for
/// `hello.txt` is served `/srv/ftp/hello.txt`, and a client asking for
/// `../../etc/passwd` is refused.
#[derive(Debug)]
pub struct SandboxFs {
    root: PathBuf,
}

impl SandboxFs {
    /// Creates a sandbox rooted at the given directory. The root is
    /// canonicalized once here so that later containment checks compare
    /// canonical paths on both sides.
    pub fn new<P: Into<PathBuf>>(root: P) -> std::io::Result<SandboxFs> {
        let root = root.into().canonicalize()?;
        Ok(SandboxFs { root })
    }

    /// The canonical root directory of the sandbox.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // Lexically combines root, current directory and argument per RFC 959
    // semantics: an absolute argument replaces the current directory.
    // Normalization of `.` and `..` is left to canonicalization so that
    // symlinks are resolved the way the host filesystem sees them.
    fn host_path(&self, cwd: &str, arg: &str) -> PathBuf {
        let mut full = self.root.clone();
        if let Some(rest) = arg.strip_prefix('/') {
            full.extend(rest.split('/').filter(|s| !s.is_empty()));
        } else {
            full.extend(cwd.trim_start_matches('/').split('/').filter(|s| !s.is_empty()));
            full.extend(arg.split('/').filter(|s| !s.is_empty()));
        }
        full
    }

    fn ensure_contained(&self, path: &Path) -> Result<()> {
        // Both sides are canonical here, and `starts_with` compares whole
        // components, so `/srv/ftp` is never accepted as a prefix of
        // `/srv/ftpother`.
        if path == self.root || path.starts_with(&self.root) {
            Ok(())
        } else {
            Err(Error::from(ErrorKind::SandboxViolation))
        }
    }

    /// Resolves a virtual path to the canonical host path of an *existing*
    /// filesystem entry, failing if the result escapes the sandbox.
    pub async fn resolve(&self, cwd: &str, arg: &str) -> Result<PathBuf> {
        let full = self.host_path(cwd, arg);
        let canonical = tokio::fs::canonicalize(&full).await.map_err(Error::from)?;
        self.ensure_contained(&canonical)?;
        Ok(canonical)
    }

    /// Resolves a virtual path for an entry that is about to be created
    /// (`STOR`, `APPE`, `MKD`, `RNTO`). The parent must exist; it is
    /// canonicalized and checked for containment, then the final name is
    /// appended.
    pub async fn resolve_for_create(&self, cwd: &str, arg: &str) -> Result<PathBuf> {
        let full = self.host_path(cwd, arg);
        // `file_name` is None when the path ends in `..`; such a target can
        // never name a new entry.
        let name = full.file_name().ok_or_else(|| Error::from(ErrorKind::SandboxViolation))?.to_owned();
        let parent = full.parent().unwrap_or(&self.root);
        let canonical_parent = tokio::fs::canonicalize(parent).await.map_err(Error::from)?;
        self.ensure_contained(&canonical_parent)?;
        let target = canonical_parent.join(name);
        // The target may already exist, possibly as a symlink; writing goes
        // to wherever it really points, so that place must be contained too.
        match tokio::fs::canonicalize(&target).await {
            Ok(canonical) => {
                self.ensure_contained(&canonical)?;
                Ok(canonical)
            }
            Err(_) => Ok(target),
        }
    }

    /// Returns the metadata of the entry at the given resolved host path.
    pub async fn metadata(&self, path: &Path) -> Result<std::fs::Metadata> {
        tokio::fs::metadata(path).await.map_err(Error::from)
    }

    /// Lists the entries of the directory at the given resolved host path.
    pub async fn list(&self, path: &Path) -> Result<Vec<Fileinfo>> {
        let mut rd = tokio::fs::read_dir(path).await.map_err(Error::from)?;
        let mut entries = vec![];
        while let Some(dir_entry) = rd.next_entry().await.map_err(Error::from)? {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            let metadata = tokio::fs::symlink_metadata(dir_entry.path()).await.map_err(Error::from)?;
            entries.push(Fileinfo { name, metadata });
        }
        Ok(entries)
    }

    /// Opens the file at the given resolved host path for reading, positioned
    /// at `start_pos`.
    pub async fn open_read(&self, path: &Path, start_pos: u64) -> Result<tokio::fs::File> {
        let md = self.metadata(path).await?;
        if md.is_dir() {
            return Err(Error::from(ErrorKind::IsADirectory));
        }
        let mut file = tokio::fs::File::open(path).await.map_err(Error::from)?;
        if start_pos > 0 {
            file.seek(SeekFrom::Start(start_pos)).await.map_err(Error::from)?;
        }
        Ok(file)
    }

    /// Opens (creating if necessary) the file at the given resolved host path
    /// for writing. The file is truncated to `start_pos` bytes and the write
    /// cursor placed there, which makes `start_pos == 0` a plain truncating
    /// store and anything else a restarted one.
    pub async fn open_write(&self, path: &Path, start_pos: u64) -> Result<tokio::fs::File> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .open(path)
            .await
            .map_err(Error::from)?;
        file.set_len(start_pos).await.map_err(Error::from)?;
        file.seek(SeekFrom::Start(start_pos)).await.map_err(Error::from)?;
        Ok(file)
    }

    /// Opens (creating if necessary) the file at the given resolved host path
    /// with the write cursor at its end.
    pub async fn open_append(&self, path: &Path) -> Result<tokio::fs::File> {
        tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .await
            .map_err(Error::from)
    }

    /// Deletes the regular file at the given resolved host path.
    pub async fn del(&self, path: &Path) -> Result<()> {
        let md = self.metadata(path).await?;
        if md.is_dir() {
            return Err(Error::from(ErrorKind::IsADirectory));
        }
        tokio::fs::remove_file(path).await.map_err(Error::from)
    }

    /// Recursively deletes the directory at the given resolved host path.
    pub async fn rmd(&self, path: &Path) -> Result<()> {
        let md = self.metadata(path).await?;
        if !md.is_dir() {
            return Err(Error::from(ErrorKind::NotADirectory));
        }
        tokio::fs::remove_dir_all(path).await.map_err(Error::from)
    }

    /// Creates a single directory at the given resolved host path.
    pub async fn mkd(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir(path).await.map_err(Error::from)
    }

    /// Renames a file or directory. Both paths must already be resolved.
    pub async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        tokio::fs::rename(from, to).await.map_err(Error::from)
    }
}

/// Joins an argument onto a virtual current directory and normalizes the
/// result: consecutive slashes collapse, `.` disappears, `..` pops one level
/// but never past the root, and the result has no trailing slash except for
/// `/` itself.
pub fn join_virtual(cwd: &str, arg: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !arg.starts_with('/') {
        parts.extend(cwd.split('/').filter(|s| !s.is_empty() && *s != "."));
    }
    for segment in arg.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_virtual_handles_relative_and_absolute() {
        assert_eq!(join_virtual("/", "dir1"), "/dir1");
        assert_eq!(join_virtual("/dir1", "sub"), "/dir1/sub");
        assert_eq!(join_virtual("/dir1", "/other"), "/other");
    }

    #[test]
    fn join_virtual_normalizes_dots() {
        assert_eq!(join_virtual("/dir1/sub", ".."), "/dir1");
        assert_eq!(join_virtual("/dir1", "./sub/../x"), "/dir1/x");
        assert_eq!(join_virtual("/", ".."), "/");
        assert_eq!(join_virtual("/", "../../.."), "/");
        assert_eq!(join_virtual("/a", "b//c"), "/a/b/c");
    }

    #[tokio::test]
    async fn resolve_stays_within_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("dir1")).unwrap();
        let fs = SandboxFs::new(root.path()).unwrap();

        let resolved = fs.resolve("/", "dir1").await.unwrap();
        assert_eq!(resolved, root.path().canonicalize().unwrap().join("dir1"));
    }

    #[tokio::test]
    async fn resolve_rejects_escape_through_dotdot() {
        let root = tempfile::tempdir().unwrap();
        let fs = SandboxFs::new(root.path()).unwrap();

        let err = fs.resolve("/", "../../etc").await.unwrap_err();
        // Either the path escapes (sandbox violation) or an intermediate
        // component does not exist; both refuse the operation.
        assert!(matches!(err.kind(), ErrorKind::SandboxViolation | ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn resolve_rejects_symlink_escape() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("exit")).unwrap();
        let fs = SandboxFs::new(root.path()).unwrap();

        let err = fs.resolve("/", "exit").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SandboxViolation);
    }

    #[tokio::test]
    async fn resolve_for_create_accepts_new_names() {
        let root = tempfile::tempdir().unwrap();
        let fs = SandboxFs::new(root.path()).unwrap();

        let resolved = fs.resolve_for_create("/", "new.txt").await.unwrap();
        assert_eq!(resolved, root.path().canonicalize().unwrap().join("new.txt"));
    }

    #[tokio::test]
    async fn resolve_for_create_rejects_escaping_parent() {
        let root = tempfile::tempdir().unwrap();
        let fs = SandboxFs::new(root.path()).unwrap();

        let err = fs.resolve_for_create("/", "/../escape.txt").await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SandboxViolation | ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn sibling_prefix_directory_is_not_contained() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("ftp");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(parent.path().join("ftpother")).unwrap();
        let fs = SandboxFs::new(&root).unwrap();

        let err = fs.resolve("/", "../ftpother").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SandboxViolation);
    }

    #[tokio::test]
    async fn open_write_truncates_to_start_pos() {
        let root = tempfile::tempdir().unwrap();
        let fs = SandboxFs::new(root.path()).unwrap();
        let path = root.path().join("data.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let file = fs.open_write(&path, 4).await.unwrap();
        drop(file);
        assert_eq!(std::fs::read(&path).unwrap(), b"0123");
    }
}
