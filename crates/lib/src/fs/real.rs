//! [`Filesystem`] backed by the real disk.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use super::Filesystem;

/// Upper bound on symlinks followed while resolving one path.
const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl Filesystem for RealFs {
  fn exists(&self, path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
  }

  fn is_symlink(&self, path: &Path) -> bool {
    fs::symlink_metadata(path)
      .map(|meta| meta.file_type().is_symlink())
      .unwrap_or(false)
  }

  fn symlink_target(&self, path: &Path) -> Option<PathBuf> {
    if !self.is_symlink(path) {
      return None;
    }
    fs::read_link(path).ok()
  }

  fn realpath(&self, path: &Path) -> PathBuf {
    resolve_lenient(path)
  }

  fn mkdir(&self, path: &Path) -> io::Result<()> {
    fs::create_dir(path)
  }

  fn symlink(&self, source: &Path, target: &Path) -> io::Result<()> {
    create_symlink(source, target)
  }

  fn rm(&self, path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
      return fs::remove_dir(path);
    }
    #[cfg(windows)]
    {
      if meta.file_type().is_symlink() && fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
        return fs::remove_dir(path);
      }
    }
    fs::remove_file(path)
  }
}

/// Create a symbolic link at `link` pointing to `source`.
fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
  #[cfg(unix)]
  {
    std::os::unix::fs::symlink(source, link)?;
  }

  #[cfg(windows)]
  {
    if source.is_dir() {
      std::os::windows::fs::symlink_dir(source, link)?;
    } else {
      std::os::windows::fs::symlink_file(source, link)?;
    }
  }

  Ok(())
}

/// Split a path into its root (prefix and root directory) and the names below it.
fn split_root(path: &Path) -> (Option<PathBuf>, Vec<OsString>) {
  let mut root: Option<PathBuf> = None;
  let mut names = Vec::new();
  for component in path.components() {
    match component {
      Component::Prefix(_) | Component::RootDir => {
        root.get_or_insert_with(PathBuf::new).push(component.as_os_str());
      }
      Component::CurDir => {}
      Component::ParentDir => names.push(OsString::from("..")),
      Component::Normal(name) => names.push(name.to_os_string()),
    }
  }
  (root, names)
}

/// Resolve symlinks component by component without requiring the path to exist.
pub(crate) fn resolve_lenient(path: &Path) -> PathBuf {
  let (root, names) = split_root(path);
  let mut resolved = match root {
    Some(root) => root,
    None => std::env::current_dir().unwrap_or_default(),
  };
  let mut pending: VecDeque<OsString> = names.into();
  let mut hops = 0;

  while let Some(name) = pending.pop_front() {
    if name == ".." {
      resolved.pop();
      continue;
    }

    let candidate = resolved.join(&name);
    match fs::read_link(&candidate) {
      Ok(target) if hops < MAX_SYMLINK_HOPS => {
        hops += 1;
        trace!(link = %candidate.display(), target = %target.display(), "following symlink");
        let (target_root, target_names) = split_root(&target);
        if let Some(target_root) = target_root {
          resolved = target_root;
        }
        for name in target_names.into_iter().rev() {
          pending.push_front(name);
        }
      }
      _ => resolved = candidate,
    }
  }

  resolved
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn temp_root() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    // temp dirs may live below a symlink (macOS /var), resolve first
    let root = fs::canonicalize(temp.path()).unwrap();
    (temp, root)
  }

  #[test]
  fn dangling_symlink_exists() {
    let (_temp, root) = temp_root();
    let link = root.join("link");
    std::os::unix::fs::symlink(root.join("missing"), &link).unwrap();

    let fs = RealFs;
    assert!(fs.exists(&link));
    assert!(fs.is_symlink(&link));
    assert_eq!(fs.symlink_target(&link), Some(root.join("missing")));
  }

  #[test]
  fn symlink_target_is_none_for_plain_file() {
    let (_temp, root) = temp_root();
    let file = root.join("file");
    fs::write(&file, "x").unwrap();

    assert!(!RealFs.is_symlink(&file));
    assert_eq!(RealFs.symlink_target(&file), None);
  }

  #[test]
  fn realpath_resolves_intermediate_dirs_and_keeps_missing_tail() {
    let (_temp, root) = temp_root();
    fs::create_dir_all(root.join("dotfiles/zsh/.zsh")).unwrap();
    std::os::unix::fs::symlink(root.join("dotfiles/zsh/.zsh"), root.join(".zsh")).unwrap();

    assert_eq!(
      RealFs.realpath(&root.join(".zsh/not-there/file")),
      root.join("dotfiles/zsh/.zsh/not-there/file")
    );
  }

  #[test]
  fn realpath_handles_relative_targets() {
    let (_temp, root) = temp_root();
    fs::create_dir_all(root.join("a/b")).unwrap();
    std::os::unix::fs::symlink("../a/b", root.join("a/link")).unwrap();

    assert_eq!(RealFs.realpath(&root.join("a/link")), root.join("a/b"));
  }

  #[test]
  fn realpath_stops_on_cycles() {
    let (_temp, root) = temp_root();
    std::os::unix::fs::symlink(root.join("b"), root.join("a")).unwrap();
    std::os::unix::fs::symlink(root.join("a"), root.join("b")).unwrap();

    // must terminate
    let _ = RealFs.realpath(&root.join("a"));
  }

  #[test]
  fn mutators_touch_single_entries() {
    let (_temp, root) = temp_root();
    let real = RealFs;
    let dir = root.join("dir");
    real.mkdir(&dir).unwrap();
    real.symlink(&root, &dir.join("link")).unwrap();
    assert!(real.is_symlink(&dir.join("link")));

    // non-empty directory is refused
    assert!(real.rm(&dir).is_err());

    real.rm(&dir.join("link")).unwrap();
    real.rm(&dir).unwrap();
    assert!(!real.exists(&dir));
  }
}
