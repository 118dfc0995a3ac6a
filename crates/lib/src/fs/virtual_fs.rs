//! In-memory overlay over a [`Filesystem`].
//!
//! While planning, every `mkdir`, `link` and `rm` decision is applied here
//! instead of on disk. Queries walk the overlay first and fall back to the
//! wrapped filesystem for any path the overlay has not touched, so later
//! decisions in the same pass see the effect of earlier ones.
//!
//! Nodes live in an arena and refer to each other by index; a symlink is a
//! pointer from the link node to the node of its source path.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use super::Filesystem;

type NodeId = usize;

const ROOT: NodeId = 0;

/// Upper bound on chained overlay symlinks followed in one step.
const MAX_LINK_CHAIN: usize = 40;

#[derive(Debug)]
struct OverlayNode {
  full_path: PathBuf,
  deleted: bool,
  /// Set once the path was removed in this pass. Nothing below it is read
  /// from the wrapped filesystem any more, even after it is re-created.
  masks_real: bool,
  symlink: Option<NodeId>,
  children: BTreeMap<OsString, NodeId>,
}

impl OverlayNode {
  fn new(full_path: PathBuf) -> Self {
    Self {
      full_path,
      deleted: false,
      masks_real: false,
      symlink: None,
      children: BTreeMap::new(),
    }
  }
}

/// Result of a plain (non-following) overlay lookup.
enum Lookup {
  Found(NodeId),
  /// Not in the overlay, and hidden from the wrapped filesystem.
  Masked,
  /// Not in the overlay; ask the wrapped filesystem.
  Missing,
}

/// Overlay recording simulated mutations on top of a real filesystem.
#[derive(Debug)]
pub struct VirtualFs<'a, F: Filesystem + ?Sized> {
  real: &'a F,
  nodes: Vec<OverlayNode>,
}

impl<'a, F: Filesystem + ?Sized> VirtualFs<'a, F> {
  pub fn new(real: &'a F) -> Self {
    Self {
      real,
      nodes: vec![OverlayNode::new(PathBuf::new())],
    }
  }

  /// Simulate creating a directory (and any missing parents).
  pub fn mkdir(&mut self, path: &Path) {
    trace!(path = %path.display(), "overlay mkdir");
    let mut current = ROOT;
    for segment in segments(path) {
      current = self.child_or_insert(current, segment);
      let node = &mut self.nodes[current];
      if node.deleted {
        node.deleted = false;
        node.symlink = None;
      }
    }
  }

  /// Simulate removing the entry at `path`.
  pub fn rm(&mut self, path: &Path) {
    trace!(path = %path.display(), "overlay rm");
    let id = self.create_path(path);
    let node = &mut self.nodes[id];
    node.deleted = true;
    node.masks_real = true;
    node.symlink = None;
    node.children.clear();
  }

  /// Simulate creating `target` as a symlink to `source`.
  pub fn link(&mut self, source: &Path, target: &Path) {
    trace!(source = %source.display(), target = %target.display(), "overlay link");
    let source_id = self.create_path(source);
    let target_id = self.create_path(target);
    let node = &mut self.nodes[target_id];
    node.deleted = false;
    node.children.clear();
    node.symlink = Some(source_id);
  }

  /// Lexical existence as if all simulated actions had been applied.
  pub fn exists(&self, path: &Path) -> bool {
    let segments = segments(path);
    let mut current = ROOT;

    for (idx, segment) in segments.iter().enumerate() {
      let Some(&child) = self.nodes[current].children.get(segment) else {
        if self.nodes[current].masks_real {
          return false;
        }
        let rest = join_onto(&self.nodes[current].full_path, &segments[idx..]);
        return self.real.exists(&rest);
      };

      if self.nodes[child].deleted {
        return false;
      }
      if idx + 1 == segments.len() {
        // a symlink exists even if what it points to does not
        return true;
      }

      current = self.follow(child);
      if self.nodes[current].deleted {
        return false;
      }
    }

    true
  }

  pub fn is_symlink(&self, path: &Path) -> bool {
    match self.lookup(path) {
      Lookup::Found(id) => self.nodes[id].symlink.is_some(),
      Lookup::Masked => false,
      Lookup::Missing => self.real.is_symlink(path),
    }
  }

  /// The source path a symlink points to, `None` if `path` is not a symlink.
  pub fn symlink_target(&self, path: &Path) -> Option<PathBuf> {
    match self.lookup(path) {
      Lookup::Found(id) => self.nodes[id]
        .symlink
        .map(|source| self.nodes[source].full_path.clone()),
      Lookup::Masked => None,
      Lookup::Missing => self.real.symlink_target(path),
    }
  }

  /// Resolve `path` following overlay symlinks at every segment, then
  /// resolving the untouched suffix on the wrapped filesystem.
  pub fn realpath(&self, path: &Path) -> PathBuf {
    let segments = segments(path);
    let mut current = ROOT;

    for (idx, segment) in segments.iter().enumerate() {
      let Some(&child) = self.nodes[current].children.get(segment) else {
        let rest = join_onto(&self.nodes[current].full_path, &segments[idx..]);
        if self.nodes[current].masks_real {
          return rest;
        }
        return self.real.realpath(&rest);
      };
      current = self.follow(child);
    }

    self.nodes[current].full_path.clone()
  }

  fn lookup(&self, path: &Path) -> Lookup {
    let mut current = ROOT;
    for segment in segments(path) {
      let node = &self.nodes[current];
      match node.children.get(&segment) {
        Some(&child) => {
          if node.deleted {
            return Lookup::Masked;
          }
          current = child;
        }
        None if node.masks_real || node.deleted => return Lookup::Masked,
        None => return Lookup::Missing,
      }
    }
    if self.nodes[current].deleted {
      return Lookup::Masked;
    }
    Lookup::Found(current)
  }

  fn follow(&self, mut id: NodeId) -> NodeId {
    for _ in 0..MAX_LINK_CHAIN {
      match self.nodes[id].symlink {
        Some(source) => id = source,
        None => break,
      }
    }
    id
  }

  fn create_path(&mut self, path: &Path) -> NodeId {
    segments(path)
      .into_iter()
      .fold(ROOT, |current, segment| self.child_or_insert(current, segment))
  }

  fn child_or_insert(&mut self, parent: NodeId, segment: OsString) -> NodeId {
    if let Some(&child) = self.nodes[parent].children.get(&segment) {
      return child;
    }
    let full_path = self.nodes[parent].full_path.join(&segment);
    let mut node = OverlayNode::new(full_path);
    // nothing below a masked directory can come from the wrapped filesystem
    node.masks_real = self.nodes[parent].masks_real;
    let id = self.nodes.len();
    self.nodes.push(node);
    self.nodes[parent].children.insert(segment, id);
    id
  }
}

/// Path components used as overlay keys. The root (and a Windows prefix)
/// are keys too, so joining the keys back rebuilds the absolute path.
fn segments(path: &Path) -> Vec<OsString> {
  let mut out: Vec<OsString> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
        out.push(component.as_os_str().to_os_string())
      }
    }
  }
  out
}

fn join_onto(base: &Path, rest: &[OsString]) -> PathBuf {
  let mut path = base.to_path_buf();
  for segment in rest {
    path.push(segment);
  }
  path
}
