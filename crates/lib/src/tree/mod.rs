//! Merged file tree.
//!
//! Every environment contributes a set of relative file paths. The tree built
//! here overlays all of them: each node records which environments own it, so
//! the planner can tell a path that belongs to a single environment (and can
//! be linked as one unit) from a path shared between several.
//!
//! # Submodules
//!
//! - [`builder`] - builds the tree from a flat `(environment, path)` listing
//! - [`walk`] - splits the tree into [`LinkUnit`]s for the planner

pub mod builder;
pub mod walk;

use std::collections::BTreeSet;
use std::fmt;

pub use builder::{ListingEntry, build_tree, parse_listing};
pub use walk::{LinkUnit, link_units};

/// Set of environment names owning a node. Iteration is sorted.
pub type EnvSet = BTreeSet<String>;

/// A node of the merged tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  File {
    name: String,
    environments: EnvSet,
  },
  Dir {
    name: String,
    environments: EnvSet,
    /// Sorted by name, names are unique.
    children: Vec<Node>,
  },
}

impl Node {
  pub fn file<I, S>(name: &str, environments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Node::File {
      name: name.to_string(),
      environments: environments.into_iter().map(Into::into).collect(),
    }
  }

  pub fn dir<I, S>(name: &str, environments: I, children: Vec<Node>) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Node::Dir {
      name: name.to_string(),
      environments: environments.into_iter().map(Into::into).collect(),
      children,
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Node::File { name, .. } | Node::Dir { name, .. } => name,
    }
  }

  pub fn environments(&self) -> &EnvSet {
    match self {
      Node::File { environments, .. } | Node::Dir { environments, .. } => environments,
    }
  }

  /// Children of a directory; always empty for a file.
  pub fn children(&self) -> &[Node] {
    match self {
      Node::File { .. } => &[],
      Node::Dir { children, .. } => children,
    }
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let envs = self.environments().iter().cloned().collect::<Vec<_>>().join("|");
    match self {
      Node::File { name, .. } => write!(f, "({})/{}", envs, name),
      Node::Dir { name, children, .. } => {
        write!(f, "({})/{}/[", envs, name)?;
        for (i, child) in children.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{}", child)?;
        }
        write!(f, "]")
      }
    }
  }
}
