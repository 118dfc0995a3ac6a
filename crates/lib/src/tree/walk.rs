//! Splitting the merged tree into link units.
//!
//! A link unit is the coarsest path that can be installed as a single
//! symlink: a leaf, or a directory whose whole subtree belongs to one
//! environment. Directories shared between environments are not units
//! themselves, the walk descends into their children instead.

use super::{EnvSet, Node};

/// A candidate for a single symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkUnit<'a> {
  /// Path segments relative to the environment root.
  pub path: Vec<String>,
  pub environments: &'a EnvSet,
  children: &'a [Node],
}

impl<'a> LinkUnit<'a> {
  /// Finer-grained units below this one, for when the coarse path turns out
  /// to be occupied. Empty for leaves and for shared paths.
  pub fn alternatives(&self) -> Vec<LinkUnit<'a>> {
    let mut units = Vec::new();
    collect(self.children, &self.path, &mut units);
    units
  }

  /// The path joined with `/`, as shown in messages.
  pub fn display_path(&self) -> String {
    self.path.join("/")
  }
}

/// Depth-first, pre-order list of the link units of a tree.
pub fn link_units(tree: &[Node]) -> Vec<LinkUnit<'_>> {
  let mut units = Vec::new();
  collect(tree, &[], &mut units);
  units
}

fn collect<'a>(nodes: &'a [Node], prefix: &[String], units: &mut Vec<LinkUnit<'a>>) {
  for node in nodes {
    let mut path = prefix.to_vec();
    path.push(node.name().to_string());

    let environments = node.environments();
    let children = node.children();

    if environments.len() > 1 {
      if children.is_empty() {
        units.push(LinkUnit {
          path,
          environments,
          children: &[],
        });
      } else {
        collect(children, &path, units);
      }
    } else {
      units.push(LinkUnit {
        path,
        environments,
        children,
      });
    }
  }
}
