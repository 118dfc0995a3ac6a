//! Building the merged tree from a flat listing.

use super::{EnvSet, Node};

/// One file contributed by an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
  pub environment: String,
  /// `/`-separated path relative to the environment root. A trailing `/`
  /// marks an empty directory.
  pub path: String,
}

impl ListingEntry {
  pub fn new(environment: impl Into<String>, path: impl Into<String>) -> Self {
    Self {
      environment: environment.into(),
      path: path.into(),
    }
  }
}

/// Parse the textual `env/relative/path` listing, one entry per line.
///
/// Surrounding whitespace and blank lines are ignored.
pub fn parse_listing(text: &str) -> Vec<ListingEntry> {
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .filter_map(|line| line.split_once('/'))
    .map(|(env, path)| ListingEntry::new(env, path))
    .collect()
}

/// Build the merged tree.
///
/// Entries are sorted by path only, so contributions to the same path from
/// different environments end up in the same group. Nodes at every level are
/// ordered by name. Entries with an empty path are dropped.
pub fn build_tree<I>(entries: I) -> Vec<Node>
where
  I: IntoIterator<Item = ListingEntry>,
{
  let mut split: Vec<(Vec<String>, String)> = entries
    .into_iter()
    .filter_map(|entry| split_segments(&entry.path).map(|segments| (segments, entry.environment)))
    .collect();

  // stable: same-path entries keep their environment order
  split.sort_by(|a, b| a.0.cmp(&b.0));

  let borrowed: Vec<(&[String], &str)> = split
    .iter()
    .map(|(segments, env)| (segments.as_slice(), env.as_str()))
    .collect();

  group(&borrowed)
}

fn split_segments(path: &str) -> Option<Vec<String>> {
  let trimmed = path.trim_start_matches('/');
  let mut segments: Vec<String> = trimmed
    .split('/')
    .filter(|segment| !segment.is_empty() && *segment != ".")
    .map(String::from)
    .collect();

  if segments.is_empty() {
    return None;
  }
  if trimmed.ends_with('/') {
    // directory marker, terminates the walk below this directory
    segments.push(String::new());
  }
  Some(segments)
}

fn group(entries: &[(&[String], &str)]) -> Vec<Node> {
  let mut nodes = Vec::new();
  let mut rest = entries;

  while let Some((first, _)) = rest.split_first() {
    let head = &first.0[0];
    let len = rest.iter().take_while(|(segments, _)| &segments[0] == head).count();
    let (run, tail) = rest.split_at(len);
    rest = tail;

    if head.is_empty() {
      continue;
    }

    let environments: EnvSet = run.iter().map(|(_, env)| env.to_string()).collect();
    let remainders: Vec<(&[String], &str)> = run
      .iter()
      .filter(|(segments, _)| segments.len() > 1)
      .map(|(segments, env)| (&segments[1..], *env))
      .collect();

    if remainders.is_empty() {
      nodes.push(Node::File {
        name: head.clone(),
        environments,
      });
    } else {
      nodes.push(Node::Dir {
        name: head.clone(),
        environments,
        children: group(&remainders),
      });
    }
  }

  nodes
}
