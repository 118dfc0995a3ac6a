//! Removal of links whose source is gone from its environment.

use tracing::debug;

use crate::action::Action;
use crate::fs::Filesystem;
use crate::links::CreatedLinks;

/// `Rm` actions for recorded links that still point at their recorded source
/// while that source no longer exists.
///
/// Links the user has re-pointed elsewhere, or removed, are left alone.
pub fn stale_link_removals<F: Filesystem + ?Sized>(links: &CreatedLinks, fs: &F) -> Vec<Action> {
  links
    .iter()
    .filter(|(target, source)| {
      let stale = fs.exists(target) && fs.is_symlink(target) && fs.realpath(target) == *source && !fs.exists(source);
      if stale {
        debug!(target = %target.display(), source = %source.display(), "recorded link is stale");
      }
      stale
    })
    .map(|(target, _)| Action::Rm(target.to_path_buf()))
    .collect()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::util::testutil::FakeFs;

  #[test]
  fn only_dangling_recorded_links_are_removed() {
    let fs = FakeFs::parse(
      "
      # source disappeared, remove
      /home/art/.zsh/aliases -> /home/art/.dotfiles/zsh/.zsh/aliases

      # source still there
      /home/art/.zsh/functions -> /home/art/.dotfiles/zsh/.zsh/functions
      /home/art/.dotfiles/zsh/.zsh/functions

      # re-pointed by the user since the last run
      /home/art/.zsh/prompt -> /home/art/local/.zsh-prompt
      /home/art/local/.zsh-prompt
      ",
    );

    let mut links = CreatedLinks::new();
    links.record("/home/art/.zsh/aliases", "/home/art/.dotfiles/zsh/.zsh/aliases");
    links.record("/home/art/.zsh/functions", "/home/art/.dotfiles/zsh/.zsh/functions");
    links.record("/home/art/.zsh/prompt", "/home/art/.dotfiles/zsh/.zsh/prompt");

    assert_eq!(
      stale_link_removals(&links, &fs),
      vec![Action::Rm(PathBuf::from("/home/art/.zsh/aliases"))]
    );
  }

  #[test]
  fn link_removed_by_user_is_ignored() {
    let fs = FakeFs::parse("");
    let mut links = CreatedLinks::new();
    links.record("/home/art/.vimrc", "/home/art/.dotfiles/base/.vimrc");

    assert!(stale_link_removals(&links, &fs).is_empty());
  }
}
