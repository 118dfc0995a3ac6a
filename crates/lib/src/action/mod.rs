//! Plan actions.
//!
//! The planner expresses everything it wants done as a sequence of
//! [`Action`]s. Nothing here touches the filesystem: executors in
//! [`crate::execute`] turn actions into real mutations or into a dry-run
//! forecast.
//!
//! # Action Types
//!
//! - [`Action::Mkdir`] - create an intermediate directory
//! - [`Action::Link`] - create a symlink into an environment
//! - [`Action::Rm`] - remove a symlink that has to be replaced or is stale
//! - [`Action::AlreadyLinked`] - the path is already in the desired state
//! - [`Action::Error`] - a conflict that needs manual attention ([`PlanError`])

mod types;

pub use types::*;

#[cfg(test)]
mod tests {
  use std::collections::HashSet;
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn conflict_message_lists_environments() {
    let err = PlanError::OwnershipConflict {
      path: ".zsh/aliases".to_string(),
      environments: vec!["base".to_string(), "develop".to_string()],
    };
    assert_eq!(
      err.to_string(),
      "File .zsh/aliases exists in more than one environment: base, develop"
    );
  }

  #[test]
  fn unmanaged_symlink_message() {
    let err = PlanError::UnmanagedSymlink {
      target: PathBuf::from("/home/art/.zshrc"),
      points_to: PathBuf::from("/home/art/.zsh/zshrc"),
    };
    assert_eq!(
      err.to_string(),
      "File /home/art/.zshrc is a symlink to /home/art/.zsh/zshrc, please remove it manually if you really want to replace it."
    );
  }

  #[test]
  fn occupied_message() {
    let err = PlanError::OccupiedByForeignFile {
      target: PathBuf::from("/home/art/.zshrc"),
    };
    assert_eq!(
      err.to_string(),
      "File /home/art/.zshrc already exists, can't make symlink instead of it."
    );
  }

  #[test]
  fn equal_actions_hash_equal() {
    let mut set = HashSet::new();
    assert!(set.insert(Action::Mkdir(PathBuf::from("/home/art/.zsh"))));
    assert!(!set.insert(Action::Mkdir(PathBuf::from("/home/art/.zsh"))));
    assert!(set.insert(Action::Rm(PathBuf::from("/home/art/.zsh"))));
  }

  #[test]
  fn only_fs_changes_are_mutations() {
    let link = Action::Link {
      source: PathBuf::from("/s"),
      target: PathBuf::from("/t"),
    };
    let linked = Action::AlreadyLinked {
      source: PathBuf::from("/s"),
      target: PathBuf::from("/t"),
    };
    assert!(link.kind().is_mutation());
    assert!(!linked.kind().is_mutation());
    assert_eq!(linked.kind().label(), "INFO");
    assert_eq!(linked.kind().as_str(), "already-linked");
  }
}
