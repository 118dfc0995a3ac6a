//! dotfiler-lib: planning and applying a symlink farm for dotfiles
//!
//! A base directory holds several environments (`base`, `work`, `osx`, ...),
//! each a partial mirror of the home directory. This crate merges them and
//! links every file into the home directory, linking whole directories where
//! a single environment owns them:
//! - `tree`: the merged tree of environment files and its link units
//! - `fs`: the filesystem capability, on disk and as a planning overlay
//! - `plan`: turning a tree into an ordered, conflict-aware list of actions
//! - `execute`: applying a plan, or describing it in a dry run
//! - `update`: the end-to-end pipeline behind `dot update`

pub mod action;
pub mod consts;
pub mod env;
pub mod execute;
pub mod fs;
pub mod links;
pub mod paths;
pub mod plan;
pub mod status;
pub mod tree;
pub mod update;
pub mod util;
