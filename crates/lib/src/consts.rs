//! Names shared across the crate.

/// Environment variable that overrides the default base directory.
pub const BASE_DIR_ENV: &str = "DOTFILER_BASE";

/// Default base directory name, relative to the home directory.
pub const DEFAULT_BASE_DIR_NAME: &str = ".dotfiles";

/// File inside the base directory recording every symlink ever created.
pub const CREATED_LINKS_FILENAME: &str = ".created-links";

/// File inside the base directory listing ignored filename patterns.
pub const IGNORE_FILENAME: &str = ".dotignore";

/// Directories never descended into while listing environment files.
pub const IGNORED_DIRS: &[&str] = &[".git"];

/// Top-level directories of the base directory that are not environments.
pub const IGNORED_ENVS: &[&str] = &[".git", "bin"];
