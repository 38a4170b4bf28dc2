//! Keyed persistence of the session id
//!
//! The creating job writes the session id to a local file named after the
//! cache key and uploads it; later jobs of the same run restore that file
//! under the same key and resume the session.
//!
//! # Key Layout
//!
//! | Part | Source |
//! |------|--------|
//! | prefix | `cache.key_prefix` |
//! | run id | `GITHUB_RUN_ID` |
//! | OS image | `ImageOS` |
//! | runtime | probe output, e.g. `node -v` |

pub mod backend;
pub mod key;
pub mod store;

pub use backend::{CacheBackend, DirectoryCache};
pub use key::{derive_key, CacheKey, CacheKeyBuilder, RunEnvironment, DEFAULT_KEY_PREFIX};
pub use store::SessionStore;
