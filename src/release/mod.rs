//! Feature release steps
//!
//! Each module is one step of the release and can be used on its own;
//! `pipeline` runs them in order for every configured variant.
//!
//! - **version**: read the feature version from `feature.xml`
//! - **template**: render `build.xml` from its template
//! - **build**: launch the host tool's Ant runner
//! - **collect**: copy build output into the release directory
//! - **hash**: checksum the produced artifact
//! - **readme**: write the release README
//! - **archive**: zip the release directory
//!
//! # Example release.toml
//!
//! ```toml
//! [feature]
//! id = "DEHCapellaAdapterFeature"
//! project_dir = "DEHCapellaAdapterFeature"
//!
//! [[variants]]
//! label = "CapellaFeature6x"
//! tool_home = "C:\\Capella\\CapellaStudio 6"
//! ```

pub mod archive;
pub mod build;
pub mod collect;
pub mod hash;
pub mod pipeline;
pub mod readme;
pub mod template;
pub mod version;

pub use pipeline::{ReleasePipeline, ReleaseSummary, RunOptions};
