pub mod release_index;

pub use release_index::ReleaseIndexSource;
