/// Load errors for the mesh store
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds reported by the mesh and material loaders.
///
/// A failed load never mutates the mesh it was called on.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No renderable geometry in {} ({vertices} vertices, {faces} faces)", path.display())]
    EmptyGeometry {
        path: PathBuf,
        vertices: usize,
        faces: usize,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;
