//! Module containing the universal error type
use thiserror::Error;

/// Universal error type for this crate
#[derive(Error, Debug)]
pub enum Error {
    /// The input point cloud was empty
    #[error("input point cloud is empty")]
    EmptyInput,

    /// No seed tetrahedron could be found, even after degeneracy handling;
    /// the input points are coincident or colinear
    #[error("input points are coincident or colinear; no tetrahedron exists")]
    DegenerateInput,

    /// IO error; see inner code for details
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
