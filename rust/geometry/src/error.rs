// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during polygon normalization and transforms
///
/// Public entry points never surface these directly; they log through the
/// diagnostics sink and return neutral values. The `try_*` internals use
/// this type with `?`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),

    #[error("Non-planar input: {0}")]
    NonPlanar(String),

    #[error("Non-convex polygon: {0}")]
    NonConvex(String),

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),

    #[error("Singular transformation: {0}")]
    SingularTransform(String),

    #[error("Boolean provider returned no result: {0}")]
    ProviderNoResult(String),

    #[error("Core error: {0}")]
    CoreError(#[from] fenestra_core::Error),
}
