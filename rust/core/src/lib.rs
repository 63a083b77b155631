// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Fenestra Core
//!
//! Shared value types and plumbing for the fenestra opening-layout engine:
//!
//! - **Tolerances & standard dimensions**: the single numeric contract every
//!   geometric comparison uses ([`units`])
//! - **Opening specifications**: caller-facing records describing windows,
//!   doors and skylights to place ([`opening`])
//! - **Diagnostics sink**: the severity-accumulating log channel through
//!   which soft failures are observed ([`diagnostics`])
//!
//! Geometry math lives in `fenestra-geometry`; the layout solver in
//! `fenestra-layout`.
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialization of opening-specification records

pub mod diagnostics;
pub mod error;
pub mod opening;
pub mod units;

pub use diagnostics::Severity;
pub use error::{Error, Result};
pub use opening::{OpeningKind, OpeningSpec, SurfaceKind};
