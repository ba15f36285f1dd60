// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the editing session.

use std::path::PathBuf;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the action that triggered them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A placement action was rejected.
    #[error(transparent)]
    Placement(#[from] ifc_lite_placement::Error),

    /// Configuration or scene JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Every item id has been handed out.
    #[error("item ids exhausted")]
    IdsExhausted,

    /// A configuration or scene file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The add action was rejected for lack of space.
    pub fn is_no_space(&self) -> bool {
        matches!(
            self,
            Error::Placement(
                ifc_lite_placement::Error::NoSpace { .. }
                    | ifc_lite_placement::Error::NoSpaceOnAnySpan { .. }
            )
        )
    }
}
