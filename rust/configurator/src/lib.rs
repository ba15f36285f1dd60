// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Lite Configurator
//!
//! Editing session on top of [`ifc_lite_placement`]: resolves spans from
//! parametric building dimensions, owns the placed items, and runs the change
//! pipeline (reflow, validation, presentation sync) once per mutation.
//!
//! ```
//! use ifc_lite_configurator::{BuildingParameters, Session, SessionConfig};
//! use ifc_lite_placement::ItemKind;
//!
//! let mut session = Session::new(BuildingParameters::new(3000.0, 2400.0, 2200.0), SessionConfig::default());
//! let door = session.add_item(&"front".into(), 900.0, ItemKind::Door).unwrap();
//! assert_eq!(session.item(door).unwrap().position, 1050.0);
//! ```

pub mod building;
pub mod config;
pub mod error;
pub mod ids;
pub mod scene;
pub mod session;
pub mod span_model;

pub use building::{BuildingParameters, Divider, RidgeAxis, RoofSpec};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use ids::IdAllocator;
pub use scene::{Scene, SceneReport};
pub use session::{Phase, Session, SessionEvent};
pub use span_model::{SpanModel, SpanRole, StandardSpanModel};
