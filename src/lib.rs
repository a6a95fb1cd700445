// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Plantscribe: build PlantUML diagrams through a typed, scope-checked API.
//!
//! Diagrams are assembled with a per-type builder ([`ActivityDiagram`], [`SequenceDiagram`],
//! [`StateDiagram`], [`ClassDiagram`]) whose nested constructs are opened and closed by
//! closures, finalized into an immutable [`Diagram`], and written out with
//! [`export_diagram`].
//!
//! ```
//! use plantscribe::{export_diagram, ActivityDiagram, RenderOptions};
//!
//! let mut diagram = ActivityDiagram::new();
//! let mut body = diagram.body();
//! body.start()?;
//! body.action("Hello")?;
//! body.stop()?;
//! let text = export_diagram(&diagram.finish()?, &RenderOptions::default())?;
//! assert_eq!(text, "@startuml\nstart\n:Hello;\nstop\n@enduml\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod format;
pub mod model;

pub use build::{ActivityDiagram, ClassDiagram, DiagramBuilder, SequenceDiagram, StateDiagram};
pub use config::RenderOptions;
pub use error::{BuildError, ConfigError, RenderError, StructuralError, ValidationError};
pub use format::plantuml::{
    export_activity, export_class, export_diagram, export_sequence, export_state, unescape,
};
pub use model::{Alias, Color, Diagram, DiagramKind};
