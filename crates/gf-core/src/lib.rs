pub mod codegen;
pub mod document;
pub mod grid;
pub mod id;
pub mod model;
pub mod palette;
pub mod schema;
pub mod update;
pub mod views;

pub use codegen::{DependencyManifest, GeneratedDocument, generate_document, install_instructions};
pub use document::{DocumentError, load_document, save_document};
pub use grid::{GRID_COLUMNS, Rows, SpanAssignment, compute_rows, rebalance_spans};
pub use id::ElementId;
pub use model::*;
pub use update::{FieldUpdate, UpdateScope};
pub use views::{ElementView, FieldBinding, FormContext, PanelSections, RenderRegistry, view_for};
