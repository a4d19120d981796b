//! archsketch — natural-language architecture descriptions to whiteboard diagrams.
//!
//! ARCHITECTURE
//! ============
//! Two pure components composed by [`services::generate`]:
//!
//! - [`extract`] turns an untrusted LLM completion into a validated
//!   [`diagram::Diagram`], degrading to an empty diagram with
//!   [`extract::Diagnostics`] instead of failing.
//! - [`layout`] places diagram nodes on a grid and emits drawable
//!   [`layout::VisualPrimitive`]s.
//!
//! The [`llm`] module is the single I/O edge: one completion request per
//! generation, bounded by a timeout.

pub mod diagram;
pub mod error;
pub mod extract;
pub mod layout;
pub mod llm;
pub mod services;

pub use diagram::{Diagram, DiagramEdge, DiagramNode};
pub use error::ErrorCode;
pub use extract::{Diagnostics, Extraction, extract_diagram};
pub use layout::{VisualPrimitive, synthesize};
pub use services::generate::{DiagramRequest, GenerateError, GeneratedDiagram, generate_diagram};
