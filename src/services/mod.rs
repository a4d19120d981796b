//! Orchestration services composed from the pure pipeline modules.
//!
//! ARCHITECTURE
//! ============
//! A service owns the sequencing of one user-facing operation: validating
//! input, calling the provider, and handing results between the extractor
//! and the layout synthesizer.

pub mod generate;
