//! XDSM Core Types and Definitions
//!
//! This crate provides the foundational types for describing Extended Design
//! Structure Matrix (XDSM) diagrams. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS color parsing for diagram styling ([`color::Color`])
//! - **Semantic**: The diagram model of systems, edges and annotations ([`semantic`] module)
//! - **TeX**: Helpers for composing TeX label text ([`tex`] module)

pub mod color;
pub mod identifier;
pub mod semantic;
pub mod tex;
