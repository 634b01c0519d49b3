// Report processing: row primitives, reference joins and per-entity processors

pub mod barcode;
pub mod color;
pub mod processors;
pub mod transform;

pub use processors::PipelineSettings;
