// Adapters layer: concrete implementations for external systems (storage, fonts, PDF output).

pub mod fonts;
pub mod memory_store;
pub mod pdf;
