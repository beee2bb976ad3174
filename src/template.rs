/// Legacy/modern design adaptation into one canonical layout.
pub mod adapter;
/// Color parsing shared by both configuration formats.
pub mod color;
/// Field label resolution and draw strategies.
pub mod fields;
/// JSON-facing template and board records.
pub mod model;
