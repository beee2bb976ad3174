/// Content-driven minimum height and band planning.
pub mod height;
/// Board rectangle resolution against a photo fit.
pub mod rect;
