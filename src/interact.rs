/// Pointer-drag repositioning of the board.
pub mod drag;
