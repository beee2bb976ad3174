use crate::foundation::error::{KokubanError, KokubanResult};
use crate::foundation::geom::Fit;
use crate::layout::height::min_content_height;
use crate::layout::rect::{BoardRects, resolve_rects};
use crate::template::adapter::{LayoutConfig, LayoutSource, ResolvedLayout, adapt};
use crate::template::model::Template;

/// Normalized distance within which a board edge sticks to the photo edge.
pub const EDGE_SNAP_EPS: f64 = 0.002;

/// Host hook for scheduling one coalesced flush on the next animation frame.
///
/// [`DragController`] requests at most one frame per pending flush; the host
/// calls [`DragController::on_frame`] when the frame arrives.
pub trait FrameScheduler {
    /// Ask the host to call back on the next frame.
    fn request_frame(&mut self);
}

/// Callbacks delivering committed board geometry.
///
/// Values are percentages (`0..=100`) of the drawn photo area, matching the
/// persisted template format rather than the internal normalized form.
pub trait DragEvents {
    /// The board top-left corner moved.
    fn moved(&mut self, x_pct: f64, y_pct: f64);
    /// The board width changed.
    fn resized(&mut self, w_pct: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    // Pointer offset within the grabbed rectangle, as fractions of its size.
    Dragging { grab_x: f64, grab_y: f64 },
}

/// Converts pointer events into board position changes.
///
/// Move bursts are coalesced to at most one committed update per animation
/// frame: each move overwrites the pending position and requests a frame
/// only when none is outstanding. Attaches to legacy-format boards only;
/// the modern format has no interactive repositioning.
pub struct DragController<S, E> {
    cfg: LayoutConfig,
    fields: Vec<String>,
    fit: Fit,
    scheduler: S,
    events: E,
    phase: Phase,
    pending: Option<(f64, f64)>,
    scheduled: bool,
}

impl<S: FrameScheduler, E: DragEvents> DragController<S, E> {
    /// Attach a controller to a legacy-format template.
    pub fn new(template: &Template, fit: Fit, scheduler: S, events: E) -> KokubanResult<Self> {
        let ResolvedLayout { cfg, source } = adapt(template)?;
        if !source.is_legacy() {
            return Err(KokubanError::validation(
                "drag control attaches to legacy-format boards only",
            ));
        }
        Ok(Self {
            cfg,
            fields: template.fields().to_vec(),
            fit,
            scheduler,
            events,
            phase: Phase::Idle,
            pending: None,
            scheduled: false,
        })
    }

    /// The board rectangles at the controller's current position.
    pub fn rects(&self) -> BoardRects {
        let min_h = min_content_height(&self.fields, self.cfg.grid, self.cfg.board.w, self.fit);
        resolve_rects(&self.cfg, LayoutSource::Legacy, min_h, self.fit)
    }

    /// Current board position and width as persisted percentages.
    pub fn board_percent(&self) -> (f64, f64, f64) {
        let b = self.cfg.board;
        (b.x * 100.0, b.y * 100.0, b.w * 100.0)
    }

    /// Return `true` while a grab is active.
    pub fn is_dragging(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Handle a pointer press at surface pixel coordinates.
    ///
    /// Returns `true` when the press lands on the board and a drag starts;
    /// presses outside the board leave the controller idle.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let outer = self.rects().outer;
        if outer.w <= 0 || outer.h <= 0 || !outer.contains(x, y) {
            return false;
        }
        self.phase = Phase::Dragging {
            grab_x: (x - f64::from(outer.x)) / f64::from(outer.w),
            grab_y: (y - f64::from(outer.y)) / f64::from(outer.h),
        };
        true
    }

    /// Handle a pointer move at surface pixel coordinates.
    ///
    /// While dragging, buffers the clamped and edge-snapped position and
    /// requests one animation frame if none is outstanding. Ignored when
    /// idle.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Phase::Dragging { grab_x, grab_y } = self.phase else {
            return;
        };
        let outer = self.rects().outer;
        let left = x - grab_x * f64::from(outer.w);
        let top = y - grab_y * f64::from(outer.h);
        let (nx, ny) = self.fit.point_to_norm(left, top);

        let w = f64::from(outer.w) / self.fit.draw_w;
        let h = f64::from(outer.h) / self.fit.draw_h;
        let max_x = (1.0 - w).max(0.0);
        let max_y = (1.0 - h).max(0.0);
        let nx = snap_edge(nx.clamp(0.0, max_x), max_x);
        let ny = snap_edge(ny.clamp(0.0, max_y), max_y);

        self.pending = Some((nx, ny));
        if !self.scheduled {
            self.scheduled = true;
            self.scheduler.request_frame();
        }
    }

    /// Animation-frame callback: commit the latest buffered position.
    ///
    /// A frame that arrives after [`DragController::pointer_up`] already
    /// flushed is a no-op.
    pub fn on_frame(&mut self) {
        self.scheduled = false;
        self.flush();
    }

    /// Handle pointer release: flush any buffered position synchronously
    /// and return to idle.
    pub fn pointer_up(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        self.scheduled = false;
        self.flush();
        self.phase = Phase::Idle;
    }

    /// Apply a width change from the host's resize control.
    ///
    /// The left edge is pulled in when the new width would push the board
    /// past the right photo edge.
    pub fn set_width_percent(&mut self, w_pct: f64) -> KokubanResult<()> {
        if !w_pct.is_finite() || w_pct <= 0.0 || w_pct > 100.0 {
            return Err(KokubanError::validation("board width must be in (0, 100]"));
        }
        let w = w_pct / 100.0;
        self.cfg.board.w = w;
        if self.cfg.board.x + w > 1.0 {
            self.cfg.board.x = (1.0 - w).max(0.0);
        }
        self.events.resized(w * 100.0);
        Ok(())
    }

    /// Read access to the event sink, mainly for hosts that own state there.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Read access to the frame scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn flush(&mut self) {
        if let Some((x, y)) = self.pending.take() {
            self.cfg.board.x = x;
            self.cfg.board.y = y;
            self.events.moved(x * 100.0, y * 100.0);
        }
    }
}

/// Snap a coordinate to `0` or to `max` when within [`EDGE_SNAP_EPS`].
///
/// Applying this twice never moves a value a second time.
fn snap_edge(v: f64, max: f64) -> f64 {
    if v.abs() <= EDGE_SNAP_EPS {
        0.0
    } else if (v - max).abs() <= EDGE_SNAP_EPS {
        max
    } else {
        v
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
