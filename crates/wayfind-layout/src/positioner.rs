//! Floating Element Positioner
//!
//! Chooses a side of a reference box with enough room for a floating
//! element, centres the element on the reference along the other axis,
//! and clamps it inside the viewport margins. The arrow coordinate keeps
//! a pointer aimed at the reference even when the box was clamped away
//! from true centre.
//!
//! Side priority: top, bottom (both only when the horizontally centred
//! box also fits), right, left, then bottom regardless.

use serde::{Deserialize, Serialize};
use wayfind_dom::{DOMRect, Dom, NodeId, Point, Scheduler, ScrollBehavior, Size, Viewport};

use crate::space::EdgeSpace;

/// Side of the reference the floating element sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Where a floating element goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementDecision {
    /// `None` when centred in the viewport (reference off screen)
    pub side: Option<Side>,
    /// Top-left corner in viewport coordinates
    pub origin: Point,
    /// Reference centre relative to the box along the cross axis
    pub arrow: Option<f64>,
}

impl PlacementDecision {
    pub fn rect(&self, size: Size) -> DOMRect {
        DOMRect::from_origin_size(self.origin, size)
    }
}

/// Result of a side-effecting positioning pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionOutcome {
    Placed(PlacementDecision),
    /// Reference scrolled toward the centre; a settled pass is scheduled
    Deferred,
    /// Reference is not rendered
    MissingReference,
}

/// Deferred work issued by the positioner
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutTask {
    /// Re-place `floating` once a smooth scroll has settled
    Reposition {
        positioner: Positioner,
        reference: NodeId,
        floating: NodeId,
    },
}

/// Placement metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Positioner {
    /// Space between reference and floating element
    pub gap: f64,
    /// Minimum distance from the viewport edges
    pub margin: f64,
    /// Scroll the reference toward the centre when it is this close to the
    /// top or bottom edge
    pub edge_threshold: Option<f64>,
    /// Delay before the settled re-position (ms)
    pub settle_delay_ms: u64,
    /// Write `tooltip--<side>` classes on the floating element
    pub side_classes: bool,
}

impl Default for Positioner {
    fn default() -> Self {
        Self::tooltip()
    }
}

impl Positioner {
    /// Metrics for hover/focus tooltips
    pub fn tooltip() -> Self {
        Self {
            gap: 8.0,
            margin: 10.0,
            edge_threshold: None,
            settle_delay_ms: 0,
            side_classes: true,
        }
    }

    /// Metrics for the walkthrough card
    pub fn tour() -> Self {
        Self {
            gap: 16.0,
            margin: 16.0,
            edge_threshold: Some(60.0),
            settle_delay_ms: 400,
            side_classes: false,
        }
    }

    fn fits(&self, space: f64, extent: f64) -> bool {
        space >= extent + self.gap + self.margin
    }

    /// Clamp `start` so `[start, start + extent]` stays within the margin
    /// band of `[0, limit]`. The near edge wins when the band is too small.
    fn clamp_axis(&self, start: f64, extent: f64, limit: f64) -> f64 {
        let high = limit - self.margin - extent;
        start.min(high).max(self.margin)
    }

    fn choose_side(&self, reference: &DOMRect, size: Size, viewport: &Viewport) -> Side {
        let space = EdgeSpace::around(reference, viewport);
        let centred_left = reference.center_x() - size.width / 2.0;
        let centred_fits = centred_left >= self.margin
            && centred_left + size.width <= viewport.width - self.margin;

        if centred_fits && self.fits(space.top, size.height) {
            Side::Top
        } else if centred_fits && self.fits(space.bottom, size.height) {
            Side::Bottom
        } else if self.fits(space.right, size.width) {
            Side::Right
        } else if self.fits(space.left, size.width) {
            Side::Left
        } else {
            Side::Bottom
        }
    }

    /// Box of `size` centred in the viewport, no side
    pub fn centred(size: Size, viewport: &Viewport) -> PlacementDecision {
        PlacementDecision {
            side: None,
            origin: Point::new(
                (viewport.width - size.width) / 2.0,
                (viewport.height - size.height) / 2.0,
            ),
            arrow: None,
        }
    }

    /// Pure placement of a box of `size` against `reference`
    pub fn compute(&self, reference: &DOMRect, size: Size, viewport: &Viewport) -> PlacementDecision {
        if viewport.is_fully_outside(reference) {
            return Self::centred(size, viewport);
        }

        let side = self.choose_side(reference, size, viewport);
        let (x, y) = match side {
            Side::Top => (
                reference.center_x() - size.width / 2.0,
                reference.top() - self.gap - size.height,
            ),
            Side::Bottom => (
                reference.center_x() - size.width / 2.0,
                reference.bottom() + self.gap,
            ),
            Side::Right => (
                reference.right() + self.gap,
                reference.center_y() - size.height / 2.0,
            ),
            Side::Left => (
                reference.left() - self.gap - size.width,
                reference.center_y() - size.height / 2.0,
            ),
        };
        let origin = Point::new(
            self.clamp_axis(x, size.width, viewport.width),
            self.clamp_axis(y, size.height, viewport.height),
        );
        let arrow = if side.is_vertical() {
            reference.center_x() - origin.x
        } else {
            reference.center_y() - origin.y
        };

        PlacementDecision { side: Some(side), origin, arrow: Some(arrow) }
    }

    /// True when the reference is within the edge threshold of the top or
    /// bottom of the viewport
    pub fn near_vertical_edge(&self, reference: &DOMRect, viewport: &Viewport) -> bool {
        match self.edge_threshold {
            Some(t) => reference.top() < t || reference.bottom() > viewport.height - t,
            None => false,
        }
    }

    /// Measurement pass; unmeasurable elements count as zero-size
    pub fn measure(dom: &mut dyn Dom, floating: NodeId) -> Size {
        dom.natural_size(floating).unwrap_or(Size::ZERO)
    }

    /// Write a decision onto the floating element
    pub fn apply(&self, dom: &mut dyn Dom, floating: NodeId, size: Size, decision: &PlacementDecision) {
        dom.place(floating, decision.rect(size));

        if self.side_classes {
            for side in Side::ALL {
                dom.remove_class(floating, &format!("tooltip--{}", side.as_str()));
            }
            if let Some(side) = decision.side {
                dom.add_class(floating, &format!("tooltip--{}", side.as_str()));
            }
        }

        let placement = decision.side.map(|s| s.as_str()).unwrap_or("center");
        dom.set_attr(floating, "data-placement", placement);
        match decision.arrow {
            Some(arrow) => dom.set_attr(floating, "data-arrow", &format!("{}", arrow.round())),
            None => dom.remove_attr(floating, "data-arrow"),
        }
    }

    fn place(&self, dom: &mut dyn Dom, reference: &DOMRect, floating: NodeId, size: Size) -> PlacementDecision {
        let decision = self.compute(reference, size, &dom.viewport());
        self.apply(dom, floating, size, &decision);
        decision
    }

    /// Position `floating` against `reference`, scrolling the reference
    /// toward the centre first when it hugs a vertical edge.
    pub fn position<T: From<LayoutTask>>(
        &self,
        dom: &mut dyn Dom,
        scheduler: &mut Scheduler<T>,
        reference: NodeId,
        floating: NodeId,
    ) -> PositionOutcome {
        let size = Self::measure(dom, floating);
        let settle = LayoutTask::Reposition { positioner: *self, reference, floating };
        self.position_sized(dom, scheduler, reference, floating, size, settle)
    }

    /// [`position`](Self::position) for a box whose size the caller
    /// decided. `settle` is scheduled when the reference is scrolled first
    /// and should end in a call to [`settle_sized`](Self::settle_sized).
    pub fn position_sized<T>(
        &self,
        dom: &mut dyn Dom,
        scheduler: &mut Scheduler<T>,
        reference: NodeId,
        floating: NodeId,
        size: Size,
        settle: impl Into<T>,
    ) -> PositionOutcome {
        let Some(rect) = dom.rect(reference) else {
            tracing::debug!("Reference {} not rendered; {} left in place", reference, floating);
            return PositionOutcome::MissingReference;
        };

        let viewport = dom.viewport();
        if !viewport.is_fully_outside(&rect) && self.near_vertical_edge(&rect, &viewport) {
            dom.scroll_into_view(reference, ScrollBehavior::Smooth);
            scheduler.after(self.settle_delay_ms, settle);
            return PositionOutcome::Deferred;
        }

        PositionOutcome::Placed(self.place(dom, &rect, floating, size))
    }

    /// Position without the edge scroll (the pass after a scroll settles)
    pub fn settle(&self, dom: &mut dyn Dom, reference: NodeId, floating: NodeId) -> PositionOutcome {
        let size = Self::measure(dom, floating);
        self.settle_sized(dom, reference, floating, size)
    }

    pub fn settle_sized(&self, dom: &mut dyn Dom, reference: NodeId, floating: NodeId, size: Size) -> PositionOutcome {
        match dom.rect(reference) {
            Some(rect) => PositionOutcome::Placed(self.place(dom, &rect, floating, size)),
            None => PositionOutcome::MissingReference,
        }
    }
}
