//! Pointer interaction: a shared tooltip overlay plus a per-chart hit-region
//! index driving an idle → hovered → idle state machine.
//!
//! Charts rebuild their hit regions on every `update` and consume the
//! capability by composition: each component owns a [`Hoverable`] holding a
//! handle to the single tooltip overlay injected at construction.

use crate::palette::Rgb8;
use std::cell::RefCell;
use std::rc::Rc;

/// Pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

/// The single tooltip overlay shared by all charts. Positioned just
/// right of and above the pointer while a mark is hovered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

const TOOLTIP_DX: f64 = 10.0;
const TOOLTIP_DY: f64 = -10.0;

impl Tooltip {
    pub fn show(&mut self, text: &str, ev: PointerEvent) {
        self.visible = true;
        self.text = text.to_string();
        self.reposition(ev);
    }

    pub fn reposition(&mut self, ev: PointerEvent) {
        self.x = ev.x + TOOLTIP_DX;
        self.y = ev.y + TOOLTIP_DY;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Shared handle to the tooltip overlay. The whole pipeline is
/// single-threaded and event-driven, so `Rc<RefCell<_>>` is the ownership
/// model here.
pub type SharedTooltip = Rc<RefCell<Tooltip>>;

pub fn shared_tooltip() -> SharedTooltip {
    Rc::new(RefCell::new(Tooltip::default()))
}

/// Geometry of one interactive mark.
#[derive(Debug, Clone, PartialEq)]
pub enum HitShape {
    /// Axis-aligned rectangle, `x0 <= x1`, `y0 <= y1`.
    Rect { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Annular wedge; angles measured clockwise from twelve o'clock.
    Wedge {
        cx: f64,
        cy: f64,
        r_inner: f64,
        r_outer: f64,
        start: f64,
        end: f64,
    },
    /// One or more closed rings, tested with the even-odd rule. Holes are
    /// simply additional rings.
    Polygon(Vec<Vec<(f64, f64)>>),
}

impl HitShape {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            HitShape::Rect { x0, y0, x1, y1 } => x >= *x0 && x <= *x1 && y >= *y0 && y <= *y1,
            HitShape::Wedge {
                cx,
                cy,
                r_inner,
                r_outer,
                start,
                end,
            } => {
                let dx = x - cx;
                let dy = y - cy;
                let r = (dx * dx + dy * dy).sqrt();
                if r < *r_inner || r > *r_outer {
                    return false;
                }
                // Clockwise angle from twelve o'clock, in [0, TAU).
                let angle = dx.atan2(-dy).rem_euclid(std::f64::consts::TAU);
                angle >= *start && angle <= *end
            }
            HitShape::Polygon(rings) => {
                let mut inside = false;
                for ring in rings {
                    let n = ring.len();
                    if n < 3 {
                        continue;
                    }
                    let mut j = n - 1;
                    for i in 0..n {
                        let (xi, yi) = ring[i];
                        let (xj, yj) = ring[j];
                        if ((yi > y) != (yj > y))
                            && (x < (xj - xi) * (y - yi) / (yj - yi) + xi)
                        {
                            inside = !inside;
                        }
                        j = i;
                    }
                }
                inside
            }
        }
    }
}

/// Visual emphasis applied to a mark while it is hovered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub opacity: f64,
    pub stroke: Option<Rgb8>,
}

impl Default for Highlight {
    fn default() -> Self {
        Highlight {
            opacity: 0.7,
            stroke: None,
        }
    }
}

/// One interactive mark: its geometry, tooltip text, and hover style.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    /// Stable identifier of the underlying datum (e.g. "X100/1.0").
    pub key: String,
    pub tooltip: String,
    pub shape: HitShape,
    pub highlight: Highlight,
}

/// Per-mark hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    /// Index of the hovered region.
    Hovered(usize),
}

/// The hoverable capability: a hit-region index plus the state machine
/// that drives the shared tooltip.
pub struct Hoverable {
    tooltip: SharedTooltip,
    regions: Vec<HitRegion>,
    phase: HoverPhase,
}

impl Hoverable {
    pub fn new(tooltip: SharedTooltip) -> Self {
        Hoverable {
            tooltip,
            regions: Vec::new(),
            phase: HoverPhase::Idle,
        }
    }

    /// Replace the hit regions after a re-render. Any in-flight hover is
    /// discarded: the marks it pointed at no longer exist.
    pub fn replace_regions(&mut self, regions: Vec<HitRegion>) {
        self.regions = regions;
        if self.phase != HoverPhase::Idle {
            self.phase = HoverPhase::Idle;
            self.tooltip.borrow_mut().hide();
        }
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Topmost region under the pointer (reverse paint order).
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.regions
            .iter()
            .enumerate()
            .rev()
            .find(|(_, r)| r.shape.contains(x, y))
            .map(|(i, _)| i)
    }

    /// Drive the state machine from a pointer move. Returns the hovered
    /// region, if any.
    pub fn pointer_moved(&mut self, ev: PointerEvent) -> Option<&HitRegion> {
        let hit = self.hit_test(ev.x, ev.y);
        match (self.phase, hit) {
            (HoverPhase::Idle, Some(i)) => {
                self.phase = HoverPhase::Hovered(i);
                self.tooltip.borrow_mut().show(&self.regions[i].tooltip, ev);
            }
            (HoverPhase::Hovered(prev), Some(i)) if prev != i => {
                self.phase = HoverPhase::Hovered(i);
                self.tooltip.borrow_mut().show(&self.regions[i].tooltip, ev);
            }
            (HoverPhase::Hovered(_), Some(_)) => {
                self.tooltip.borrow_mut().reposition(ev);
            }
            (HoverPhase::Hovered(_), None) => {
                self.phase = HoverPhase::Idle;
                self.tooltip.borrow_mut().hide();
            }
            (HoverPhase::Idle, None) => {}
        }
        self.hovered()
    }

    /// Pointer left the chart entirely.
    pub fn pointer_left(&mut self) {
        if self.phase != HoverPhase::Idle {
            self.phase = HoverPhase::Idle;
            self.tooltip.borrow_mut().hide();
        }
    }

    pub fn hovered(&self) -> Option<&HitRegion> {
        match self.phase {
            HoverPhase::Idle => None,
            HoverPhase::Hovered(i) => self.regions.get(i),
        }
    }

    pub fn phase(&self) -> HoverPhase {
        self.phase
    }

    pub fn tooltip(&self) -> SharedTooltip {
        Rc::clone(&self.tooltip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_region(key: &str, x0: f64, x1: f64) -> HitRegion {
        HitRegion {
            key: key.to_string(),
            tooltip: format!("{key}\n1(ea)"),
            shape: HitShape::Rect {
                x0,
                y0: 0.0,
                x1,
                y1: 10.0,
            },
            highlight: Highlight::default(),
        }
    }

    #[test]
    fn hover_enter_move_leave() {
        let tooltip = shared_tooltip();
        let mut hover = Hoverable::new(Rc::clone(&tooltip));
        hover.replace_regions(vec![rect_region("a", 0.0, 10.0), rect_region("b", 20.0, 30.0)]);

        assert_eq!(hover.phase(), HoverPhase::Idle);
        hover.pointer_moved(PointerEvent { x: 5.0, y: 5.0 });
        assert_eq!(hover.phase(), HoverPhase::Hovered(0));
        {
            let t = tooltip.borrow();
            assert!(t.visible);
            assert_eq!(t.text, "a\n1(ea)");
            assert_eq!(t.x, 15.0);
            assert_eq!(t.y, -5.0);
        }

        // Move within the same region repositions without changing text.
        hover.pointer_moved(PointerEvent { x: 7.0, y: 5.0 });
        assert_eq!(tooltip.borrow().x, 17.0);

        // Move to the second region swaps the tooltip content.
        hover.pointer_moved(PointerEvent { x: 25.0, y: 5.0 });
        assert_eq!(hover.hovered().unwrap().key, "b");

        // Leaving all marks returns to idle and hides the tooltip.
        hover.pointer_moved(PointerEvent { x: 100.0, y: 100.0 });
        assert_eq!(hover.phase(), HoverPhase::Idle);
        assert!(!tooltip.borrow().visible);
    }

    #[test]
    fn replace_regions_resets_hover() {
        let tooltip = shared_tooltip();
        let mut hover = Hoverable::new(Rc::clone(&tooltip));
        hover.replace_regions(vec![rect_region("a", 0.0, 10.0)]);
        hover.pointer_moved(PointerEvent { x: 5.0, y: 5.0 });
        assert!(tooltip.borrow().visible);

        hover.replace_regions(vec![rect_region("b", 0.0, 10.0)]);
        assert_eq!(hover.phase(), HoverPhase::Idle);
        assert!(!tooltip.borrow().visible);
    }

    #[test]
    fn topmost_region_wins() {
        let tooltip = shared_tooltip();
        let mut hover = Hoverable::new(tooltip);
        hover.replace_regions(vec![rect_region("under", 0.0, 10.0), rect_region("over", 0.0, 10.0)]);
        let hit = hover.pointer_moved(PointerEvent { x: 5.0, y: 5.0 }).unwrap();
        assert_eq!(hit.key, "over");
    }

    #[test]
    fn wedge_contains_uses_clockwise_from_noon() {
        let wedge = HitShape::Wedge {
            cx: 0.0,
            cy: 0.0,
            r_inner: 0.0,
            r_outer: 10.0,
            start: 0.0,
            end: std::f64::consts::PI, // right half
        };
        assert!(wedge.contains(5.0, 0.0)); // 3 o'clock
        assert!(wedge.contains(0.1, -5.0)); // just past noon
        assert!(!wedge.contains(-5.0, 0.0)); // 9 o'clock
        assert!(!wedge.contains(0.0, -20.0)); // outside radius
    }

    #[test]
    fn polygon_with_hole_uses_even_odd() {
        let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let hole = vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)];
        let shape = HitShape::Polygon(vec![outer, hole]);
        assert!(shape.contains(2.0, 2.0));
        assert!(!shape.contains(5.0, 5.0)); // inside the hole
        assert!(!shape.contains(20.0, 2.0));
    }
}
