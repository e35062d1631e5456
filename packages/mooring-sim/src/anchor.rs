//! anchor.rs — Anchor holding and drag
//!
//! The anchor holds until the stern line pulls harder than its holding
//! force. Then it creeps along the bottom toward the dock at a fixed speed,
//! never past a floor one boat length off the dock face. It never moves back.

use mooring_types::{AnchorTelemetry, Point2D};

use crate::config::AnchorConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub base_x_cm: f64,
    pub x_cm: f64,
    /// Set the first time the anchor moves; cleared by a restart or a new
    /// mooring layout
    pub dragged: bool,
    pub holding_force_n: f64,
    /// Cosmetic tilt of the anchor icon while it ploughs (radians)
    pub settle_rotation_rad: f64,
}

impl Anchor {
    pub fn new(base_x_cm: f64, holding_force_n: f64) -> Self {
        Self { base_x_cm, x_cm: base_x_cm, dragged: false, holding_force_n, settle_rotation_rad: 0.0 }
    }

    /// Anchors lie on the seabed plane.
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x_cm, 0.0)
    }

    pub fn reset(&mut self) {
        self.x_cm = self.base_x_cm;
        self.dragged = false;
        self.settle_rotation_rad = 0.0;
    }

    pub fn telemetry(&self) -> AnchorTelemetry {
        AnchorTelemetry {
            position: self.position(),
            base_x_cm: self.base_x_cm,
            dragged: self.dragged,
            settle_rotation_rad: self.settle_rotation_rad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub moved_cm: f64,
    /// This tick flipped `dragged` from false to true
    pub started: bool,
}

pub struct AnchorDragModel<'a> {
    cfg: &'a AnchorConfig,
    dt_s: f64,
}

impl<'a> AnchorDragModel<'a> {
    pub fn new(cfg: &'a AnchorConfig, dt_s: f64) -> Self {
        Self { cfg, dt_s }
    }

    /// Ticks after a reconfiguration during which the anchor always holds.
    pub fn grace_ticks(&self) -> u64 {
        (self.cfg.grace_period_s / self.dt_s).round() as u64
    }

    /// Apply one tick of drag under `stern_tension_n`. `floor_x_cm` is the
    /// closest the anchor may come to the dock.
    pub fn step(&self, anchor: &mut Anchor, stern_tension_n: f64, ticks_since_reconfigure: u64, floor_x_cm: f64) -> DragOutcome {
        let loaded = stern_tension_n > anchor.holding_force_n && ticks_since_reconfigure >= self.grace_ticks();

        let mut moved_cm = 0.0;
        if loaded {
            let step = self.cfg.drag_speed_cm_per_s * self.dt_s;
            let next = (anchor.x_cm - step).max(floor_x_cm).min(anchor.x_cm);
            moved_cm = anchor.x_cm - next;
            anchor.x_cm = next;
        }

        let started = moved_cm > 0.0 && !anchor.dragged;
        if moved_cm > 0.0 {
            anchor.dragged = true;
            anchor.settle_rotation_rad = (anchor.settle_rotation_rad + self.cfg.settle_rate_rad_per_tick).min(self.cfg.max_settle_rad);
        } else {
            anchor.settle_rotation_rad *= self.cfg.settle_decay;
        }

        DragOutcome { moved_cm, started }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn holds_below_holding_force() {
        let cfg = AnchorConfig::default();
        let model = AnchorDragModel::new(&cfg, DT);
        let mut anchor = Anchor::new(900.0, cfg.holding_force_n);
        let out = model.step(&mut anchor, 1_999.0, 10_000, 500.0);
        assert_eq!(out.moved_cm, 0.0);
        assert!(!anchor.dragged);
        assert_eq!(anchor.x_cm, 900.0);
    }

    #[test]
    fn grace_period_after_reconfigure() {
        let cfg = AnchorConfig::default();
        let model = AnchorDragModel::new(&cfg, DT);
        assert_eq!(model.grace_ticks(), 300);
        let mut anchor = Anchor::new(900.0, cfg.holding_force_n);
        assert_eq!(model.step(&mut anchor, 5_000.0, 299, 500.0).moved_cm, 0.0);
        let out = model.step(&mut anchor, 5_000.0, 300, 500.0);
        assert_relative_eq!(out.moved_cm, 10.0 / 60.0, epsilon = 1e-12);
        assert!(out.started);
    }

    #[test]
    fn drag_is_monotone_sticky_and_floored() {
        let cfg = AnchorConfig::default();
        let model = AnchorDragModel::new(&cfg, DT);
        let mut anchor = Anchor::new(520.0, cfg.holding_force_n);
        let mut last = anchor.x_cm;
        let mut flips = 0;
        for tick in 0..1_000 {
            let tension = if tick % 3 == 0 { 500.0 } else { 2_500.0 };
            if model.step(&mut anchor, tension, 1_000, 500.0).started {
                flips += 1;
            }
            assert!(anchor.x_cm <= last);
            last = anchor.x_cm;
        }
        assert_eq!(flips, 1);
        assert!(anchor.dragged);
        assert_eq!(anchor.x_cm, 500.0);

        // at the floor it stays put, and the icon settles back
        let before = anchor.settle_rotation_rad;
        model.step(&mut anchor, 9_000.0, 1_000, 500.0);
        assert_eq!(anchor.x_cm, 500.0);
        assert!(anchor.settle_rotation_rad < before || before == 0.0);
    }

    #[test]
    fn floor_above_position_never_pushes_back() {
        let cfg = AnchorConfig::default();
        let model = AnchorDragModel::new(&cfg, DT);
        let mut anchor = Anchor::new(450.0, cfg.holding_force_n);
        let out = model.step(&mut anchor, 9_000.0, 1_000, 500.0);
        assert_eq!(out.moved_cm, 0.0);
        assert_eq!(anchor.x_cm, 450.0);
    }

    #[test]
    fn reset_returns_to_base() {
        let mut anchor = Anchor::new(900.0, 2_000.0);
        anchor.x_cm = 700.0;
        anchor.dragged = true;
        anchor.reset();
        assert_eq!(anchor, Anchor::new(900.0, 2_000.0));
    }
}
