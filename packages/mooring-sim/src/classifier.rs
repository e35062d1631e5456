//! classifier.rs — Discrete mooring status
//!
//! Highest priority first: sunk → critical → colliding → stressed → normal.
//! Wind from the dock loads the bow line, wind from the sea loads the stern
//! line; calm air loads neither.

use mooring_types::{MooringStatus, WindDirection};

/// Bow line this close to its stretch limit is critical (cm)
pub const CRITICAL_MARGIN_CM: f64 = 0.5;
/// Bow this close to the dock face counts as touching (cm)
pub const COLLISION_MARGIN_CM: f64 = 1.0;
/// Share of the stretch limit above which a loaded line is stressed
pub const STRESS_RATIO: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusInput {
    pub is_sunk: bool,
    pub bow_distance_cm: f64,
    pub bow_max_stretch_cm: f64,
    pub stern_distance_cm: f64,
    pub stern_max_stretch_cm: f64,
    pub wind_speed_ms: f64,
    pub wind_direction: WindDirection,
    pub boat_x_cm: f64,
    pub boat_length_cm: f64,
    pub dock_x_cm: f64,
}

impl StatusInput {
    fn loads(&self, direction: WindDirection) -> bool {
        self.wind_speed_ms > 0.0 && self.wind_direction == direction
    }
}

fn ratio(distance: f64, max: f64) -> f64 {
    if max > 0.0 { distance / max } else { 0.0 }
}

pub fn classify(input: &StatusInput) -> MooringStatus {
    if input.is_sunk {
        return MooringStatus::Sunk;
    }

    let bow_loaded = input.loads(WindDirection::FromDock);
    let stern_loaded = input.loads(WindDirection::FromSea);

    if bow_loaded && input.bow_distance_cm >= input.bow_max_stretch_cm - CRITICAL_MARGIN_CM {
        return MooringStatus::Critical;
    }

    if input.boat_x_cm - input.boat_length_cm / 2.0 <= input.dock_x_cm + COLLISION_MARGIN_CM {
        return MooringStatus::Colliding;
    }

    let bow_stressed = bow_loaded && ratio(input.bow_distance_cm, input.bow_max_stretch_cm) > STRESS_RATIO;
    let stern_stressed = stern_loaded && ratio(input.stern_distance_cm, input.stern_max_stretch_cm) > STRESS_RATIO;
    if bow_stressed || stern_stressed {
        return MooringStatus::Stressed;
    }

    MooringStatus::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StatusInput {
        StatusInput {
            is_sunk: false,
            bow_distance_cm: 80.0,
            bow_max_stretch_cm: 126.0,
            stern_distance_cm: 300.0,
            stern_max_stretch_cm: 403.0,
            wind_speed_ms: 10.0,
            wind_direction: WindDirection::FromDock,
            boat_x_cm: 320.0,
            boat_length_cm: 500.0,
            dock_x_cm: 0.0,
        }
    }

    #[test]
    fn relaxed_mooring_is_normal() {
        assert_eq!(classify(&base()), MooringStatus::Normal);
    }

    #[test]
    fn sunk_overrides_everything() {
        let input = StatusInput { is_sunk: true, bow_distance_cm: 126.0, boat_x_cm: 250.0, ..base() };
        assert_eq!(classify(&input), MooringStatus::Sunk);
    }

    #[test]
    fn bow_at_limit_is_critical_only_when_wind_loads_it() {
        let input = StatusInput { bow_distance_cm: 125.6, ..base() };
        assert_eq!(classify(&input), MooringStatus::Critical);

        let from_sea = StatusInput { wind_direction: WindDirection::FromSea, ..input };
        assert_eq!(classify(&from_sea), MooringStatus::Normal);

        let calm = StatusInput { wind_speed_ms: 0.0, ..input };
        assert_eq!(classify(&calm), MooringStatus::Normal);
    }

    #[test]
    fn critical_beats_colliding() {
        let input = StatusInput { bow_distance_cm: 126.0, boat_x_cm: 250.5, ..base() };
        assert_eq!(classify(&input), MooringStatus::Critical);
    }

    #[test]
    fn bow_on_dock_face_is_colliding() {
        let input = StatusInput { boat_x_cm: 251.0, wind_direction: WindDirection::FromSea, ..base() };
        assert_eq!(classify(&input), MooringStatus::Colliding);
        let clear = StatusInput { boat_x_cm: 251.5, ..input };
        assert_eq!(classify(&clear), MooringStatus::Normal);
    }

    #[test]
    fn loaded_line_near_limit_is_stressed() {
        let stern = StatusInput { wind_direction: WindDirection::FromSea, stern_distance_cm: 400.0, ..base() };
        assert_eq!(classify(&stern), MooringStatus::Stressed);

        // same geometry, wind from the dock does not load the stern
        let unloaded = StatusInput { wind_direction: WindDirection::FromDock, ..stern };
        assert_eq!(classify(&unloaded), MooringStatus::Normal);

        let bow = StatusInput { bow_distance_cm: 124.0, ..base() };
        assert_eq!(classify(&bow), MooringStatus::Stressed);
    }
}
