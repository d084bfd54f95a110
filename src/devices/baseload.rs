use crate::sim::types::Season;

/// Always-on household draw (W).
pub const BASE_LOAD_W: f64 = 200.0;

/// Seasonal scaling of the heating, cooling, and lighting components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadMultipliers {
    pub heating: f64,
    pub cooling: f64,
    pub lighting: f64,
}

impl LoadMultipliers {
    pub fn for_season(season: Season) -> Self {
        let (heating, cooling, lighting) = match season {
            Season::Summer => (0.0, 1.5, 0.8),
            Season::Spring => (0.3, 0.3, 1.0),
            Season::Winter => (1.2, 0.0, 1.3),
        };
        Self {
            heating,
            cooling,
            lighting,
        }
    }
}

/// A deterministic household load profile for one season.
///
/// `SeasonalLoad` adds time-of-day components to a constant base load:
///
/// | hours  | component                                      |
/// |--------|------------------------------------------------|
/// | 6-22   | 200 W x lighting + 300 W x cooling             |
/// | 17-22  | 400 W x heating (winter evenings)              |
/// | 7-10   | 300 W cooking, + 200 W x heating in winter     |
/// | 18-21  | 500 W evening peak, + 300 W x cooling in summer|
/// | 13-18  | 400 W x cooling (summer afternoons)            |
///
/// The hourly total is rounded to whole watts.
///
/// # Examples
///
/// ```
/// use pv_offgrid_sim::devices::baseload::SeasonalLoad;
/// use pv_offgrid_sim::sim::types::Season;
///
/// let load = SeasonalLoad::new(Season::Spring);
/// assert_eq!(load.demand_w(3), 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalLoad {
    pub season: Season,
    pub multipliers: LoadMultipliers,
}

impl SeasonalLoad {
    pub fn new(season: Season) -> Self {
        Self {
            season,
            multipliers: LoadMultipliers::for_season(season),
        }
    }

    /// Load (W) during `hour`.
    pub fn demand_w(&self, hour: usize) -> f64 {
        let m = self.multipliers;
        let winter = self.season == Season::Winter;
        let summer = self.season == Season::Summer;
        let mut variable = 0.0;

        if (6..=22).contains(&hour) {
            variable += 200.0 * m.lighting;
            variable += 300.0 * m.cooling;
        }
        if winter && (17..=22).contains(&hour) {
            variable += 400.0 * m.heating;
        }
        if (7..=10).contains(&hour) {
            variable += 300.0;
            if winter {
                variable += 200.0 * m.heating;
            }
        }
        if (18..=21).contains(&hour) {
            variable += 500.0;
            if summer {
                variable += 300.0 * m.cooling;
            }
        }
        if summer && (13..=18).contains(&hour) {
            variable += 400.0 * m.cooling;
        }

        (BASE_LOAD_W + variable).round()
    }
}
