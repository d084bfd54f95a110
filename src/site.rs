//! Tilt/azimuth performance factors and site recommendations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::SiteRecord;

/// Lowest tilt factor, reached 90° away from the optimal tilt.
pub const TILT_FACTOR_FLOOR: f64 = 0.7;
/// Lowest azimuth factor, reached facing directly away from the optimum.
pub const AZIMUTH_FACTOR_FLOOR: f64 = 0.8;

/// Tilt deviation (°) still considered optimal.
const TILT_OPTIMAL_DEG: f64 = 5.0;
/// Tilt deviation (°) up to which a small adjustment is suggested.
const TILT_ADJUST_DEG: f64 = 15.0;
/// Latitude magnitude (°) above which seasonal re-tilting pays off.
const SEASONAL_TILT_LATITUDE: f64 = 35.0;

/// Performance factor for a tilt angle relative to the site optimum.
///
/// `max(0.7, 1 - |current - optimal| / 90 * 0.3)`.
pub fn tilt_factor(current_tilt: f64, optimal_tilt: f64) -> f64 {
    let difference = (current_tilt - optimal_tilt).abs();
    (1.0 - (difference / 90.0) * 0.3).max(TILT_FACTOR_FLOOR)
}

/// Compass distance between two headings, in [0, 180].
///
/// 350° and 10° are 20° apart.
pub fn circular_deviation(a: f64, b: f64) -> f64 {
    let deviation = (a - b).abs().rem_euclid(360.0);
    deviation.min(360.0 - deviation)
}

/// Performance factor for an azimuth relative to the site optimum.
///
/// `max(0.8, 1 - circular_deviation / 180 * 0.2)`.
pub fn azimuth_factor(current_azimuth: f64, optimal_azimuth: f64) -> f64 {
    let deviation = circular_deviation(current_azimuth, optimal_azimuth);
    (1.0 - (deviation / 180.0) * 0.2).max(AZIMUTH_FACTOR_FLOOR)
}

/// Selected site and array geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub site_key: String,
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
}

impl SiteAnalysis {
    /// Geometry set to the site's optimum.
    pub fn optimal_for(site: &SiteRecord) -> Self {
        Self {
            site_key: site.key.clone(),
            tilt_deg: site.optimal_tilt,
            azimuth_deg: site.optimal_azimuth,
        }
    }
}

/// How well the combined tilt/azimuth factor uses the solar resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Utilization {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Utilization {
    pub fn classify(performance_factor: f64) -> Self {
        if performance_factor >= 0.95 {
            Self::Excellent
        } else if performance_factor >= 0.85 {
            Self::Good
        } else if performance_factor >= 0.75 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Annual solar resource class of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    Excellent,
    Good,
    Moderate,
}

impl ResourceClass {
    pub fn classify(ghi: f64) -> Self {
        if ghi > 2000.0 {
            Self::Excellent
        } else if ghi > 1600.0 {
            Self::Good
        } else {
            Self::Moderate
        }
    }
}

/// One advisory produced by the site analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SiteRecommendation {
    TiltOptimal,
    AdjustTilt { optimal_tilt: f64 },
    TiltFarFromOptimal { optimal_tilt: f64 },
    OrientationOptimal { southern_hemisphere: bool },
    Reorient { southern_hemisphere: bool },
    Utilization { class: Utilization },
    SeasonalTiltAdjustment,
    Resource { class: ResourceClass },
}

impl fmt::Display for SiteRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TiltOptimal => write!(f, "Tilt angle is optimal for this location"),
            Self::AdjustTilt { optimal_tilt } => write!(
                f,
                "Consider adjusting tilt to {optimal_tilt:.0}° for better performance"
            ),
            Self::TiltFarFromOptimal { optimal_tilt } => write!(
                f,
                "Tilt angle significantly deviates from optimal {optimal_tilt:.0}°"
            ),
            Self::OrientationOptimal {
                southern_hemisphere,
            } => {
                let facing = if *southern_hemisphere {
                    "North-facing"
                } else {
                    "South-facing"
                };
                write!(f, "{facing} orientation maximizes generation")
            }
            Self::Reorient {
                southern_hemisphere,
            } => {
                let optimal = if *southern_hemisphere {
                    "north (0°)"
                } else {
                    "south (180°)"
                };
                write!(
                    f,
                    "Consider orienting panels toward {optimal} for optimal performance"
                )
            }
            Self::Utilization { class } => f.write_str(match class {
                Utilization::Excellent => "Excellent solar resource utilization",
                Utilization::Good => "Good solar resource utilization",
                Utilization::Fair => "Fair solar resource - consider optimization",
                Utilization::Poor => "Poor orientation - significant performance loss",
            }),
            Self::SeasonalTiltAdjustment => {
                write!(f, "Consider seasonal tilt adjustments at this latitude")
            }
            Self::Resource { class } => f.write_str(match class {
                ResourceClass::Excellent => "Excellent solar resource location",
                ResourceClass::Good => "Good solar resource location",
                ResourceClass::Moderate => "Moderate solar resource - maximize system efficiency",
            }),
        }
    }
}

/// Ordered advisories: tilt, azimuth, overall performance, latitude, climate.
pub fn recommendations(
    site: &SiteRecord,
    tilt_deg: f64,
    azimuth_deg: f64,
    performance_factor: f64,
) -> Vec<SiteRecommendation> {
    let mut recs = Vec::with_capacity(5);
    let southern_hemisphere = site.is_southern_hemisphere();

    let tilt_difference = (tilt_deg - site.optimal_tilt).abs();
    recs.push(if tilt_difference <= TILT_OPTIMAL_DEG {
        SiteRecommendation::TiltOptimal
    } else if tilt_difference <= TILT_ADJUST_DEG {
        SiteRecommendation::AdjustTilt {
            optimal_tilt: site.optimal_tilt,
        }
    } else {
        SiteRecommendation::TiltFarFromOptimal {
            optimal_tilt: site.optimal_tilt,
        }
    });

    // Raw difference; >= 350 catches headings just across north.
    let azimuth_difference = (azimuth_deg - site.optimal_azimuth).abs();
    recs.push(if azimuth_difference <= 10.0 || azimuth_difference >= 350.0 {
        SiteRecommendation::OrientationOptimal {
            southern_hemisphere,
        }
    } else {
        SiteRecommendation::Reorient {
            southern_hemisphere,
        }
    });

    recs.push(SiteRecommendation::Utilization {
        class: Utilization::classify(performance_factor),
    });

    if site.latitude.abs() > SEASONAL_TILT_LATITUDE {
        recs.push(SiteRecommendation::SeasonalTiltAdjustment);
    }

    recs.push(SiteRecommendation::Resource {
        class: ResourceClass::classify(site.ghi),
    });

    recs
}

/// Derived site metrics for the current geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    pub site_key: String,
    pub site_name: String,
    pub southern_hemisphere: bool,
    pub tilt_factor: f64,
    pub azimuth_factor: f64,
    /// `tilt_factor * azimuth_factor`.
    pub performance_factor: f64,
    /// Plane-of-array resource (kWh/m²/yr), unrounded.
    pub effective_ghi: f64,
    /// `performance_factor` as a percentage.
    pub performance_ratio_pct: f64,
    /// `effective_ghi * array_power / 1000` (kWh/yr).
    pub annual_generation_kwh: f64,
    pub peak_sun_hours: f64,
    pub recommendations: Vec<SiteRecommendation>,
}

impl SiteReport {
    /// Effective GHI rounded for display.
    pub fn effective_ghi_rounded(&self) -> f64 {
        self.effective_ghi.round()
    }
}

impl fmt::Display for SiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Site: {} ---", self.site_name)?;
        writeln!(
            f,
            "Tilt factor {:.3}  azimuth factor {:.3}  (performance ratio {:.1}%)",
            self.tilt_factor, self.azimuth_factor, self.performance_ratio_pct
        )?;
        writeln!(
            f,
            "Effective GHI {:.0} kWh/m²/yr  annual generation {:.0} kWh",
            self.effective_ghi_rounded(),
            self.annual_generation_kwh
        )?;
        for rec in &self.recommendations {
            writeln!(f, "  - {rec}")?;
        }
        Ok(())
    }
}

/// Evaluates a geometry at a site for an array of `array_power_w`.
pub fn analyze_site(
    site: &SiteRecord,
    tilt_deg: f64,
    azimuth_deg: f64,
    array_power_w: f64,
) -> SiteReport {
    let tilt_factor = tilt_factor(tilt_deg, site.optimal_tilt);
    let azimuth_factor = azimuth_factor(azimuth_deg, site.optimal_azimuth);
    let performance_factor = tilt_factor * azimuth_factor;
    let effective_ghi = site.ghi * performance_factor;

    SiteReport {
        site_key: site.key.clone(),
        site_name: site.name.clone(),
        southern_hemisphere: site.is_southern_hemisphere(),
        tilt_factor,
        azimuth_factor,
        performance_factor,
        effective_ghi,
        performance_ratio_pct: performance_factor * 100.0,
        annual_generation_kwh: effective_ghi * array_power_w / 1000.0,
        peak_sun_hours: site.peak_sun_hours,
        recommendations: recommendations(site, tilt_deg, azimuth_deg, performance_factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn site(key: &str) -> SiteRecord {
        Catalog::builtin().site(key).cloned().unwrap_or_else(|| panic!("{key}"))
    }

    #[test]
    fn factors_are_one_at_optimum() {
        assert_eq!(tilt_factor(33.0, 33.0), 1.0);
        assert_eq!(azimuth_factor(180.0, 180.0), 1.0);
    }

    #[test]
    fn tilt_factor_bounded_and_monotonic() {
        let mut prev = f64::INFINITY;
        for deg in 0..=180 {
            let f = tilt_factor(33.0 + f64::from(deg), 33.0);
            assert!((0.7..=1.0).contains(&f));
            assert!(f <= prev);
            prev = f;
        }
        assert_eq!(tilt_factor(-500.0, 33.0), 0.7);
        assert_eq!(tilt_factor(f64::NAN, 33.0), 0.7);
    }

    #[test]
    fn tilt_factor_value() {
        // 15° off: 1 - 15/90*0.3 = 0.95
        assert!((tilt_factor(48.0, 33.0) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn azimuth_factor_bounded_for_any_inputs() {
        for a in (-720..=720).step_by(15) {
            for b in [0.0, 90.0, 180.0, 270.0] {
                let f = azimuth_factor(f64::from(a), b);
                assert!((0.8..=1.0).contains(&f), "a={a} b={b} f={f}");
            }
        }
    }

    #[test]
    fn azimuth_is_circular() {
        let ab = azimuth_factor(10.0, 350.0);
        let ba = azimuth_factor(350.0, 10.0);
        assert_eq!(ab, ba);
        assert_eq!(ab, azimuth_factor(20.0, 0.0));
        assert!((ab - (1.0 - 20.0 / 180.0 * 0.2)).abs() < 1e-12);
        assert_eq!(circular_deviation(350.0, 10.0), 20.0);
        assert_eq!(circular_deviation(0.0, 180.0), 180.0);
    }

    #[test]
    fn azimuth_floor_facing_away() {
        assert!((azimuth_factor(0.0, 180.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn optimal_phoenix_report() {
        let phx = site("phoenix");
        let report = analyze_site(&phx, 33.0, 180.0, 2100.0);
        assert_eq!(report.performance_factor, 1.0);
        assert_eq!(report.effective_ghi, 2200.0);
        assert_eq!(report.annual_generation_kwh, 4620.0);
        assert_eq!(
            report.recommendations,
            vec![
                SiteRecommendation::TiltOptimal,
                SiteRecommendation::OrientationOptimal {
                    southern_hemisphere: false
                },
                SiteRecommendation::Utilization {
                    class: Utilization::Excellent
                },
                SiteRecommendation::Resource {
                    class: ResourceClass::Excellent
                },
            ]
        );
    }

    #[test]
    fn effective_ghi_kept_unrounded() {
        let phx = site("phoenix");
        let report = analyze_site(&phx, 40.0, 170.0, 1000.0);
        let expected = 2200.0 * (tilt_factor(40.0, 33.0) * azimuth_factor(170.0, 180.0));
        assert_eq!(report.effective_ghi, expected);
        assert_eq!(report.effective_ghi_rounded(), expected.round());
        assert_ne!(report.effective_ghi, report.effective_ghi_rounded());
    }

    #[test]
    fn recommendation_order_with_latitude_advice() {
        let sea = site("seattle");
        let recs = recommendations(&sea, 54.0, 90.0, 0.7);
        assert_eq!(
            recs,
            vec![
                SiteRecommendation::AdjustTilt { optimal_tilt: 44.0 },
                SiteRecommendation::Reorient {
                    southern_hemisphere: false
                },
                SiteRecommendation::Utilization {
                    class: Utilization::Poor
                },
                SiteRecommendation::SeasonalTiltAdjustment,
                SiteRecommendation::Resource {
                    class: ResourceClass::Moderate
                },
            ]
        );
    }

    #[test]
    fn southern_site_faces_north() {
        let syd = site("sydney");
        let recs = recommendations(&syd, 10.0, 355.0, 0.9);
        assert_eq!(
            recs[0],
            SiteRecommendation::TiltFarFromOptimal { optimal_tilt: 34.0 }
        );
        assert_eq!(
            recs[1],
            SiteRecommendation::OrientationOptimal {
                southern_hemisphere: true
            }
        );
        assert_eq!(recs[1].to_string(), "North-facing orientation maximizes generation");
        assert_eq!(
            recs[2],
            SiteRecommendation::Utilization {
                class: Utilization::Good
            }
        );
        assert_eq!(recs.len(), 4);
    }

    #[test]
    fn utilization_bands() {
        assert_eq!(Utilization::classify(0.95), Utilization::Excellent);
        assert_eq!(Utilization::classify(0.9), Utilization::Good);
        assert_eq!(Utilization::classify(0.8), Utilization::Fair);
        assert_eq!(Utilization::classify(0.74), Utilization::Poor);
    }

    #[test]
    fn resource_bands() {
        assert_eq!(ResourceClass::classify(2200.0), ResourceClass::Excellent);
        assert_eq!(ResourceClass::classify(2000.0), ResourceClass::Good);
        assert_eq!(ResourceClass::classify(1600.0), ResourceClass::Moderate);
    }

    #[test]
    fn recommendation_text() {
        assert_eq!(
            SiteRecommendation::AdjustTilt { optimal_tilt: 33.0 }.to_string(),
            "Consider adjusting tilt to 33° for better performance"
        );
        assert_eq!(
            SiteRecommendation::Reorient {
                southern_hemisphere: false
            }
            .to_string(),
            "Consider orienting panels toward south (180°) for optimal performance"
        );
    }
}
