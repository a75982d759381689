//! # Direct (On-Site) Water
//!
//! Extraction-based coefficients give service sectors no water of their
//! own, so on-site use in hotels, restaurants and transport is estimated
//! from activity data and per-activity coefficients in litres:
//!
//! ```text
//! hotel      = rooms × occupancy × nights × L/room-night
//! restaurant = (domestic days + inbound days) × meals/day × L/meal
//! rail       = pkm × tourist share × L/pkm
//! air        = passengers × tourist share × L/passenger
//! ```
//!
//! Every term is divided by 1000 to give m³. Coefficients come as low,
//! base and high [`ScenarioValues`]; [`DirectMultipliers`] scale each term
//! for Monte Carlo draws.

use serde::{Deserialize, Serialize};

use crate::FootprintError;

/// Coefficient scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Low coefficients.
    Low,
    /// Central coefficients.
    Base,
    /// High coefficients.
    High,
}

impl Scenario {
    /// All scenarios, low to high.
    pub fn all() -> [Scenario; 3] {
        [Self::Low, Self::Base, Self::High]
    }
}

/// A coefficient under each scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioValues {
    /// Low scenario value.
    pub low: f64,
    /// Central value.
    pub base: f64,
    /// High scenario value.
    pub high: f64,
}

impl ScenarioValues {
    /// Build from three values.
    pub const fn new(low: f64, base: f64, high: f64) -> Self {
        Self { low, base, high }
    }

    /// Value for a scenario.
    pub fn get(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Low => self.low,
            Scenario::Base => self.base,
            Scenario::High => self.high,
        }
    }
}

/// Per-activity water coefficients, litres per unit of activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectCoefficients {
    /// Litres per occupied room-night.
    pub hotel: ScenarioValues,
    /// Litres per meal.
    pub restaurant: ScenarioValues,
    /// Litres per passenger-km.
    pub rail: ScenarioValues,
    /// Litres per passenger.
    pub air: ScenarioValues,
}

/// Activity volumes for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityData {
    /// Classified hotel rooms.
    pub classified_rooms: f64,
    /// Average occupancy, fraction.
    pub occupancy_rate: f64,
    /// Operating nights per year.
    pub nights_per_year: f64,
    /// Domestic tourists, millions.
    pub domestic_tourists_m: f64,
    /// Inbound tourists, millions.
    pub inbound_tourists_m: f64,
    /// Average stay of a domestic tourist, days.
    pub avg_stay_days_dom: f64,
    /// Average stay of an inbound tourist, days.
    pub avg_stay_days_inb: f64,
    /// Restaurant meals per tourist-day.
    pub meals_per_tourist_day: f64,
    /// Rail passenger-km, billions.
    pub rail_pkm_b: f64,
    /// Tourist share of rail passenger-km, fraction.
    pub tourist_rail_share: f64,
    /// Air passengers, millions.
    pub air_pax_m: f64,
    /// Tourist share of air passengers, fraction.
    pub tourist_air_share: f64,
}

impl ActivityData {
    /// Reject negative or non-finite volumes.
    pub fn validate(&self) -> Result<(), FootprintError> {
        let fields = [
            ("classified_rooms", self.classified_rooms),
            ("occupancy_rate", self.occupancy_rate),
            ("nights_per_year", self.nights_per_year),
            ("domestic_tourists_m", self.domestic_tourists_m),
            ("inbound_tourists_m", self.inbound_tourists_m),
            ("avg_stay_days_dom", self.avg_stay_days_dom),
            ("avg_stay_days_inb", self.avg_stay_days_inb),
            ("meals_per_tourist_day", self.meals_per_tourist_day),
            ("rail_pkm_b", self.rail_pkm_b),
            ("tourist_rail_share", self.tourist_rail_share),
            ("air_pax_m", self.air_pax_m),
            ("tourist_air_share", self.tourist_air_share),
        ];
        match fields.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            Some(&(field, value)) => Err(FootprintError::InvalidActivity { field, value }),
            None => Ok(()),
        }
    }

    /// Tourist-days by segment.
    pub fn tourist_days(&self) -> TouristDays {
        TouristDays {
            domestic: self.domestic_tourists_m * 1e6 * self.avg_stay_days_dom,
            inbound: self.inbound_tourists_m * 1e6 * self.avg_stay_days_inb,
        }
    }
}

/// Tourist-days by visitor origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouristDays {
    /// Domestic tourist-days.
    pub domestic: f64,
    /// Inbound tourist-days.
    pub inbound: f64,
}

impl TouristDays {
    /// All tourist-days.
    pub fn total(&self) -> f64 {
        self.domestic + self.inbound
    }
}

/// Multiplicative perturbations of the direct-water terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectMultipliers {
    /// Hotel coefficient.
    pub hotel: f64,
    /// Restaurant coefficient.
    pub restaurant: f64,
    /// Rail coefficient.
    pub rail: f64,
    /// Air coefficient.
    pub air: f64,
    /// Domestic tourist volume.
    pub domestic_volume: f64,
    /// Inbound tourist volume.
    pub inbound_volume: f64,
}

impl Default for DirectMultipliers {
    fn default() -> Self {
        Self {
            hotel: 1.0,
            restaurant: 1.0,
            rail: 1.0,
            air: 1.0,
            domestic_volume: 1.0,
            inbound_volume: 1.0,
        }
    }
}

/// Direct water by activity, m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectWater {
    /// Hotels.
    pub hotel: f64,
    /// Restaurants.
    pub restaurant: f64,
    /// Rail.
    pub rail: f64,
    /// Air.
    pub air: f64,
    /// Sum of the four terms.
    pub total: f64,
}

impl DirectWater {
    /// Evaluate the activity formulas without validating inputs.
    pub fn evaluate(
        activity: &ActivityData,
        coefficients: &DirectCoefficients,
        scenario: Scenario,
        m: &DirectMultipliers,
    ) -> Self {
        let occupied_nights = activity.classified_rooms * activity.occupancy_rate * activity.nights_per_year;
        let hotel = occupied_nights * coefficients.hotel.get(scenario) * m.hotel / 1000.0;

        let days = activity.tourist_days();
        let meals =
            (days.domestic * m.domestic_volume + days.inbound * m.inbound_volume) * activity.meals_per_tourist_day;
        let restaurant = meals * coefficients.restaurant.get(scenario) * m.restaurant / 1000.0;

        let tourist_pkm = activity.rail_pkm_b * 1e9 * activity.tourist_rail_share;
        let rail = tourist_pkm * coefficients.rail.get(scenario) * m.rail / 1000.0;

        let tourist_pax = activity.air_pax_m * 1e6 * activity.tourist_air_share;
        let air = tourist_pax * coefficients.air.get(scenario) * m.air / 1000.0;

        Self {
            hotel,
            restaurant,
            rail,
            air,
            total: hotel + restaurant + rail + air,
        }
    }

    /// Share of each term in the total, percent, in hotel/restaurant/rail/air order.
    pub fn shares_pct(&self) -> [f64; 4] {
        let s = |v| twf_core::numeric::share_pct(v, self.total);
        [s(self.hotel), s(self.restaurant), s(self.rail), s(self.air)]
    }
}

/// Validated direct water for one scenario.
pub fn direct_water(
    activity: &ActivityData,
    coefficients: &DirectCoefficients,
    scenario: Scenario,
    multipliers: &DirectMultipliers,
) -> Result<DirectWater, FootprintError> {
    activity.validate()?;
    Ok(DirectWater::evaluate(activity, coefficients, scenario, multipliers))
}

/// Direct water under all three scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectScenarios {
    /// Low coefficients.
    pub low: DirectWater,
    /// Central coefficients.
    pub base: DirectWater,
    /// High coefficients.
    pub high: DirectWater,
}

impl DirectScenarios {
    /// Evaluate every scenario with unit multipliers.
    pub fn compute(activity: &ActivityData, coefficients: &DirectCoefficients) -> Result<Self, FootprintError> {
        let m = DirectMultipliers::default();
        let scenarios = Self {
            low: direct_water(activity, coefficients, Scenario::Low, &m)?,
            base: direct_water(activity, coefficients, Scenario::Base, &m)?,
            high: direct_water(activity, coefficients, Scenario::High, &m)?,
        };
        tracing::debug!(
            low = scenarios.low.total,
            base = scenarios.base.total,
            high = scenarios.high.total,
            "direct water scenarios"
        );
        Ok(scenarios)
    }

    /// `100 · (high − base) / base`, `None` for a zero base.
    pub fn upper_range_pct(&self) -> Option<f64> {
        twf_core::numeric::pct_change(self.base.total, self.high.total)
    }
}

/// Litres of total water per tourist-day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouristDayIntensity {
    /// Total water (m³) the intensity was computed from.
    pub total_m3: f64,
    /// Tourist-days.
    pub days: TouristDays,
    /// Litres per tourist-day over all tourists.
    pub all: f64,
    /// Litres per domestic tourist-day.
    pub domestic: f64,
    /// Litres per inbound tourist-day.
    pub inbound: f64,
}

impl TouristDayIntensity {
    /// Intensities from the total footprint, indirect plus base direct.
    ///
    /// Each segment is attributed `total_m3 × segment_days / all_days` and
    /// divided by its own tourist-days, so a segment with days reports the
    /// same litres per day as `all`. A segment without days reports zero.
    pub fn from_total(total_m3: f64, days: TouristDays) -> Self {
        let total_days = days.total();
        let segment = |segment_days: f64| {
            let share = twf_core::numeric::ratio_or_zero(segment_days, total_days);
            litres_per_day(total_m3 * share, segment_days)
        };
        Self {
            total_m3,
            days,
            all: litres_per_day(total_m3, total_days),
            domestic: segment(days.domestic),
            inbound: segment(days.inbound),
        }
    }
}

fn litres_per_day(m3: f64, days: f64) -> f64 {
    twf_core::numeric::ratio_or_zero(m3 * 1000.0, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn activity() -> ActivityData {
        ActivityData {
            classified_rooms: 1000.0,
            occupancy_rate: 0.5,
            nights_per_year: 360.0,
            domestic_tourists_m: 2.0,
            inbound_tourists_m: 0.5,
            avg_stay_days_dom: 2.0,
            avg_stay_days_inb: 10.0,
            meals_per_tourist_day: 2.0,
            rail_pkm_b: 1.0,
            tourist_rail_share: 0.1,
            air_pax_m: 1.0,
            tourist_air_share: 0.5,
        }
    }

    fn coefficients() -> DirectCoefficients {
        DirectCoefficients {
            hotel: ScenarioValues::new(1000.0, 1500.0, 2000.0),
            restaurant: ScenarioValues::new(10.0, 20.0, 30.0),
            rail: ScenarioValues::new(2.0, 3.0, 4.0),
            air: ScenarioValues::new(10.0, 20.0, 30.0),
        }
    }

    #[test]
    fn base_scenario_terms() {
        let w = direct_water(&activity(), &coefficients(), Scenario::Base, &DirectMultipliers::default()).unwrap();
        // 180 000 room-nights × 1500 L
        assert_relative_eq!(w.hotel, 270_000.0, epsilon = 1e-6);
        // (4M + 5M) days × 2 meals × 20 L
        assert_relative_eq!(w.restaurant, 360_000.0, epsilon = 1e-6);
        // 1e8 pkm × 3 L
        assert_relative_eq!(w.rail, 300_000.0, epsilon = 1e-6);
        // 5e5 pax × 20 L
        assert_relative_eq!(w.air, 10_000.0, epsilon = 1e-6);
        assert_relative_eq!(w.total, 940_000.0, epsilon = 1e-6);
        assert_relative_eq!(w.shares_pct().iter().sum::<f64>(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn scenarios_are_ordered() {
        let s = DirectScenarios::compute(&activity(), &coefficients()).unwrap();
        assert!(s.low.total < s.base.total && s.base.total < s.high.total);
        assert!(s.upper_range_pct().unwrap() > 0.0);
    }

    #[test]
    fn volume_multipliers_scale_restaurants_only() {
        let m = DirectMultipliers {
            inbound_volume: 2.0,
            ..DirectMultipliers::default()
        };
        let base = DirectWater::evaluate(&activity(), &coefficients(), Scenario::Base, &DirectMultipliers::default());
        let w = DirectWater::evaluate(&activity(), &coefficients(), Scenario::Base, &m);
        assert_eq!(w.hotel, base.hotel);
        assert_relative_eq!(w.restaurant, 560_000.0, epsilon = 1e-6);
    }

    #[test]
    fn negative_activity_is_rejected() {
        let mut a = activity();
        a.occupancy_rate = -0.1;
        assert_eq!(
            direct_water(&a, &coefficients(), Scenario::Base, &DirectMultipliers::default()),
            Err(FootprintError::InvalidActivity {
                field: "occupancy_rate",
                value: -0.1
            })
        );
    }

    #[test]
    fn tourist_day_intensity() {
        let days = activity().tourist_days();
        assert_relative_eq!(days.total(), 9e6, epsilon = 1e-6);

        // 4e6 domestic and 5e6 inbound days share the total 4:5.
        let t = TouristDayIntensity::from_total(9_000.0, days);
        assert_relative_eq!(t.all, 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.domestic, 4_000.0 * 1000.0 / 4e6, epsilon = 1e-12);
        assert_relative_eq!(t.inbound, 5_000.0 * 1000.0 / 5e6, epsilon = 1e-12);
    }

    #[test]
    fn segment_without_days_reports_zero() {
        let days = TouristDays { domestic: 2e6, inbound: 0.0 };
        let t = TouristDayIntensity::from_total(500.0, days);
        assert_relative_eq!(t.domestic, 0.25, epsilon = 1e-12);
        assert_relative_eq!(t.all, t.domestic, epsilon = 1e-12);
        assert_eq!(t.inbound, 0.0);
    }

    #[test]
    fn zero_tourist_days_give_zero_intensity() {
        let days = TouristDays { domestic: 0.0, inbound: 0.0 };
        let t = TouristDayIntensity::from_total(1.0, days);
        assert_eq!(t.all, 0.0);
        assert_eq!(t.domestic, 0.0);
        assert_eq!(t.inbound, 0.0);
    }
}
