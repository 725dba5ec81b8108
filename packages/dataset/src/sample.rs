//! Synthetic building data for when the real dataset is unavailable.
//!
//! The shape is fixed (names, addresses, property types, tiers, a scatter
//! window around downtown Chicago) but the values are drawn from a small
//! seeded PRNG, so a given seed always produces the same dataset.

use retrofit_map_building_models::{BuildingRecord, RetrofitPriority};
use retrofit_map_config::SampleConfig;

/// Seeded xorshift-on-LCG generator. Not for anything security related.
#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    /// Uniform in `[0, n)`.
    #[allow(clippy::cast_possible_truncation)]
    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    /// Uniform in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.int_n(items.len())]
    }
}

/// Derives a seed from the current time.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn clock_seed() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default() as u64
}

/// Generates `config.size` synthetic building records.
///
/// Records get sequential ids from 0, names `Building 1..`, addresses
/// `100 Sample St..`, an energy score in 1-100, a site EUI in 50-249, and
/// coordinates within `jitter_degrees / 2` of the configured center. No
/// retrofit score is generated.
#[must_use]
pub fn generate(config: &SampleConfig, seed: u64) -> Vec<BuildingRecord> {
    let mut rng = DeterministicRng::new(seed);
    let priorities = RetrofitPriority::all();
    let year_span = usize::try_from(config.year_built_span).unwrap_or(1);

    (0..config.size)
        .map(|i| {
            let property_type = if config.property_types.is_empty() {
                None
            } else {
                Some(rng.pick(&config.property_types).clone())
            };
            let priority = *rng.pick(priorities);
            let energy_score = 1 + rng.int_n(100);
            let year_offset = rng.int_n(year_span);
            let latitude = config.center_latitude + (rng.next_f64() - 0.5) * config.jitter_degrees;
            let longitude =
                config.center_longitude + (rng.next_f64() - 0.5) * config.jitter_degrees;
            let site_eui = u32::try_from(50 + rng.int_n(200)).unwrap_or(50);

            BuildingRecord {
                id: i64::try_from(i).unwrap_or(i64::MAX),
                property_name: Some(format!("Building {}", i + 1)),
                address: Some(format!("{} Sample St", 100 + i)),
                primary_property_type: property_type,
                retrofit_priority: Some(priority),
                energy_star_score: i64::try_from(energy_score).ok(),
                retrofit_score: None,
                year_built: i32::try_from(year_offset)
                    .ok()
                    .map(|offset| config.first_year_built + offset),
                latitude: Some(latitude),
                longitude: Some(longitude),
                site_eui_kbtu_sq_ft: Some(f64::from(site_eui)),
                ghg_intensity_kg_co2e_sq_ft: None,
                needs_retrofit: None,
                chicago_energy_rating: None,
            }
        })
        .collect()
}
