use crate::models::HeatmapZone;
use crate::tier::RiskTier;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityCenter {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const MEKONG_CENTERS: [CityCenter; 10] = [
    CityCenter { name: "Can Tho", lat: 10.0452, lon: 105.7469 },
    CityCenter { name: "Vinh Long", lat: 10.2540, lon: 105.9722 },
    CityCenter { name: "Long Xuyen", lat: 10.3759, lon: 105.4389 },
    CityCenter { name: "Soc Trang", lat: 9.6069, lon: 105.9749 },
    CityCenter { name: "Ca Mau", lat: 9.1769, lon: 105.1501 },
    CityCenter { name: "Rach Gia", lat: 10.0152, lon: 105.0809 },
    CityCenter { name: "Bac Lieu", lat: 9.2941, lon: 105.7278 },
    CityCenter { name: "Cao Lanh", lat: 10.4524, lon: 105.6375 },
    CityCenter { name: "My Tho", lat: 10.3536, lon: 106.3636 },
    CityCenter { name: "Vi Thanh", lat: 9.7845, lon: 105.4701 },
];

pub const CAN_THO: (f64, f64) = (10.03, 105.78);

pub const MAX_OFFSET_DEG: f64 = 0.05;
pub const MIN_POINTS_PER_CENTER: usize = 3;
pub const MAX_POINTS_PER_CENTER: usize = 7;
pub const HOT_RISK: u8 = 85;
pub const WARM_RISK: u8 = 55;
const HOT_PROBABILITY_CUTOFF: f64 = 0.4;

/// Cluster 3 to 7 points around each Mekong center.
pub fn generate_mock_zones<R: Rng + ?Sized>(rng: &mut R) -> Vec<HeatmapZone> {
    let mut zones = Vec::with_capacity(MEKONG_CENTERS.len() * MAX_POINTS_PER_CENTER);

    for center in &MEKONG_CENTERS {
        let count = rng.gen_range(MIN_POINTS_PER_CENTER..=MAX_POINTS_PER_CENTER);
        for _ in 0..count {
            let lat_offset = rng.gen_range(-MAX_OFFSET_DEG..=MAX_OFFSET_DEG);
            let lon_offset = rng.gen_range(-MAX_OFFSET_DEG..=MAX_OFFSET_DEG);
            let risk = if rng.gen::<f64>() > HOT_PROBABILITY_CUTOFF {
                HOT_RISK
            } else {
                WARM_RISK
            };

            zones.push(HeatmapZone {
                lat: center.lat + lat_offset,
                lon: center.lon + lon_offset,
                risk,
            });
        }
    }

    zones
}

pub fn nearest_center(lat: f64, lon: f64) -> &'static CityCenter {
    let mut best = &MEKONG_CENTERS[0];
    let mut best_distance = f64::MAX;
    for center in &MEKONG_CENTERS {
        let d_lat = center.lat - lat;
        let d_lon = center.lon - lon;
        let distance = d_lat.mul_add(d_lat, d_lon * d_lon);
        if distance < best_distance {
            best_distance = distance;
            best = center;
        }
    }
    best
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TierCounts {
    pub fn tally<'a>(zones: impl IntoIterator<Item = &'a HeatmapZone>) -> Self {
        let mut counts = Self::default();
        for zone in zones {
            match zone.tier() {
                RiskTier::Low => counts.low += 1,
                RiskTier::Medium => counts.medium += 1,
                RiskTier::High => counts.high += 1,
            }
        }
        counts
    }

    pub const fn get(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Low => self.low,
            RiskTier::Medium => self.medium,
            RiskTier::High => self.high,
        }
    }

    pub const fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

pub fn plotted(zones: &[HeatmapZone]) -> impl Iterator<Item = &HeatmapZone> {
    zones.iter().filter(|zone| zone.tier().is_plotted())
}

/// Lat/lon bounding box with a margin, or `None` for an empty slice.
pub fn bounds(points: impl IntoIterator<Item = (f64, f64)>, margin: f64) -> Option<GeoBounds> {
    let mut iter = points.into_iter();
    let (lat, lon) = iter.next()?;
    let mut b = GeoBounds {
        min_lat: lat,
        max_lat: lat,
        min_lon: lon,
        max_lon: lon,
    };
    for (lat, lon) in iter {
        b.min_lat = b.min_lat.min(lat);
        b.max_lat = b.max_lat.max(lat);
        b.min_lon = b.min_lon.min(lon);
        b.max_lon = b.max_lon.max(lon);
    }
    b.min_lat -= margin;
    b.max_lat += margin;
    b.min_lon -= margin;
    b.max_lon += margin;
    Some(b)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub const MEKONG: Self = Self {
        min_lat: 9.0,
        max_lat: 10.6,
        min_lon: 104.9,
        max_lon: 106.5,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn within_some_center(zone: &HeatmapZone) -> bool {
        MEKONG_CENTERS.iter().any(|center| {
            (zone.lat - center.lat).abs() <= MAX_OFFSET_DEG + 1e-9
                && (zone.lon - center.lon).abs() <= MAX_OFFSET_DEG + 1e-9
        })
    }

    #[test]
    fn risk_is_binarized() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            for zone in generate_mock_zones(&mut rng) {
                assert!(zone.risk == HOT_RISK || zone.risk == WARM_RISK);
                assert!(zone.risk <= 100);
            }
        }
    }

    #[test]
    fn points_stay_near_centers() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            for zone in generate_mock_zones(&mut rng) {
                assert!(within_some_center(&zone), "stray zone {zone:?}");
            }
        }
    }

    #[test]
    fn count_per_center_is_three_to_seven() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for _ in 0..50 {
            let zones = generate_mock_zones(&mut rng);
            assert!(zones.len() >= MEKONG_CENTERS.len() * MIN_POINTS_PER_CENTER);
            assert!(zones.len() <= MEKONG_CENTERS.len() * MAX_POINTS_PER_CENTER);

            // Centers are further apart than twice the offset, so each point
            // belongs to exactly one of them.
            for center in &MEKONG_CENTERS {
                let near = zones
                    .iter()
                    .filter(|zone| nearest_center(zone.lat, zone.lon).name == center.name)
                    .count();
                assert!((MIN_POINTS_PER_CENTER..=MAX_POINTS_PER_CENTER).contains(&near));
            }
        }
    }

    #[test]
    fn same_seed_same_zones() {
        let a = generate_mock_zones(&mut ChaCha8Rng::seed_from_u64(99));
        let b = generate_mock_zones(&mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn tally_and_plotted_skip_low() {
        let zones = [
            HeatmapZone { lat: 10.0, lon: 105.0, risk: 20 },
            HeatmapZone { lat: 10.0, lon: 105.0, risk: 55 },
            HeatmapZone { lat: 10.0, lon: 105.0, risk: 85 },
            HeatmapZone { lat: 10.0, lon: 105.0, risk: 90 },
        ];
        let counts = TierCounts::tally(&zones);
        assert_eq!(counts, TierCounts { low: 1, medium: 1, high: 2 });
        assert_eq!(counts.total(), 4);
        assert_eq!(plotted(&zones).count(), 3);
    }

    #[test]
    fn bounds_include_margin() {
        let b = bounds([(10.0, 105.0), (9.0, 106.0)], 0.1);
        let Some(b) = b else {
            panic!("expected bounds");
        };
        assert!((b.min_lat - 8.9).abs() < 1e-9);
        assert!((b.max_lon - 106.1).abs() < 1e-9);
        assert!(bounds(std::iter::empty(), 0.1).is_none());
    }
}
