use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use smartstock_core::{Category, Equipment, EquipmentId, EquipmentState, Location, Manufacturer};

/// Oldest equipment in a generated population, in months.
pub const MAX_AGE_MONTHS: u32 = 60;

/// Generate `count` equipment records.
///
/// Ids are numbered from 1. Age is uniform over `0..=60` months and the state
/// tier is derived from it; categorical fields are uniform over their sets.
pub fn generate_equipment<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    reference_time: DateTime<Utc>,
) -> Vec<Equipment> {
    (0..count)
        .map(|i| {
            let age_months = rng.random_range(0..=MAX_AGE_MONTHS);
            let acquired = reference_time - Duration::days(i64::from(age_months) * 30);

            Equipment {
                id: EquipmentId::new(i as u32 + 1),
                rfid: format!("RFID{}", rng.random_range(10_000..=99_999)),
                category: pick(rng, Category::ALL),
                manufacturer: pick(rng, Manufacturer::ALL),
                model: format!("Model-{}", rng.random_range(1_000..=9_999)),
                location: pick(rng, Location::INITIAL),
                state: EquipmentState::from_age(age_months),
                age_months,
                acquired_on: acquired.date_naive(),
                acquisition_value: rng.random_range(1_000..=10_000),
                in_use: rng.random_bool(0.5),
            }
        })
        .collect()
}

/// Uniform pick from one of the constant label sets (never empty).
pub(crate) fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, from: &[T]) -> T {
    from[rng.random_range(0..from.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let eq = generate_equipment(&mut rng, 12, Utc::now());
        assert_eq!(eq.len(), 12);
        for (i, e) in eq.iter().enumerate() {
            assert_eq!(e.id.sequence(), i as u32 + 1);
        }
        assert_eq!(eq[0].id.to_string(), "EQ0001");
    }

    #[test]
    fn zero_count_yields_empty_population() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_equipment(&mut rng, 0, Utc::now()).is_empty());
    }

    #[test]
    fn same_seed_same_population() {
        let now = Utc::now();
        let a = generate_equipment(&mut StdRng::seed_from_u64(9), 20, now);
        let b = generate_equipment(&mut StdRng::seed_from_u64(9), 20, now);
        assert_eq!(a, b);
    }

    #[test]
    fn initial_locations_never_include_hr() {
        let mut rng = StdRng::seed_from_u64(3);
        let eq = generate_equipment(&mut rng, 500, Utc::now());
        assert!(eq.iter().all(|e| e.location != Location::InUseHr));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: age stays within bounds and the state is exactly the age rule.
        #[test]
        fn state_is_function_of_age(seed in any::<u64>(), count in 1usize..80) {
            let now = Utc::now();
            let mut rng = StdRng::seed_from_u64(seed);
            for e in generate_equipment(&mut rng, count, now) {
                prop_assert!(e.age_months <= MAX_AGE_MONTHS);
                prop_assert_eq!(e.state, EquipmentState::from_age(e.age_months));
                prop_assert!((1_000..=10_000).contains(&e.acquisition_value));
                prop_assert_eq!(
                    e.acquired_on,
                    (now - Duration::days(i64::from(e.age_months) * 30)).date_naive()
                );
                prop_assert!(e.rfid.starts_with("RFID") && e.rfid.len() == 9);
            }
        }
    }
}
