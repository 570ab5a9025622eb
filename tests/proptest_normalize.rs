//! Property-based tests for normalization, aggregation and paging.

use chrono::{Days, NaiveDate};
use downspeeds::model::{Advisory, Distribution, Release};
use downspeeds::normalize::{canonical_severity, normalize};
use downspeeds::sources::{Paginated, RawDate, RockyAdvisory};
use downspeeds::{Dataset, RawRecord};
use proptest::prelude::*;

fn distribution() -> impl Strategy<Value = Distribution> {
    prop_oneof![
        Just(Distribution::Rhel),
        Just(Distribution::AlmaLinux),
        Just(Distribution::RockyLinux),
    ]
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn normalize_is_deterministic(
        id in "RLSA-20[0-9]{2}:[0-9]{4}",
        day in 0u64..1000,
        severity in prop::option::of("SEVERITY_(LOW|MODERATE|IMPORTANT|CRITICAL)"),
        synopsis in prop::option::of("[a-zA-Z ]{0,40}"),
    ) {
        let date = base_date() + Days::new(day);
        let raw = RawRecord::RockyLinux(RockyAdvisory {
            name: Some(id.clone()),
            synopsis,
            severity,
            kind: Some("TYPE_SECURITY".to_string()),
            published_at: Some(RawDate::Text(format!("{date}T12:00:00Z"))),
        });

        let first = normalize(&raw, Release::R9).unwrap();
        let second = normalize(&raw, Release::R9).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.advisory_id, id);
        prop_assert_eq!(first.issue_date, date);
    }

    #[test]
    fn normalize_never_panics_on_arbitrary_ids(id in "\\PC{0,40}", millis in any::<i64>()) {
        let raw = RawRecord::RockyLinux(RockyAdvisory {
            name: Some(id),
            published_at: Some(RawDate::Millis(millis)),
            ..RockyAdvisory::default()
        });
        let _ = normalize(&raw, Release::R8);
    }

    #[test]
    fn canonical_severity_is_idempotent(raw in "(SEVERITY_)?[A-Za-z]{1,12}") {
        let once = canonical_severity(&raw);
        prop_assert_eq!(canonical_severity(&once), once);
    }

    #[test]
    fn dataset_partitions_stay_ordered(
        records in prop::collection::vec((distribution(), 0u32..50, 0u64..30), 0..60),
        one_by_one in any::<bool>(),
    ) {
        let advisories: Vec<Advisory> = records
            .iter()
            .map(|(dist, n, day)| {
                Advisory::new(
                    *dist,
                    Release::R8,
                    format!("{}-2023:{n:04}", dist.advisory_prefix()),
                    base_date() + Days::new(*day),
                )
            })
            .collect();

        let mut dataset = Dataset::new(Release::R8);
        if one_by_one {
            for advisory in advisories.clone() {
                dataset.push(advisory).unwrap();
            }
        } else {
            dataset.extend(advisories.clone()).unwrap();
        }

        prop_assert_eq!(dataset.len(), advisories.len());
        for dist in Distribution::ALL {
            let partition = dataset.records(dist);
            prop_assert!(partition.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
        }
        let ordered = dataset.ordered();
        prop_assert!(ordered.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
    }

    #[test]
    fn pagination_is_finite(page_size in 1usize..10, lengths in prop::collection::vec(0usize..12, 0..8)) {
        let mut stream = Paginated::new(page_size, |page| {
            let len = lengths.get(page as usize).copied().unwrap_or(0);
            Ok((0..len).collect::<Vec<_>>())
        });
        let total = stream.by_ref().count();

        let expected_requests = lengths
            .iter()
            .position(|len| *len < page_size)
            .map_or(lengths.len() + 1, |i| i + 1);
        prop_assert_eq!(stream.requests() as usize, expected_requests);
        prop_assert_eq!(total, lengths.iter().take(expected_requests).sum::<usize>());
    }
}
