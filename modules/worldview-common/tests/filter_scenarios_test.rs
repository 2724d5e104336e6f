//! End-to-end checks of filtering, facets, and aggregation over small
//! hand-built datasets, plus property checks over a richer fixture.

use worldview_common::{
    apply, charts, distinct_count, group_mean, options_for, Dimension, FilterState, Record,
    UNKNOWN_GROUP,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn sector_intensity(sector: &str, intensity: f64) -> Record {
    Record {
        sector: Some(sector.into()),
        intensity: Some(intensity),
        ..Default::default()
    }
}

fn parse(json: &str) -> Vec<Record> {
    serde_json::from_str(json).expect("fixture should parse")
}

/// A slice of realistic provider output, including the usual gaps.
fn world_fixture() -> Vec<Record> {
    parse(
        r#"[
        {"end_year": "", "intensity": 6, "sector": "Energy", "topic": "gas",
         "region": "Northern America", "pestle": "Industries", "source": "EIA",
         "country": "United States of America", "impact": "", "likelihood": 3,
         "start_year": "", "published": "January, 09 2017 00:00:00"},
        {"end_year": 2030, "intensity": 10, "sector": "Energy", "topic": "oil",
         "region": "Northern America", "pestle": "Economic", "source": "EIA",
         "country": "United States of America", "impact": 2, "likelihood": 2,
         "start_year": 2016, "published": "January, 20 2017 03:51:25"},
        {"end_year": "", "intensity": 4, "sector": "", "topic": "oil",
         "region": "World", "pestle": "Economic", "source": "Reuters",
         "country": "", "impact": "", "likelihood": 2,
         "start_year": "", "published": "February, 01 2017 00:00:00"},
        {"end_year": 2050, "intensity": 16, "sector": "Environment", "topic": "climate",
         "region": "Europe", "pestle": "Environmental", "source": "WWF",
         "country": "Germany", "impact": 4, "likelihood": 4,
         "start_year": 2017, "published": "March, 14 2017 00:00:00"},
        {"sector": "Energy", "topic": "gas", "region": "Europe", "pestle": "Economic",
         "source": "Reuters", "country": "Germany", "end_year": 2030}
    ]"#,
    )
}

// ---------------------------------------------------------------------------
// Named scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_mean_intensity_by_sector() {
    let records = vec![
        sector_intensity("Energy", 4.0),
        sector_intensity("Energy", 8.0),
        sector_intensity("Health", 2.0),
    ];
    let groups = group_mean(&records, |r| r.sector.as_deref(), Record::intensity_or_zero);
    let pairs: Vec<(&str, f64)> = groups.iter().map(|g| (g.key.as_str(), g.mean)).collect();
    assert_eq!(pairs, vec![("Energy", 6.0), ("Health", 2.0)]);
}

#[test]
fn scenario_b_single_sector_filter() {
    let records = vec![
        sector_intensity("Energy", 4.0),
        sector_intensity("Energy", 8.0),
        sector_intensity("Health", 2.0),
    ];
    let mut filters = FilterState::new();
    filters.set(Dimension::Sector, "Health");

    let subset = apply(&records, &filters);
    assert_eq!(subset, vec![&sector_intensity("Health", 2.0)]);
    assert_eq!(distinct_count(&subset, |r| r.sector.as_deref()), 1);
}

#[test]
fn scenario_c_donut_drops_all_zero_regions() {
    let records = parse(r#"[{"region": "EU", "impact": 0}, {"region": "EU", "impact": 0}]"#);
    assert!(charts::impact_by_region(&records).is_empty());
}

#[test]
fn scenario_d_missing_sector_groups_as_unknown() {
    let records = parse(r#"[{"intensity": 5}, {"topic": "oil"}, {"sector": "Energy", "intensity": 1}]"#);
    let groups = charts::intensity_by_sector(&records);
    assert_eq!(groups[0].key, UNKNOWN_GROUP);
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].mean, 2.5);
    assert_eq!(groups[1].key, "Energy");
}

// ---------------------------------------------------------------------------
// Properties over the realistic fixture
// ---------------------------------------------------------------------------

fn filter_combinations() -> Vec<FilterState> {
    let pairs: &[&[(&str, &str)]] = &[
        &[],
        &[("sector", "Energy")],
        &[("region", "Europe")],
        &[("sector", "Energy"), ("region", "Europe")],
        &[("topic", "oil"), ("end_year", "2030")],
        &[("country", "Germany"), ("pestle", "Economic")],
        &[("source", "Nobody")],
    ];
    pairs
        .iter()
        .map(|p| FilterState::from_pairs(p.iter().copied()).unwrap())
        .collect()
}

#[test]
fn filtered_subset_preserves_identity_and_order() {
    let records = world_fixture();
    for filters in filter_combinations() {
        let subset = apply(&records, &filters);
        let positions: Vec<usize> = subset
            .iter()
            .map(|r| {
                records
                    .iter()
                    .position(|candidate| std::ptr::eq(candidate, *r))
                    .expect("subset member must come from the input")
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn every_offered_option_yields_records() {
    let records = world_fixture();
    for filters in filter_combinations() {
        for dimension in Dimension::ALL {
            for value in options_for(&records, &filters, dimension) {
                let mut probe = filters.clone();
                probe.set(dimension, value.clone());
                assert!(
                    !apply(&records, &probe).is_empty(),
                    "{dimension}={value} under {filters:?} is empty"
                );
            }
        }
    }
}

#[test]
fn options_ignore_own_selection() {
    let records = world_fixture();
    for filters in filter_combinations() {
        for dimension in Dimension::ALL {
            let baseline = options_for(&records, &filters.without(dimension), dimension);
            for value in ["Energy", "Europe", "2030", "nonexistent"] {
                let mut changed = filters.clone();
                changed.set(dimension, value);
                assert_eq!(options_for(&records, &changed, dimension), baseline);
            }
        }
    }
}

#[test]
fn clearing_a_dimension_matches_never_setting_it() {
    let records = world_fixture();
    let mut never = FilterState::new();
    never.set(Dimension::Region, "Europe");

    let mut cleared = never.clone();
    cleared.set(Dimension::Topic, "gas");
    cleared.clear(Dimension::Topic);

    assert_eq!(apply(&records, &cleared), apply(&records, &never));
}

#[test]
fn numeric_years_filter_as_text() {
    let records = world_fixture();
    let mut filters = FilterState::new();
    filters.set(Dimension::EndYear, "2030");
    assert_eq!(apply(&records, &filters).len(), 2);
    assert_eq!(
        options_for(&records, &FilterState::new(), Dimension::EndYear),
        vec!["2030", "2050"]
    );
}

#[test]
fn statistics_skip_blank_categories() {
    let records = world_fixture();
    let stats = charts::statistics(&records);
    assert_eq!(stats.records, 5);
    assert_eq!(stats.sectors, 2);
    assert_eq!(stats.countries, 2);
    assert_eq!(stats.topics, 3);
}
