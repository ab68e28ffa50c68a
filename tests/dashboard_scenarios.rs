//! End-to-end checks of the data pipeline: CSV text in, dashboard views out.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use data_tracker::data::loader::load_csv;
use data_tracker::data::{
    ADVISORY_MESSAGE, DashboardView, Dataset, DateInterval, classify, filter, is_country_code,
    latest, map_layer, prepare, series,
};

const SAMPLE: &str = "\
iso_code,continent,location,date,total_cases,new_cases,total_deaths,new_deaths,people_fully_vaccinated_per_hundred
KEN,Africa,Kenya,2021-01-02,150,50,3,1,
UGA,Africa,Uganda,2021-01-01,50,50,1,1,0.1
KEN,Africa,Kenya,2021-01-01,100,100,2,2,
OWID_AFR,,Africa,2021-01-03,300,150,6,2,
TZA,Africa,Tanzania,2021-01-01,20,20,,,
TZA,Africa,Tanzania,2021-01-04,25,5,0,0,1.5
";

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
}

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn dataset() -> Dataset {
    load_csv(SAMPLE.as_bytes()).expect("sample loads")
}

#[test]
fn kenya_uganda_scenario() {
    let ds = dataset();

    let view = filter(
        ds.records(),
        &names(&["Kenya"]),
        DateInterval::new(d(1), d(2)).unwrap(),
    );
    assert_eq!(view.len(), 2);
    assert!(view.rows().iter().all(|r| r.location == "Kenya"));

    let snap = latest(&ds);
    assert_eq!(snap.get("KEN").unwrap().date, d(2));
    assert_eq!(snap.get("UGA").unwrap().date, d(1));
}

#[test]
fn entity_set_has_only_three_letter_codes() {
    let ds = dataset();
    let entities = classify(&ds);

    assert_eq!(
        entities.iter().collect::<Vec<_>>(),
        ["Kenya", "Tanzania", "Uganda"]
    );
    for name in entities.iter() {
        assert!(
            ds.records()
                .iter()
                .filter(|r| r.location == name)
                .all(|r| is_country_code(&r.iso_code))
        );
    }
}

#[test]
fn null_deaths_row_never_reaches_a_view() {
    let ds = dataset();
    assert!(
        ds.records()
            .iter()
            .any(|r| r.location == "Tanzania" && r.total_deaths.is_none())
    );

    let all = ds.date_bounds().unwrap();
    let view = filter(ds.records(), &names(&["Tanzania"]), all);
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows()[0].date, d(4));
}

#[test]
fn snapshot_ignores_selection_and_interval() {
    let ds = dataset();
    let snap = latest(&ds);

    assert_eq!(snap.len(), 3);
    assert!(snap.get("OWID_AFR").is_none());
    for row in snap.rows() {
        assert!(
            ds.records()
                .iter()
                .filter(|r| r.iso_code == row.iso_code)
                .all(|r| r.date <= row.date)
        );
    }

    let layer = map_layer(&snap, "people_fully_vaccinated_per_hundred").unwrap();
    assert_eq!(layer.range, Some((0.1, 1.5)));
    assert_eq!(
        layer.title,
        "People Fully Vaccinated Per Hundred by Country"
    );
}

#[test]
fn series_are_date_ordered_even_when_the_file_is_not() {
    let ds = dataset();
    let view = filter(
        ds.records(),
        &names(&["Kenya", "Uganda"]),
        ds.date_bounds().unwrap(),
    );
    let set = series(&view, "total_cases").unwrap();

    for points in set.values() {
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }
    assert_eq!(set["Kenya"][0].value, Some(100.0));
}

#[test]
fn empty_selection_produces_no_charts() {
    let ds = dataset();
    let view = prepare(&ds, &BTreeSet::new(), ds.date_bounds().unwrap());
    assert_eq!(view, DashboardView::Advisory(ADVISORY_MESSAGE));
}

#[test]
fn unknown_metric_is_rejected() {
    let ds = dataset();
    let view = filter(ds.records(), &names(&["Kenya"]), ds.date_bounds().unwrap());
    let err = series(&view, "hospital_beds").unwrap_err();
    assert_eq!(err.requested(), "hospital_beds");
}
