use std::collections::BTreeSet;

use super::model::{DateInterval, Record, date_bounds};

// ---------------------------------------------------------------------------
// FilteredView – rows matching the current selection
// ---------------------------------------------------------------------------

/// Rows of the selected entities inside the chosen interval, in source order.
/// Every row has both cumulative counts present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    rows: Vec<Record>,
}

impl FilteredView {
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Keep the rows that
/// * belong to one of `entities`,
/// * have both `total_cases` and `total_deaths` recorded, and
/// * fall inside `interval` (inclusive).
///
/// No match is an empty view, not an error.
pub fn filter(rows: &[Record], entities: &BTreeSet<String>, interval: DateInterval) -> FilteredView {
    let rows = rows
        .iter()
        .filter(|r| entities.contains(&r.location))
        .filter(|r| r.has_cumulative_counts())
        .filter(|r| interval.contains(r.date))
        .cloned()
        .collect();
    FilteredView { rows }
}

/// Date range available to `entities`: the first and last day on which any of
/// them has both cumulative counts. `None` if they have no such row.
pub fn selection_bounds(rows: &[Record], entities: &BTreeSet<String>) -> Option<DateInterval> {
    date_bounds(
        rows.iter()
            .filter(|r| entities.contains(&r.location) && r.has_cumulative_counts()),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn row(location: &str, day: u32, cases: Option<f64>, deaths: Option<f64>) -> Record {
        Record {
            iso_code: location[..3].to_ascii_uppercase(),
            location: location.to_string(),
            date: d(day),
            total_cases: cases,
            total_deaths: deaths,
            new_cases: None,
            new_deaths: None,
            people_fully_vaccinated_per_hundred: None,
        }
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            row("Kenya", 1, Some(100.0), Some(1.0)),
            row("Uganda", 1, Some(50.0), Some(0.0)),
            row("Kenya", 2, Some(150.0), Some(2.0)),
            row("Kenya", 3, Some(160.0), None),
            row("Kenya", 4, Some(170.0), Some(3.0)),
            row("Uganda", 5, None, Some(1.0)),
        ]
    }

    #[test]
    fn keeps_selected_rows_inside_interval() {
        let rows = sample();
        let interval = DateInterval::new(d(1), d(2)).unwrap();
        let view = filter(&rows, &names(&["Kenya"]), interval);

        assert_eq!(view.len(), 2);
        assert!(view.rows().iter().all(|r| r.location == "Kenya"));
        assert_eq!(view.rows()[0].date, d(1));
        assert_eq!(view.rows()[1].date, d(2));
    }

    #[test]
    fn rows_missing_cumulative_counts_are_dropped() {
        let rows = sample();
        let interval = DateInterval::new(d(1), d(5)).unwrap();
        let view = filter(&rows, &names(&["Kenya", "Uganda"]), interval);

        assert!(view.rows().iter().all(Record::has_cumulative_counts));
        assert!(!view.rows().iter().any(|r| r.date == d(3)));
        assert!(!view.rows().iter().any(|r| r.date == d(5)));
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn no_match_is_an_empty_view() {
        let rows = sample();
        let interval = DateInterval::new(d(10), d(20)).unwrap();
        assert!(filter(&rows, &names(&["Kenya"]), interval).is_empty());
        assert!(filter(&rows, &names(&["Atlantis"]), DateInterval::day(d(1))).is_empty());
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let rows = sample();
        let entities = names(&["Kenya", "Uganda"]);
        let interval = DateInterval::new(d(2), d(5)).unwrap();

        let once = filter(&rows, &entities, interval);
        let twice = filter(once.rows(), &entities, interval);
        assert_eq!(once, twice);
    }

    #[test]
    fn bounds_ignore_rows_without_cumulative_counts() {
        let rows = sample();
        assert_eq!(
            selection_bounds(&rows, &names(&["Uganda"])),
            Some(DateInterval::day(d(1)))
        );
        assert_eq!(
            selection_bounds(&rows, &names(&["Kenya", "Uganda"])),
            DateInterval::new(d(1), d(4))
        );
        assert_eq!(selection_bounds(&rows, &names(&[])), None);
    }
}
