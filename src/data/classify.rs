use std::collections::BTreeSet;

use super::model::Dataset;

/// Length of a country code. Aggregates (continents, income groups, "World")
/// use longer `OWID_*` codes.
pub const COUNTRY_CODE_LEN: usize = 3;

/// Whether `code` identifies a single country rather than an aggregate.
pub fn is_country_code(code: &str) -> bool {
    code.chars().count() == COUNTRY_CODE_LEN
}

// ---------------------------------------------------------------------------
// EntitySet – the selectable countries
// ---------------------------------------------------------------------------

/// Distinct location names of country rows, sorted for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySet {
    names: BTreeSet<String>,
}

impl EntitySet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collect the selectable entities of `dataset`.
pub fn classify(dataset: &Dataset) -> EntitySet {
    let names = dataset
        .records()
        .iter()
        .filter(|r| is_country_code(&r.iso_code))
        .map(|r| r.location.clone())
        .collect();
    EntitySet { names }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::Record;

    fn row(code: &str, location: &str) -> Record {
        Record {
            iso_code: code.to_string(),
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            total_cases: None,
            total_deaths: None,
            new_cases: None,
            new_deaths: None,
            people_fully_vaccinated_per_hundred: None,
        }
    }

    #[test]
    fn aggregates_are_not_selectable() {
        let ds = Dataset::new(
            vec![
                row("UGA", "Uganda"),
                row("OWID_WRL", "World"),
                row("KEN", "Kenya"),
                row("OWID_AFR", "Africa"),
                row("KEN", "Kenya"),
            ],
            0,
        );
        let entities = classify(&ds);
        assert_eq!(entities.iter().collect::<Vec<_>>(), ["Kenya", "Uganda"]);
        assert!(!entities.contains("World"));
    }

    #[test]
    fn code_length_counts_characters() {
        assert!(is_country_code("KEN"));
        assert!(is_country_code("ÅLA"));
        assert!(!is_country_code("KE"));
        assert!(!is_country_code(""));
        assert!(!is_country_code("OWID_KOS"));
    }
}
