use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

use data_tracker::data::{Field, Record};

const DAYS: i64 = 180;

/// Small deterministic generator (xorshift64*), enough for synthetic counts.
struct Xorshift(u64);

impl Xorshift {
    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let v = self.0.wrapping_mul(0x2545_f491_4f6c_dd1d);
        (v >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// (iso_code, location, typical daily cases, case fatality rate, vaccination start day)
const COUNTRIES: [(&str, &str, f64, f64, i64); 6] = [
    ("KEN", "Kenya", 400.0, 0.017, 60),
    ("UGA", "Uganda", 150.0, 0.024, 75),
    ("TZA", "Tanzania", 60.0, 0.020, 120),
    ("RWA", "Rwanda", 90.0, 0.013, 45),
    ("ETH", "Ethiopia", 700.0, 0.015, 90),
    ("BDI", "Burundi", 20.0, 0.002, 150),
];

fn country_rows(
    rng: &mut Xorshift,
    start: NaiveDate,
    (code, name, daily, cfr, vax_start): (&str, &str, f64, f64, i64),
) -> Vec<Record> {
    let mut total_cases = 0.0;
    let mut total_deaths = 0.0;
    let mut vaccinated = 0.0;
    let mut rows = Vec::new();

    for day in 0..DAYS {
        // Weekly reporting rhythm plus noise.
        let weekday = 1.0 + 0.3 * ((day % 7) as f64 - 3.0) / 3.0;
        let new_cases = (daily * weekday * (0.5 + rng.next_f64())).round();
        let new_deaths = (new_cases * cfr * (0.5 + rng.next_f64())).round();
        total_cases += new_cases;
        total_deaths += new_deaths;
        if day >= vax_start {
            vaccinated += 0.15 * rng.next_f64();
        }

        // Deaths were not reported during the first week; some days are missing outright.
        let deaths_reported = day >= 7;
        let gap = rng.next_f64() < 0.03;

        rows.push(Record {
            iso_code: code.to_string(),
            location: name.to_string(),
            date: start + Duration::days(day),
            total_cases: (!gap).then_some(total_cases),
            total_deaths: (deaths_reported && !gap).then_some(total_deaths),
            new_cases: (!gap).then_some(new_cases),
            new_deaths: deaths_reported.then_some(new_deaths),
            people_fully_vaccinated_per_hundred: (day >= vax_start)
                .then(|| (vaccinated * 100.0).round() / 100.0),
        });
    }
    rows
}

/// Sum countries into an aggregate row per day, the way the source data
/// carries continents and "World".
fn aggregate(code: &str, name: &str, countries: &[Record]) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::new();
    for r in countries {
        let day = (r.date - countries[0].date).num_days() as usize;
        if out.len() <= day {
            out.push(Record {
                iso_code: code.to_string(),
                location: name.to_string(),
                date: r.date,
                total_cases: Some(0.0),
                total_deaths: Some(0.0),
                new_cases: Some(0.0),
                new_deaths: Some(0.0),
                people_fully_vaccinated_per_hundred: None,
            });
        }
        let agg = &mut out[day];
        for (slot, v) in [
            (&mut agg.total_cases, r.total_cases),
            (&mut agg.total_deaths, r.total_deaths),
            (&mut agg.new_cases, r.new_cases),
            (&mut agg.new_deaths, r.new_deaths),
        ] {
            *slot = slot.map(|acc| acc + v.unwrap_or(0.0));
        }
    }
    out
}

fn write_csv(path: &str, rows: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["iso_code", "location", "date"];
    header.extend(Field::ALL.iter().map(|f| f.column()));
    writer.write_record(&header)?;

    for r in rows {
        let mut record = vec![r.iso_code.clone(), r.location.clone(), r.date.to_string()];
        record.extend(
            Field::ALL
                .iter()
                .map(|f| r.value(*f).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Record]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;

    let mut fields = vec![
        ArrowField::new("iso_code", DataType::Utf8, false),
        ArrowField::new("location", DataType::Utf8, false),
        ArrowField::new("date", DataType::Date32, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.iso_code.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.location.as_str()))),
        Arc::new(Date32Array::from_iter_values(
            rows.iter().map(|r| (r.date - epoch).num_days() as i32),
        )),
    ];
    for field in Field::ALL {
        fields.push(ArrowField::new(field.column(), DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.value(field)).collect::<Vec<_>>(),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = Xorshift(0x9e37_79b9_7f4a_7c15);
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).context("start date")?;

    let mut countries = Vec::new();
    for spec in COUNTRIES {
        countries.extend(country_rows(&mut rng, start, spec));
    }

    let mut rows = countries.clone();
    rows.extend(aggregate("OWID_AFR", "Africa", &countries));
    rows.extend(aggregate("OWID_WRL", "World", &countries));

    write_csv("sample_covid_data.csv", &rows)?;
    write_parquet("sample_covid_data.parquet", &rows)?;

    log::info!(
        "Wrote {} rows ({} countries, {DAYS} days) to sample_covid_data.csv/.parquet",
        rows.len(),
        COUNTRIES.len()
    );
    println!("Wrote {} rows to sample_covid_data.csv and sample_covid_data.parquet", rows.len());
    Ok(())
}
