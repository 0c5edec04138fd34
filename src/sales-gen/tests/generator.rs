use std::collections::HashMap;
use std::env::temp_dir;
use std::fs::File;
use std::str::FromStr;

use chrono::NaiveDate;
use common::round2;
use common::types::Channel;
use common::types::Region;
use common::types::Segment;
use common::types::Tier;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use sales_gen::store::catalog::CATALOG;
use sales_gen::store::output::write_parquet;
use sales_gen::store::Config;
use sales_gen::store::Scenario;
use sales_gen::store::Transaction;
use strum::IntoEnumIterator;
use uuid::Uuid;

fn to_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn generate(seed: u64, num_records: usize) -> Vec<Transaction> {
    let cfg = Config {
        num_records,
        seed,
        to_date: to_date(),
    };
    Scenario::try_new(cfg).unwrap().run().unwrap()
}

#[test]
fn deterministic_for_equal_seeds() {
    let a = generate(35487, 500);
    let b = generate(35487, 500);
    assert_eq!(a, b);

    let c = generate(35488, 500);
    assert_ne!(a, c);
}

#[test]
fn scenario_seed_35487_100_records() {
    let rows = generate(35487, 100);

    assert!(rows.len() >= 100);
    // bundle count is bounded by the primary count
    assert!(rows.len() <= 200);

    for row in &rows {
        assert!(Region::iter().any(|r| r == row.region));
        assert!(CATALOG.iter().any(|p| p.name == row.product));
        assert!(row.quantity >= 1);
        assert!((0.0..100.0).contains(&row.discount_percent));
        assert!(row.unit_price > 0.0);
    }
}

#[test]
fn total_amount_invariant() {
    for row in generate(35487, 2000) {
        let subtotal = row.quantity as f64 * row.unit_price;
        let expected = round2(subtotal - subtotal * (row.discount_percent / 100.0));
        assert!(
            (row.total_amount - expected).abs() < 1e-6,
            "row {} total {} expected {}",
            row.id,
            row.total_amount,
            expected
        );
    }
}

#[test]
fn bundle_rows_share_primary_context() {
    let rows = generate(9, 1000);
    assert!(rows.len() > 1000, "seed produced no bundles");

    let ids: std::collections::HashSet<Uuid> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), rows.len(), "duplicate transaction ids");

    // primaries come first, bundles are appended after the primary pass
    let (primaries, bundles) = rows.split_at(1000);

    for bundle in bundles {
        // at least one primary shares the full linkage context and
        // carries the bundle product in its affinity list
        let linked = primaries.iter().any(|p| {
            p.customer_id == bundle.customer_id
                && p.date == bundle.date
                && p.salesperson == bundle.salesperson
                && p.region == bundle.region
                && p.sales_channel == bundle.sales_channel
                && CATALOG
                    .iter()
                    .find(|c| c.name == p.product)
                    .map(|c| c.bundles.contains(&bundle.product))
                    .unwrap_or(false)
        });
        assert!(linked, "bundle {} has no linked primary", bundle.id);
    }
}

#[test]
fn customers_drawn_from_assigned_roster_only() {
    let cfg = Config {
        num_records: 2000,
        seed: 42,
        to_date: to_date(),
    };
    let mut scenario = Scenario::try_new(cfg).unwrap();

    let rosters: HashMap<String, Vec<Uuid>> = scenario
        .pools()
        .salespeople
        .iter()
        .map(|sp| {
            let ids = sp
                .customers
                .clone()
                .map(|i| scenario.pools().customers[i].id)
                .collect();
            (sp.name.clone(), ids)
        })
        .collect();

    for row in scenario.run().unwrap() {
        let roster = rosters.get(&row.salesperson).unwrap();
        assert!(roster.contains(&row.customer_id));
    }
}

#[test]
fn channel_frequencies_converge() {
    let rows = generate(123, 20000);
    let primaries = &rows[..20000];

    let mut counts: HashMap<Channel, usize> = HashMap::new();
    for row in primaries {
        *counts.entry(row.sales_channel).or_default() += 1;
    }

    for channel in Channel::iter() {
        let freq = *counts.get(&channel).unwrap_or(&0) as f64 / primaries.len() as f64;
        assert!(
            (freq - channel.weight()).abs() < 0.02,
            "{channel}: {freq} vs {}",
            channel.weight()
        );
    }
}

#[test]
fn segment_frequencies_converge() {
    let cfg = Config {
        num_records: 0,
        seed: 35487,
        to_date: to_date(),
    };
    let scenario = Scenario::try_new(cfg).unwrap();
    let customers = &scenario.pools().customers;

    let mut counts: HashMap<Segment, usize> = HashMap::new();
    for customer in customers {
        *counts.entry(customer.segment).or_default() += 1;
    }

    for segment in Segment::iter() {
        let freq = *counts.get(&segment).unwrap_or(&0) as f64 / customers.len() as f64;
        assert!(
            (freq - segment.weight()).abs() < 0.06,
            "{segment}: {freq} vs {}",
            segment.weight()
        );
    }
}

#[test]
fn dates_within_trailing_window() {
    let rows = generate(77, 3000);
    let to = to_date();
    let from = to - chrono::Duration::days(730);
    for row in &rows {
        assert!(row.date >= from && row.date <= to);
    }
}

#[test]
fn segment_and_tier_strings_parse_back() {
    for row in generate(55, 200) {
        assert!(Segment::from_str(&row.customer_segment.to_string()).is_ok());
        assert!(Tier::from_str(&row.salesperson_tier.to_string()).is_ok());
    }
}

#[test]
fn parquet_roundtrip() {
    let rows = generate(35487, 300);
    let path = temp_dir().join(format!("{}.parquet", Uuid::new_v4()));

    let written = write_parquet(&path, &rows).unwrap();
    assert_eq!(written, rows.len());

    let file = File::open(&path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let total: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(total, rows.len());

    std::fs::remove_file(&path).ok();
}

#[test]
fn empty_generation_writes_valid_file() {
    let path = temp_dir().join(format!("{}.parquet", Uuid::new_v4()));
    let written = write_parquet(&path, &[]).unwrap();
    assert_eq!(written, 0);

    let file = File::open(&path).unwrap();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    assert_eq!(builder.schema().fields().len(), 15);

    std::fs::remove_file(&path).ok();
}
