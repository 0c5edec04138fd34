use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use common::round2;
use common::types::Channel;
use common::types::Region;
use common::types::Segment;
use common::types::Tier;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::error::SalesGenError;
use crate::store::catalog::CatalogProvider;
use crate::store::catalog::Product;
use crate::store::pools::Pools;

/// Trailing window the transaction dates are drawn from, in days.
const DATE_WINDOW_DAYS: i64 = 730;

#[derive(Debug, Clone)]
pub struct Config {
    pub num_records: usize,
    pub seed: u64,
    /// Upper bound of the date window. Dates fall within the two years
    /// preceding it.
    pub to_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub product: &'static str,
    pub quantity: u32,
    pub unit_price: f64,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_segment: Segment,
    pub region: Region,
    pub sales_channel: Channel,
    pub salesperson: String,
    pub salesperson_tier: Tier,
    pub discount_percent: f64,
    pub total_amount: f64,
}

/// Adjusts a discount by the salesperson's performance. Strong closers
/// concede less, weak ones concede more.
pub fn tier_adjusted_discount(discount: f64, tier: Tier) -> f64 {
    let mult = tier.performance_mult();
    if mult > 1.0 {
        discount * 0.8
    } else if mult < 1.0 {
        discount * 1.3
    } else {
        discount
    }
}

/// Bundle items come with a 20% larger discount than their own
/// computed value.
pub fn bundle_discount(discount: f64) -> f64 {
    round2(discount * 1.2)
}

/// Seasonal price amplification: holiday season Nov-Dec, back-to-school
/// Aug-Sep.
pub fn seasonal_multiplier(date: NaiveDate, product: &Product) -> f64 {
    match date.month() {
        11 | 12 => product.seasonal_factor * 1.5,
        8 | 9 => product.seasonal_factor * 1.2,
        _ => product.seasonal_factor,
    }
}

fn regional_multiplier(region: Region, product: &Product) -> f64 {
    if product.tech {
        (region.economic_strength() + region.tech_adoption()) / 2.0
    } else {
        region.economic_strength()
    }
}

pub struct Scenario {
    rng: StdRng,
    num_records: usize,
    to_date: NaiveDate,
    pools: Pools,
    catalog: CatalogProvider,
    regions: Vec<Region>,
    channels: Vec<Channel>,
    channel_weight_idx: WeightedIndex<f64>,
}

impl Scenario {
    pub fn try_new(cfg: Config) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let pools = Pools::generate(&mut rng)?;
        let catalog = CatalogProvider::try_new()?;
        let regions = Region::iter().collect::<Vec<_>>();
        let channels = Channel::iter().collect::<Vec<_>>();
        let channel_weight_idx =
            WeightedIndex::new(channels.iter().map(|c| c.weight()))
                .map_err(|err| SalesGenError::Internal(err.to_string()))?;

        Ok(Self {
            rng,
            num_records: cfg.num_records,
            to_date: cfg.to_date,
            pools,
            catalog,
            regions,
            channels,
            channel_weight_idx,
        })
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    /// Runs the single-pass generation. Bundle transactions accumulate
    /// separately and are appended after all primary records.
    pub fn run(&mut self) -> Result<Vec<Transaction>> {
        let mut data = Vec::with_capacity(self.num_records);
        let mut bundles = Vec::new();
        let start_date = self.to_date - Duration::days(DATE_WINDOW_DAYS);

        for _ in 0..self.num_records {
            let date = start_date + Duration::days(self.rng.gen_range(0..=DATE_WINDOW_DAYS));

            let (customer, salesperson) = self.pools.sample_pair(&mut self.rng);

            let product = self.catalog.product_sample(&mut self.rng);
            let region = self.regions[self.rng.gen_range(0..self.regions.len())];
            let seasonal_mult = seasonal_multiplier(date, product);
            let segment = customer.segment;

            let unit_price = sample_unit_price(
                &mut self.rng,
                product,
                seasonal_mult,
                region,
                segment,
            );

            let base_quantity = self.catalog.quantity_sample(&mut self.rng, product);
            let quantity = amplify_quantity(&mut self.rng, base_quantity, segment);

            let sales_channel = self.channels[self.channel_weight_idx.sample(&mut self.rng)];

            let discount = sample_discount(&mut self.rng, product, sales_channel, quantity);
            let discount_percent = round2(tier_adjusted_discount(discount, salesperson.tier));

            let record = Transaction {
                id: next_uuid(&mut self.rng),
                date,
                product: product.name,
                quantity,
                unit_price,
                customer_id: customer.id,
                customer_name: customer.name.clone(),
                customer_email: customer.email.clone(),
                customer_segment: segment,
                region,
                sales_channel,
                salesperson: salesperson.name.clone(),
                salesperson_tier: salesperson.tier,
                discount_percent,
                total_amount: total_amount(quantity, unit_price, discount_percent),
            };

            let spawn_bundle = !product.bundles.is_empty()
                && self.rng.gen::<f64>() < segment.bundle_probability();
            if spawn_bundle {
                let name = product.bundles[self.rng.gen_range(0..product.bundles.len())];
                let bundle_product = self
                    .catalog
                    .get_by_name(name)
                    .ok_or_else(|| SalesGenError::Internal(format!("no product {name}")))?;

                let bundle_quantity = self.catalog.quantity_sample(&mut self.rng, bundle_product);
                // the bundle is priced under the primary's seasonal multiplier
                let bundle_price = sample_unit_price(
                    &mut self.rng,
                    bundle_product,
                    seasonal_mult,
                    region,
                    segment,
                );
                let bundle_disc = bundle_discount(sample_discount(
                    &mut self.rng,
                    bundle_product,
                    sales_channel,
                    bundle_quantity,
                ));

                bundles.push(Transaction {
                    id: next_uuid(&mut self.rng),
                    product: bundle_product.name,
                    quantity: bundle_quantity,
                    unit_price: bundle_price,
                    discount_percent: bundle_disc,
                    total_amount: total_amount(bundle_quantity, bundle_price, bundle_disc),
                    ..record.clone()
                });
            }

            data.push(record);
        }

        info!(
            "generated {} primary and {} bundle transactions",
            data.len(),
            bundles.len()
        );

        data.append(&mut bundles);
        Ok(data)
    }
}

fn next_uuid(rng: &mut StdRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

fn sample_unit_price(
    rng: &mut StdRng,
    product: &Product,
    seasonal_mult: f64,
    region: Region,
    segment: Segment,
) -> f64 {
    let (lo, hi) = product.price_range;
    let base = rng.gen_range(lo..hi);
    let adjusted = base * seasonal_mult * regional_multiplier(region, product);
    round2(adjusted * segment.avg_order_value())
}

fn amplify_quantity(rng: &mut StdRng, base: u32, segment: Segment) -> u32 {
    match segment {
        // bulk orders
        Segment::Enterprise if rng.gen::<f64>() < 0.3 => base * rng.gen_range(2..=5),
        // classroom sets
        Segment::Education if rng.gen::<f64>() < 0.4 => base * rng.gen_range(2..=3),
        _ => base,
    }
}

fn sample_discount(
    rng: &mut StdRng,
    product: &Product,
    channel: Channel,
    quantity: u32,
) -> f64 {
    let (lo, hi) = channel.discount_range();
    let mut base = rng.gen_range(lo..hi);

    if quantity >= 5 {
        base += rng.gen_range(3.0..8.0);
    } else if quantity >= 3 {
        base += rng.gen_range(1.0..5.0);
    }

    // high-value products discount less often
    let gate = if product.high_value { 0.3 } else { 0.6 };
    if rng.gen::<f64>() < gate {
        round2(base)
    } else {
        0.0
    }
}

fn total_amount(quantity: u32, unit_price: f64, discount_percent: f64) -> f64 {
    let subtotal = quantity as f64 * unit_price;
    round2(subtotal - subtotal * (discount_percent / 100.0))
}

#[cfg(test)]
mod tests {
    use common::types::Tier;

    use super::*;

    fn product(name: &str) -> &'static Product {
        crate::store::catalog::CATALOG
            .iter()
            .find(|p| p.name == name)
            .unwrap()
    }

    #[test]
    fn seasonal_windows() {
        let laptop = product("Laptop");
        let nov = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();
        let sep = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
        let may = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert_eq!(seasonal_multiplier(nov, laptop), 1.2 * 1.5);
        assert_eq!(seasonal_multiplier(sep, laptop), 1.2 * 1.2);
        assert_eq!(seasonal_multiplier(may, laptop), 1.2);
    }

    #[test]
    fn regional_multiplier_tech_vs_not() {
        let laptop = product("Laptop");
        let speaker = product("Speaker");
        // West: econ 1.3, tech 1.4
        assert!((regional_multiplier(Region::West, laptop) - 1.35).abs() < 1e-9);
        assert!((regional_multiplier(Region::West, speaker) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn tier_discount_adjustment() {
        assert!((tier_adjusted_discount(10.0, Tier::Top) - 8.0).abs() < 1e-9);
        assert!((tier_adjusted_discount(10.0, Tier::High) - 8.0).abs() < 1e-9);
        assert!((tier_adjusted_discount(10.0, Tier::Average) - 10.0).abs() < 1e-9);
        assert!((tier_adjusted_discount(10.0, Tier::Low) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn bundle_discount_is_20_percent_larger() {
        assert_eq!(bundle_discount(10.0), 12.0);
        assert_eq!(bundle_discount(7.77), 9.32);
        assert_eq!(bundle_discount(0.0), 0.0);
    }

    #[test]
    fn discount_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let laptop = product("Laptop");
        let mouse = product("Mouse");
        for _ in 0..5000 {
            for (p, q) in [(laptop, 1), (mouse, 6)] {
                let d = sample_discount(&mut rng, p, Channel::Direct, q);
                let adjusted = round2(tier_adjusted_discount(d, Tier::Low));
                assert!((0.0..100.0).contains(&adjusted));
            }
        }
    }

    #[test]
    fn total_amount_arithmetic() {
        assert_eq!(total_amount(2, 100.0, 10.0), 180.0);
        assert_eq!(total_amount(1, 99.99, 0.0), 99.99);
        assert_eq!(total_amount(3, 33.33, 5.5), 94.49);
    }

    #[test]
    fn zero_records_yield_empty_set() {
        let cfg = Config {
            num_records: 0,
            seed: 1,
            to_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        let mut scenario = Scenario::try_new(cfg).unwrap();
        assert!(scenario.run().unwrap().is_empty());
    }
}
