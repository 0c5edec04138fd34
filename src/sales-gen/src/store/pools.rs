use std::ops::Range;

use common::types::Segment;
use common::types::Tier;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::error::Result;
use crate::error::SalesGenError;

pub const MAX_CUSTOMERS: usize = 500;
pub const MAX_SALESPEOPLE: usize = 25;

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub segment: Segment,
}

#[derive(Debug, Clone)]
pub struct Salesperson {
    pub name: String,
    pub tier: Tier,
    /// Contiguous slice of the customer pool assigned to this
    /// salesperson. Ranges tile the pool, the last one absorbs the
    /// integer-division remainder.
    pub customers: Range<usize>,
}

pub struct Pools {
    pub customers: Vec<Customer>,
    pub salespeople: Vec<Salesperson>,
}

fn deterministic_uuid(rng: &mut StdRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

impl Pools {
    pub fn generate(rng: &mut StdRng) -> Result<Self> {
        let segments = Segment::iter().collect::<Vec<_>>();
        let segment_weight_idx =
            WeightedIndex::new(segments.iter().map(|s| s.weight()))
                .map_err(|err| SalesGenError::Internal(err.to_string()))?;

        let mut customers = Vec::with_capacity(MAX_CUSTOMERS);
        for _ in 0..MAX_CUSTOMERS {
            let segment = segments[segment_weight_idx.sample(rng)];
            customers.push(Customer {
                id: deterministic_uuid(rng),
                name: Name().fake_with_rng(rng),
                email: SafeEmail().fake_with_rng(rng),
                segment,
            });
        }

        // floored tier proportions, average absorbs the remainder
        let top = (MAX_SALESPEOPLE as f64 * Tier::Top.weight()) as usize;
        let high = (MAX_SALESPEOPLE as f64 * Tier::High.weight()) as usize;
        let low = (MAX_SALESPEOPLE as f64 * Tier::Low.weight()) as usize;
        let average = MAX_SALESPEOPLE - top - high - low;

        let tiers = [Tier::Top, Tier::High, Tier::Low, Tier::Average]
            .into_iter()
            .zip([top, high, low, average]);

        let mut salespeople = Vec::with_capacity(MAX_SALESPEOPLE);
        for (tier, count) in tiers {
            for _ in 0..count {
                let base_name: String = Name().fake_with_rng(rng);
                salespeople.push(Salesperson {
                    name: format!("{base_name}{}", tier.name_suffix()),
                    tier,
                    customers: 0..0,
                });
            }
        }

        let per_salesperson = customers.len() / salespeople.len();
        let last = salespeople.len() - 1;
        for (i, salesperson) in salespeople.iter_mut().enumerate() {
            let start = i * per_salesperson;
            let end = if i == last {
                customers.len()
            } else {
                start + per_salesperson
            };
            salesperson.customers = start..end;
        }

        Ok(Self {
            customers,
            salespeople,
        })
    }

    /// The two-stage draw: uniform salesperson, then uniform customer
    /// within their roster. Customers of smaller rosters are
    /// overrepresented on purpose.
    pub fn sample_pair(&self, rng: &mut StdRng) -> (&Customer, &Salesperson) {
        let salesperson = &self.salespeople[rng.gen_range(0..self.salespeople.len())];
        let customer_idx = rng.gen_range(salesperson.customers.clone());
        (&self.customers[customer_idx], salesperson)
    }
}
