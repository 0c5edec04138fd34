use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::error::SalesGenError;

/// Shape of the per-category quantity distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityProfile {
    /// Laptops, desktops, tablets, smartphones.
    Computer,
    /// Monitors and printers, bought in moderate bulk.
    ModerateBulk,
    /// Small accessories, up to classroom-size counts.
    Accessory,
}

impl QuantityProfile {
    fn support(&self) -> &'static [u32] {
        match self {
            QuantityProfile::Computer => &[1, 2, 3],
            QuantityProfile::ModerateBulk => &[1, 2, 3, 4],
            QuantityProfile::Accessory => &[1, 2, 3, 4, 5, 6],
        }
    }

    fn probabilities(&self) -> &'static [f64] {
        match self {
            QuantityProfile::Computer => &[0.8, 0.15, 0.05],
            QuantityProfile::ModerateBulk => &[0.7, 0.2, 0.08, 0.02],
            QuantityProfile::Accessory => &[0.4, 0.3, 0.15, 0.08, 0.05, 0.02],
        }
    }
}

#[derive(Debug)]
pub struct Product {
    pub name: &'static str,
    pub price_range: (f64, f64),
    pub weight: f64,
    pub seasonal_factor: f64,
    pub quantity_profile: QuantityProfile,
    /// Tech products are priced with the regional tech-adoption factor
    /// averaged into the economic one.
    pub tech: bool,
    /// High-value products receive a discount less often.
    pub high_value: bool,
    /// Products customers often buy together with this one.
    pub bundles: &'static [&'static str],
}

pub static CATALOG: &[Product] = &[
    Product {
        name: "Laptop",
        price_range: (800.0, 2500.0),
        weight: 0.15,
        seasonal_factor: 1.2,
        quantity_profile: QuantityProfile::Computer,
        tech: true,
        high_value: true,
        bundles: &["Mouse", "Keyboard", "Headphones"],
    },
    Product {
        name: "Desktop",
        price_range: (600.0, 1800.0),
        weight: 0.08,
        seasonal_factor: 1.0,
        quantity_profile: QuantityProfile::Computer,
        tech: true,
        high_value: true,
        bundles: &["Monitor", "Keyboard", "Mouse"],
    },
    Product {
        name: "Monitor",
        price_range: (200.0, 800.0),
        weight: 0.12,
        seasonal_factor: 1.1,
        quantity_profile: QuantityProfile::ModerateBulk,
        tech: false,
        high_value: false,
        bundles: &[],
    },
    Product {
        name: "Keyboard",
        price_range: (30.0, 200.0),
        weight: 0.18,
        seasonal_factor: 1.0,
        quantity_profile: QuantityProfile::Accessory,
        tech: false,
        high_value: false,
        bundles: &[],
    },
    Product {
        name: "Mouse",
        price_range: (20.0, 150.0),
        weight: 0.19,
        seasonal_factor: 1.0,
        quantity_profile: QuantityProfile::Accessory,
        tech: false,
        high_value: false,
        bundles: &[],
    },
    Product {
        name: "Headphones",
        price_range: (50.0, 400.0),
        weight: 0.15,
        seasonal_factor: 1.3,
        quantity_profile: QuantityProfile::Accessory,
        tech: false,
        high_value: false,
        bundles: &[],
    },
    Product {
        name: "Tablet",
        price_range: (300.0, 1200.0),
        weight: 0.10,
        seasonal_factor: 1.4,
        quantity_profile: QuantityProfile::Computer,
        tech: true,
        high_value: false,
        bundles: &["Keyboard", "Headphones"],
    },
    Product {
        name: "Smartphone",
        price_range: (400.0, 1500.0),
        weight: 0.12,
        seasonal_factor: 1.5,
        quantity_profile: QuantityProfile::Computer,
        tech: true,
        high_value: true,
        bundles: &["Headphones", "Speaker"],
    },
    Product {
        name: "Printer",
        price_range: (150.0, 600.0),
        weight: 0.06,
        seasonal_factor: 0.9,
        quantity_profile: QuantityProfile::ModerateBulk,
        tech: false,
        high_value: false,
        bundles: &[],
    },
    Product {
        name: "Webcam",
        price_range: (40.0, 250.0),
        weight: 0.08,
        seasonal_factor: 1.2,
        quantity_profile: QuantityProfile::Accessory,
        tech: true,
        high_value: false,
        bundles: &["Headphones", "Speaker"],
    },
    Product {
        name: "Speaker",
        price_range: (80.0, 500.0),
        weight: 0.10,
        seasonal_factor: 1.1,
        quantity_profile: QuantityProfile::Accessory,
        tech: false,
        high_value: false,
        bundles: &[],
    },
    Product {
        name: "Router",
        price_range: (100.0, 400.0),
        weight: 0.05,
        seasonal_factor: 1.0,
        quantity_profile: QuantityProfile::Accessory,
        tech: false,
        high_value: false,
        bundles: &[],
    },
];

pub struct CatalogProvider {
    product_weight_idx: WeightedIndex<f64>,
    computer_qty_idx: WeightedIndex<f64>,
    moderate_qty_idx: WeightedIndex<f64>,
    accessory_qty_idx: WeightedIndex<f64>,
}

impl CatalogProvider {
    pub fn try_new() -> Result<Self> {
        let weights = CATALOG.iter().map(|p| p.weight).collect::<Vec<_>>();
        let product_weight_idx = WeightedIndex::new(weights)
            .map_err(|err| SalesGenError::Internal(err.to_string()))?;
        let computer_qty_idx = WeightedIndex::new(QuantityProfile::Computer.probabilities())
            .map_err(|err| SalesGenError::Internal(err.to_string()))?;
        let moderate_qty_idx = WeightedIndex::new(QuantityProfile::ModerateBulk.probabilities())
            .map_err(|err| SalesGenError::Internal(err.to_string()))?;
        let accessory_qty_idx = WeightedIndex::new(QuantityProfile::Accessory.probabilities())
            .map_err(|err| SalesGenError::Internal(err.to_string()))?;

        Ok(Self {
            product_weight_idx,
            computer_qty_idx,
            moderate_qty_idx,
            accessory_qty_idx,
        })
    }

    /// Weighted pick over the catalog's market-share weights.
    pub fn product_sample(&self, rng: &mut StdRng) -> &'static Product {
        &CATALOG[self.product_weight_idx.sample(rng)]
    }

    pub fn get_by_name(&self, name: &str) -> Option<&'static Product> {
        CATALOG.iter().find(|p| p.name == name)
    }

    /// Base quantity draw from the product's category distribution.
    pub fn quantity_sample(&self, rng: &mut StdRng, product: &Product) -> u32 {
        let idx = match product.quantity_profile {
            QuantityProfile::Computer => self.computer_qty_idx.sample(rng),
            QuantityProfile::ModerateBulk => self.moderate_qty_idx.sample(rng),
            QuantityProfile::Accessory => self.accessory_qty_idx.sample(rng),
        };
        product.quantity_profile.support()[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shape() {
        assert_eq!(CATALOG.len(), 12);
        for p in CATALOG {
            assert!(p.price_range.0 < p.price_range.1);
            assert!(p.weight > 0.0);
            for b in p.bundles {
                assert!(
                    CATALOG.iter().any(|c| c.name == *b),
                    "bundle target {b} not in catalog"
                );
            }
        }
    }

    #[test]
    fn quantity_profiles_normalized() {
        for profile in [
            QuantityProfile::Computer,
            QuantityProfile::ModerateBulk,
            QuantityProfile::Accessory,
        ] {
            assert_eq!(profile.support().len(), profile.probabilities().len());
            let sum: f64 = profile.probabilities().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn quantity_sample_within_support() {
        let provider = CatalogProvider::try_new().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let laptop = provider.get_by_name("Laptop").unwrap();
        for _ in 0..100 {
            let q = provider.quantity_sample(&mut rng, laptop);
            assert!((1..=3).contains(&q));
        }
    }
}
