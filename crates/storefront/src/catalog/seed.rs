//! Demo catalog used by local runs, the home preview and tests.

use chrono::{DateTime, Utc};
use faucet_store_core::{Category, Price, Product, ProductDraft, ProductId};

const IMAGE_BASE: &str = "https://images.unsplash.com/photo-1584622";

/// Product ids featured in the home page preview.
pub const PREVIEW_IDS: [&str; 3] = ["k1", "k2", "b1"];

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    minor: u32,
    image: &'static str,
    description: &'static str,
    category: Category,
}

const SEED: [SeedProduct; 12] = [
    SeedProduct {
        id: "k1",
        name: "Modern Kitchen Faucet",
        minor: 19_999,
        image: "650111-993a426fbf0a",
        description: "Contemporary single-lever kitchen faucet with pull-out spray head",
        category: Category::Kitchen,
    },
    SeedProduct {
        id: "k2",
        name: "Industrial Kitchen Faucet",
        minor: 29_999,
        image: "781860-6d1a0d0c9c0c",
        description: "High-pressure faucet for professional kitchens",
        category: Category::Kitchen,
    },
    SeedProduct {
        id: "k3",
        name: "Corner Kitchen Faucet",
        minor: 24_999,
        image: "781860-6d1a0d0c9c0d",
        description: "Faucet designed for corner sinks",
        category: Category::Kitchen,
    },
    SeedProduct {
        id: "b1",
        name: "Classic Bathroom Faucet",
        minor: 14_999,
        image: "781860-6d1a0d0c9c0a",
        description: "Traditional two-handle bathroom faucet with ceramic disc valves",
        category: Category::Bathroom,
    },
    SeedProduct {
        id: "b2",
        name: "Modern Bathroom Faucet",
        minor: 17_999,
        image: "781860-6d1a0d0c9c0e",
        description: "Single-lever bathroom faucet with LED lighting",
        category: Category::Bathroom,
    },
    SeedProduct {
        id: "b3",
        name: "Thermostatic Bathroom Faucet",
        minor: 29_999,
        image: "781860-6d1a0d0c9c0f",
        description: "Thermostatic faucet holding a constant temperature",
        category: Category::Bathroom,
    },
    SeedProduct {
        id: "d1",
        name: "Wall-Mounted Shower System",
        minor: 29_999,
        image: "781860-6d1a0d0c9c0b",
        description: "Complete shower system with rain head and hand shower",
        category: Category::Shower,
    },
    SeedProduct {
        id: "d2",
        name: "Ceiling Shower System",
        minor: 39_999,
        image: "781860-6d1a0d0c9c0g",
        description: "Luxury ceiling-mounted rain shower",
        category: Category::Shower,
    },
    SeedProduct {
        id: "d3",
        name: "Hydromassage Shower System",
        minor: 59_999,
        image: "781860-6d1a0d0c9c0h",
        description: "Multi-head shower system with hydromassage jets",
        category: Category::Shower,
    },
    SeedProduct {
        id: "a1",
        name: "Faucet Filter",
        minor: 4_999,
        image: "781860-6d1a0d0c9c0i",
        description: "Activated carbon filter for better water quality",
        category: Category::Accessories,
    },
    SeedProduct {
        id: "a2",
        name: "Shower Caddy",
        minor: 2_999,
        image: "781860-6d1a0d0c9c0j",
        description: "Stainless steel shower caddy set",
        category: Category::Accessories,
    },
    SeedProduct {
        id: "a3",
        name: "Faucet Aerator",
        minor: 1_999,
        image: "781860-6d1a0d0c9c0k",
        description: "Water-saving faucet aerator",
        category: Category::Accessories,
    },
];

/// The twelve demo products, three per category.
#[must_use]
pub fn demo_products() -> Vec<Product> {
    let created = DateTime::<Utc>::UNIX_EPOCH;
    SEED.iter()
        .map(|seed| {
            ProductDraft {
                name: seed.name.to_owned(),
                price: Price::from_minor(seed.minor),
                image: Some(format!(
                    "{IMAGE_BASE}{}?auto=format&fit=crop&w=500&q=60",
                    seed.image
                )),
                description: seed.description.to_owned(),
                category: seed.category,
                details: None,
                specs: None,
                stock: None,
                active: true,
            }
            .into_product(ProductId::new(seed.id), created)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_products_per_category() {
        let products = demo_products();
        for category in Category::ALL {
            assert_eq!(
                products.iter().filter(|p| p.category == category).count(),
                3,
                "{category:?}"
            );
        }
    }

    #[test]
    fn test_preview_ids_exist() {
        let products = demo_products();
        for id in PREVIEW_IDS {
            assert!(products.iter().any(|p| p.id.as_str() == id));
        }
    }
}
