//! Placeholder catalog used when neither the sheet nor a snapshot is available
//!
//! Output is deterministic for a given seed so tests can pin it down.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ProductRecord;

/// Image shown for every generated record
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300";

/// Categories and the base names drawn for each
static CATEGORIES: [(&str, [&str; 5]); 5] = [
    (
        "Headphones",
        ["JBL Bluetooth Headset", "Sony Headphones", "Beats Headphones", "Bose Headphones", "AirPods"],
    ),
    (
        "Chargers",
        ["Samsung Fast Charger", "iPhone Charger", "Wireless Charger", "Power Bank", "Car Charger"],
    ),
    (
        "Cables",
        ["USB-C Cable", "Lightning Cable", "Micro USB Cable", "HDMI Cable", "AUX Cable"],
    ),
    (
        "Screen Protectors",
        ["iPhone Screen Guard", "Samsung Screen Guard", "Camera Lens Guard", "Protective Case", "Back Film"],
    ),
    (
        "Accessories",
        ["Car Phone Mount", "Desk Stand", "Phone Grip", "Laptop Bag", "Wireless Mouse"],
    ),
];

/// Generates `count` placeholder records with ids `1..=count`
///
/// The first `featured` records are marked featured. With `seed` the output is
/// reproducible; without it the generator draws from OS entropy.
pub fn generate(count: usize, featured: usize, seed: Option<u64>) -> Vec<ProductRecord> {
    let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    (1..=count)
        .map(|index| {
            let (category, names) = &CATEGORIES[rng.random_range(0..CATEGORIES.len())];
            let base_name = names[rng.random_range(0..names.len())];
            // Prices land on a 250-unit grid between 2,500 and 50,000.
            let price = rng.random_range(10..=200u64) * 250;

            ProductRecord {
                id: index as u64,
                name: format!("{base_name} - Sample {index}"),
                category: (*category).to_string(),
                price,
                description: format!("Placeholder {} item", category.to_lowercase()),
                image_url: PLACEHOLDER_IMAGE.to_string(),
                stock: rng.random_range(0..=50),
                featured: index <= featured,
                popularity: 0,
                extra: Default::default(),
            }
        })
        .collect()
}
