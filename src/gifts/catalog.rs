use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// A product that can be placed in a gift bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
    pub description: String,
}

impl CatalogItem {
    pub fn new(id: u32, name: &str, cents: i64, image: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            image_url: format!("https://via.placeholder.com/300?text={}", image),
            description: description.to_string(),
        }
    }
}

/// A titled group of catalog items with their combined price.
///
/// `total_price` is kept equal to the 2-dp rounded sum of `items`; the only
/// way to change the item set is through methods that recompute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    title: String,
    items: Vec<CatalogItem>,
    #[serde(with = "rust_decimal::serde::float")]
    total_price: Decimal,
}

impl Bundle {
    pub fn new(title: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        let total_price = rounded_total(&items);
        Self {
            title: title.into(),
            items,
            total_price,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes the priciest item (the last one on ties) and returns it.
    pub(crate) fn drop_most_expensive(&mut self) -> Option<CatalogItem> {
        let (index, _) = self
            .items
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.price.cmp(&b.price))?;
        let removed = self.items.remove(index);
        self.total_price = rounded_total(&self.items);
        Some(removed)
    }
}

pub fn rounded_total(items: &[CatalogItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price)
        .sum::<Decimal>()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Hand-authored bundle: a title plus catalog ids, in display order.
#[derive(Debug)]
pub struct Template {
    pub title: &'static str,
    pub item_ids: &'static [u32],
}

/// Templates offered when every keyword appears in the prompt.
#[derive(Debug)]
pub struct CuratedRule {
    pub keywords: &'static [&'static str],
    pub templates: &'static [Template],
}

impl CuratedRule {
    /// `prompt` must already be lower-cased.
    pub fn matches(&self, prompt: &str) -> bool {
        !self.keywords.is_empty() && self.keywords.iter().all(|k| prompt.contains(k))
    }
}

pub static CURATED_RULES: &[CuratedRule] = &[
    CuratedRule {
        keywords: &["sister", "birthday"],
        templates: &[
            Template {
                title: "Stylish Birthday Picks",
                item_ids: &[1, 2, 3],
            },
            Template {
                title: "Fragrance & Fashion",
                item_ids: &[4, 5, 6],
            },
        ],
    },
    CuratedRule {
        keywords: &["mom", "birthday"],
        templates: &[
            Template {
                title: "Pamper Mom",
                item_ids: &[13, 14, 15],
            },
            Template {
                title: "Kitchen Favorites",
                item_ids: &[16, 17, 18],
            },
        ],
    },
    CuratedRule {
        keywords: &["dad", "tech"],
        templates: &[
            Template {
                title: "Gadget Starter",
                item_ids: &[19, 20, 21],
            },
            Template {
                title: "Desk Upgrade",
                item_ids: &[22, 23, 24],
            },
        ],
    },
];

/// Read-only product table plus the curated rules that point into it.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    rules: &'static [CuratedRule],
}

static BUILTIN: Lazy<Arc<Catalog>> =
    Lazy::new(|| Arc::new(Catalog::new(builtin_items(), CURATED_RULES)));

impl Catalog {
    pub fn new(items: Vec<CatalogItem>, rules: &'static [CuratedRule]) -> Self {
        Self { items, rules }
    }

    /// Process-wide compiled-in catalog.
    pub fn builtin() -> Arc<Catalog> {
        Arc::clone(&BUILTIN)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn rule_for(&self, prompt: &str) -> Option<&'static CuratedRule> {
        let prompt = prompt.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&prompt))
    }

    /// Resolves a template to a bundle. Ids missing from the table are skipped.
    pub fn bundle_from(&self, template: &Template) -> Bundle {
        let items = template
            .item_ids
            .iter()
            .filter_map(|id| self.get(*id).cloned())
            .collect();
        Bundle::new(template.title, items)
    }
}

fn builtin_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(
            1,
            "Women's Sneakers",
            4999,
            "Sneakers",
            "Comfortable sneakers perfect for running errands or workouts.",
        ),
        CatalogItem::new(
            2,
            "Leather Crossbody Bag",
            8999,
            "Crossbody+Bag",
            "Soft vegan-leather bag with an adjustable strap.",
        ),
        CatalogItem::new(
            3,
            "Silk Scrunchie Set",
            999,
            "Scrunchies",
            "Set of five silk scrunchies in pastel shades.",
        ),
        CatalogItem::new(
            4,
            "Floral Eau de Parfum",
            6499,
            "Parfum",
            "Light floral fragrance with notes of peony and pear.",
        ),
        CatalogItem::new(
            5,
            "Silk Scarf",
            2499,
            "Scarf",
            "Printed silk scarf that doubles as a hair wrap.",
        ),
        CatalogItem::new(
            6,
            "Gold Hoop Earrings",
            3499,
            "Earrings",
            "Lightweight 14k gold-plated hoops.",
        ),
        CatalogItem::new(
            7,
            "Wireless Headphones",
            5999,
            "Headphones",
            "Bluetooth headphones with noise cancellation and long battery life.",
        ),
        CatalogItem::new(
            8,
            "Yoga Mat",
            1999,
            "Yoga+Mat",
            "Non-slip yoga mat providing excellent grip for daily practice.",
        ),
        CatalogItem::new(
            9,
            "Blender",
            2999,
            "Blender",
            "High-speed blender ideal for smoothies and sauces.",
        ),
        CatalogItem::new(
            10,
            "Chocolate Cookies",
            299,
            "Cookies",
            "Rich chocolate chip cookies baked to perfection.",
        ),
        CatalogItem::new(
            11,
            "Action Figure",
            1499,
            "Action+Figure",
            "Collectible action figure with movable joints and accessories.",
        ),
        CatalogItem::new(
            12,
            "Comforter Set",
            7999,
            "Comforter",
            "Plush queen-size comforter set to keep you cozy all night.",
        ),
        CatalogItem::new(
            13,
            "Scented Candle Trio",
            1899,
            "Candles",
            "Three soy candles: lavender, vanilla and cedar.",
        ),
        CatalogItem::new(
            14,
            "Bath Bomb Gift Box",
            2299,
            "Bath+Bombs",
            "Twelve handmade bath bombs with essential oils.",
        ),
        CatalogItem::new(
            15,
            "Plush Robe",
            4499,
            "Robe",
            "Ultra-soft fleece robe with deep pockets.",
        ),
        CatalogItem::new(
            16,
            "Chef's Knife",
            3999,
            "Knife",
            "8-inch stainless steel chef's knife.",
        ),
        CatalogItem::new(
            17,
            "Cast Iron Skillet",
            2799,
            "Skillet",
            "Pre-seasoned 10-inch cast iron skillet.",
        ),
        CatalogItem::new(
            18,
            "Herb Garden Kit",
            2199,
            "Herb+Kit",
            "Grow basil, mint and parsley on a sunny windowsill.",
        ),
        CatalogItem::new(
            19,
            "Smartwatch",
            14999,
            "Smartwatch",
            "Fitness tracking, notifications and a week of battery.",
        ),
        CatalogItem::new(
            20,
            "Portable Charger",
            2499,
            "Charger",
            "10,000 mAh power bank with USB-C fast charging.",
        ),
        CatalogItem::new(
            21,
            "Bluetooth Speaker",
            3999,
            "Speaker",
            "Waterproof speaker with 12-hour playtime.",
        ),
        CatalogItem::new(
            22,
            "Mechanical Keyboard",
            7999,
            "Keyboard",
            "Tenkeyless keyboard with hot-swappable switches.",
        ),
        CatalogItem::new(
            23,
            "Ergonomic Mouse",
            2999,
            "Mouse",
            "Vertical wireless mouse that eases wrist strain.",
        ),
        CatalogItem::new(
            24,
            "Monitor Light Bar",
            4599,
            "Light+Bar",
            "Glare-free desk lighting that clips onto any monitor.",
        ),
        CatalogItem::new(
            25,
            "Coffee Sampler",
            1699,
            "Coffee",
            "Four single-origin coffees, whole bean.",
        ),
        CatalogItem::new(
            26,
            "Insulated Tumbler",
            2499,
            "Tumbler",
            "Keeps drinks cold for 24 hours or hot for 12.",
        ),
        CatalogItem::new(
            27,
            "Photo Frame",
            1299,
            "Frame",
            "Solid oak frame for 5x7 prints.",
        ),
        CatalogItem::new(
            28,
            "Strategy Board Game",
            3299,
            "Board+Game",
            "Two to four players, about an hour per game.",
        ),
        CatalogItem::new(
            29,
            "Fuzzy Socks",
            899,
            "Socks",
            "Three pairs of cozy sherpa-lined socks.",
        ),
        CatalogItem::new(
            30,
            "Jigsaw Puzzle",
            1799,
            "Puzzle",
            "1000-piece puzzle of a coastal village.",
        ),
    ]
}
