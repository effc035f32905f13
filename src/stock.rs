/// Stock images shown when the recipient has no photo of their own

use rand::seq::IndexedRandom;
use rand::Rng;
use url::Url;

/// Built-in stock image pool.
pub const STOCK_IMAGES: [&str; 5] = [
    "https://images.unsplash.com/photo-1530103862676-de8c9debad1d?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1558636508-e0db3814bd1d?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1464349095431-e9a21285b5f3?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1513542789411-b6d5d05985c9?w=600&h=400&fit=crop",
    "https://images.unsplash.com/photo-1527529482837-4698179dc6ce?w=600&h=400&fit=crop",
];

/// The built-in pool as parsed URLs.
pub fn default_stock_images() -> Vec<Url> {
    STOCK_IMAGES.iter().filter_map(|s| Url::parse(s).ok()).collect()
}

/// Pick one image uniformly at random. Returns `None` for an empty pool.
pub fn pick_stock_image<'a, R: Rng + ?Sized>(pool: &'a [Url], rng: &mut R) -> Option<&'a Url> {
    pool.choose(rng)
}
