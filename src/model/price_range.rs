//! The fixed price buckets used by the bar chart.

use serde::Serialize;

/// One price bucket of the bar chart.
///
/// Buckets are labelled with inclusive whole-number bounds (`101-200`). A price belongs to a
/// bucket when it is greater than the previous bucket's `max` and no greater than its own `max`,
/// so whole-number prices land exactly where the label says and a fractional price between two
/// labels (e.g. `100.5`) falls into the next bucket. Together the buckets cover every price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    label: &'static str,
    min: u32,
    max: Option<u32>,
}

/// The ten buckets, in chart order.
pub static PRICE_RANGES: [PriceRange; 10] = [
    PriceRange::new("0-100", 0, Some(100)),
    PriceRange::new("101-200", 101, Some(200)),
    PriceRange::new("201-300", 201, Some(300)),
    PriceRange::new("301-400", 301, Some(400)),
    PriceRange::new("401-500", 401, Some(500)),
    PriceRange::new("501-600", 501, Some(600)),
    PriceRange::new("601-700", 601, Some(700)),
    PriceRange::new("701-800", 701, Some(800)),
    PriceRange::new("801-900", 801, Some(900)),
    PriceRange::new("901-above", 901, None),
];

impl PriceRange {
    const fn new(label: &'static str, min: u32, max: Option<u32>) -> Self {
        Self { label, min, max }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The smallest whole-number price in the bucket.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// The largest whole-number price in the bucket, `None` for the open-ended last bucket.
    pub fn max(&self) -> Option<u32> {
        self.max
    }

    /// Prices must be strictly greater than this. `None` for the first bucket, which takes
    /// everything up to its `max`.
    pub fn exclusive_floor(&self) -> Option<f64> {
        match self.min {
            0 => None,
            min => Some(f64::from(min - 1)),
        }
    }

    /// Prices must be no greater than this. `None` for the last bucket.
    pub fn inclusive_ceiling(&self) -> Option<f64> {
        self.max.map(f64::from)
    }

    /// Whether `price` falls in this bucket.
    pub fn contains(&self, price: f64) -> bool {
        let above_floor = self.exclusive_floor().map_or(true, |floor| price > floor);
        let below_ceiling = self.inclusive_ceiling().map_or(true, |ceil| price <= ceil);
        above_floor && below_ceiling
    }

    /// Finds the bucket for `price`.
    pub fn for_price(price: f64) -> Option<&'static PriceRange> {
        PRICE_RANGES.iter().find(|r| r.contains(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(PriceRange::for_price(0.0).unwrap().label(), "0-100");
        assert_eq!(PriceRange::for_price(100.0).unwrap().label(), "0-100");
        assert_eq!(PriceRange::for_price(101.0).unwrap().label(), "101-200");
        assert_eq!(PriceRange::for_price(200.0).unwrap().label(), "101-200");
        assert_eq!(PriceRange::for_price(900.0).unwrap().label(), "801-900");
        assert_eq!(PriceRange::for_price(901.0).unwrap().label(), "901-above");
        assert_eq!(PriceRange::for_price(99999.0).unwrap().label(), "901-above");
    }

    #[test]
    fn test_fractional_price_between_labels() {
        assert_eq!(PriceRange::for_price(100.5).unwrap().label(), "101-200");
        assert_eq!(PriceRange::for_price(900.01).unwrap().label(), "901-above");
        assert_eq!(PriceRange::for_price(44.6).unwrap().label(), "0-100");
    }

    #[test]
    fn test_every_price_in_exactly_one_bucket() {
        let mut price = 0.0;
        while price < 1200.0 {
            let matches = PRICE_RANGES.iter().filter(|r| r.contains(price)).count();
            assert_eq!(matches, 1, "price {price} matched {matches} buckets");
            price += 0.25;
        }
    }

    #[test]
    fn test_ranges_are_ordered_and_contiguous() {
        assert_eq!(PRICE_RANGES.len(), 10);
        for pair in PRICE_RANGES.windows(2) {
            assert_eq!(pair[0].max().unwrap() + 1, pair[1].min());
        }
        assert!(PRICE_RANGES[9].max().is_none());
        assert!(PRICE_RANGES[0].exclusive_floor().is_none());
    }
}
