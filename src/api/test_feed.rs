//! Implements the `Feed` trait using an in-memory document for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without reaching the network.

use crate::api::http_feed::decode;
use crate::api::Feed;
use crate::error::Res;
use crate::model::NewTransaction;

/// An implementation of the `Feed` trait that serves a JSON document held in memory. By default
/// it holds a small set of sample records.
pub(crate) struct TestFeed {
    document: String,
}

impl TestFeed {
    pub(crate) fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl Default for TestFeed {
    fn default() -> Self {
        Self::new(SAMPLE_FEED)
    }
}

#[async_trait::async_trait]
impl Feed for TestFeed {
    async fn fetch(&self) -> Res<Vec<NewTransaction>> {
        decode(self.document.as_bytes())
    }
}

/// Sample records in the shape of the live feed.
const SAMPLE_FEED: &str = r##"[
  {"id": 1, "title": "Fjallraven Foldsack No. 1 Backpack", "price": 329.85,
   "description": "Your perfect pack for everyday use and walks in the forest.",
   "category": "men's clothing", "image": "https://example.com/img/1.jpg",
   "sold": false, "dateOfSale": "2021-11-27T20:29:54+05:30"},
  {"id": 2, "title": "Mens Casual Premium Slim Fit T-Shirts", "price": 44.6,
   "description": "Slim-fitting style, contrast raglan long sleeve.",
   "category": "men's clothing", "image": "https://example.com/img/2.jpg",
   "sold": false, "dateOfSale": "2021-10-27T20:29:54+05:30"},
  {"id": 3, "title": "Mens Cotton Jacket", "price": 615.89,
   "description": "Great outerwear jackets for Spring, Autumn and Winter.",
   "category": "men's clothing", "image": "https://example.com/img/3.jpg",
   "sold": true, "dateOfSale": "2022-07-27T20:29:54+05:30"},
  {"id": 4, "title": "Mens Casual Slim Fit", "price": 31.98,
   "description": "The color could be slightly different between on the screen and in practice.",
   "category": "men's clothing", "image": "https://example.com/img/4.jpg",
   "sold": false, "dateOfSale": "2021-12-27T20:29:54+05:30"},
  {"id": 5, "title": "John Hardy Women's Legends Naga Bracelet", "price": 6950,
   "description": "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
   "category": "jewelery", "image": "https://example.com/img/5.jpg",
   "sold": false, "dateOfSale": "2022-03-27T20:29:54+05:30"},
  {"id": 6, "title": "Solid Gold Petite Micropave", "price": 168,
   "description": "Satisfaction Guaranteed. Return or exchange any order within 30 days.",
   "category": "jewelery", "image": "https://example.com/img/6.jpg",
   "sold": true, "dateOfSale": "2022-03-27T20:29:54+05:30"},
  {"id": 7, "title": "White Gold Plated Princess", "price": 9.99,
   "description": "Classic Created Wedding Engagement Solitaire Diamond Promise Ring.",
   "category": "jewelery", "image": "https://example.com/img/7.jpg",
   "sold": true, "dateOfSale": "2022-05-27T20:29:54+05:30"},
  {"id": 8, "title": "WD 2TB Elements Portable External Hard Drive", "price": 64,
   "description": "USB 3.0 and USB 2.0 compatibility, fast data transfers.",
   "category": "electronics", "image": "https://example.com/img/8.jpg",
   "sold": true, "dateOfSale": "2022-05-27T20:29:54+05:30"},
  {"id": 9, "title": "SanDisk SSD PLUS 1TB Internal SSD", "price": 109,
   "description": "Easy upgrade for faster boot up, shutdown, application load and response.",
   "category": "electronics", "image": "https://example.com/img/9.jpg",
   "sold": false, "dateOfSale": "2021-05-27T20:29:54+05:30"},
  {"id": 10, "title": "Samsung 49-Inch Curved Gaming Monitor", "price": 999.99,
   "description": "49 inch super ultrawide 32:9 curved gaming monitor.",
   "category": "electronics", "image": "https://example.com/img/10.jpg",
   "sold": true, "dateOfSale": "2022-06-27T20:29:54+05:30"},
  {"id": 11, "title": "Rain Jacket Women Windbreaker", "price": 39.99,
   "description": "Lightweight perfect for trip or casual wear.",
   "category": "women's clothing", "image": "https://example.com/img/11.jpg",
   "sold": false, "dateOfSale": "2022-09-27T20:29:54+05:30"},
  {"id": 12, "title": "DANVOUY Womens T Shirt Casual Cotton Short", "price": 12.99,
   "description": "95% Cotton, 5% Spandex. Features: Casual, Short Sleeve, Letter Print.",
   "category": "women's clothing", "image": "https://example.com/img/12.jpg",
   "sold": true, "dateOfSale": "2022-03-27T20:29:54+05:30"}
]"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Month;

    #[tokio::test]
    async fn test_sample_feed_decodes() {
        let records = TestFeed::default().fetch().await.unwrap();
        assert_eq!(records.len(), 12);
        assert!(records.iter().all(|r| r.id.is_some() && r.sale_month().is_some()));
        let march = Month::new(3).unwrap();
        let in_march = records
            .iter()
            .filter(|r| r.sale_month() == Some(march))
            .count();
        assert_eq!(in_march, 3);
    }

    #[tokio::test]
    async fn test_malformed_document_fails() {
        assert!(TestFeed::new("[{").fetch().await.is_err());
    }
}
