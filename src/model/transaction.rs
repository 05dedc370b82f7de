use crate::model::Month;
use serde::{Deserialize, Deserializer, Serialize};

/// A single product-sale record as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) price: Option<f64>,
    pub(crate) date_of_sale: Option<String>,
    pub(crate) sold: Option<bool>,
    pub(crate) category: Option<String>,
}

impl Transaction {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn date_of_sale(&self) -> Option<&str> {
        self.date_of_sale.as_deref()
    }

    pub fn sold(&self) -> Option<bool> {
        self.sold
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// A record as delivered by the seed feed, before the store has accepted it.
///
/// The feed uses camelCase keys. Keys this crate has no column for (e.g. `image`) are ignored.
/// A `price` that is neither a number nor a numeric string is kept as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub(crate) id: Option<i64>,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub(crate) price: Option<f64>,
    #[serde(default)]
    pub(crate) date_of_sale: Option<String>,
    #[serde(default)]
    pub(crate) sold: Option<bool>,
    #[serde(default)]
    pub(crate) category: Option<String>,
}

impl NewTransaction {
    /// The month the sale falls in, `None` when the date is missing or unparseable. Such records
    /// are never matched by a month filter.
    pub fn sale_month(&self) -> Option<Month> {
        self.date_of_sale.as_deref().and_then(Month::of_date)
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_from_feed_json() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven  - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 329.85,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;
        let t: NewTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, Some(1));
        assert_eq!(t.price, Some(329.85));
        assert_eq!(t.sold, Some(false));
        assert_eq!(t.category.as_deref(), Some("men's clothing"));
        assert_eq!(t.sale_month().unwrap().number(), 11);
    }

    #[test]
    fn test_new_transaction_lenient_price() {
        let t: NewTransaction = serde_json::from_str(r#"{"price": "12.5"}"#).unwrap();
        assert_eq!(t.price, Some(12.5));
        let t: NewTransaction = serde_json::from_str(r#"{"price": "cheap"}"#).unwrap();
        assert_eq!(t.price, None);
        let t: NewTransaction = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(t.price, None);
        let t: NewTransaction = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(t.price, None);
        assert!(t.sale_month().is_none());
    }

    #[test]
    fn test_transaction_serializes_camel_case() {
        let t = Transaction {
            id: 7,
            title: "Mug".into(),
            description: "A mug".into(),
            price: Some(9.5),
            date_of_sale: Some("2022-05-01".into()),
            sold: Some(true),
            category: Some("kitchen".into()),
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["dateOfSale"], "2022-05-01");
        assert_eq!(v["sold"], true);
        assert_eq!(v["price"], 9.5);
    }
}
