// src/client/query.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Age,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Rent,
    Sale,
}

impl OrderBy {
    fn as_str(self) -> &'static str {
        match self {
            OrderBy::Age => "age",
            OrderBy::Price => "price",
        }
    }
}

impl Ordering {
    fn as_str(self) -> &'static str {
        match self {
            Ordering::Ascending => "ascending",
            Ordering::Descending => "descending",
        }
    }
}

impl ListingStatus {
    fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Rent => "rent",
            ListingStatus::Sale => "sale",
        }
    }
}

/// What one snapshot request asks the catalog for.
///
/// Every field is optional; unset fields are left out of the request so the
/// catalog applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub area: Option<String>,
    pub postcode: Option<String>,
    pub order_by: Option<OrderBy>,
    pub ordering: Option<Ordering>,
    pub listing_status: Option<ListingStatus>,
    pub include_sold: Option<bool>,
    pub include_rented: Option<bool>,
    pub minimum_price: Option<u32>,
    pub maximum_price: Option<u32>,
    pub minimum_beds: Option<u32>,
    pub maximum_beds: Option<u32>,
    /// "furnished" | "unfurnished" | "part-furnished"
    pub furnished: Option<String>,
    /// "houses" | "flats"
    pub property_type: Option<String>,
    pub new_homes: Option<bool>,
    pub chain_free: Option<bool>,
    pub keywords: Vec<String>,
    pub listing_id: Option<String>,
    pub branch_id: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub summarised: Option<bool>,
}

impl ListingQuery {
    pub fn area(area: impl Into<String>) -> Self {
        Self {
            area: Some(area.into()),
            ..Self::default()
        }
    }

    pub fn with_beds(mut self, min: u32, max: u32) -> Self {
        self.minimum_beds = Some(min);
        self.maximum_beds = Some(max);
        self
    }

    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.listing_status = Some(status);
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Sort by listing age, newest first. The stream's early exit relies on it.
    pub fn newest_first(mut self) -> Self {
        self.order_by = Some(OrderBy::Age);
        self.ordering = Some(Ordering::Descending);
        self
    }

    /// Request parameters for the set fields, in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                out.push((key, v));
            }
        };

        push("area", self.area.clone());
        push("postcode", self.postcode.clone());
        push("order_by", self.order_by.map(|o| o.as_str().to_string()));
        push("ordering", self.ordering.map(|o| o.as_str().to_string()));
        push(
            "listing_status",
            self.listing_status.map(|s| s.as_str().to_string()),
        );
        push("include_sold", self.include_sold.map(bool_param));
        push("include_rented", self.include_rented.map(bool_param));
        push("minimum_price", self.minimum_price.map(|v| v.to_string()));
        push("maximum_price", self.maximum_price.map(|v| v.to_string()));
        push("minimum_beds", self.minimum_beds.map(|v| v.to_string()));
        push("maximum_beds", self.maximum_beds.map(|v| v.to_string()));
        push("furnished", self.furnished.clone());
        push("property_type", self.property_type.clone());
        push("new_homes", self.new_homes.map(bool_param));
        push("chain_free", self.chain_free.map(bool_param));
        push("keywords", Some(self.keywords.join(" ")));
        push("listing_id", self.listing_id.clone());
        push("branch_id", self.branch_id.clone());
        push("page_number", self.page_number.map(|v| v.to_string()));
        push("page_size", self.page_size.map(|v| v.to_string()));
        push("summarised", self.summarised.map(bool_param));

        out
    }
}

fn bool_param(b: bool) -> String {
    if b { "true" } else { "false" }.to_string()
}
