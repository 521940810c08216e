// src/listings/types.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::stream::Identified;

/// Search metadata the catalog echoes back alongside the listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub area_name: Option<String>,
    pub street: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
    pub result_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub latitude_min: f64,
    pub latitude_max: f64,
    pub longitude_min: f64,
    pub longitude_max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub search: SearchSettings,
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: Option<String>,
    pub id: Option<String>,
    pub address: Option<String>,
    pub logo: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorArea {
    pub name: Option<String>,
    pub units: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetails {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub floors: u32,
    pub receptions: u32,
    pub floor_area: Option<FloorArea>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPrices {
    pub accurate: Option<String>,
    pub per_month: Option<u32>,
    pub per_week: Option<u32>,
    pub shared_occupancy: Option<String>,
}

/// When the property can be moved into, as advertised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Availability {
    Immediately,
    From(NaiveDate),
    #[default]
    Unspecified,
    /// Text we could not read as a date, kept verbatim.
    Other(String),
}

/// One property listing. `listing_id` is the stable identifier the stream
/// deduplicates on; every other field is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub listing_id: String,
    pub agent: Agent,
    pub details_url: Option<String>,
    pub image_url: Option<String>,
    pub address: Option<String>,
    pub post_town: Option<String>,
    pub outcode: Option<String>,
    pub availability: Availability,
    pub first_published: Option<NaiveDateTime>,
    pub last_published: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub property_type: Option<String>,
    pub floor_plans: Vec<String>,
    pub furnished_state: Option<String>,
    pub letting_fees: Option<String>,
    pub rooms: RoomDetails,
    pub rental_prices: RentalPrices,
}

impl Listing {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            listing_id: id.into(),
            ..Self::default()
        }
    }
}

impl Identified for Listing {
    fn id(&self) -> &str {
        &self.listing_id
    }
}
