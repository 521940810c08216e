// src/listings/xml.rs
//! Wire shape of `property_listings.xml` and its mapping onto the public types.
//!
//! Every leaf is read as optional text first; numbers and dates are parsed
//! leniently afterwards so one odd field never rejects a whole snapshot.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::error::Result;
use crate::listings::types::{
    Agent, Availability, BoundingBox, FloorArea, Listing, ListingResponse, RentalPrices,
    RoomDetails, SearchSettings,
};

const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct Response {
    area_name: Option<String>,
    street: Option<String>,
    town: Option<String>,
    county: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    bounding_box: Option<Bbox>,
    result_count: Option<String>,
    #[serde(rename = "listing", default)]
    listing: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Bbox {
    latitude_min: Option<String>,
    latitude_max: Option<String>,
    longitude_min: Option<String>,
    longitude_max: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Item {
    listing_id: Option<String>,

    agent_name: Option<String>,
    agent_id: Option<String>,
    company_address: Option<String>,
    agent_logo: Option<String>,
    agent_phone: Option<String>,
    category: Option<String>,

    details_url: Option<String>,
    image_url: Option<String>,
    displayable_address: Option<String>,
    post_town: Option<String>,
    outcode: Option<String>,
    available_from_display: Option<String>,
    first_published_date: Option<String>,
    last_published_date: Option<String>,
    status: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    property_type: Option<String>,
    #[serde(rename = "floor_plan", default)]
    floor_plan: Vec<String>,
    furnished_state: Option<String>,
    letting_fees: Option<String>,

    num_bedrooms: Option<String>,
    num_bathrooms: Option<String>,
    num_floors: Option<String>,
    num_recepts: Option<String>,
    floor_area: Option<Area>,

    rental_prices: Option<Prices>,
}

#[derive(Debug, Deserialize)]
struct Area {
    name: Option<String>,
    units: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prices {
    accurate: Option<String>,
    per_month: Option<String>,
    per_week: Option<String>,
    shared_occupancy: Option<String>,
}

/// Decode a full listings document. Fails only on malformed XML.
pub fn parse_listings_xml(s: &str) -> Result<ListingResponse> {
    let raw: Response = from_str(s)?;

    let bounding_box = raw.bounding_box.and_then(|b| {
        Some(BoundingBox {
            latitude_min: number(b.latitude_min)?,
            latitude_max: number(b.latitude_max)?,
            longitude_min: number(b.longitude_min)?,
            longitude_max: number(b.longitude_max)?,
        })
    });

    let search = SearchSettings {
        area_name: text(raw.area_name),
        street: text(raw.street),
        town: text(raw.town),
        county: text(raw.county),
        country: text(raw.country),
        postcode: text(raw.postcode),
        latitude: number(raw.latitude),
        longitude: number(raw.longitude),
        bounding_box,
        result_count: number(raw.result_count).unwrap_or(0),
    };

    // Without an id a record cannot be deduplicated; drop it here.
    let listings = raw
        .listing
        .into_iter()
        .map(Listing::from)
        .filter(|l| {
            if l.listing_id.is_empty() {
                tracing::warn!(address = ?l.address, "skipping listing without listing_id");
            }
            !l.listing_id.is_empty()
        })
        .collect();
    Ok(ListingResponse { search, listings })
}

impl From<Item> for Listing {
    fn from(it: Item) -> Self {
        Listing {
            listing_id: text(it.listing_id).unwrap_or_default(),
            agent: Agent {
                name: text(it.agent_name),
                id: text(it.agent_id),
                address: text(it.company_address),
                logo: text(it.agent_logo),
                phone: text(it.agent_phone),
                category: text(it.category),
            },
            details_url: text(it.details_url),
            image_url: text(it.image_url),
            address: text(it.displayable_address),
            post_town: text(it.post_town),
            outcode: text(it.outcode),
            availability: parse_availability(it.available_from_display.as_deref()),
            first_published: it.first_published_date.as_deref().and_then(parse_published),
            last_published: it.last_published_date.as_deref().and_then(parse_published),
            status: text(it.status),
            description: text(it.description),
            short_description: text(it.short_description),
            property_type: text(it.property_type),
            floor_plans: it
                .floor_plan
                .into_iter()
                .filter_map(|p| text(Some(p)))
                .collect(),
            furnished_state: text(it.furnished_state),
            letting_fees: text(it.letting_fees),
            rooms: RoomDetails {
                bedrooms: number(it.num_bedrooms).unwrap_or(0),
                bathrooms: number(it.num_bathrooms).unwrap_or(0),
                floors: number(it.num_floors).unwrap_or(0),
                receptions: number(it.num_recepts).unwrap_or(0),
                floor_area: it.floor_area.map(|a| FloorArea {
                    name: text(a.name),
                    units: text(a.units),
                    value: text(a.value),
                }),
            },
            rental_prices: it
                .rental_prices
                .map(|p| RentalPrices {
                    accurate: text(p.accurate),
                    per_month: number(p.per_month),
                    per_week: number(p.per_week),
                    shared_occupancy: text(p.shared_occupancy),
                })
                .unwrap_or_default(),
        }
    }
}

fn text(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn number<T: std::str::FromStr>(v: Option<String>) -> Option<T> {
    text(v).and_then(|s| s.parse().ok())
}

/// `2024-01-02 15:04:05` → timestamp; anything else is dropped.
pub fn parse_published(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), PUBLISHED_FORMAT).ok()
}

/// Read the free-text availability line, e.g. "Available from 12th Jan 2024".
pub fn parse_availability(s: Option<&str>) -> Availability {
    let Some(raw) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Availability::Unspecified;
    };
    if raw.eq_ignore_ascii_case("available immediately") {
        return Availability::Immediately;
    }

    static RE_DATE: OnceCell<Regex> = OnceCell::new();
    let re = RE_DATE.get_or_init(|| {
        Regex::new(r"(\d{1,2})(?:st|nd|rd|th) (\w+) (\d{4})").expect("valid availability regex")
    });

    re.captures(raw)
        .and_then(|c| {
            let cleaned = format!("{} {} {}", &c[1], &c[2], &c[3]);
            NaiveDate::parse_from_str(&cleaned, "%d %B %Y").ok()
        })
        .map(Availability::From)
        .unwrap_or_else(|| Availability::Other(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_variants() {
        assert_eq!(parse_availability(None), Availability::Unspecified);
        assert_eq!(parse_availability(Some("  ")), Availability::Unspecified);
        assert_eq!(
            parse_availability(Some("Available immediately")),
            Availability::Immediately
        );
        assert_eq!(
            parse_availability(Some("Available from 12th Jan 2024")),
            Availability::From(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap())
        );
        assert_eq!(
            parse_availability(Some("Available from 1st March 2025")),
            Availability::From(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert_eq!(
            parse_availability(Some("Ask agent")),
            Availability::Other("Ask agent".into())
        );
    }

    #[test]
    fn published_date_is_lenient() {
        let ts = parse_published("2024-01-02 15:04:05").expect("parses");
        assert_eq!(ts.to_string(), "2024-01-02 15:04:05");
        assert!(parse_published("yesterday").is_none());
    }

    #[test]
    fn empty_document_has_no_listings() {
        let r = parse_listings_xml("<response><result_count>0</result_count></response>")
            .expect("decodes");
        assert!(r.listings.is_empty());
        assert_eq!(r.search.result_count, 0);
    }

    #[test]
    fn bad_numbers_do_not_reject_the_listing() {
        let xml = r#"<response>
            <listing>
                <listing_id> 42 </listing_id>
                <num_bedrooms>two</num_bedrooms>
                <num_bathrooms/>
                <rental_prices><per_month>1,200</per_month><per_week>300</per_week></rental_prices>
            </listing>
        </response>"#;
        let r = parse_listings_xml(xml).expect("decodes");
        let l = &r.listings[0];
        assert_eq!(l.listing_id, "42");
        assert_eq!(l.rooms.bedrooms, 0);
        assert_eq!(l.rooms.bathrooms, 0);
        assert_eq!(l.rental_prices.per_month, None);
        assert_eq!(l.rental_prices.per_week, Some(300));
    }

    #[test]
    fn listings_without_id_are_skipped() {
        let xml = r#"<response>
            <listing><listing_id>3</listing_id></listing>
            <listing><displayable_address>Nowhere</displayable_address></listing>
            <listing><listing_id>2</listing_id></listing>
        </response>"#;
        let r = parse_listings_xml(xml).expect("decodes");
        let ids: Vec<_> = r.listings.iter().map(|l| l.listing_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[test]
    fn malformed_xml_is_a_decode_error() {
        let err = parse_listings_xml("<response><listing></response>").unwrap_err();
        assert!(matches!(err, crate::Error::Decode(_)));
    }
}
