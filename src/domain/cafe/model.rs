use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Raw key/value parameters as received from a form body or query string.
///
/// Keys are kept sorted so that messages listing offending keys are deterministic.
pub type RawParams = BTreeMap<String, String>;

/// A persisted cafe row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cafe {
    pub id: i32,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    /// Formatted currency text, e.g. `"£ 2.50"`.
    pub coffee_price: String,
}

/// Insert payload: a cafe that passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: String,
}

impl NewCafe {
    pub fn into_cafe(self, id: i32) -> Cafe {
        Cafe {
            id,
            name: self.name,
            map_url: self.map_url,
            img_url: self.img_url,
            location: self.location,
            seats: self.seats,
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            has_sockets: self.has_sockets,
            can_take_calls: self.can_take_calls,
            coffee_price: self.coffee_price,
        }
    }
}

/// How the raw text of a field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Url,
    Boolean,
    Price,
}

/// The client-settable columns of the `cafe` table, in table order.
///
/// `id` is system-assigned and deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CafeField {
    Name,
    MapUrl,
    ImgUrl,
    Location,
    Seats,
    HasToilet,
    HasWifi,
    HasSockets,
    CanTakeCalls,
    CoffeePrice,
}

impl CafeField {
    pub const ALL: [CafeField; 10] = [
        CafeField::Name,
        CafeField::MapUrl,
        CafeField::ImgUrl,
        CafeField::Location,
        CafeField::Seats,
        CafeField::HasToilet,
        CafeField::HasWifi,
        CafeField::HasSockets,
        CafeField::CanTakeCalls,
        CafeField::CoffeePrice,
    ];

    /// Boolean fields in the order they are checked on the API create path.
    pub const BOOLEANS: [CafeField; 4] = [
        CafeField::HasToilet,
        CafeField::HasSockets,
        CafeField::HasWifi,
        CafeField::CanTakeCalls,
    ];

    /// URL fields in the order they are checked on the API create path.
    pub const URLS: [CafeField; 2] = [CafeField::ImgUrl, CafeField::MapUrl];

    pub fn as_str(self) -> &'static str {
        match self {
            CafeField::Name => "name",
            CafeField::MapUrl => "map_url",
            CafeField::ImgUrl => "img_url",
            CafeField::Location => "location",
            CafeField::Seats => "seats",
            CafeField::HasToilet => "has_toilet",
            CafeField::HasWifi => "has_wifi",
            CafeField::HasSockets => "has_sockets",
            CafeField::CanTakeCalls => "can_take_calls",
            CafeField::CoffeePrice => "coffee_price",
        }
    }

    /// Column header used by the HTML listing.
    pub fn display_name(self) -> &'static str {
        match self {
            CafeField::Name => "Cafe Name",
            CafeField::MapUrl => "Maps URL",
            CafeField::ImgUrl => "Image",
            CafeField::Location => "Location",
            CafeField::Seats => "Seats",
            CafeField::HasToilet => "Toilets",
            CafeField::HasWifi => "Wi-Fi",
            CafeField::HasSockets => "Power Sockets",
            CafeField::CanTakeCalls => "Can Take Calls",
            CafeField::CoffeePrice => "Coffee Price",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            CafeField::MapUrl | CafeField::ImgUrl => FieldKind::Url,
            CafeField::HasToilet
            | CafeField::HasWifi
            | CafeField::HasSockets
            | CafeField::CanTakeCalls => FieldKind::Boolean,
            CafeField::CoffeePrice => FieldKind::Price,
            CafeField::Name | CafeField::Location | CafeField::Seats => FieldKind::Text,
        }
    }
}

impl fmt::Display for CafeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CafeField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CafeField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

impl Cafe {
    /// Renders one field the way the HTML table shows it.
    pub fn field_text(&self, field: CafeField) -> String {
        match field {
            CafeField::Name => self.name.clone(),
            CafeField::MapUrl => self.map_url.clone(),
            CafeField::ImgUrl => self.img_url.clone(),
            CafeField::Location => self.location.clone(),
            CafeField::Seats => self.seats.clone(),
            CafeField::HasToilet => bool_text(self.has_toilet),
            CafeField::HasWifi => bool_text(self.has_wifi),
            CafeField::HasSockets => bool_text(self.has_sockets),
            CafeField::CanTakeCalls => bool_text(self.can_take_calls),
            CafeField::CoffeePrice => self.coffee_price.clone(),
        }
    }
}

fn bool_text(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
