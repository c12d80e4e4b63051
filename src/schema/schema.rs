use serde::{Serialize, Deserialize};

/// Reference domain: order lifecycle states.
pub const ORDER_STATUS: [&str; 4] = ["ACTIVE", "IN_PROGRESS", "DELIVERED", "ERROR"];

/// Reference domain: destination cities.
pub const ORDER_CITY: [&str; 20] = [
    "Warszawa",
    "Wroclaw",
    "Krakow",
    "Gdansk",
    "Zakopane",
    "Bydgoszcz",
    "Torun",
    "Bialystok",
    "Poznan",
    "Lodz",
    "Szczecin",
    "Katowice",
    "Rzeszow",
    "Gdynia",
    "Olsztyn",
    "Kielce",
    "Przemysl",
    "Plock",
    "Kalisz",
    "Ostroleka",
];

/// Reference domain: delivery carriers.
pub const DELIVERY_COMPANY: [&str; 8] = [
    "DHL", "DPD", "FedEx", "Geis", "GLS", "InPost", "Pocztex", "UPS",
];

/// Indexable fields, resolved at compile time. Filters built through the
/// typed API cannot name a field that does not exist; only external
/// string input goes through [`Field::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Status,
    City,
    Delivery,
}

impl Field {
    pub const COUNT: usize = 3;
    pub const ALL: [Field; Field::COUNT] = [Field::Status, Field::City, Field::Delivery];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Status => "status",
            Field::City => "city",
            Field::Delivery => "delivery",
        }
    }

    /// Resolve an externally supplied field name. `None` is the residual
    /// unknown-target case that filter evaluation degrades on.
    pub fn parse(name: &str) -> Option<Field> {
        match name {
            "status" => Some(Field::Status),
            "city" => Some(Field::City),
            "delivery" => Some(Field::Delivery),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Static description of the indexable fields and each field's finite
/// value domain. Known before any index is built; every record value for
/// a field must be a member of that field's domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    domains: [Vec<String>; Field::COUNT],
}

impl Schema {
    pub fn new(statuses: Vec<String>, cities: Vec<String>, carriers: Vec<String>) -> Self {
        Schema {
            domains: [statuses, cities, carriers],
        }
    }

    /// The reference order schema.
    pub fn orders() -> Self {
        Schema::new(
            ORDER_STATUS.iter().map(|v| v.to_string()).collect(),
            ORDER_CITY.iter().map(|v| v.to_string()).collect(),
            DELIVERY_COMPANY.iter().map(|v| v.to_string()).collect(),
        )
    }

    pub fn domain(&self, field: Field) -> &[String] {
        &self.domains[field.index()]
    }

    pub fn contains(&self, field: Field, value: &str) -> bool {
        self.domains[field.index()].iter().any(|v| v == value)
    }
}
