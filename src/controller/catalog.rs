//! What each resource shows: list columns, detail fields, edit form.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::types::{display_value, format_timestamp, lookup};
use crate::api::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Text,
    /// `#` prefixed identifier.
    Id,
    /// `$` prefixed amount.
    Money,
    /// ISO timestamp trimmed to `date time`.
    Timestamp,
    /// `Paid` / `No` payment badge.
    Paid,
}

/// Condition under which an optional field or section is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    Equals(&'static str, &'static str),
    NotEquals(&'static str, &'static str),
    IsTrue(&'static str),
    Present(&'static str),
    AllOf(&'static [Gate]),
}

impl Gate {
    /// Evaluate against a fetched entity.
    pub fn holds(&self, entity: &Value) -> bool {
        match self {
            Gate::Always => true,
            Gate::Equals(path, expected) => {
                lookup(entity, path).and_then(Value::as_str) == Some(*expected)
            }
            Gate::NotEquals(path, expected) => {
                lookup(entity, path).and_then(Value::as_str) != Some(*expected)
            }
            Gate::IsTrue(path) => matches!(lookup(entity, path), Some(Value::Bool(true))),
            Gate::Present(path) => match lookup(entity, path) {
                None | Some(Value::Null) | Some(Value::Bool(false)) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(Value::Number(n)) => n.as_f64() != Some(0.0),
                Some(_) => true,
            },
            Gate::AllOf(gates) => gates.iter().all(|gate| gate.holds(entity)),
        }
    }

    /// Evaluate against the string values of an open form.
    pub fn holds_in_form(&self, values: &BTreeMap<String, String>) -> bool {
        let value = |key: &str| values.get(key).map(String::as_str);
        match self {
            Gate::Always => true,
            Gate::Equals(key, expected) => value(key) == Some(*expected),
            Gate::NotEquals(key, expected) => value(key) != Some(*expected),
            Gate::IsTrue(key) => value(key) == Some("true"),
            Gate::Present(key) => value(key).is_some_and(|v| !v.trim().is_empty()),
            Gate::AllOf(gates) => gates.iter().all(|gate| gate.holds_in_form(values)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub path: &'static str,
    pub format: CellFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub path: &'static str,
    pub format: CellFormat,
    pub gate: Gate,
}

/// A titled group of fields. `source` names a sibling payload key
/// (e.g. `winner`) instead of the entity itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub source: Option<&'static str>,
    pub gate: Gate,
    pub fields: &'static [DetailField],
}

/// Array of related entities rendered as a table under the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedTable {
    pub title: &'static str,
    pub source: &'static str,
    pub columns: &'static [Column],
    pub empty: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Select(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub visible_when: Gate,
}

const fn col(header: &'static str, path: &'static str, format: CellFormat) -> Column {
    Column {
        header,
        path,
        format,
    }
}

const fn field(label: &'static str, path: &'static str, format: CellFormat) -> DetailField {
    DetailField {
        label,
        path,
        format,
        gate: Gate::Always,
    }
}

const fn gated(
    label: &'static str,
    path: &'static str,
    format: CellFormat,
    gate: Gate,
) -> DetailField {
    DetailField {
        label,
        path,
        format,
        gate,
    }
}

const fn input(key: &'static str, label: &'static str, kind: FieldKind) -> FormField {
    FormField {
        key,
        label,
        kind,
        required: true,
        visible_when: Gate::Always,
    }
}

const fn input_when(
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    visible_when: Gate,
) -> FormField {
    FormField {
        key,
        label,
        kind,
        required: true,
        visible_when,
    }
}

use CellFormat::{Id, Money, Paid, Text, Timestamp};

const BOOL_OPTIONS: &[&str] = &["true", "false"];

static USER_COLUMNS: [Column; 7] = [
    col("Client ID", "clientId", Id),
    col("Full Name", "name", Text),
    col("Email", "email", Text),
    col("Age", "age", Text),
    col("Mobile No.", "phoneNumber", Text),
    col("Role", "role", Text),
    col("Locked", "is_locked", Text),
];

static VEHICLE_COLUMNS: [Column; 6] = [
    col("Vehicle Type", "vehicle_type", Text),
    col("Manufacturing Company", "manufacture_company", Text),
    col("Model", "model", Text),
    col("VIN", "unique_identification_number", Text),
    col("Colour", "color", Text),
    col("Reg. Date", "createdAt", Timestamp),
];

static AUCTION_COLUMNS: [Column; 6] = [
    col("Auction Id", "_id", Id),
    col("Seller", "seller.name", Text),
    col("Auction Start", "auction_start", Timestamp),
    col("Auction End", "auction_end", Timestamp),
    col("Highest Bid", "highest_bid", Money),
    col("Status", "status", Text),
];

static BID_COLUMNS: [Column; 4] = [
    col("Bidded By", "bidder.name", Text),
    col("Auction Id", "auction", Id),
    col("Bid Amount", "bid_amount", Money),
    col("Bidded At", "createdAt", Timestamp),
];

static TRANSACTION_COLUMNS: [Column; 5] = [
    col("Transaction Id", "transactionId", Text),
    col("Amount", "amount", Money),
    col("Status", "status", Text),
    col("Created By", "user.name", Text),
    col("Created At", "createdAt", Timestamp),
];

static QUERY_COLUMNS: [Column; 5] = [
    col("Name", "name", Text),
    col("Email", "email", Text),
    col("Subject", "subject", Text),
    col("Status", "status", Text),
    col("Created At", "createdAt", Timestamp),
];

pub fn columns(resource: Resource) -> &'static [Column] {
    match resource {
        Resource::User => &USER_COLUMNS,
        Resource::Vehicle => &VEHICLE_COLUMNS,
        Resource::Auction => &AUCTION_COLUMNS,
        Resource::Bid => &BID_COLUMNS,
        Resource::Transaction => &TRANSACTION_COLUMNS,
        Resource::Query => &QUERY_COLUMNS,
    }
}

static USER_SECTIONS: [DetailSection; 1] = [DetailSection {
    title: "Details",
    source: None,
    gate: Gate::Always,
    fields: &[
        field("Client ID", "clientId", Id),
        field("Full Name", "name", Text),
        field("Email", "email", Text),
        field("Age", "age", Text),
        field("Mobile No.", "phoneNumber", Text),
        field("City", "city", Text),
        field("Suburb", "shuburb", Text),
        field("State", "state", Text),
        field("Postcode", "postal_code", Text),
        field("Address", "address", Text),
        gated("Account Locked", "is_locked", Text, Gate::IsTrue("is_locked")),
        field("Role", "role", Text),
        field("Created At", "createdAt", Timestamp),
        field("Last Update", "updatedAt", Timestamp),
        field("Profile Picture", "profilePicUrl", Text),
    ],
}];

static VEHICLE_SECTIONS: [DetailSection; 1] = [DetailSection {
    title: "Details",
    source: None,
    gate: Gate::Always,
    fields: &[
        field("Vehicle Type", "vehicle_type", Text),
        field("Manufacturing Company", "manufacture_company", Text),
        field("Model", "model", Text),
        field("Manufacturing Year", "manufacture_year", Text),
        field("VIN", "unique_identification_number", Text),
        field("Is Registered", "is_registered", Text),
        gated(
            "Expiry Date",
            "expiry_date",
            Text,
            Gate::IsTrue("is_registered"),
        ),
        field("Colour", "color", Text),
        field("Is Owner", "owner", Text),
        field("Is Authorized Person", "autorized_person", Text),
        field("Body Type", "body_type", Text),
        field("Fuel Type", "fuel_type", Text),
        field("Transmission Type", "transmission_type", Text),
        gated(
            "Engine Capacity (cc)",
            "engine_capacity",
            Text,
            Gate::AllOf(&[
                Gate::Equals("vehicle_type", "Car"),
                Gate::Present("engine_capacity"),
            ]),
        ),
        gated(
            "Engine Power (hp)",
            "engine_power",
            Text,
            Gate::AllOf(&[
                Gate::NotEquals("vehicle_type", "Car"),
                Gate::Present("engine_power"),
            ]),
        ),
        field("Odometer Reading", "odometer_reading", Text),
        field("Drive Type", "drive_type", Text),
        field("Number Of Cylinders", "num_of_cylinders", Text),
        gated(
            "Axle Configuration",
            "axle_configuration",
            Text,
            Gate::Equals("vehicle_type", "Truck"),
        ),
        gated("GVM (kg)", "gvm", Text, Gate::Equals("vehicle_type", "Truck")),
        gated("Suburb", "car_shuburb", Text, Gate::Present("car_shuburb")),
        gated("State", "car_state", Text, Gate::Present("car_state")),
        gated("City", "car_city", Text, Gate::Present("car_city")),
        gated(
            "Postcode",
            "car_postal_code",
            Text,
            Gate::Present("car_postal_code"),
        ),
        gated("Address", "car_address", Text, Gate::Present("car_address")),
        field("Created At", "createdAt", Timestamp),
        field("Last Update", "updatedAt", Timestamp),
    ],
}];

const PERSON_FIELDS: &[DetailField] = &[
    field("Client ID", "clientId", Id),
    field("Full Name", "name", Text),
    field("Email", "email", Text),
    field("Phone No.", "phoneNumber", Text),
    field("Age", "age", Text),
    field("City", "city", Text),
    field("Suburb", "shuburb", Text),
    field("State", "state", Text),
    field("Postcode", "postal_code", Text),
    field("Address", "address", Text),
];

static AUCTION_SECTIONS: [DetailSection; 4] = [
    DetailSection {
        title: "Details",
        source: None,
        gate: Gate::Always,
        fields: &[
            field("Auction ID", "auction_id", Id),
            field("Auction Start", "auction_start", Timestamp),
            field("Auction End", "auction_end", Timestamp),
            field("Asking Price Visible", "show_hide_price", Text),
            gated(
                "Seller Paid 10%",
                "is_Seller_paid10_percent",
                Paid,
                Gate::IsTrue("auction_confirmed"),
            ),
            gated(
                "Winner Paid $100",
                "is_Winner_paid10_percent",
                Paid,
                Gate::IsTrue("auction_confirmed"),
            ),
            field("Bidding Status", "reserve_flag", Text),
            field("Auction Status", "status", Text),
            field("Highest Bid", "highest_bid", Money),
            field("Created At", "createdAt", Timestamp),
            field("Last Update", "updatedAt", Timestamp),
        ],
    },
    DetailSection {
        title: "Auctioneer",
        source: Some("seller"),
        gate: Gate::Always,
        fields: PERSON_FIELDS,
    },
    DetailSection {
        title: "Winner",
        source: Some("winner"),
        gate: Gate::IsTrue("auction_confirmed"),
        fields: PERSON_FIELDS,
    },
    DetailSection {
        title: "Vehicle",
        source: Some("car"),
        gate: Gate::Present("car"),
        fields: &[
            field("Model", "model", Text),
            field("Manufacturing Company", "manufacture_company", Text),
            field("Manufacturing Year", "manufacture_year", Text),
            field("VIN", "unique_identification_number", Text),
            field("Colour", "color", Text),
            field("Fuel Type", "fuel_type", Text),
            field("Transmission Type", "transmission_type", Text),
            gated(
                "Engine Capacity",
                "engine_capacity",
                Text,
                Gate::Present("engine_capacity"),
            ),
            gated("Engine Power", "engine_power", Text, Gate::Present("engine_power")),
            field("Odometer Reading", "odometer_reading", Text),
            field("Drive Type", "drive_type", Text),
            field("Number Of Cylinders", "num_of_cylinders", Text),
            field("City", "car_city", Text),
            field("State", "car_state", Text),
            field("Suburb", "car_shuburb", Text),
            field("Postcode", "car_postal_code", Text),
            field("Address", "car_address", Text),
        ],
    },
];

static BID_SECTIONS: [DetailSection; 1] = [DetailSection {
    title: "Details",
    source: None,
    gate: Gate::Always,
    fields: &[
        field("Bidded By", "bidder.name", Text),
        field("Bidder Email", "bidder.email", Text),
        field("Auction Id", "auction", Id),
        field("Bid Amount", "bid_amount", Money),
        field("Bidded At", "createdAt", Timestamp),
    ],
}];

static TRANSACTION_SECTIONS: [DetailSection; 3] = [
    DetailSection {
        title: "Details",
        source: None,
        gate: Gate::Always,
        fields: &[
            field("Transaction ID", "transactionId", Text),
            field("Transaction Done By", "user.name", Text),
            field("Transaction Amount", "amount", Money),
            field("Transaction Status", "status", Text),
            field("Created At", "createdAt", Timestamp),
            field("Last Update", "updatedAt", Timestamp),
        ],
    },
    DetailSection {
        title: "Order",
        source: None,
        gate: Gate::Present("order"),
        fields: &[
            field("Order ID", "order.paypalOrderId", Text),
            field("Auction ID", "order.auction.auction_id", Id),
            field("Auction Seller", "order.auction.seller.name", Text),
            field("Order Created At", "order.createdAt", Timestamp),
            field("Order Last Update", "order.updatedAt", Timestamp),
        ],
    },
    DetailSection {
        title: "Auctioned Vehicle",
        source: None,
        gate: Gate::Present("order.auction.car"),
        fields: &[
            field("Car ID", "order.auction.car._id", Id),
            field("Car Model", "order.auction.car.model", Text),
            field(
                "Car Manufacture Company",
                "order.auction.car.manufacture_company",
                Text,
            ),
            field(
                "Car VIN",
                "order.auction.car.unique_identification_number",
                Text,
            ),
            field("Car City", "order.auction.car.car_city", Text),
            field("Car State", "order.auction.car.car_state", Text),
            field("Car Suburb", "order.auction.car.car_shuburb", Text),
            field("Car Postal Code", "order.auction.car.car_postal_code", Text),
            field("Car Address", "order.auction.car.car_address", Text),
        ],
    },
];

static QUERY_SECTIONS: [DetailSection; 1] = [DetailSection {
    title: "Details",
    source: None,
    gate: Gate::Always,
    fields: &[
        field("Name", "name", Text),
        field("Email", "email", Text),
        field("Subject", "subject", Text),
        field("Message", "message", Text),
        field("Status", "status", Text),
        field("Created At", "createdAt", Timestamp),
        field("Last Update", "updatedAt", Timestamp),
    ],
}];

pub fn detail_sections(resource: Resource) -> &'static [DetailSection] {
    match resource {
        Resource::User => &USER_SECTIONS,
        Resource::Vehicle => &VEHICLE_SECTIONS,
        Resource::Auction => &AUCTION_SECTIONS,
        Resource::Bid => &BID_SECTIONS,
        Resource::Transaction => &TRANSACTION_SECTIONS,
        Resource::Query => &QUERY_SECTIONS,
    }
}

static AUCTION_RELATED: [RelatedTable; 1] = [RelatedTable {
    title: "Bids",
    source: "bids",
    columns: &[
        col("Bidder", "bidder.name", Text),
        col("Bid Amount", "bid_amount", Money),
        col("Bid At", "createdAt", Timestamp),
    ],
    empty: "No Bid(s) Found",
}];

pub fn related_tables(resource: Resource) -> &'static [RelatedTable] {
    match resource {
        Resource::Auction => &AUCTION_RELATED,
        _ => &[],
    }
}

/// Fields of the signed-in admin's own profile.
pub static PROFILE_FIELDS: [DetailField; 11] = [
    field("Full Name", "name", Text),
    field("Email", "email", Text),
    field("Mobile No.", "phoneNumber", Text),
    field("Role", "role", Text),
    field("City", "city", Text),
    field("Suburb", "shuburb", Text),
    field("State", "state", Text),
    field("Postcode", "postal_code", Text),
    field("Address", "address", Text),
    field("Created At", "createdAt", Timestamp),
    field("Last Update", "updatedAt", Timestamp),
];

static USER_FORM: [FormField; 8] = [
    input("name", "Name", FieldKind::Text),
    input("email", "Email", FieldKind::Email),
    input("age", "Age", FieldKind::Number),
    input("phoneNumber", "Mobile No.", FieldKind::Number),
    input("address", "Address", FieldKind::Text),
    input("role", "Role", FieldKind::Select(&["user", "admin"])),
    input("city", "City", FieldKind::Text),
    input("pincode", "Pincode", FieldKind::Number),
];

static VEHICLE_FORM: [FormField; 26] = [
    input("vehicle_type", "Vehicle Type", FieldKind::Select(&["Car", "Truck"])),
    input("manufacture_company", "Manufacturing Company", FieldKind::Text),
    input("is_registered", "Is Registered", FieldKind::Select(BOOL_OPTIONS)),
    input_when(
        "expiry_date",
        "Expiry Date",
        FieldKind::Date,
        Gate::IsTrue("is_registered"),
    ),
    input("owner", "Is Owner", FieldKind::Select(BOOL_OPTIONS)),
    input(
        "autorized_person",
        "Is Authorized Person",
        FieldKind::Select(BOOL_OPTIONS),
    ),
    input("model", "Model", FieldKind::Text),
    input("body_type", "Body Type", FieldKind::Text),
    input_when(
        "axle_configuration",
        "Axle Configuration",
        FieldKind::Text,
        Gate::Equals("vehicle_type", "Truck"),
    ),
    input_when(
        "gvm",
        "GVM",
        FieldKind::Text,
        Gate::Equals("vehicle_type", "Truck"),
    ),
    input_when(
        "engine_power",
        "Engine Power",
        FieldKind::Text,
        Gate::Equals("vehicle_type", "Truck"),
    ),
    input("manufacture_year", "Manufacturing Year", FieldKind::Text),
    input("unique_identification_number", "VIN Number", FieldKind::Text),
    input("color", "Colour", FieldKind::Text),
    input("fuel_type", "Fuel Type", FieldKind::Text),
    input_when(
        "engine_capacity",
        "Engine Capacity",
        FieldKind::Number,
        Gate::Equals("vehicle_type", "Car"),
    ),
    input(
        "transmission_type",
        "Transmission Type",
        FieldKind::Select(&["Automatic", "Manual"]),
    ),
    input("odometer_reading", "Odometer Reading", FieldKind::Number),
    input("drive_type", "Drive Type", FieldKind::Text),
    input("num_of_cylinders", "Number Of Cylinder(s)", FieldKind::Number),
    input("car_city", "Car Location - City", FieldKind::Text),
    input("car_state", "Car Location - State", FieldKind::Text),
    input("car_shuburb", "Car Location - Suburb", FieldKind::Text),
    input("car_postal_code", "Car Location - Pincode", FieldKind::Number),
    input("car_address", "Car Location - Address", FieldKind::Text),
    input("description", "Car Description", FieldKind::Text),
];

/// Edit form of a resource; empty for read-only resources.
pub fn form_fields(resource: Resource) -> &'static [FormField] {
    match resource {
        Resource::User => &USER_FORM,
        Resource::Vehicle => &VEHICLE_FORM,
        _ => &[],
    }
}

/// Render one value of an entity for a table cell or detail row.
pub fn format_cell(entity: &Value, path: &str, format: CellFormat) -> String {
    let raw = display_value(entity, path);
    if raw == "N/A" {
        return match format {
            Paid => "No".to_string(),
            _ => raw,
        };
    }
    match format {
        Text => raw,
        Id => format!("#{}", raw),
        Money => format!("${}", raw),
        Timestamp => format_timestamp(&raw),
        Paid => match lookup(entity, path) {
            Some(Value::Bool(true)) => "Paid".to_string(),
            _ => "No".to_string(),
        },
    }
}
