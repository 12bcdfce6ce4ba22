//! Catalog of admin resources and their REST endpoints.
//!
//! Every resource follows the same shape: a paginated list endpoint
//! returning `{ <items>: [...], <count>, <filteredCount> }`, a get-by-id
//! endpoint returning `{ <entity>: {...} }`, and optional update/delete
//! endpoints. Path spellings are the server's, typos included.

use std::fmt;
use std::str::FromStr;

/// A select-based list filter sent as an extra query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query-string key.
    pub key: &'static str,
    pub label: &'static str,
    /// `(value, label)` pairs; the first one is the default.
    pub options: &'static [(&'static str, &'static str)],
}

impl FilterSpec {
    pub fn default_value(&self) -> &'static str {
        self.options.first().map(|(value, _)| *value).unwrap_or("all")
    }
}

static TRANSACTION_STATUS: FilterSpec = FilterSpec {
    key: "status",
    label: "Status",
    options: &[
        ("all", "All"),
        ("PENDING", "Pending"),
        ("COMPLETED", "Completed"),
        ("REFUNDED", "Refunded"),
        ("CANCELLED", "Cancelled"),
    ],
};

static VEHICLE_TYPE: FilterSpec = FilterSpec {
    key: "vehicle_type",
    label: "Vehicle Type",
    options: &[("all", "All"), ("Car", "Car"), ("Truck", "Truck")],
};

static QUERY_STATUS: FilterSpec = FilterSpec {
    key: "status",
    label: "Status",
    options: &[("all", "All"), ("open", "Open"), ("closed", "Closed")],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    User,
    Vehicle,
    Auction,
    Bid,
    Transaction,
    Query,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[
            Resource::User,
            Resource::Vehicle,
            Resource::Auction,
            Resource::Bid,
            Resource::Transaction,
            Resource::Query,
        ]
    }

    /// Name used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::User => "users",
            Resource::Vehicle => "vehicles",
            Resource::Auction => "auctions",
            Resource::Bid => "bids",
            Resource::Transaction => "transactions",
            Resource::Query => "queries",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Resource::User => "User",
            Resource::Vehicle => "Vehicle",
            Resource::Auction => "Auction",
            Resource::Bid => "Bid",
            Resource::Transaction => "Transaction",
            Resource::Query => "Query",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Resource::User => "Users",
            Resource::Vehicle => "Vehicles",
            Resource::Auction => "Auctions",
            Resource::Bid => "Bids",
            Resource::Transaction => "Transactions",
            Resource::Query => "Queries",
        }
    }

    pub fn list_path(&self) -> &'static str {
        match self {
            Resource::User => "/api/admin/getallusers/",
            Resource::Vehicle => "/api/admin/getallcars/",
            Resource::Auction => "/api/admin/getalauctions/",
            Resource::Bid => "/api/admin/getallbids/",
            Resource::Transaction => "/api/admin/get-all-transaction/",
            Resource::Query => "/api/admin/getallqueries/",
        }
    }

    fn get_prefix(&self) -> &'static str {
        match self {
            Resource::User => "/api/admin/getuser",
            Resource::Vehicle => "/api/admin/getcar",
            Resource::Auction => "/api/admin/getauction",
            Resource::Bid => "/api/admin/getbid",
            Resource::Transaction => "/api/admin/get-transaction",
            Resource::Query => "/api/admin/getquery",
        }
    }

    fn update_prefix(&self) -> Option<&'static str> {
        match self {
            Resource::User => Some("/api/admin/updateuser"),
            Resource::Vehicle => Some("/api/admin/updatecar"),
            _ => None,
        }
    }

    fn delete_prefix(&self) -> Option<&'static str> {
        match self {
            Resource::User => Some("/api/admin/deleteuser"),
            Resource::Vehicle => Some("/api/admin/deletecar"),
            Resource::Auction => Some("/api/admin/deleteauction"),
            Resource::Bid => Some("/api/admin/deletebid"),
            Resource::Query => Some("/api/admin/deletequery"),
            Resource::Transaction => None,
        }
    }

    pub fn get_path(&self, id: &str) -> String {
        format!("{}/{}", self.get_prefix(), id)
    }

    pub fn update_path(&self, id: &str) -> Option<String> {
        self.update_prefix().map(|prefix| format!("{}/{}", prefix, id))
    }

    pub fn delete_path(&self, id: &str) -> Option<String> {
        self.delete_prefix().map(|prefix| format!("{}/{}", prefix, id))
    }

    pub fn can_edit(&self) -> bool {
        self.update_prefix().is_some()
    }

    pub fn can_delete(&self) -> bool {
        self.delete_prefix().is_some()
    }

    /// Envelope key holding the entity array in list responses.
    pub fn items_key(&self) -> &'static str {
        match self {
            Resource::User => "users",
            Resource::Vehicle => "cars",
            Resource::Auction => "auctions",
            Resource::Bid => "bids",
            Resource::Transaction => "transactions",
            Resource::Query => "queries",
        }
    }

    pub fn count_key(&self) -> &'static str {
        match self {
            Resource::User => "userCount",
            Resource::Vehicle => "carCount",
            Resource::Auction => "auctionCount",
            Resource::Bid => "bidCount",
            Resource::Transaction => "transactionCount",
            Resource::Query => "queryCount",
        }
    }

    pub fn filtered_count_key(&self) -> &'static str {
        match self {
            Resource::User => "filteredUserCount",
            Resource::Vehicle => "filteredCarCount",
            Resource::Auction => "filteredAuctionCount",
            Resource::Bid => "filteredBidCount",
            Resource::Transaction => "filteredTransactionsCount",
            Resource::Query => "filteredQueryCount",
        }
    }

    /// Envelope key holding the entity in get-by-id responses.
    pub fn entity_key(&self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Vehicle => "car",
            Resource::Auction => "auction",
            Resource::Bid => "bid",
            Resource::Transaction => "transaction",
            Resource::Query => "query",
        }
    }

    pub fn filters(&self) -> &'static [FilterSpec] {
        match self {
            Resource::Vehicle => std::slice::from_ref(&VEHICLE_TYPE),
            Resource::Transaction => std::slice::from_ref(&TRANSACTION_STATUS),
            Resource::Query => std::slice::from_ref(&QUERY_STATUS),
            _ => &[],
        }
    }

    /// Confirmation text shown before a delete.
    pub fn delete_prompt(&self) -> String {
        match self {
            Resource::Vehicle => "Are you sure you want to delete this Vehicle?\n\nNote: All related auctions will also be deleted.".to_string(),
            other => format!("Are you sure you want to delete this {}?", other.singular()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResource(pub String);

impl fmt::Display for UnknownResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Resource::all().iter().map(Resource::as_str).collect();
        write!(f, "unknown resource '{}' (expected one of: {})", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownResource {}

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" | "user" => Ok(Resource::User),
            "vehicles" | "vehicle" | "cars" | "car" => Ok(Resource::Vehicle),
            "auctions" | "auction" => Ok(Resource::Auction),
            "bids" | "bid" => Ok(Resource::Bid),
            "transactions" | "transaction" => Ok(Resource::Transaction),
            "queries" | "query" => Ok(Resource::Query),
            _ => Err(UnknownResource(s.to_string())),
        }
    }
}
