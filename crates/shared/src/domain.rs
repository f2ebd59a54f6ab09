use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProjectId);
id_newtype!(DevlogId);
id_newtype!(UserId);
id_newtype!(StoreItemId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ship_status: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub readme_url: Option<String>,
    #[serde(default)]
    pub ai_declaration: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Devlog {
    pub id: DevlogId,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default)]
    pub scrapbook_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub cookies: i64,
    #[serde(default)]
    pub devlog_seconds_today: u64,
    #[serde(default)]
    pub devlog_seconds_total: u64,
}

/// Regional prices of a store item, in biscuits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCost {
    #[serde(default)]
    pub base_cost: Option<i64>,
    #[serde(default)]
    pub us: Option<i64>,
    #[serde(default)]
    pub eu: Option<i64>,
    #[serde(default)]
    pub uk: Option<i64>,
    #[serde(default)]
    pub ca: Option<i64>,
}

impl TicketCost {
    pub fn regional(&self) -> [Option<i64>; 4] {
        [self.us, self.eu, self.uk, self.ca]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAvailability {
    #[serde(default)]
    pub enabled_us: bool,
    #[serde(default)]
    pub enabled_eu: bool,
    #[serde(default)]
    pub enabled_uk: bool,
    #[serde(default)]
    pub enabled_ca: bool,
    #[serde(default)]
    pub enabled_au: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: StoreItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub limited: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ticket_cost: TicketCost,
    #[serde(default)]
    pub enabled: RegionAvailability,
}

impl StoreItem {
    pub fn base_cost(&self) -> Option<i64> {
        self.ticket_cost.base_cost
    }
}
