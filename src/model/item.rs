// File: ./src/model/item.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Categories offered by the report form. Items may still carry any other text.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Electronics",
    "Bags/Backpacks",
    "Keys",
    "Wallets/Purses",
    "Clothing",
    "Jewelry",
    "Documents/IDs",
    "Books",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Lost,
    Found,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Lost => "lost",
            ItemType::Found => "found",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lost" => Ok(ItemType::Lost),
            "found" => Ok(ItemType::Found),
            other => Err(format!("unknown item type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Resolved,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ItemStatus::Active),
            "resolved" => Ok(ItemStatus::Resolved),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Outcome of asking an item to move to a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    Unchanged,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub contact_name: String,
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    pub date_reported: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Builds a fresh active report from validated fields, stamping id and timestamps.
    pub fn new(fields: ItemFields, image_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind: fields.kind,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            location: fields.location,
            contact_name: fields.contact_name,
            contact_email: fields.contact_email,
            contact_phone: fields.contact_phone,
            image_url,
            status: ItemStatus::Active,
            date_reported: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    /// Status only ever moves active -> resolved.
    pub fn transition(&mut self, status: ItemStatus) -> Transition {
        match (self.status, status) {
            (ItemStatus::Active, ItemStatus::Resolved) => {
                self.status = ItemStatus::Resolved;
                self.updated_at = Utc::now();
                Transition::Changed
            }
            (current, requested) if current == requested => Transition::Unchanged,
            _ => Transition::Rejected,
        }
    }
}

/// The user-entered part of an item, already trimmed and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub kind: ItemType,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ItemFields {
        ItemFields {
            kind: ItemType::Found,
            title: "Keys".to_string(),
            description: "Ring with three keys".to_string(),
            category: "Keys".to_string(),
            location: "Cafeteria".to_string(),
            contact_name: "Bob".to_string(),
            contact_email: "bob@example.com".to_string(),
            contact_phone: None,
        }
    }

    #[test]
    fn new_item_is_active_with_matching_timestamps() {
        let item = Item::new(fields(), None);
        assert!(item.is_active());
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.date_reported, item.created_at);
        assert!(Uuid::parse_str(&item.id).is_ok());
    }

    #[test]
    fn status_is_one_way() {
        let mut item = Item::new(fields(), None);
        let before = item.updated_at;
        assert_eq!(item.transition(ItemStatus::Resolved), Transition::Changed);
        assert!(item.updated_at >= before);
        assert_eq!(item.transition(ItemStatus::Resolved), Transition::Unchanged);
        assert_eq!(item.transition(ItemStatus::Active), Transition::Rejected);
        assert_eq!(item.status, ItemStatus::Resolved);
    }

    #[test]
    fn serializes_with_wire_names() {
        let mut item = Item::new(fields(), Some("/uploads/a.png".to_string()));
        item.contact_phone = Some("555-0100".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "found");
        assert_eq!(json["status"], "active");
        assert_eq!(json["contactEmail"], "bob@example.com");
        assert_eq!(json["contactPhone"], "555-0100");
        assert_eq!(json["imageUrl"], "/uploads/a.png");
        assert!(json.get("dateReported").is_some());
    }

    #[test]
    fn missing_status_defaults_to_active() {
        let json = r#"{
            "id": "1", "type": "lost", "title": "t", "description": "d",
            "category": "Other", "location": "l", "contactName": "n",
            "contactEmail": "e@x.com",
            "dateReported": "2024-05-01T10:00:00Z",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert_eq!(item.contact_phone, None);
    }
}
