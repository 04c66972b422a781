// File: ./src/model/contact.rs
use crate::error::{LostFoundError, Result};
use crate::model::item::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub item_id: String,
    pub name: String,
    pub email: String,
    pub mail_action: String,
    pub phone: Option<String>,
    pub phone_action: Option<String>,
}

pub fn mail_subject(item: &Item) -> String {
    format!("Regarding your {} item: {}", item.kind, item.title)
}

/// Percent-encodes both halves of the address so it cannot add header fields.
fn mailto_address(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!(
            "{}@{}",
            urlencoding::encode(local),
            urlencoding::encode(domain)
        ),
        None => urlencoding::encode(email).into_owned(),
    }
}

impl ContactCard {
    pub fn for_item(item: &Item) -> Self {
        let subject = mail_subject(item);
        let mail_action = format!(
            "mailto:{}?subject={}",
            mailto_address(&item.contact_email),
            urlencoding::encode(&subject)
        );

        let phone = item
            .contact_phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let phone_action = phone.as_ref().map(|p| {
            let dial: String = p.chars().filter(|c| !c.is_whitespace()).collect();
            format!("tel:{}", dial)
        });

        Self {
            item_id: item.id.clone(),
            name: item.contact_name.clone(),
            email: item.contact_email.clone(),
            mail_action,
            phone,
            phone_action,
        }
    }
}

/// Looks the item up by id (full scan) and builds its contact actions.
pub fn resolve_contact(items: &[Item], id: &str) -> Result<ContactCard> {
    items
        .iter()
        .find(|item| item.id == id)
        .map(ContactCard::for_item)
        .ok_or_else(|| LostFoundError::NotFound(id.to_string()))
}
