// File: ./src/model/display.rs
// Projects items into plain display data; drawing is the front end's job.
use crate::model::item::{Item, ItemStatus, ItemType};
use chrono::{DateTime, Local, Utc};
use std::borrow::Cow;

pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Where the projected text ends up, which decides how it is neutralized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Html,
    Terminal,
}

impl Surface {
    pub fn escape<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self {
            Surface::Html => escape_html(input),
            Surface::Terminal => strip_control(input),
        }
    }
}

pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Drops control characters (ESC included) so stored text cannot drive the terminal.
pub fn strip_control(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(
        input
            .chars()
            .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect(),
    )
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 item found".to_string()
    } else {
        format!("{} items found", n)
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemCard {
    pub id: String,
    pub kind: ItemType,
    pub badge: &'static str,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub contact_name: String,
    pub date: String,
    pub has_image: bool,
}

impl ItemCard {
    pub fn from_item(item: &Item, surface: Surface) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind,
            badge: match item.kind {
                ItemType::Lost => "LOST",
                ItemType::Found => "FOUND",
            },
            title: surface.escape(&item.title).into_owned(),
            description: surface.escape(&item.description).into_owned(),
            category: surface.escape(&item.category).into_owned(),
            location: surface.escape(&item.location).into_owned(),
            contact_name: surface.escape(&item.contact_name).into_owned(),
            date: format_date(&item.date_reported),
            has_image: item.image_url.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub count_label: String,
    pub cards: Vec<ItemCard>,
}

pub fn project<'a, I>(items: I, surface: Surface) -> Listing
where
    I: IntoIterator<Item = &'a Item>,
{
    let cards: Vec<ItemCard> = items
        .into_iter()
        .map(|item| ItemCard::from_item(item, surface))
        .collect();
    Listing {
        count_label: count_label(cards.len()),
        cards,
    }
}

/// Board-wide counters, taken over the whole store rather than the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub active: usize,
    pub lost: usize,
    pub found: usize,
    pub resolved: usize,
}

impl Stats {
    pub fn collect(items: &[Item]) -> Self {
        let mut stats = Stats::default();
        for item in items {
            match (item.status, item.kind) {
                (ItemStatus::Resolved, _) => stats.resolved += 1,
                (ItemStatus::Active, ItemType::Lost) => {
                    stats.active += 1;
                    stats.lost += 1;
                }
                (ItemStatus::Active, ItemType::Found) => {
                    stats.active += 1;
                    stats.found += 1;
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::ItemFields;
    use chrono::TimeZone;

    fn item(kind: ItemType, title: &str) -> Item {
        Item::new(
            ItemFields {
                kind,
                title: title.to_string(),
                description: "desc".to_string(),
                category: "Other".to_string(),
                location: "Hall".to_string(),
                contact_name: "Alice".to_string(),
                contact_email: "a@x.com".to_string(),
                contact_phone: None,
            },
            None,
        )
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(0), "0 items found");
        assert_eq!(count_label(1), "1 item found");
        assert_eq!(count_label(2), "2 items found");
    }

    #[test]
    fn html_surface_neutralizes_markup() {
        let items = vec![item(ItemType::Lost, "<script>alert('x')</script> & co")];
        let listing = project(&items, Surface::Html);
        assert_eq!(
            listing.cards[0].title,
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt; &amp; co"
        );
        assert_eq!(listing.count_label, "1 item found");
    }

    #[test]
    fn terminal_surface_strips_escape_sequences() {
        assert_eq!(strip_control("red\u{1b}[31m alert"), "red[31m alert");
        assert_eq!(strip_control("two\nlines"), "two lines");
        assert!(matches!(strip_control("plain"), Cow::Borrowed(_)));
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn cards_carry_badge_date_and_image_flag() {
        let mut found = item(ItemType::Found, "Wallet");
        found.image_url = Some("data:image/png;base64,AA==".to_string());
        found.date_reported = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let card = ItemCard::from_item(&found, Surface::Terminal);
        assert_eq!(card.badge, "FOUND");
        assert!(card.has_image);
        assert_eq!(card.date, format_date(&found.date_reported));
        assert!(card.date.ends_with("/2024"));
    }

    #[test]
    fn stats_cover_the_whole_board() {
        let mut done = item(ItemType::Lost, "Scarf");
        done.status = ItemStatus::Resolved;
        let items = vec![
            item(ItemType::Lost, "Phone"),
            item(ItemType::Found, "Gloves"),
            item(ItemType::Found, "Badge"),
            done,
        ];
        assert_eq!(
            Stats::collect(&items),
            Stats {
                active: 3,
                lost: 1,
                found: 2,
                resolved: 1
            }
        );
    }
}
