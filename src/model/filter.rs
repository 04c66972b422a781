// File: ./src/model/filter.rs
// Narrowing the board down to what the user asked for
use crate::model::item::{Item, ItemType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ItemType),
}

impl TypeFilter {
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        value.parse().map(TypeFilter::Only)
    }

    /// All -> lost -> found -> All
    pub fn cycle(self) -> Self {
        match self {
            TypeFilter::All => TypeFilter::Only(ItemType::Lost),
            TypeFilter::Only(ItemType::Lost) => TypeFilter::Only(ItemType::Found),
            TypeFilter::Only(ItemType::Found) => TypeFilter::All,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(kind) => kind.as_str(),
        }
    }

    fn matches(&self, kind: ItemType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c,
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemFilter {
    pub search: String,
    pub kind: TypeFilter,
    pub category: CategoryFilter,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if !item.is_active() {
            return false;
        }
        if !self.kind.matches(item.kind) || !self.category.matches(&item.category) {
            return false;
        }
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&item.title, &item.description, &item.location]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Active items passing every predicate, in input order.
pub fn filter(items: &[Item], criteria: &ItemFilter) -> Vec<Item> {
    filter_refs(items, criteria).into_iter().cloned().collect()
}

pub fn filter_refs<'a>(items: &'a [Item], criteria: &ItemFilter) -> Vec<&'a Item> {
    items.iter().filter(|item| criteria.matches(item)).collect()
}

/// Indices into `items` of the visible entries, for views that keep the master list.
pub fn filter_indices(items: &[Item], criteria: &ItemFilter) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| criteria.matches(item))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{ItemFields, ItemStatus};

    fn item(kind: ItemType, title: &str, category: &str, location: &str) -> Item {
        Item::new(
            ItemFields {
                kind,
                title: title.to_string(),
                description: format!("{} description", title),
                category: category.to_string(),
                location: location.to_string(),
                contact_name: "Alice".to_string(),
                contact_email: "a@x.com".to_string(),
                contact_phone: None,
            },
            None,
        )
    }

    fn board() -> Vec<Item> {
        let mut resolved = item(ItemType::Lost, "Red Backpack", "Bags/Backpacks", "Gym");
        resolved.status = ItemStatus::Resolved;
        vec![
            item(ItemType::Lost, "Blue Backpack", "Bags/Backpacks", "Main Library"),
            item(ItemType::Found, "Car keys", "Keys", "Parking lot B"),
            resolved,
            item(ItemType::Found, "Umbrella", "Other", "Library entrance"),
        ]
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn empty_filter_shows_all_active_in_order() {
        let items = board();
        let out = filter(&items, &ItemFilter::default());
        assert_eq!(titles(&out), vec!["Blue Backpack", "Car keys", "Umbrella"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_description_location() {
        let items = board();
        let by_title = ItemFilter {
            search: "backpack".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&filter(&items, &by_title)), vec!["Blue Backpack"]);

        let by_location = ItemFilter {
            search: "LIBRARY".to_string(),
            ..Default::default()
        };
        assert_eq!(
            titles(&filter(&items, &by_location)),
            vec!["Blue Backpack", "Umbrella"]
        );

        let by_description = ItemFilter {
            search: "keys desc".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&filter(&items, &by_description)), vec!["Car keys"]);
    }

    #[test]
    fn whitespace_search_is_treated_as_empty() {
        let items = board();
        let criteria = ItemFilter {
            search: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(filter(&items, &criteria).len(), 3);
    }

    #[test]
    fn type_and_category_must_both_match() {
        let items = board();
        let criteria = ItemFilter {
            search: String::new(),
            kind: TypeFilter::Only(ItemType::Found),
            category: CategoryFilter::Only("Keys".to_string()),
        };
        assert_eq!(titles(&filter(&items, &criteria)), vec!["Car keys"]);

        let mismatch = ItemFilter {
            kind: TypeFilter::Only(ItemType::Lost),
            category: CategoryFilter::Only("Keys".to_string()),
            ..Default::default()
        };
        assert!(filter(&items, &mismatch).is_empty());
    }

    #[test]
    fn resolved_items_never_pass() {
        let items = board();
        let criteria = ItemFilter {
            search: "red".to_string(),
            ..Default::default()
        };
        assert!(filter(&items, &criteria).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = board();
        let criteria = ItemFilter {
            search: "b".to_string(),
            kind: TypeFilter::All,
            category: CategoryFilter::All,
        };
        let first = filter(&items, &criteria);
        let second = filter(&items, &criteria);
        assert_eq!(first, second);
        assert_eq!(filter(&first, &criteria), first);
    }

    #[test]
    fn indices_point_into_master_list() {
        let items = board();
        let criteria = ItemFilter {
            kind: TypeFilter::Only(ItemType::Found),
            ..Default::default()
        };
        assert_eq!(filter_indices(&items, &criteria), vec![1, 3]);
    }

    #[test]
    fn parses_filter_values() {
        assert_eq!(TypeFilter::parse("all"), Ok(TypeFilter::All));
        assert_eq!(TypeFilter::parse("Lost"), Ok(TypeFilter::Only(ItemType::Lost)));
        assert!(TypeFilter::parse("stolen").is_err());
        assert_eq!(CategoryFilter::parse("ALL"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Keys"),
            CategoryFilter::Only("Keys".to_string())
        );
        assert_eq!(TypeFilter::All.cycle().cycle().cycle(), TypeFilter::All);
    }
}
