// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod contact;
pub mod display;
pub mod filter;
pub mod item;

pub use contact::{ContactCard, resolve_contact};
pub use display::{ItemCard, Listing, Stats, Surface, project};
pub use filter::{CategoryFilter, ItemFilter, TypeFilter, filter};
pub use item::{Item, ItemFields, ItemStatus, ItemType, KNOWN_CATEGORIES, Transition};
