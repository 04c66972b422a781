use crate::model::{Item, ItemStatus};
use crate::submission::ItemForm;

#[derive(Debug)]
pub enum Action {
    Refresh,
    Submit {
        form: ItemForm,
        image_path: Option<String>,
    },
    SetStatus(String, ItemStatus),
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    ItemsLoaded(Vec<Item>),
    Submitted(Item),
    SubmitFailed(String),
    StatusChanged(Item),
    Error(String),
    Status(String),
}
