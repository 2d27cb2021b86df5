//! Catalog items and the detail payload fetched on selection

use serde::{Deserialize, Serialize};

/// Identifier of a catalog item, as issued by the backend
pub type AppId = u64;

/// Summary shape returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: AppId,
    pub title: String,
    /// Wire name is `thumbnail`
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
}

/// Full detail for the selected item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub name: String,
    pub price: String,
    pub description: String,
    /// Review summary generated by the backend
    pub summary: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub header_image: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
}

impl ItemDetail {
    /// Detail with only the fields the transcript needs
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            description: description.into(),
            summary: summary.into(),
            categories: Vec::new(),
            genres: Vec::new(),
            header_image: String::new(),
            website: String::new(),
            developers: Vec::new(),
            publishers: Vec::new(),
        }
    }

    /// Text of the system entry appended when this item is selected.
    ///
    /// Embeds name, price, description and summary in that order.
    #[must_use]
    pub fn selection_message(&self) -> String {
        format!(
            "Selected: {}\nPrice: {}\nDescription: {}\n\nReview Summary: {}",
            self.name, self.price, self.description, self.summary
        )
    }
}
