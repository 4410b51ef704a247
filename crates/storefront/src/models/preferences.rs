//! Per-user UI preferences.

use omnicart_core::{ProductId, Theme};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "Bengaluru 562130";
pub const RECENTLY_VIEWED_LIMIT: usize = 10;

/// Preference scalars kept between visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub location: String,
    pub preferred_category: Option<String>,
    pub preferred_sort: Option<String>,
    /// Most recent first, without duplicates.
    pub recently_viewed: Vec<ProductId>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            location: DEFAULT_LOCATION.to_string(),
            preferred_category: None,
            preferred_sort: None,
            recently_viewed: Vec::new(),
        }
    }
}

impl Preferences {
    /// Move `product_id` to the front of the recently viewed list.
    pub fn record_view(&mut self, product_id: ProductId) {
        self.recently_viewed.retain(|id| *id != product_id);
        self.recently_viewed.insert(0, product_id);
        self.recently_viewed.truncate(RECENTLY_VIEWED_LIMIT);
    }
}

/// Partial update of [`Preferences`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub location: Option<String>,
    pub preferred_category: Option<String>,
    pub preferred_sort: Option<String>,
}

/// Category and sort remembered for the next catalog visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseDefaults {
    pub category: Option<String>,
    pub sort: Option<String>,
}
