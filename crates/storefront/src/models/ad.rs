//! Promotional ad records.

use omnicart_core::AdId;
use serde::{Deserialize, Serialize};

/// A homepage promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: AdId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
    pub cta_text: String,
    pub cta_link: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

/// Fields accepted when creating an ad; blanks fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdInput {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub enabled: Option<bool>,
}

/// Field-wise update of an existing ad. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub enabled: Option<bool>,
}

pub const DEFAULT_TITLE: &str = "Untitled Ad";
pub const DEFAULT_CTA_TEXT: &str = "Shop Now";
pub const DEFAULT_CTA_LINK: &str = "/customer/home";

impl Ad {
    /// Build an ad from creation input, filling blank fields with defaults.
    #[must_use]
    pub fn from_input(id: AdId, input: AdInput) -> Self {
        Self {
            id,
            title: non_blank(input.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            subtitle: input.subtitle.unwrap_or_default(),
            image_url: input.image_url.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            cta_text: non_blank(input.cta_text).unwrap_or_else(|| DEFAULT_CTA_TEXT.to_string()),
            cta_link: non_blank(input.cta_link).unwrap_or_else(|| DEFAULT_CTA_LINK.to_string()),
            enabled: input.enabled.unwrap_or(true),
        }
    }

    /// Ads shown before any have been configured.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        let ad = |id: &str, title: &str, subtitle: &str, image: &str, category: &str, cta: &str| Self {
            id: AdId::new(id),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            image_url: format!(
                "https://images.unsplash.com/{image}?auto=format&fit=crop&w=1400&q=80"
            ),
            category: category.to_string(),
            cta_text: cta.to_string(),
            cta_link: DEFAULT_CTA_LINK.to_string(),
            enabled: true,
        };

        vec![
            ad(
                "ad-fashion",
                "Fashion Flash Sale",
                "Up to 50% off on daily styles",
                "photo-1445205170230-053b83016050",
                "beauty",
                "Shop Fashion",
            ),
            ad(
                "ad-electronics",
                "Top Rated Electronics",
                "Smart picks curated for you",
                "photo-1519389950473-47ba0277781c",
                "smartphones",
                "Explore Deals",
            ),
            ad(
                "ad-home",
                "Home Essentials Week",
                "Kitchen, decor and storage at better prices",
                "photo-1484101403633-562f891dc89a",
                "home-decoration",
                "Browse Home",
            ),
        ]
    }

    /// Apply a patch in place.
    pub fn apply(&mut self, patch: AdPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(cta_text) = patch.cta_text {
            self.cta_text = cta_text;
        }
        if let Some(cta_link) = patch.cta_link {
            self.cta_link = cta_link;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
    }
}

const fn enabled_by_default() -> bool {
    true
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
