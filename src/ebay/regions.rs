//! eBay regional storefronts and their locale conventions.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported eBay storefronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    De,
    Fr,
    It,
    Es,
    Au,
}

impl Region {
    /// Returns the eBay domain for this region.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::Us => "ebay.com",
            Region::Uk => "ebay.co.uk",
            Region::De => "ebay.de",
            Region::Fr => "ebay.fr",
            Region::It => "ebay.it",
            Region::Es => "ebay.es",
            Region::Au => "ebay.com.au",
        }
    }

    /// Returns the base URL for this region.
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Returns the currency code prices on this storefront are quoted in.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::De | Region::Fr | Region::It | Region::Es => "EUR",
            Region::Au => "AUD",
        }
    }

    /// Returns the Accept-Language header value for this region.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Region::Us => "en-US,en;q=0.9",
            Region::Uk => "en-GB,en;q=0.9",
            Region::Au => "en-AU,en;q=0.9",
            Region::De => "de-DE,de;q=0.9,en;q=0.8",
            Region::Fr => "fr-FR,fr;q=0.9,en;q=0.8",
            Region::It => "it-IT,it;q=0.9,en;q=0.8",
            Region::Es => "es-ES,es;q=0.9,en;q=0.8",
        }
    }

    /// Word the storefront places between the bounds of a price range
    /// ("$10.00 to $25.00", "EUR 10,00 bis EUR 25,00").
    pub fn range_separator(&self) -> &'static str {
        match self {
            Region::Us | Region::Uk | Region::Au => "to",
            Region::De => "bis",
            Region::Fr => "à",
            Region::It | Region::Es => "a",
        }
    }

    /// Human-readable site label used in reports, e.g. `eBay (UK)`.
    pub fn site_label(&self) -> String {
        format!("eBay ({})", self.to_string().to_uppercase())
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[Region::Us, Region::Uk, Region::De, Region::Fr, Region::It, Region::Es, Region::Au]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::De => "de",
            Region::Fr => "fr",
            Region::It => "it",
            Region::Es => "es",
            Region::Au => "au",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Region::Us),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "it" | "italy" => Ok(Region::It),
            "es" | "spain" => Ok(Region::Es),
            "au" | "australia" => Ok(Region::Au),
            _ => Err(ValidationError::UnknownRegion(s.to_string())),
        }
    }
}
