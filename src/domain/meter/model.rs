//! Meter domain entity

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Metered utility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    #[default]
    Electricity,
    Water,
    Gas,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Water => "water",
            Self::Gas => "gas",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electricity" => Ok(Self::Electricity),
            "water" => Ok(Self::Water),
            "gas" => Ok(Self::Gas),
            other => Err(format!("unknown service type: {}", other)),
        }
    }
}

/// Customer category used to select a tariff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerCategory {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Governmental,
    Agricultural,
}

impl CustomerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Governmental => "governmental",
            Self::Agricultural => "agricultural",
        }
    }
}

impl std::fmt::Display for CustomerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" => Ok(Self::Residential),
            "commercial" => Ok(Self::Commercial),
            "industrial" => Ok(Self::Industrial),
            "governmental" => Ok(Self::Governmental),
            "agricultural" => Ok(Self::Agricultural),
            other => Err(format!("unknown customer category: {}", other)),
        }
    }
}

/// Everything the billing engine needs to know about a meter and its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterProfile {
    pub meter_id: i32,
    pub customer_id: i32,
    pub customer_category: CustomerCategory,
    pub service_type: ServiceType,
    /// Tariff explicitly assigned to this meter, bypassing the category schedule
    pub tariff_override_id: Option<i32>,
}

impl MeterProfile {
    pub fn new(
        meter_id: i32,
        customer_id: i32,
        customer_category: CustomerCategory,
        service_type: ServiceType,
    ) -> Self {
        Self {
            meter_id,
            customer_id,
            customer_category,
            service_type,
            tariff_override_id: None,
        }
    }

    pub fn with_tariff_override(mut self, tariff_id: i32) -> Self {
        self.tariff_override_id = Some(tariff_id);
        self
    }
}
