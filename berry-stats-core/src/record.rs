use berry_stats_common::BerryAttribute;
use serde::{Deserialize, Serialize};

/// one berry as normalized from the provider's detail payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BerryRecord {
    pub name: String,
    pub growth_time: u32,
    pub max_harvest: u32,
    pub natural_gift_power: u32,
    pub size: u32,
    pub smoothness: u32,
    pub soil_dryness: u32,
}

impl BerryRecord {
    pub fn value(&self, attribute: BerryAttribute) -> f64 {
        let v = match attribute {
            BerryAttribute::GrowthTime => self.growth_time,
            BerryAttribute::MaxHarvest => self.max_harvest,
            BerryAttribute::NaturalGiftPower => self.natural_gift_power,
            BerryAttribute::Size => self.size,
            BerryAttribute::Smoothness => self.smoothness,
            BerryAttribute::SoilDryness => self.soil_dryness,
        };
        v as f64
    }
}

/// berries in pagination order; order has no meaning for aggregation
pub type Catalog = Vec<BerryRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_payload_ignores_unrelated_fields() {
        let raw = r#"{
            "id": 1, "name": "cheri", "growth_time": 3, "max_harvest": 5,
            "natural_gift_power": 60, "size": 20, "smoothness": 25, "soil_dryness": 15,
            "firmness": {"name": "soft", "url": "https://pokeapi.co/api/v2/berry-firmness/2/"}
        }"#;
        let rec: BerryRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.name, "cheri");
        assert_eq!(rec.value(BerryAttribute::GrowthTime), 3.0);
        assert_eq!(rec.value(BerryAttribute::NaturalGiftPower), 60.0);
    }

    #[test]
    fn missing_numeric_field_fails_to_parse() {
        let raw = r#"{"name": "cheri", "max_harvest": 5, "natural_gift_power": 60,
            "size": 20, "smoothness": 25, "soil_dryness": 15}"#;
        assert!(serde_json::from_str::<BerryRecord>(raw).is_err());
    }
}
