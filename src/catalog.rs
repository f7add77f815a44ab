//! Treatment catalog import from CSV.

use crate::core::{Material, Treatment};
use clinic_derive::CsvSchema;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Description of one CSV column, generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One row of a treatment catalog CSV
#[derive(Debug, Clone, Serialize, Deserialize, CsvSchema)]
pub struct TreatmentRecord {
    /// Treatment name, unique within the catalog
    pub name: String,
    /// Chair time in minutes
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Total cost of consumables used
    #[serde(default)]
    pub materials_cost: Option<Decimal>,
    /// External laboratory cost
    #[serde(default)]
    pub lab_cost: Option<Decimal>,
    /// Free-form note, ignored by the calculations
    pub note: Option<String>,
}

impl From<TreatmentRecord> for Treatment {
    fn from(record: TreatmentRecord) -> Self {
        let materials = match record.materials_cost {
            Some(cost) if !cost.is_zero() => vec![Material {
                name: "Materials".to_string(),
                cost,
            }],
            _ => Vec::new(),
        };
        Treatment {
            name: record.name,
            duration_minutes: record.duration_minutes,
            materials,
            lab_cost: record.lab_cost.unwrap_or_default(),
        }
    }
}

/// Read treatments from a catalog CSV
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Treatment>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records: Result<Vec<TreatmentRecord>, _> = rdr.deserialize().collect();
    let treatments: Vec<Treatment> = records?.into_iter().map(Into::into).collect();
    log::info!("Read {} treatments from csv", treatments.len());
    Ok(treatments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_catalog() {
        let data = "name,duration,materials_cost,lab_cost,note\n\
                    Cleaning,30,50,,\n\
                    Crown,90,120.5,450,zirconia\n";
        let treatments = read_csv(data.as_bytes()).unwrap();
        assert_eq!(treatments.len(), 2);
        assert_eq!(treatments[0].materials_cost().unwrap(), dec!(50));
        assert_eq!(treatments[0].lab_cost, Decimal::ZERO);
        assert_eq!(treatments[1].duration_minutes, 90);
        assert_eq!(treatments[1].lab_cost, dec!(450));
    }

    #[test]
    fn schema_follows_serde_names() {
        assert_eq!(
            TreatmentRecord::csv_header(),
            vec!["name", "duration", "materials_cost", "lab_cost", "note"]
        );
        let schema = TreatmentRecord::csv_schema();
        assert!(schema[0].required);
        assert!(!schema[2].required);
        assert!(!schema[4].required);
        assert_eq!(schema[1].description, "Chair time in minutes");
    }

    #[test]
    fn missing_duration_fails() {
        let data = "name,duration\nCleaning,\n";
        assert!(read_csv(data.as_bytes()).is_err());
    }
}
