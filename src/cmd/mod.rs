pub mod costs;
pub mod init;
pub mod price;
pub mod schema;
pub mod strategy;
pub mod tax;
pub mod validate;

use clinic_pricing::catalog;
use clinic_pricing::core::{ClinicRecord, Treatment};
use clinic_pricing::store::{self, ClinicStore, JsonFileStore};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a clinic document from a file, or from stdin with "-"
pub fn read_clinic(path: &Path) -> anyhow::Result<ClinicRecord> {
    if path.as_os_str() == "-" {
        let value = store::clinic_document(read_stdin_json()?);
        return Ok(serde_json::from_value(value)?);
    }
    match JsonFileStore::new(path).load()? {
        Some(clinic) => Ok(clinic),
        None => anyhow::bail!("Clinic file not found: {}", path.display()),
    }
}

/// Raw JSON of a clinic document, for commands that inspect it piecewise
pub fn read_clinic_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    if path.as_os_str() == "-" {
        return Ok(store::clinic_document(read_stdin_json()?));
    }
    let reader = BufReader::new(File::open(path)?);
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    Ok(store::clinic_document(value))
}

fn read_stdin_json() -> anyhow::Result<serde_json::Value> {
    let mut buffer = Vec::new();
    BufReader::new(io::stdin().lock()).read_to_end(&mut buffer)?;
    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }
    Ok(serde_json::from_slice(&buffer)?)
}

/// The clinic's own treatments followed by any from a catalog CSV
pub fn collect_treatments(
    clinic: &ClinicRecord,
    catalog_path: Option<&Path>,
) -> anyhow::Result<Vec<Treatment>> {
    let mut treatments = clinic.treatments.clone();
    if let Some(path) = catalog_path {
        treatments.extend(catalog::read_csv(File::open(path)?)?);
    }
    Ok(treatments)
}

pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}
