//! Schema command - print expected input formats

use clap::Args;
use clinic_pricing::catalog::{CsvField, TreatmentRecord};
use clinic_pricing::core::ClinicRecord;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the clinic file
    JsonSchema,
    /// CSV header row of the treatment catalog
    CsvHeader,
    /// Treatment catalog column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => {
                println!("{}", TreatmentRecord::csv_header().join(","));
                Ok(())
            }
            SchemaFormat::CsvFields => {
                print_csv_fields(TreatmentRecord::csv_schema());
                Ok(())
            }
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ClinicRecord);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

fn print_csv_fields(fields: &[CsvField]) {
    println!("Treatment Catalog CSV");
    println!("=====================");
    println!();
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        println!("{:16} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("Amounts are plain decimals in the clinic's currency");
}
