//! Validate command - surface configuration problems without pricing anything

use super::{collect_treatments, percent, read_clinic_json};
use clap::Args;
use clinic_pricing::core::{
    calculate_clinic_costs, price_treatment, ClinicRecord, PricingError, TaxConfig,
    TaxConfigInput,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Clinic JSON file (or "-" for stdin)
    #[arg(short, long)]
    clinic: PathBuf,

    /// Additional treatments from a catalog CSV
    #[arg(short, long)]
    treatments: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    subject: String,
    message: String,
}

impl ValidationIssue {
    fn from_error(subject: &str, err: &PricingError) -> Self {
        let issue_type = match err {
            PricingError::InvalidConfiguration(_) => "InvalidConfiguration",
            PricingError::InvalidTaxRate { .. } => "InvalidTaxRate",
            PricingError::MissingBracketData(_) => "MissingBracketData",
        };
        ValidationIssue {
            issue_type: issue_type.to_string(),
            subject: subject.to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut value = read_clinic_json(&self.clinic)?;
        let mut issues = Vec::new();

        // Check the tax configuration on its own so a bad one is reported, not fatal
        let raw_tax = value
            .as_object_mut()
            .and_then(|doc| doc.remove("taxConfig"))
            .filter(|v| !v.is_null());
        let tax_config = match raw_tax {
            None => None,
            Some(raw) => {
                let parsed = serde_json::from_value::<TaxConfigInput>(raw)
                    .map_err(|err| PricingError::MissingBracketData(err.to_string()))
                    .and_then(TaxConfig::try_from);
                match parsed {
                    Ok(config) => Some(config),
                    Err(err) => {
                        issues.push(ValidationIssue::from_error("tax configuration", &err));
                        None
                    }
                }
            }
        };

        let mut clinic: ClinicRecord = serde_json::from_value(value)?;
        clinic.tax_config = tax_config;
        let treatments = collect_treatments(&clinic, self.treatments.as_deref())?;

        match calculate_clinic_costs(&clinic) {
            Err(err) => issues.push(ValidationIssue::from_error("clinic costs", &err)),
            Ok(costs) => {
                if costs.fixed_costs_exceed_alert(clinic.goals.monthly_revenue) {
                    if let Some(ratio) = costs.fixed_cost_ratio(clinic.goals.monthly_revenue) {
                        issues.push(ValidationIssue {
                            issue_type: "HighFixedCosts".to_string(),
                            subject: "fixed costs".to_string(),
                            message: format!(
                                "fixed costs are {} of monthly revenue",
                                percent(ratio)
                            ),
                        });
                    }
                }
                for treatment in &treatments {
                    if treatment.duration_minutes == 0 {
                        issues.push(ValidationIssue {
                            issue_type: "ZeroDuration".to_string(),
                            subject: treatment.name.clone(),
                            message: "treatment takes no chair time".to_string(),
                        });
                    }
                    if let Err(err) = price_treatment(
                        treatment,
                        &costs,
                        clinic.goals.profit_margin,
                        clinic.tax_config.as_ref(),
                    ) {
                        issues.push(ValidationIssue::from_error(&treatment.name, &err));
                    }
                }
            }
        }

        if self.json {
            let output = ValidationOutput {
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(issues: &[ValidationIssue]) {
    println!();
    println!("VALIDATION RESULTS");
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
    } else {
        println!("\u{26A0} {} issue(s) found:", issues.len());
        println!();
        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.subject);
            println!("     {}", issue.message);
            println!();
        }
    }
}
