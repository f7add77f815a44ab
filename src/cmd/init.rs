//! Init command - write a starter clinic file

use clap::Args;
use clinic_pricing::core::ClinicRecord;
use clinic_pricing::store::{ClinicStore, JsonFileStore};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitCommand {
    /// Where to write the clinic file
    #[arg(short, long, default_value = "clinic.json")]
    output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists, pass --force to overwrite",
                self.output.display()
            );
        }
        let store = JsonFileStore::new(self.output.clone());
        store.save(&ClinicRecord::template())?;
        println!("Wrote {}", store.path().display());
        println!("Fill in salaries, expenses and equipment, then run `costs`.");
        Ok(())
    }
}
