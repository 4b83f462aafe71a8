use std::process::ExitCode;

use clap::Args;
use returncheck_core::ChecksumReport;

#[derive(Args)]
pub struct ChecksumArgs {
    /// Barcode digits, check digit included.
    pub barcode: String,
}

impl ChecksumArgs {
    /// Prints the report; exits non-zero when the check digit is wrong.
    pub fn run(self) -> anyhow::Result<ExitCode> {
        let report = ChecksumReport::for_code(self.barcode.trim());
        println!("{}", serde_json::to_string_pretty(&report)?);

        Ok(if report.valid_checksum { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}
