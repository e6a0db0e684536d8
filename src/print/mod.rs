//! Label output
//!
//! Dispatches a rendered label body to the configured destination: the
//! terminal, a raw network printer, or the system print spooler. Printed
//! jobs are recorded in the print journal when one is configured.

pub mod journal;
pub mod network;

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::{PrinterType, Settings};
use crate::error::{LabelError, LabelResult};
use crate::models::LabelFile;

/// Sends rendered label bodies to the configured destination
pub struct Printer {
    printer_type: PrinterType,
    address: String,
    log_file: Option<PathBuf>,
}

impl Printer {
    pub fn from_settings(settings: &Settings) -> Self {
        let log_file = if settings.log_file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(settings.log_file.trim()))
        };

        Self {
            printer_type: settings.printer_type,
            address: settings.printer_address.trim().to_string(),
            log_file,
        }
    }

    /// Emit a filled label
    ///
    /// A record whose fill was cancelled is silently skipped. Screen output
    /// goes to stdout and is never journaled; every other destination
    /// appends to the journal when one is configured.
    pub fn print(&self, file: &LabelFile) -> LabelResult<()> {
        if !file.print {
            return Ok(());
        }

        match self.printer_type {
            PrinterType::Screen => {
                print!("{}", file.body);
                Ok(())
            }
            PrinterType::Network => {
                network::send_raw(&self.address, file.body.as_bytes())?;
                self.journal(&file.body)
            }
            PrinterType::Local | PrinterType::Shared => {
                self.spool(&file.body)?;
                self.journal(&file.body)
            }
        }
    }

    /// Hand the body to the system spooler as a raw job
    fn spool(&self, body: &str) -> LabelResult<()> {
        if self.address.is_empty() {
            return Err(LabelError::Print(
                "No printer name configured".to_string(),
            ));
        }

        let mut child = Command::new("lp")
            .args(["-d", &self.address, "-o", "raw", "-s"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| LabelError::Print(format!("Failed to start lp: {}", e)))?;

        child
            .stdin
            .take()
            .ok_or_else(|| LabelError::Print("Failed to open lp stdin".to_string()))?
            .write_all(body.as_bytes())
            .map_err(|e| LabelError::Print(format!("Failed to write to lp: {}", e)))?;

        let status = child
            .wait()
            .map_err(|e| LabelError::Print(format!("Failed to wait for lp: {}", e)))?;

        if !status.success() {
            return Err(LabelError::Print(format!(
                "lp exited with status {}",
                status
            )));
        }
        Ok(())
    }

    fn journal(&self, body: &str) -> LabelResult<()> {
        match &self.log_file {
            Some(path) => journal::record(path, body),
            None => Ok(()),
        }
    }
}
