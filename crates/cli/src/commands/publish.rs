//! `showcase publish`
//!
//! Walks the admin through the same confirmations every time: a large
//! payload, an endpoint visitors do not read from, and the overwrite itself.

use showcase_core::CloudSettings;
use showcase_sync::{PayloadReport, PayloadSize, PublishGate, PublishOutcome, PublishSummary};
use tracing::{info, warn};

use super::prompt::confirm_or_assume;
use super::{CommandError, open_editing_session};

/// Interactive gate; `assume_yes` answers every prompt with yes.
pub struct TerminalGate {
    assume_yes: bool,
}

impl TerminalGate {
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, question: &str) -> bool {
        match confirm_or_assume(question, self.assume_yes) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Could not read answer, treating it as no");
                false
            }
        }
    }
}

#[allow(clippy::print_stderr)]
impl PublishGate for TerminalGate {
    fn confirm_large_payload(&mut self, report: &PayloadReport, threshold_kb: f64) -> bool {
        eprintln!(
            "The catalog is {} (warning threshold {threshold_kb:.0} KB) and may be rejected by the store.",
            report.size
        );
        eprintln!("Largest records:");
        for record in &report.heaviest {
            let image = record
                .embedded_image_bytes
                .map_or_else(String::new, |bytes| {
                    format!(", embedded image {}", PayloadSize::from_bytes(bytes))
                });
            eprintln!("  {} {} \"{}\": {}{image}", record.kind, record.id, record.label, record.size);
        }
        if report.embedded_images().next().is_some() {
            eprintln!("Hint: replace embedded images with hosted URLs or smaller files.");
        }
        self.ask("Publish anyway?")
    }

    fn acknowledge_endpoint_mismatch(&mut self, admin: &CloudSettings, public: &CloudSettings) -> bool {
        eprintln!("Warning: this publish goes to a document visitors do not read.");
        eprintln!("  admin endpoint:  {}", admin.normalized_endpoint());
        if public.is_usable() {
            eprintln!("  public endpoint: {}", public.normalized_endpoint());
        } else {
            eprintln!("  public endpoint: (not configured in this build)");
        }
        eprintln!("Visitors will not see these changes. This is expected only for staging.");
        self.ask("Publish to the admin endpoint anyway?")
    }

    fn confirm_overwrite(&mut self, summary: &PublishSummary) -> bool {
        eprintln!(
            "About to replace {} with {} products and {} case studies ({}).",
            summary.endpoint, summary.products, summary.cases, summary.size
        );
        self.ask("Overwrite the remote catalog?")
    }
}

/// Publish the local catalog.
///
/// # Errors
///
/// Returns error if settings are missing or the store rejects the upload.
pub async fn publish(assume_yes: bool) -> Result<(), CommandError> {
    let mut sync = open_editing_session()?;
    let mut gate = TerminalGate::new(assume_yes);

    match sync.publish(&mut gate).await? {
        PublishOutcome::Published { endpoint, size } => {
            info!(endpoint = %endpoint, size = %size, "Catalog published");
        }
        PublishOutcome::Cancelled(reason) => {
            info!(reason = ?reason, "Publish cancelled, nothing was sent");
        }
    }
    Ok(())
}
