use parkora_api_client::{FileStore, SessionStore};
use parkora_core::ClientConfig;
use parkora_onboarding::SlotId;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Session persisted in the configured session file, hydrated from it.
pub fn open_session(config: &ClientConfig) -> SessionStore {
    let store = FileStore::new(config.session_file.clone());
    let session = SessionStore::new(Box::new(store), config.storage_keys.clone());
    session.initialize();
    session
}

/// Accepts the form field name or a short alias.
pub fn parse_slot(value: &str) -> Result<SlotId, String> {
    match value.trim().to_lowercase().replace(['-', '_'], "").as_str() {
        "businesslicense" | "license" | "businessregistration" => Ok(SlotId::BusinessLicense),
        "taxdocument" | "tax" | "taxidentification" => Ok(SlotId::TaxDocument),
        "additionaldocument" | "additional" => Ok(SlotId::AdditionalDocument),
        other => Err(format!(
            "unknown slot '{}', expected business-license, tax-document or additional-document",
            other
        )),
    }
}

/// `[#####     ]  50%`
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}
