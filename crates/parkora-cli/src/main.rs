//! Parkora CLI — command-line client for the Parkora partner API.
//!
//! Configure with PARKORA_API_URL (or API_URL). The session token is kept in
//! PARKORA_SESSION_FILE (default ~/.parkora/session.json).

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use parkora_api_client::{ApiClient, RequestControl};
use parkora_cli::{init_tracing, open_session, parse_slot, progress_bar};
use parkora_core::models::{CompanyInfo, LocalFile, RegisterPartnerForm};
use parkora_core::ClientConfig;
use parkora_onboarding::{can_enter, Route, SlotId, VerificationForm};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "parkora", about = "Parkora partner API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Register a partner account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[command(flatten)]
        company: CompanyArgs,
    },
    /// List documents already submitted for verification
    Documents,
    /// Upload a single document
    Upload {
        /// business-license, tax-document or additional-document
        #[arg(value_parser = parse_slot)]
        slot: SlotId,
        /// Path to a PDF, JPEG or PNG file
        file: PathBuf,
    },
    /// Submit verification documents in one batch
    Submit {
        #[arg(long)]
        business_license: Option<PathBuf>,
        #[arg(long)]
        tax_document: Option<PathBuf>,
        #[arg(long)]
        additional_document: Option<PathBuf>,
    },
    /// Check whether the current session may open a page
    Guard {
        /// Route path, e.g. /verification
        path: String,
    },
}

#[derive(Args)]
struct CompanyArgs {
    #[arg(long)]
    company_name: String,
    #[arg(long)]
    business_registration_number: String,
    #[arg(long)]
    tax_identification_number: String,
    #[arg(long)]
    business_type: Option<String>,
    #[arg(long)]
    address_line1: Option<String>,
    #[arg(long)]
    address_line2: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    province: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

impl From<CompanyArgs> for CompanyInfo {
    fn from(args: CompanyArgs) -> Self {
        Self {
            company_name: args.company_name,
            business_registration_number: args.business_registration_number,
            tax_identification_number: args.tax_identification_number,
            business_type: args.business_type,
            address_line1: args.address_line1,
            address_line2: args.address_line2,
            city: args.city,
            state: args.state,
            province: args.province,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_progress(percent: u8) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r{}", progress_bar(percent));
    if percent >= 100 {
        let _ = writeln!(stderr);
    }
    let _ = stderr.flush();
}

fn read_file(path: &Path) -> anyhow::Result<LocalFile> {
    LocalFile::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env().context(
        "Invalid configuration. Check PARKORA_API_URL (or API_URL) and PARKORA_REQUEST_TIMEOUT_SECS",
    )?;
    let session = Arc::new(open_session(&config));
    let client = ApiClient::new(&config, Arc::clone(&session)).context("Failed to create API client")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { username, password } => {
            let user = client.authenticate(&username, &password).await?;
            print_json(&user)?;
        }
        Commands::Logout => {
            session.logout()?;
            print_json(&serde_json::json!({ "success": true, "message": "Signed out" }))?;
        }
        Commands::Whoami => {
            session.ensure_fresh();
            let snapshot = session.snapshot();
            print_json(&serde_json::json!({
                "authenticated": snapshot.is_authenticated,
                "user": snapshot.user,
            }))?;
        }
        Commands::Register {
            email,
            password,
            confirm_password,
            username,
            first_name,
            last_name,
            phone,
            company,
        } => {
            let form = RegisterPartnerForm {
                username,
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                phone,
                company: company.into(),
            };
            let user = client.sign_up(&form).await?;
            print_json(&serde_json::json!({ "registered": true, "user": user }))?;
        }
        Commands::Documents => {
            let documents = client.list_documents().await?;
            print_json(&documents)?;
        }
        Commands::Upload { slot, file } => {
            let local = read_file(&file)?;
            let control = RequestControl::with_progress(print_progress);
            let response = client
                .upload_single(&local, slot.document_type(), &control)
                .await?;
            print_json(&response)?;
        }
        Commands::Submit {
            business_license,
            tax_document,
            additional_document,
        } => {
            let mut form = VerificationForm::default();
            form.on_progress(print_progress);
            form.load_existing(&client).await;

            let picks = [
                (SlotId::BusinessLicense, business_license),
                (SlotId::TaxDocument, tax_document),
                (SlotId::AdditionalDocument, additional_document),
            ];
            for (slot, path) in picks {
                if let Some(path) = path {
                    if let Err(e) = form.select_file(slot, read_file(&path)?) {
                        tracing::warn!(slot = %slot, error = %e, "File not accepted");
                    }
                }
            }

            let outcome = form.submit(&client).await;
            print_json(&outcome)?;
            if !outcome.is_success() {
                anyhow::bail!("Verification was not submitted");
            }
        }
        Commands::Guard { path } => {
            let route = Route::from_path(&path)
                .with_context(|| format!("Unknown route: {}", path))?;
            let decision = can_enter(route, &session);
            print_json(&serde_json::json!({ "route": route.path(), "decision": decision }))?;
        }
    }

    Ok(())
}
