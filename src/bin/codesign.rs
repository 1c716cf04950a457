//! Code Signing Service command-line client
//!
//! ## Usage
//!
//! ```bash
//! # Log in (password from CODESIGN_PASSWORD or stdin)
//! codesign login alice
//!
//! # Sign a file and save the result
//! codesign sign ./build/app.exe
//! codesign history
//! codesign download 42 -o app-signed.exe
//!
//! # Admin: manage signing pages
//! codesign pages list --filter contoso
//! codesign pages create --title contoso --owner contoso --generate-password \
//!     --account-name contoso-signing --certificate-name contoso-cert ...
//! codesign pages delete 7
//!
//! # Admin: sign on behalf of a page
//! codesign --page 7 sign ./build/app.exe
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use codesign_sdk::config::{ClientConfig, ENV_API_URL, ENV_PAGE_ID, ENV_SESSION_FILE};
use codesign_sdk::domain::admin::client::DEFAULT_ACTIVITY_LIMIT;
use codesign_sdk::prelude::*;
use codesign_sdk::session::file::default_session_path;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codesign")]
#[command(about = "Client for the Code Signing Service")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = ENV_API_URL)]
    api_url: Option<String>,

    /// Session file (defaults to the user config directory)
    #[arg(long, env = ENV_SESSION_FILE)]
    session_file: Option<PathBuf>,

    /// Signing page to act on behalf of (admins only)
    #[arg(long, env = ENV_PAGE_ID)]
    page: Option<PageId>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session
    Login {
        username: String,
        #[arg(long, env = "CODESIGN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Manage signing pages (admin)
    #[command(subcommand)]
    Pages(PagesCommand),
    /// Page and signed-file counts (admin)
    Stats,
    /// Recently created pages (admin)
    Activity {
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_LIMIT)]
        limit: u32,
    },
    /// Upload a file without waiting for it to be signed
    Upload { path: PathBuf },
    /// Upload a file and wait until it is signed
    Sign { path: PathBuf },
    /// List submitted files
    History {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Save a signed file
    Download {
        id: FileId,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum PagesCommand {
    List {
        /// Case-insensitive match on title or owner
        #[arg(long, default_value = "")]
        filter: String,
    },
    Show {
        id: PageId,
    },
    Create(CreatePageArgs),
    Update(UpdatePageArgs),
    Delete {
        id: PageId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct CreatePageArgs {
    #[arg(long)]
    title: String,
    /// Username of an account to create for the page
    #[arg(long)]
    owner: Option<String>,
    #[arg(long, requires = "owner", conflicts_with = "generate_password")]
    owner_password: Option<String>,
    /// Generate a strong password for the new owner account
    #[arg(long, requires = "owner")]
    generate_password: bool,
    /// Existing user id to own the page
    #[arg(long, conflicts_with = "owner")]
    owner_id: Option<i64>,
    #[command(flatten)]
    credentials: CredentialArgs,
}

#[derive(Args, Debug)]
struct UpdatePageArgs {
    id: PageId,
    #[arg(long)]
    page_url: Option<String>,
    #[command(flatten)]
    credentials: CredentialArgs,
}

#[derive(Args, Debug, Default)]
struct CredentialArgs {
    #[arg(long)]
    account_uri: Option<String>,
    #[arg(long)]
    account_name: Option<String>,
    #[arg(long)]
    certificate_name: Option<String>,
    #[arg(long)]
    tenant_id: Option<String>,
    #[arg(long)]
    client_id: Option<String>,
    #[arg(long, env = "CODESIGN_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("codesign_sdk=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::default();
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    config.session_file = Some(cli.session_file.clone().unwrap_or_else(default_session_path));
    config.impersonate_page = cli.page;

    let client = SigningClient::builder().from_config(&config).build()?;
    client.auth().restore().await?;

    let result = run(&client, cli.command).await;
    if let Err(e) = &result {
        if let Some(sdk) = e.downcast_ref::<SdkError>() {
            if let Some(landing) = client.auth().handle_failure(sdk).await {
                eprintln!("Session expired; log in again ({})", landing);
            }
        }
    }
    result
}

async fn run(client: &SigningClient, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => login(client, &username, password).await,
        Command::Logout => {
            client.auth().logout().await;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            match client.auth().current_session().await {
                Some(s) => println!("{} ({})", s.username, s.role),
                None => println!("Not logged in"),
            }
            Ok(())
        }
        Command::Pages(cmd) => {
            client.auth().require_admin().await?;
            pages(client, cmd).await
        }
        Command::Stats => {
            client.auth().require_admin().await?;
            let stats = client.admin().dashboard().await?;
            println!("Signing pages: {}", stats.pages);
            println!("Files signed:  {}", stats.signed_files);
            Ok(())
        }
        Command::Activity { limit } => {
            client.auth().require_admin().await?;
            let entries = client.admin().recent_activity(limit).await?;
            if entries.is_empty() {
                println!("No recent activity");
            }
            for entry in entries {
                println!(
                    "{:<14} {:<32} {}",
                    entry.action,
                    entry.page_url,
                    entry
                        .at
                        .map(|at| format!("{} UTC", at.format("%Y-%m-%dT%H:%M:%S")))
                        .unwrap_or_else(|| "N/A".to_string())
                );
            }
            Ok(())
        }
        Command::Upload { path } => {
            require_login(client).await?;
            let file = SelectedFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let record = client.files().upload(Some(file), progress_printer()).await?;
            println!("Uploaded {} as #{} ({})", record.file_name, record.id, record.status);
            Ok(())
        }
        Command::Sign { path } => {
            require_login(client).await?;
            let file = SelectedFile::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let outcome = client.files().sign(Some(file), progress_printer()).await?;
            println!(
                "#{} {} is {}",
                outcome.file.id, outcome.file.file_name, outcome.file.status
            );
            if outcome.file.status.is_downloadable() {
                println!("Download with: codesign download {}", outcome.file.id);
            }
            Ok(())
        }
        Command::History { skip, limit } => {
            require_login(client).await?;
            let files = client.files().history(skip, limit).await?;
            if files.is_empty() {
                println!("No files found");
            }
            for f in files {
                println!(
                    "{:>6}  {:<40} {:<12} {}",
                    f.id,
                    f.file_name,
                    f.status,
                    format_date(&f.uploaded_at)
                );
            }
            Ok(())
        }
        Command::Download { id, output } => {
            require_login(client).await?;
            let download = client.files().download(id).await?;
            let target = output.unwrap_or_else(|| PathBuf::from(&download.file_name));
            tokio::fs::write(&target, &download.bytes)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!(
                "Saved {} ({})",
                target.display(),
                format_file_size(download.bytes.len() as u64)
            );
            Ok(())
        }
    }
}

async fn login(client: &SigningClient, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    match client.auth().login(username, &password).await {
        LoginOutcome::Authenticated { session, landing } => {
            println!("Logged in as {} ({}), landing {}", session.username, session.role, landing);
            Ok(())
        }
        LoginOutcome::Rejected { message } => bail!(message),
    }
}

async fn pages(client: &SigningClient, cmd: PagesCommand) -> Result<()> {
    let admin = client.admin();
    match cmd {
        PagesCommand::List { filter } => {
            let mut directory = PageDirectory::new();
            admin.refresh(&mut directory).await?;
            match directory.rows(&filter) {
                PageRows::Placeholder(text) => println!("{}", text),
                PageRows::Pages(rows) => {
                    for p in rows {
                        println!(
                            "{:>5}  {:<24} {:<24} {:<24} {}  {}",
                            p.id,
                            p.title,
                            p.account_name.as_deref().unwrap_or("N/A"),
                            p.certificate_name.as_deref().unwrap_or("N/A"),
                            created(&p.created_at),
                            p.status
                        );
                    }
                }
            }
        }
        PagesCommand::Show { id } => {
            let p = admin.get_page(id).await?;
            let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
            println!("id:               {}", p.id);
            println!("title:            {}", p.title);
            println!("page url:         {}", p.page_url);
            println!("owner:            {}", field(&p.owner_username));
            println!("account uri:      {}", field(&p.account_uri));
            println!("account name:     {}", field(&p.account_name));
            println!("certificate name: {}", field(&p.certificate_name));
            println!("tenant id:        {}", field(&p.tenant_id));
            println!("client id:        {}", field(&p.client_id));
            println!("created:          {}", created(&p.created_at));
            println!("status:           {}", p.status);
        }
        PagesCommand::Create(args) => {
            let owner = match (args.owner, args.owner_password, args.generate_password) {
                (Some(username), Some(password), _) => Some(NewAccount::new(username, password)),
                (Some(username), None, true) => {
                    let account = NewAccount::with_generated_password(username);
                    println!("Generated password for {}: {}", account.username, account.password);
                    Some(account)
                }
                (Some(_), None, false) => {
                    bail!("--owner needs --owner-password or --generate-password")
                }
                (None, _, _) => None,
            };
            let c = args.credentials;
            let form = NewSigningPage {
                title: args.title,
                owner,
                owner_id: args.owner_id,
                account_uri: c.account_uri.unwrap_or_default(),
                account_name: c.account_name.unwrap_or_default(),
                certificate_name: c.certificate_name.unwrap_or_default(),
                tenant_id: c.tenant_id.unwrap_or_default(),
                client_id: c.client_id.unwrap_or_default(),
                client_secret: c.client_secret.unwrap_or_default(),
            };
            let page = admin.create_page(&form).await?;
            println!("Signing page created: #{} {}", page.id, page.page_url);
        }
        PagesCommand::Update(args) => {
            let mut form = admin.edit_form(args.id).await?;
            let c = args.credentials;
            overlay(&mut form.page_url, args.page_url);
            overlay(&mut form.account_uri, c.account_uri);
            overlay(&mut form.account_name, c.account_name);
            overlay(&mut form.certificate_name, c.certificate_name);
            overlay(&mut form.tenant_id, c.tenant_id);
            overlay(&mut form.client_id, c.client_id);
            overlay(&mut form.client_secret, c.client_secret);
            let page = admin.update_page(args.id, &form).await?;
            println!("Signing page updated: #{} {}", page.id, page.page_url);
        }
        PagesCommand::Delete { id, yes } => {
            let confirm = |prompt_text: &str| {
                yes || prompt(&format!("{} [y/N] ", prompt_text))
                    .map(|a| matches!(a.trim(), "y" | "Y" | "yes"))
                    .unwrap_or(false)
            };
            match admin.delete_page(id, &confirm).await? {
                DeleteOutcome::Deleted => println!("Signing page deleted"),
                DeleteOutcome::Cancelled => println!("Cancelled"),
            }
        }
    }
    Ok(())
}

async fn require_login(client: &SigningClient) -> Result<()> {
    if client.auth().current_session().await.is_none() {
        bail!("Not logged in; run `codesign login <username>` first");
    }
    Ok(())
}

fn created(at: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.as_ref().map(format_date).unwrap_or_else(|| "N/A".to_string())
}

fn overlay(field: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *field = v;
    }
}

fn prompt(text: &str) -> Result<String> {
    eprint!("{}", text);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Renders upload events on stderr as they arrive.
fn progress_printer() -> impl Fn(UploadEvent) + Send + Sync + 'static {
    let tracker = Arc::new(Mutex::new(UploadTracker::new()));
    move |event| {
        let Ok(mut tracker) = tracker.lock() else {
            return;
        };
        if tracker.apply(&event) {
            let state = tracker.state();
            if state.is_terminal() {
                eprintln!("\r{}", state.status_text());
            } else {
                eprint!("\r{:<32}", state.status_text());
            }
        }
    }
}
