use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use folio::app::FolioApp;
use folio::browse::PaginationWindow;
use folio::config::Config;
use folio::contact::{ContactForm, EmailJsClient, Service};
use folio::locale::Locale;
use folio::models::{ContentSnapshot, SqliteContentStore};

const USAGE: &str = "\
usage: folio [browse|import FILE|contact] [options]

options:
  --db PATH            content database (default: XDG config dir)
  --locale en|ar       display locale
  --page-size N        items shown before \"load more\"
  --page-increment N   items added by each \"load more\"

contact options:
  --name NAME --email ADDRESS --service wedding|portrait|corporate|event|nature
  --message TEXT [--company NAME]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folio=info".parse().context("Invalid log directive")?),
        )
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{USAGE}");
        return Ok(());
    }

    let command = args.subcommand()?.unwrap_or_else(|| "browse".to_string());

    let mut config = Config::from_env();
    if let Some(path) = args.opt_value_from_str::<_, PathBuf>("--db")? {
        config.db_path = Some(path);
    }
    if let Some(locale) = args.opt_value_from_str::<_, Locale>("--locale")? {
        config.locale = locale;
    }
    if let Some(n) = args.opt_value_from_str::<_, usize>("--page-size")? {
        config.page_size = n.max(1);
    }
    if let Some(n) = args.opt_value_from_str::<_, usize>("--page-increment")? {
        config.page_increment = n.max(1);
    }

    match command.as_str() {
        "browse" => {
            warn_unused(args);
            browse(&config)
        }
        "import" => {
            let file: PathBuf = args.free_from_str().context("import needs a JSON file")?;
            warn_unused(args);
            import(&config, &file)
        }
        "contact" => {
            let form = ContactForm {
                name: args.value_from_str("--name")?,
                email: args.value_from_str("--email")?,
                company: args.opt_value_from_str("--company")?,
                service: args.value_from_str::<_, Service>("--service")?,
                message: args.value_from_str("--message")?,
            };
            warn_unused(args);
            contact(&config, &form)
        }
        other => {
            eprintln!("{USAGE}");
            anyhow::bail!("unknown command: {other}")
        }
    }
}

fn warn_unused(args: pico_args::Arguments) {
    let rest = args.finish();
    if !rest.is_empty() {
        warn!(?rest, "Ignoring unused arguments");
    }
}

fn open_store(config: &Config) -> Result<SqliteContentStore> {
    let path = match &config.db_path {
        Some(path) => path.clone(),
        None => SqliteContentStore::default_db_path()?,
    };
    SqliteContentStore::open_or_recover(&path)
        .with_context(|| format!("Failed to open content store at {:?}", path))
}

fn browse(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let pagination = PaginationWindow::new(config.page_size, config.page_increment);
    let app = FolioApp::new(store, config.locale, pagination);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        app.run(stdin, &mut std::io::stdout()).await
    });
    // The stdin reader parks a blocking thread; don't wait on it.
    runtime.shutdown_background();
    result
}

fn import(config: &Config, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read fixture {:?}", file))?;
    let snapshot: ContentSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse fixture {:?}", file))?;

    let mut store = open_store(config)?;
    let stats = store
        .import_snapshot(&snapshot)
        .context("Failed to import content snapshot")?;
    println!(
        "imported {} categories, {} brands, {} media items",
        stats.categories, stats.brands, stats.media
    );
    Ok(())
}

fn contact(config: &Config, form: &ContactForm) -> Result<()> {
    let client = EmailJsClient::from_config(&config.emailjs)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(client.send(form))
        .context("Failed to send contact form")?;
    info!(name = %form.name, "Contact form sent");
    println!("message sent");
    Ok(())
}
