use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pop_corpus::{
    FetchedMessage, Label, LabeledLine, NormalizedRecord, Security, SessionConfig, corpus_line,
    fetch_messages, write_corpus, write_json, write_labeled_csv,
};
use secrecy::SecretString;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch mail over POP3 and export it as clean text")]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ServerArgs {
    /// POP3 server hostname (e.g. pop.gmail.com)
    #[arg(long, env = "POP3_SERVER", global = true)]
    server: Option<String>,

    /// Username or email address
    #[arg(long, env = "POP3_USER", global = true)]
    user: Option<String>,

    /// Port (defaults to 995 with TLS, 110 without)
    #[arg(long, env = "POP3_PORT", global = true)]
    port: Option<u16>,

    /// Connect without TLS. Credentials are sent in cleartext.
    #[arg(long, global = true)]
    no_ssl: bool,

    /// Socket timeout in seconds
    #[arg(long, default_value_t = 60, global = true)]
    timeout: u64,

    /// Delete retrieved messages from the server
    #[arg(long, global = true)]
    delete: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write structured records as a JSON array
    Json {
        /// Output path
        #[arg(long, default_value = "emails.json")]
        out: PathBuf,

        /// Max messages to fetch (newest first)
        #[arg(long, default_value_t = 10)]
        max: usize,
    },
    /// Write one normalized body per line for the classifier
    Corpus {
        /// Output path
        #[arg(long, default_value = "emails.txt")]
        out: PathBuf,

        /// Max messages to fetch (default: all)
        #[arg(long)]
        max: Option<usize>,

        /// Also write a `label,text,label_num` CSV here
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Label used when headers are not trusted or say nothing
        #[arg(long, default_value = "ham")]
        default_label: Label,

        /// Honor X-Spam-Flag / X-Spam-Status
        #[arg(long)]
        trust_spam_headers: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Json { out, max } => {
            let config = session_config(&cli.server, Some(*max))?;
            let messages = fetch_messages(&config)
                .with_context(|| format!("fetching from {}", config.host))?;
            run_json(&messages, out)
        }
        Command::Corpus {
            out,
            max,
            csv,
            default_label,
            trust_spam_headers,
        } => {
            let config = session_config(&cli.server, *max)?;
            let messages = fetch_messages(&config)
                .with_context(|| format!("fetching from {}", config.host))?;
            run_corpus(
                &messages,
                out,
                csv.as_deref(),
                *default_label,
                *trust_spam_headers,
            )
        }
    }
}

fn session_config(args: &ServerArgs, max: Option<usize>) -> Result<SessionConfig> {
    let host = args
        .server
        .clone()
        .context("no server given (use --server or POP3_SERVER)")?;
    let user = args
        .user
        .clone()
        .context("no user given (use --user or POP3_USER)")?;
    let secret = read_secret(&user, &host)?;

    let security = if args.no_ssl {
        Security::Plain
    } else {
        Security::Tls
    };

    let mut config = SessionConfig::new(host, user, secret)
        .security(security)
        .timeout(std::time::Duration::from_secs(args.timeout))
        .max_messages(max)
        .delete_after_fetch(args.delete);
    if let Some(port) = args.port {
        config = config.port(port);
    }
    Ok(config)
}

fn read_secret(user: &str, host: &str) -> Result<SecretString> {
    if let Ok(secret) = std::env::var("POP3_PASSWORD") {
        return Ok(SecretString::from(secret));
    }
    let secret = rpassword::prompt_password(format!("Password for {user}@{host}: "))
        .context("reading password")?;
    Ok(SecretString::from(secret))
}

fn run_json(messages: &[FetchedMessage], out: &Path) -> Result<()> {
    let records: Vec<NormalizedRecord> = messages
        .iter()
        .map(|m| NormalizedRecord::from_tree(&m.tree))
        .collect();

    for (i, record) in records.iter().enumerate() {
        print_summary(i + 1, record);
    }

    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    write_json(&records, BufWriter::new(file))?;
    info!("Wrote {} messages to {}", records.len(), out.display());
    Ok(())
}

fn run_corpus(
    messages: &[FetchedMessage],
    out: &Path,
    csv: Option<&Path>,
    default_label: Label,
    trust_spam_headers: bool,
) -> Result<()> {
    let lines: Vec<String> = messages.iter().map(|m| corpus_line(&m.tree)).collect();
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    write_corpus(&lines, BufWriter::new(file))?;
    info!("Wrote {} messages to {}", lines.len(), out.display());

    if let Some(path) = csv {
        let rows: Vec<LabeledLine> = messages
            .iter()
            .map(|m| LabeledLine::from_tree(&m.tree, default_label, trust_spam_headers))
            .collect();
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_labeled_csv(&rows, BufWriter::new(file))?;
        info!("Wrote {} labeled rows to {}", rows.len(), path.display());
    }
    Ok(())
}

fn print_summary(position: usize, record: &NormalizedRecord) {
    const PREVIEW_CHARS: usize = 120;

    let flat = record.body.replace(['\r', '\n'], " ");
    let preview: String = flat.chars().take(PREVIEW_CHARS).collect();
    let ellipsis = if flat.chars().count() > PREVIEW_CHARS {
        "..."
    } else {
        ""
    };

    println!("\n--- Message {position} ---");
    println!("From: {} <{}>", record.from_name, record.from_email);
    println!("Subject: {}", record.subject);
    println!("Date: {}", record.date);
    println!("Preview: {preview}{ellipsis}");
}
