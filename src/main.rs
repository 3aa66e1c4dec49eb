use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fidama::panel::{DirectoryView, Identity, Panel, Request, RequestContext};
use fidama::{EntryType, FileOperator, OperatorConfig, RenamePolicy, ScopedFs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "fidama")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory all paths are confined to
    #[arg(long, env = "FIDAMA_ROOT", default_value = "/", global = true)]
    root: PathBuf,

    /// Refuse to rename onto an existing file or directory
    #[arg(long, env = "FIDAMA_NO_OVERWRITE", global = true)]
    no_overwrite: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List a directory
    Ls {
        /// Directory relative to the root; empty for the root itself
        #[arg(default_value = "")]
        dir: String,
        /// Print the directory view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the content of a file
    Cat { target: String },
    /// Create a new file inside DIR
    Create {
        dir: String,
        filename: String,
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Replace the content of an existing file (read from stdin without --content)
    Update {
        target: String,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a file or an empty directory
    Rm { target: String },
    /// Create directory NAME inside DIR
    Mkdir { dir: String, name: String },
    /// Rename OLD in place to NEW_NAME
    Mv { old: String, new_name: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fidama=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = if cli.no_overwrite {
        RenamePolicy::KEEP_EXISTING
    } else {
        RenamePolicy::OVERWRITE
    };
    let config = OperatorConfig::new(&cli.root).with_rename_policy(policy);
    let fs = ScopedFs::new(config)
        .with_context(|| format!("cannot open root {}", cli.root.display()))?;
    info!(root = %fs.root().display(), overwrite = policy.overwrite, "file operator ready");

    let panel = Panel::new(fs);
    let ctx = RequestContext::authenticated(local_identity()?);

    let request = match cli.command {
        Commands::Ls { dir, json } => return list(&panel, &ctx, &dir, json),
        Commands::Cat { target } => Request::Edit { target },
        Commands::Create {
            dir,
            filename,
            content,
        } => Request::CreateFile {
            dir,
            filename,
            content,
        },
        Commands::Update { target, content } => Request::UpdateFile {
            filename: target,
            content: match content {
                Some(content) => content,
                None => read_stdin()?,
            },
        },
        Commands::Rm { target } => Request::Delete { target },
        Commands::Mkdir { dir, name } => Request::Mkdir { dir, dirname: name },
        Commands::Mv { old, new_name } => Request::Rename {
            old_name: old,
            new_name,
        },
    };

    let outcome = panel.handle(&ctx, request)?;
    if let Some(editor) = outcome.editor() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&editor.content)?;
        stdout.flush()?;
    }
    match (outcome.is_success(), outcome.banner()) {
        (true, Some(banner)) => println!("{}", banner),
        (true, None) => {}
        (false, Some(banner)) => bail!("{}", banner),
        (false, None) => bail!("Failed to {}.", outcome.action()),
    }
    Ok(())
}

fn list(panel: &Panel<ScopedFs>, ctx: &RequestContext, dir: &str, json: bool) -> Result<()> {
    let view = panel.browse(ctx, dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let crumbs: Vec<_> = view.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
    println!("Current Directory: {}", crumbs.join(" / "));
    let Some(rows) = view.rows else {
        bail!("{}", DirectoryView::UNREADABLE);
    };
    for row in rows {
        let kind = match row.kind {
            EntryType::Directory => "Directory",
            EntryType::File => "File",
        };
        let marker = if row.writable { ' ' } else { '!' };
        println!("{:<9} {:>4}{} {}", kind, row.permissions, marker, row.name);
    }
    Ok(())
}

/// The CLI runs as a local operator who is already authenticated by the OS.
fn local_identity() -> Result<Identity> {
    let token = std::env::var("FIDAMA_OPERATOR")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "local".to_string());
    Identity::new(token).ok_or_else(|| anyhow!("operator name must not be empty"))
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("failed to read content from stdin")?;
    Ok(content)
}
