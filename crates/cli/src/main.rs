//! H5P Editor CLI - inspect and maintain the editor's library & translation store

mod cleanup;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;

use h5p_editor_core::application::{CleanupConfig, EditorStorage, TmpFileCleanup};
use h5p_editor_core::domain::{EditorLibrary, LibraryRef};
use h5p_editor_core::port::time_provider::SystemTimeProvider;
use h5p_editor_core::port::{NoopAssetHook, StaticCapability};
use h5p_editor_sqlite::{
    create_pool, run_migrations, SqliteLibraryRepository, SqliteStoreConfig,
    SqliteTmpFileRepository, TablePrefix,
};

const DEFAULT_DB_PATH: &str = "~/.h5p/editor.db";
const DEFAULT_TABLE_PREFIX: &str = "wp_";

#[derive(Parser)]
#[command(name = "h5p-editor")]
#[command(about = "H5P editor library & translation store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (or sqlite:: URL)
    #[arg(long, env = "H5P_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: String,

    /// Table name prefix
    #[arg(long, env = "H5P_TABLE_PREFIX", default_value = DEFAULT_TABLE_PREFIX)]
    table_prefix: String,

    /// Act as a user allowed to manage libraries (sees restricted libraries as unrestricted)
    #[arg(long, env = "H5P_MANAGE_LIBRARIES")]
    manage_libraries: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the translation JSON of a library
    Translation {
        /// Library, e.g. "H5P.MultiChoice 1.16"
        library: LibraryRef,

        /// Language code (e.g. nb, de, fr)
        language: String,
    },

    /// List languages a library is translated into
    Languages {
        /// Library, e.g. "H5P.MultiChoice 1.16"
        library: LibraryRef,
    },

    /// List the content types offered by the editor
    Libraries {
        /// Only load these libraries (repeatable), e.g. --only "H5P.Blanks 1.14"
        #[arg(long = "only")]
        only: Vec<LibraryRef>,

        /// Include outdated versions
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Mark an uploaded file as permanent
    KeepFile {
        /// File path as stored in the temporary file list
        path: String,
    },

    /// Put an uploaded file on the temporary file list
    TrackFile {
        /// File path relative to the upload directory
        path: String,
    },

    /// Purge temporary files that were never saved with content
    Cleanup {
        /// Maximum age in hours
        #[arg(long, default_value = "24")]
        max_age_hours: u64,

        /// Upload directory the stored paths are relative to; files are unlinked when given
        #[arg(long)]
        upload_dir: Option<PathBuf>,
    },
}

#[derive(Tabled)]
struct LibraryTableRow {
    name: String,
    version: String,
    title: String,
    runnable: bool,
    restricted: bool,
    outdated: bool,
}

impl From<&EditorLibrary> for LibraryTableRow {
    fn from(library: &EditorLibrary) -> Self {
        Self {
            name: library.name.clone(),
            version: library.version().to_string(),
            title: library.title.clone(),
            runnable: library.runnable,
            restricted: library.restricted,
            outdated: library.is_old,
        }
    }
}

/// Store wiring shared by every command
struct Store {
    storage: EditorStorage,
    cleanup_repo: Arc<SqliteTmpFileRepository>,
}

async fn open_store(cli: &Cli) -> Result<Store> {
    let database_url = shellexpand::tilde(&cli.db).into_owned();
    let table_prefix = TablePrefix::new(cli.table_prefix.clone())?;

    if !database_url.starts_with("sqlite:") {
        if let Some(parent) = PathBuf::from(&database_url).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
    }

    info!(db_path = %database_url, prefix = %table_prefix, "Initializing database...");

    let config = SqliteStoreConfig {
        database_url,
        table_prefix,
        ..Default::default()
    };

    let pool = create_pool(&config).await.context("DB pool creation failed")?;
    run_migrations(&pool, &config.table_prefix)
        .await
        .context("Migration failed")?;

    // DI wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let libraries = Arc::new(SqliteLibraryRepository::new(
        pool.clone(),
        &config.table_prefix,
    ));
    let tmp_files = Arc::new(SqliteTmpFileRepository::new(pool, &config.table_prefix));

    let storage = EditorStorage::new(
        libraries,
        tmp_files.clone(),
        Arc::new(StaticCapability::new(cli.manage_libraries)),
        Arc::new(NoopAssetHook),
        time_provider,
    );

    Ok(Store {
        storage,
        cleanup_repo: tmp_files,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging()?;

    let store = open_store(&cli).await?;

    match cli.command {
        Commands::Translation { library, language } => {
            let translation = store
                .storage
                .get_translation(
                    &library.name,
                    library.major_version,
                    library.minor_version,
                    &language,
                )
                .await?;

            match translation {
                Some(json) => println!("{}", json),
                None => {
                    eprintln!(
                        "{}",
                        format!("No {} translation for {}", language, library).yellow()
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Languages { library } => {
            let languages = store
                .storage
                .available_languages(&library.name, library.major_version, library.minor_version)
                .await?;

            if languages.is_empty() {
                println!("{}", format!("No translations for {}", library).yellow());
            } else {
                println!("{}", languages.join("\n"));
            }
        }

        Commands::Libraries { only, all, json } => {
            let requested = if only.is_empty() { None } else { Some(only) };
            let mut libraries = store.storage.list_libraries(requested).await?;

            if !all {
                libraries.retain(|l| !l.is_old);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&libraries)?);
            } else if libraries.is_empty() {
                println!("{}", "No libraries available".yellow());
            } else {
                let rows: Vec<LibraryTableRow> = libraries.iter().map(Into::into).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::KeepFile { path } => {
            store.storage.mark_file_permanent(&path).await?;
            println!("{}", format!("✓ {} kept", path).green().bold());
        }

        Commands::TrackFile { path } => {
            store.storage.mark_file_for_cleanup(&path).await?;
            println!("{}", format!("✓ {} marked for cleanup", path).green().bold());
        }

        Commands::Cleanup {
            max_age_hours,
            upload_dir,
        } => {
            let purger = TmpFileCleanup::new(
                store.cleanup_repo,
                Arc::new(SystemTimeProvider),
                CleanupConfig {
                    max_age: cleanup::max_age_from_hours(max_age_hours)?,
                },
            );

            let purged = purger.purge_expired().await?;
            let unlinked = match &upload_dir {
                Some(dir) => cleanup::unlink_purged(dir, &purged).await,
                None => 0,
            };

            println!("  {} {} entries purged", "✓".green(), purged.len());
            if upload_dir.is_some() {
                println!("  {} {} files deleted", "✓".green(), unlinked);
            }
        }
    }

    Ok(())
}
