//! DeviantArt Downloader - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use deviantart_downloader::{
    api::{DeviantArtApi, Endpoints, FolderKind},
    cli::Args,
    config::{validate_config, Config, DownloadMode},
    download::{
        list_folders, DownloadSettings, DownloadState, GalleryDownloader, GlobalState, Interrupt,
    },
    error::{exit_codes, Error, Result},
    fs::get_account_folder,
    output::{
        confirm, create_spinner, print_banner, print_config_summary, print_destination_stats,
        print_error, print_folder_entry, print_global_stats, print_info, print_success,
        print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let mut config = match Config::locate(&args.config) {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            Config::load(&path)?
        }
        None if args.public => {
            print_warning(&format!(
                "Configuration file not found: {}",
                args.config.display()
            ));
            print_info("Using default configuration with CLI arguments");
            Config::default()
        }
        None => {
            return Err(Error::Config(format!(
                "Configuration file not found: {}. Create one from config.example.toml",
                args.config.display()
            )))
        }
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let account = config
        .target
        .account
        .clone()
        .ok_or_else(|| Error::MissingConfig("account".to_string()))?;
    let mode = config.settings.download_mode;

    print_config_summary(
        &account,
        &mode.to_string(),
        &config.settings.api.to_string(),
        &config.download_directory(),
        config.settings.max_concurrent_downloads,
    );

    let account_dir = get_account_folder(&config, &account);
    if mode != DownloadMode::List && account_dir.exists() && !args.yes {
        let question = format!("The folder '{}' already exists. Replace contents?", account);
        if !confirm(&question)? {
            print_info("Cancelled.");
            return Ok(());
        }
    }

    print_info("Connecting to DeviantArt...");
    let api = DeviantArtApi::from_config(&config, Endpoints::default()).await?;

    let interrupt = Interrupt::new();
    interrupt.install_ctrl_c_handler();

    if mode == DownloadMode::List {
        return list_gallery_folders(&api, &account, &interrupt).await;
    }

    let downloader = GalleryDownloader::new(
        &api,
        account.as_str(),
        DownloadSettings::from_config(&config)?,
        interrupt,
    );
    let mut global_state = GlobalState::default();

    let result = download(&downloader, &config, &account_dir, &mut global_state).await;

    match &result {
        Ok(states) => states.iter().for_each(print_destination_stats),
        Err(Error::Interrupted) => print_warning("Download interrupted"),
        Err(_) => {}
    }
    print_global_stats(&global_state);

    if result.is_ok() && global_state.failed == 0 {
        print_success("Download complete");
    }

    result.map(|_| ())
}

/// Print every gallery folder of the account.
async fn list_gallery_folders(
    api: &DeviantArtApi,
    account: &str,
    interrupt: &Interrupt,
) -> Result<()> {
    let spinner = create_spinner(&format!("Fetching folders of {}...", account));
    let folders = list_folders(api, account, FolderKind::Gallery, interrupt).await;
    spinner.finish_and_clear();

    let folders = folders?;
    if folders.is_empty() {
        print_info(&format!("{} has no gallery folders", account));
        return Ok(());
    }

    for folder in &folders {
        print_folder_entry(&folder.name, &folder.folder_id);
    }
    Ok(())
}

/// Run the selected download mode.
async fn download(
    downloader: &GalleryDownloader<'_, DeviantArtApi>,
    config: &Config,
    account_dir: &Path,
    global: &mut GlobalState,
) -> Result<Vec<DownloadState>> {
    match config.settings.download_mode {
        DownloadMode::Gallery => Ok(vec![downloader.download_gallery(account_dir, global).await?]),
        DownloadMode::Folder => {
            let folder_id = config
                .settings
                .folder_id
                .as_deref()
                .ok_or_else(|| Error::MissingConfig("folder_id".to_string()))?;
            Ok(vec![
                downloader
                    .download_folder_by_id(folder_id, account_dir, global)
                    .await?,
            ])
        }
        DownloadMode::All => {
            let mut states = downloader.download_all(account_dir, global).await?;
            if config.settings.include_collections {
                states.extend(downloader.download_collections(account_dir, global).await?);
            }
            Ok(states)
        }
        DownloadMode::Collections => downloader.download_collections(account_dir, global).await,
        DownloadMode::List => Ok(Vec::new()),
    }
}
