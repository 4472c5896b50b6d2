use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use radio_to_tidal::mirror::DedupState;
use radio_to_tidal::{ActivityLog, Config, FfprobeTitleReader, RadioWatcher, TidalClient};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "radio-to-tidal")]
#[command(about = "Mirror the songs played on a radio stream into a TIDAL playlist", long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long, default_value = "config.yaml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Watch the stream and add new songs to today's playlist (default)
    #[default]
    Watch,

    /// Remove all tracks from today's playlist and exit
    ClearPlaylist,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = Config::load(&args.config)?;
    let playlist_name = config.playlist_name(Local::now().date_naive());

    let mut client = TidalClient::connect(config.tidal.clone(), config.session_path())?;
    log::info!("🎧 Logged in as user ID: {}", client.user_id());

    match args.command.unwrap_or_default() {
        Command::Watch => watch(&config, client, &playlist_name),
        Command::ClearPlaylist => clear_playlist(&mut client, &playlist_name),
    }
}

fn watch(config: &Config, mut client: TidalClient, playlist_name: &str) -> Result<()> {
    let playlist = client.find_or_create_playlist(playlist_name, &config.playlist_description)?;

    let reader = FfprobeTitleReader::new(config.ffprobe_path(), config.stream_url.clone())
        .with_timeout(config.probe_timeout());
    let activity = ActivityLog::new(config.log_path());
    log::info!("Recording added tracks to {:?}", activity.path());

    let mut watcher = RadioWatcher::new(reader, client, playlist, activity)
        .with_filter(config.title_filter())
        .with_state(DedupState::new(config.seen_titles()))
        .with_retry(config.retry_policy())
        .with_timing(config.timing());

    watcher.run()
}

fn clear_playlist(client: &mut TidalClient, playlist_name: &str) -> Result<()> {
    match client.find_playlist(playlist_name)? {
        Some(playlist) => {
            log::info!("🧹 Clearing playlist: {}", playlist.name);
            let removed = client.clear_playlist(&playlist)?;
            log::info!("Removed {} track(s)", removed);
        }
        None => log::warn!("⚠️ Playlist '{}' not found.", playlist_name),
    }
    Ok(())
}
