//! sonos-queue - inspect Sonos queues and saved playlists.
//!
//! Finds a group coordinator on the local network, reads a queue or saved
//! playlist completely and reports tracks that appear more than once.

mod config;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sonos_queue_core::sonos::SonosTransportInfo;
use sonos_queue_core::{
    dedup, find_playlist, CoordinatorLocator, Device, DeviceFilter, PagedCollector,
    PlaylistIndexSource, PlaylistRef, QueueError, SonosClientImpl, SonosDeviceDiscovery, Track,
    TrackSource, TransportState,
};

use crate::config::CliConfig;
use crate::output::{CollectionReport, Format, NowPlaying};

/// sonos-queue - Sonos queue and playlist inspector.
#[derive(Parser, Debug)]
#[command(name = "sonos-queue")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE", env = "SONOS_QUEUE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn", env = "SONOS_QUEUE_LOG_LEVEL", global = true)]
    log_level: log::LevelFilter,

    /// Debug messages (same as --log-level debug).
    #[arg(short, long, global = true)]
    debug: bool,

    /// Speaker IP to use instead of SSDP discovery (repeatable; overrides config).
    #[arg(short, long = "speaker", value_name = "IP", global = true)]
    speakers: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the queue of the first coordinator with a non-empty queue, flagging duplicates.
    Queue {
        /// Print only the first occurrence of each track.
        #[arg(long)]
        unique_only: bool,

        /// Entries requested per page (overrides config).
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// List saved playlists by title, flagging duplicates.
    Playlist {
        /// Playlist titles (exact match).
        #[arg(value_name = "TITLE", required = true)]
        titles: Vec<String>,

        /// Print only the first occurrence of each track.
        #[arg(long)]
        unique_only: bool,

        /// Entries requested per page (overrides config).
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// List all saved playlists.
    Playlists,

    /// List discovered devices with role, group and queue length.
    Coordinators,

    /// Show what every group is playing.
    NowPlaying,
}

/// Shared state for one command invocation.
struct App {
    config: CliConfig,
    client: Arc<SonosClientImpl>,
    format: Format,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        args.log_level
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .init();

    let format = args.format;
    let result = run(args).await;
    if let Err(err) = &result {
        if format == Format::Json {
            println!("{}", output::to_json(&output::error_report(err))?);
        }
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let mut config = CliConfig::load(args.config.as_deref())
        .map_err(|e| QueueError::Configuration(format!("{:#}", e)))?;
    if !args.speakers.is_empty() {
        config.speakers = args.speakers;
    }
    log::debug!("Configuration: {:?}", config);

    let discovery_config = config.discovery_config()?;
    let http = SonosClientImpl::default_http_client().context("Failed to build HTTP client")?;
    let app = App {
        client: Arc::new(SonosClientImpl::with_discovery_config(http, discovery_config)),
        config,
        format: args.format,
    };

    match args.command {
        Command::Queue {
            unique_only,
            page_size,
        } => app.queue(unique_only, page_size).await,
        Command::Playlist {
            titles,
            unique_only,
            page_size,
        } => app.playlists_by_title(&titles, unique_only, page_size).await,
        Command::Playlists => app.list_playlists().await,
        Command::Coordinators => app.coordinators().await,
        Command::NowPlaying => app.now_playing().await,
    }
}

impl App {
    /// Discovers devices and returns those matching `filter`.
    async fn locate(&self, filter: DeviceFilter, probe_queues: bool) -> Result<Vec<Device>> {
        let discovery = SonosDeviceDiscovery::new(self.client.clone(), probe_queues);
        let located = CoordinatorLocator::new(self.config.locator_config())
            .locate(&discovery, filter)
            .await;

        if located.nothing_discovered() {
            return Err(QueueError::Discovery(format!(
                "no Sonos speakers found after {} attempt(s)",
                self.config.discovery_attempts
            ))
            .into());
        }
        Ok(located.candidates)
    }

    async fn first_coordinator(&self, filter: DeviceFilter, missing: &str) -> Result<Device> {
        let probe = filter.require_queue;
        match self.locate(filter, probe).await?.into_iter().next() {
            Some(device) => {
                log::info!("Using coordinator {} ({})", device.zone_name, device.ip);
                Ok(device)
            }
            None => Err(QueueError::NoCoordinator(missing.to_string()).into()),
        }
    }

    async fn queue(&self, unique_only: bool, page_size: Option<u32>) -> Result<()> {
        let coordinator = self
            .first_coordinator(
                DeviceFilter::coordinators_with_queue(),
                "no group has a non-empty queue",
            )
            .await?;

        let options = self
            .config
            .collect_options(page_size.unwrap_or(self.config.queue_page_size));
        let queue = PagedCollector::new(options)
            .collect(&TrackSource::queue(&*self.client, &coordinator.ip))
            .await
            .map_err(QueueError::from)
            .with_context(|| format!("Failed to read queue of {}", coordinator.group_label))?;

        if self.format == Format::Text {
            println!(
                "Queue of {} has {} items",
                coordinator.group_label, queue.total_count
            );
        }
        self.print_collection(
            "Queue",
            &coordinator.group_label,
            queue.total_count,
            &queue.items,
            unique_only,
        )
    }

    async fn playlists_by_title(
        &self,
        titles: &[String],
        unique_only: bool,
        page_size: Option<u32>,
    ) -> Result<()> {
        let coordinator = self
            .first_coordinator(DeviceFilter::coordinators(), "no group answered")
            .await?;
        let playlists = self.saved_playlists(&coordinator).await?;

        let options = self
            .config
            .collect_options(page_size.unwrap_or(self.config.playlist_page_size));
        let collector = PagedCollector::new(options);

        for title in titles {
            let Some(playlist) = find_playlist(&playlists, title) else {
                log::error!("Could not find sonos playlist with title '{}'", title);
                return Err(QueueError::PlaylistNotFound(title.clone()).into());
            };

            let entries = collector
                .collect(&TrackSource::playlist(
                    &*self.client,
                    &coordinator.ip,
                    playlist,
                ))
                .await
                .map_err(QueueError::from)
                .with_context(|| format!("Failed to read playlist '{}'", playlist.title))?;

            if self.format == Format::Text {
                println!(
                    "Found sonos playlist {} - '{}'",
                    playlist.item_id, playlist.title
                );
                println!(
                    "Playlist {} has {} items",
                    playlist.title, entries.total_count
                );
            }
            self.print_collection(
                "Playlist",
                &playlist.title,
                entries.total_count,
                &entries.items,
                unique_only,
            )?;
        }
        Ok(())
    }

    async fn saved_playlists(&self, coordinator: &Device) -> Result<Vec<PlaylistRef>> {
        let options = self.config.collect_options(self.config.playlist_page_size);
        let index = PagedCollector::new(options)
            .collect(&PlaylistIndexSource::new(
                &*self.client,
                &coordinator.ip,
            ))
            .await
            .map_err(QueueError::from)
            .context("Failed to list saved playlists")?;
        Ok(index.into_items())
    }

    async fn list_playlists(&self) -> Result<()> {
        let coordinator = self
            .first_coordinator(DeviceFilter::coordinators(), "no group answered")
            .await?;
        let playlists = self.saved_playlists(&coordinator).await?;

        match self.format {
            Format::Json => println!("{}", output::to_json(&playlists)?),
            Format::Text => {
                for playlist in &playlists {
                    println!("{}", output::playlist_line(playlist));
                }
            }
        }
        Ok(())
    }

    async fn coordinators(&self) -> Result<()> {
        let devices = self.locate(DeviceFilter::any(), true).await?;

        match self.format {
            Format::Json => println!("{}", output::to_json(&devices)?),
            Format::Text => {
                for device in &devices {
                    println!("{}", output::device_line(device));
                }
            }
        }
        Ok(())
    }

    async fn now_playing(&self) -> Result<()> {
        let coordinators = self.locate(DeviceFilter::coordinators(), false).await?;
        if coordinators.is_empty() {
            return Err(QueueError::NoCoordinator("no group answered".to_string()).into());
        }

        let mut statuses = Vec::with_capacity(coordinators.len());
        for coordinator in &coordinators {
            let state = self
                .client
                .get_transport_state(&coordinator.ip)
                .await
                .map_err(QueueError::from)
                .with_context(|| format!("Failed to read state of {}", coordinator.group_label))?;
            let position = if state == TransportState::Stopped {
                None
            } else {
                Some(
                    self.client
                        .get_position_info(&coordinator.ip)
                        .await
                        .map_err(QueueError::from)
                        .with_context(|| {
                            format!("Failed to read position of {}", coordinator.group_label)
                        })?,
                )
            };
            statuses.push(NowPlaying {
                group_label: coordinator.group_label.clone(),
                state,
                position,
            });
        }

        match self.format {
            Format::Json => println!("{}", output::to_json(&statuses)?),
            Format::Text => {
                for status in &statuses {
                    println!("{}", output::now_playing_line(status));
                }
            }
        }
        Ok(())
    }

    fn print_collection(
        &self,
        kind: &str,
        name: &str,
        total_count: u32,
        items: &[Track],
        unique_only: bool,
    ) -> Result<()> {
        let analysis = dedup(items.iter(), |t| t.identity().to_string());
        log::debug!(
            "{} '{}': {} entries, {} unique, {} duplicates",
            kind,
            name,
            analysis.total(),
            analysis.unique.len(),
            analysis.duplicates.len()
        );

        match self.format {
            Format::Json => {
                let report = CollectionReport {
                    name,
                    total_count,
                    unique: &analysis.unique,
                    duplicates: (!unique_only).then_some(analysis.duplicates.as_slice()),
                };
                println!("{}", output::to_json(&report)?);
            }
            Format::Text => {
                for line in output::collection_lines(kind, items, &analysis, unique_only) {
                    println!("{}", line);
                }
            }
        }
        Ok(())
    }
}
