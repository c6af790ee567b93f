//! Command-line front end.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crate::api::{Character, GenderFilter, StatusFilter};
use crate::app::App;
use crate::catalog::{CharacterFilters, ResultSource};
use crate::config::Config;
use crate::favorites::{FavoriteId, FavoriteItem};

/// How many telemetry events `--show-telemetry` prints.
const TELEMETRY_TAIL: usize = 10;

/// Browse the character catalog and manage favorites.
#[derive(Parser, Debug)]
#[command(name = "multiverso-hub", version, about)]
pub struct Cli {
    /// Config file (default: ~/.config/multiverso-hub/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the most recent telemetry events before exiting
    #[arg(long, global = true)]
    pub show_telemetry: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage favorite characters
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// List characters, optionally filtered or searched by name
    Characters(CharactersArgs),

    /// Show one character with its episodes
    Character {
        id: i64,
    },

    /// Catalog totals by status and favorites count
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesCommand {
    /// List favorites in the order they were added
    List,
    /// Fetch a character and add it to favorites
    Add { id: FavoriteId },
    /// Remove a character from favorites
    Remove { id: FavoriteId },
    /// Print whether a character is a favorite
    Has { id: FavoriteId },
    /// Add when absent, remove when present
    Toggle { id: FavoriteId },
    /// Remove every favorite
    Clear,
}

#[derive(Args, Debug)]
pub struct CharactersArgs {
    /// Number of pages to load
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// alive, dead or unknown
    #[arg(long, value_parser = parse_status)]
    pub status: Option<StatusFilter>,

    #[arg(long)]
    pub species: Option<String>,

    /// female, male, genderless or unknown
    #[arg(long, value_parser = parse_gender)]
    pub gender: Option<GenderFilter>,

    /// Name search (at least 2 characters)
    #[arg(long)]
    pub search: Option<String>,
}

impl Command {
    /// Screen name recorded in telemetry.
    pub fn screen_name(&self) -> &'static str {
        match self {
            Command::Favorites(_) => "favorites",
            Command::Characters(_) => "characters",
            Command::Character { .. } => "character_detail",
            Command::Stats => "home",
        }
    }
}

fn parse_status(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(s).ok_or_else(|| format!("unknown status '{}'", s))
}

fn parse_gender(s: &str) -> Result<GenderFilter, String> {
    GenderFilter::parse(s).ok_or_else(|| format!("unknown gender '{}'", s))
}

/// Loads config, runs `cli.command`, then flushes favorites.
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };

    let app = App::start(config).await?;
    app.telemetry.screen_view(cli.command.screen_name());

    let mut out = std::io::stdout();
    let result = execute(&app, cli.command, &mut out).await;
    app.shutdown().await;

    if cli.show_telemetry {
        writeln!(out, "\nRecent events:")?;
        for event in app.telemetry.recent(TELEMETRY_TAIL) {
            writeln!(
                out,
                "  {} [{}] {}",
                event.timestamp.format("%H:%M:%S"),
                event.kind.as_str(),
                event.action
            )?;
        }
    }

    result
}

pub async fn execute<W: Write>(app: &App, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Favorites(cmd) => favorites(app, cmd, out).await,
        Command::Characters(args) => characters(app, args, out).await,
        Command::Character { id } => character(app, id, out).await,
        Command::Stats => stats(app, out).await,
    }
}

async fn favorites<W: Write>(app: &App, cmd: FavoritesCommand, out: &mut W) -> Result<()> {
    let store = &app.favorites;
    match cmd {
        FavoritesCommand::List => {
            if store.is_empty() {
                writeln!(out, "No favorites yet.")?;
            }
            for item in store.favorites() {
                writeln!(out, "{}", favorite_line(&item))?;
            }
        }
        FavoritesCommand::Add { id } => {
            if store.has(id) {
                writeln!(out, "#{} is already a favorite.", id)?;
                return Ok(());
            }
            let item = fetch_item(app, id).await?;
            let name = item.name().unwrap_or_default().to_string();
            store.add(item);
            app.telemetry.user_action("add_favorite", Some(json!({ "id": id })));
            writeln!(out, "Added #{} {}", id, name)?;
        }
        FavoritesCommand::Remove { id } => {
            if !store.has(id) {
                writeln!(out, "#{} is not a favorite.", id)?;
                return Ok(());
            }
            store.remove(id);
            app.telemetry.user_action("remove_favorite", Some(json!({ "id": id })));
            writeln!(out, "Removed #{}", id)?;
        }
        FavoritesCommand::Has { id } => {
            writeln!(out, "{}", store.has(id))?;
        }
        FavoritesCommand::Toggle { id } => {
            let item = match store.get(id) {
                Some(item) => item,
                None => fetch_item(app, id).await?,
            };
            let now_favorite = store.toggle(item);
            app.telemetry.user_action(
                "toggle_favorite",
                Some(json!({ "id": id, "favorite": now_favorite })),
            );
            let verb = if now_favorite { "Added" } else { "Removed" };
            writeln!(out, "{} #{}", verb, id)?;
        }
        FavoritesCommand::Clear => {
            let count = store.len();
            store.clear();
            app.telemetry.user_action("clear_favorites", Some(json!({ "count": count })));
            writeln!(out, "Cleared {} favorites.", count)?;
        }
    }
    Ok(())
}

async fn fetch_item(app: &App, id: FavoriteId) -> Result<FavoriteItem> {
    let character = app
        .client
        .character(id)
        .await
        .with_context(|| format!("fetching character #{}", id))?;
    Ok(FavoriteItem::from_record(&character)?)
}

async fn characters<W: Write>(app: &App, args: CharactersArgs, out: &mut W) -> Result<()> {
    let filters = CharacterFilters {
        status: args.status,
        species: args.species,
        gender: args.gender,
    };
    let mut browser = app.browser();
    browser
        .open(filters, args.search.as_deref().unwrap_or_default())
        .await;
    while browser.state().page < args.pages && browser.load_more().await {}

    let state = browser.state();
    if state.characters.is_empty() {
        if let Some(err) = &state.last_error {
            anyhow::bail!("could not load characters: {}", err);
        }
        writeln!(out, "No characters found.")?;
        return Ok(());
    }

    for c in &state.characters {
        writeln!(out, "{}", character_line(c, app.favorites.has(c.id)))?;
    }

    let total = state.total_count.unwrap_or(state.characters.len() as u32);
    write!(out, "\n{} of {} shown", state.characters.len(), total)?;
    if state.has_more {
        write!(out, ", more available")?;
    }
    if state.source == ResultSource::Cache {
        write!(out, " (offline, from cache)")?;
    }
    writeln!(out)?;
    if let Some(err) = &state.last_error {
        writeln!(out, "warning: stopped after page {}: {}", state.page, err)?;
    }
    Ok(())
}

async fn character<W: Write>(app: &App, id: i64, out: &mut W) -> Result<()> {
    let c = app
        .client
        .character(id)
        .await
        .with_context(|| format!("fetching character #{}", id))?;
    let episodes = app
        .client
        .episodes(&c.episode)
        .await
        .context("fetching episodes")?;

    let marker = if app.favorites.has(c.id) { " ♥" } else { "" };
    writeln!(out, "#{} {}{}", c.id, c.name, marker)?;
    writeln!(out, "  Status:   {}", c.status)?;
    writeln!(out, "  Species:  {}", c.species)?;
    if !c.kind.is_empty() {
        writeln!(out, "  Type:     {}", c.kind)?;
    }
    writeln!(out, "  Gender:   {}", c.gender)?;
    writeln!(out, "  Origin:   {}", c.origin.name)?;
    writeln!(out, "  Location: {}", c.location.name)?;
    writeln!(out, "  Episodes ({}):", episodes.len())?;
    for episode in &episodes {
        writeln!(out, "    {} {}", episode.episode, episode.name)?;
    }
    Ok(())
}

async fn stats<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let breakdown = app
        .client
        .status_breakdown()
        .await
        .context("fetching catalog statistics")?;
    writeln!(out, "Characters: {}", breakdown.total)?;
    writeln!(out, "  Alive:    {}", breakdown.alive)?;
    writeln!(out, "  Dead:     {}", breakdown.dead)?;
    writeln!(out, "  Unknown:  {}", breakdown.unknown)?;
    writeln!(out, "Favorites:  {}", app.favorites.len())?;
    Ok(())
}

fn character_line(c: &Character, favorite: bool) -> String {
    let marker = if favorite { "♥ " } else { "" };
    format!("{:>4}  {}{} [{} - {}]", c.id, marker, c.name, c.status, c.species)
}

fn favorite_line(item: &FavoriteItem) -> String {
    match item.decode::<Character>() {
        Ok(c) => character_line(&c, false),
        Err(_) => format!("{:>4}  {}", item.id, item.name().unwrap_or("(unnamed)")),
    }
}
