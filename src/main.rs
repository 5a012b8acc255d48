use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};

use asset_bridge::config::BridgeConfig;
use asset_bridge::dedup::{EquivalenceCheck, EquivalenceProfile};
use asset_bridge::scene_graph::{load_gltf, ObjectId};

#[derive(Parser)]
#[command(name = "asset-bridge", version, about = "Scene duplicate resolution and bridge configuration")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical name of every object in a glTF scene
    Resolve {
        path: PathBuf,

        /// Attribute group to compare (repeatable); defaults to the configured profile.
        /// glTF nodes carry flags and modifiers in the `_flags` and `_modifiers` extras
        #[arg(long = "check", value_name = "CHECK")]
        checks: Vec<EquivalenceCheck>,

        /// Compare object types only
        #[arg(long, conflicts_with = "checks")]
        loose: bool,

        /// Only print objects that fold into another name
        #[arg(long)]
        folded_only: bool,
    },

    /// Print the objects whose parent is not part of the selection
    TopLevel {
        path: PathBuf,

        /// Object names to select; selects every object when omitted
        #[arg(long = "select", value_name = "NAME")]
        selection: Vec<String>,
    },

    /// Show or edit the bridge configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Path,
    SetPort { port: u16 },
    SetDir { kind: DirKind, path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirKind {
    Codewalker,
    Blender,
    Fivem,
    Rpf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    logger.parse_default_env();
    logger.init();

    match cli.command {
        Command::Resolve {
            path,
            checks,
            loose,
            folded_only,
        } => {
            let profile = if loose {
                EquivalenceProfile::disabled()
            } else if !checks.is_empty() {
                EquivalenceProfile::from_checks(checks)
            } else {
                BridgeConfig::load()?.equivalence
            };
            resolve(path, &profile, folded_only)
        }
        Command::TopLevel { path, selection } => top_level(path, &selection),
        Command::Config { action } => config(action),
    }
}

fn resolve(path: PathBuf, profile: &EquivalenceProfile, folded_only: bool) -> Result<()> {
    let (scene, _materials) = load_gltf(&path)?;

    let checks = profile
        .enabled_checks()
        .map(|check| check.key())
        .collect::<Vec<_>>();
    info!("Resolving {} with checks [{}]", path.display(), checks.join(", "));

    let entries = scene.canonical_names(profile);
    let folded = entries.iter().filter(|entry| entry.is_folded()).count();

    for entry in entries.iter().filter(|entry| !folded_only || entry.is_folded()) {
        println!("{} -> {}", entry.name, entry.canonical_name);
    }

    info!("{} of {} objects are duplicates", folded, entries.len());
    Ok(())
}

fn top_level(path: PathBuf, selection: &[String]) -> Result<()> {
    let (scene, _materials) = load_gltf(&path)?;

    let selected = if selection.is_empty() {
        scene.objects().map(|(id, _)| id).collect::<Vec<ObjectId>>()
    } else {
        selection
            .iter()
            .map(|name| {
                scene
                    .get_object_by_name(name)
                    .with_context(|| format!("No object named {name} in {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?
    };

    for id in scene.top_level_objects(&selected) {
        if let Some(object) = scene.get_object(id) {
            println!("{}", object.name);
        }
    }

    Ok(())
}

fn config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = BridgeConfig::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
            println!("# backend: {}", config.api_base_url());
        }
        ConfigAction::Path => {
            println!("{}", BridgeConfig::config_path()?.display());
        }
        ConfigAction::SetPort { port } => {
            let mut config = BridgeConfig::load()?;
            config.api_port = port;
            config.save()?;
            info!("Backend API now at {}", config.api_base_url());
        }
        ConfigAction::SetDir { kind, path } => {
            let mut config = BridgeConfig::load()?;
            let field = match kind {
                DirKind::Codewalker => &mut config.codewalker_output_dir,
                DirKind::Blender => &mut config.blender_output_dir,
                DirKind::Fivem => &mut config.fivem_output_dir,
                DirKind::Rpf => &mut config.rpf_path,
            };
            *field = path;
            config.save()?;
            info!("Saved {}", BridgeConfig::config_path()?.display());
        }
    }

    Ok(())
}
