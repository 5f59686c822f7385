//! Command-line front end for the pad list.
//!
//! # Responsibility
//! - Drive the same screen and services the Flutter UI uses, from a shell.
//! - Keep output plain and line-oriented so it can be piped.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use padland_core::db::open_db;
use padland_core::{
    init_logging_from_config, BulkAction, GroupId, GroupService, InboundRequest, NewPad, Notice,
    PadId, PadListConfig, PadListScreen, PadService, Projection, RowPosition, ScreenEffect,
    SelectionEvent, SqliteGroupRepository, SqlitePadRepository,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "padland")]
#[command(version)]
#[command(about = "Manage the PadLand pad list from the terminal")]
struct Cli {
    /// TOML config file (db_path, log_level, log_dir, membership, ...)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pad store file; overrides the config and PADLAND_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grouped pad list
    #[command(visible_alias = "ls")]
    List {
        /// Expand these group rows, as if their headers were tapped
        #[arg(short, long = "expand")]
        expand: Vec<usize>,
    },
    /// Open the list the way another app would, then print it
    Open {
        /// Delete these pad ids before loading
        #[arg(long = "delete", value_delimiter = ',')]
        delete: Vec<String>,
        /// Plain text shared into the app; echoed as clipboard content
        #[arg(long)]
        text: Option<String>,
    },
    /// Save a new pad
    Add {
        name: String,
        url: String,
        #[arg(short, long)]
        group: Option<GroupId>,
    },
    /// Record that a pad was opened now
    Touch { id: PadId },
    /// Select rows (`group:child`) and run a bulk action on them
    Select {
        #[arg(value_enum)]
        action: ActionArg,
        /// Rows to check, first one is long-pressed
        #[arg(required = true)]
        rows: Vec<String>,
        /// Target group for `group`; omit to ungroup
        #[arg(short, long)]
        group: Option<GroupId>,
        /// Confirm a delete without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage pad groups
    #[command(subcommand)]
    Group(GroupCommands),
}

#[derive(Subcommand)]
enum GroupCommands {
    /// List groups in display order
    List,
    /// Create a group at the end of the list
    Create { name: String },
    /// Rename a group
    Rename { id: GroupId, name: String },
    /// Delete a group; its pads become unclassified
    Delete { id: GroupId },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ActionArg {
    Delete,
    Group,
    Share,
}

impl From<ActionArg> for BulkAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Delete => BulkAction::Delete,
            ActionArg::Group => BulkAction::Group,
            ActionArg::Share => BulkAction::Share,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => PadListConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PadListConfig::default(),
    };
    init_logging_from_config(&config).map_err(|err| anyhow!(err))?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.resolve_db_path());
    let conn = open_db(&db_path)
        .with_context(|| format!("opening pad store {}", db_path.display()))?;
    let pad_repo = SqlitePadRepository::try_new(&conn)?;
    let group_repo = SqliteGroupRepository::try_new(&conn)?;

    match cli.command {
        Commands::List { expand } => {
            let mut screen = PadListScreen::new(pad_repo, group_repo, config.screen_settings());
            screen.reload()?;
            for group in expand {
                screen.expand_group(group)?;
            }
            print_projection(screen.projection());
        }
        Commands::Open { delete, text } => {
            let request = InboundRequest {
                action: (!delete.is_empty()).then(|| "delete".to_string()),
                pad_ids: delete,
                shared_text: text,
            };
            let mut screen = PadListScreen::new(pad_repo, group_repo, config.screen_settings());
            let effects = screen.open(&request)?;
            print_effects(&effects);
            print_projection(screen.projection());
        }
        Commands::Add { name, url, group } => {
            let new_pad = match group {
                Some(group) => NewPad::new(name, url).in_group(group),
                None => NewPad::new(name, url),
            };
            let pad = PadService::new(pad_repo).create_pad(&new_pad)?;
            println!("{}", pad.id);
        }
        Commands::Touch { id } => {
            PadService::new(pad_repo).touch_pad(id, now_millis())?;
        }
        Commands::Select {
            action,
            rows,
            group,
            yes,
        } => {
            let mut screen = PadListScreen::new(pad_repo, group_repo, config.screen_settings());
            screen.reload()?;
            run_selection(&mut screen, action.into(), &rows, group, yes)?;
        }
        Commands::Group(command) => {
            let service = GroupService::new(group_repo);
            match command {
                GroupCommands::List => {
                    for group in service.list_groups()? {
                        println!("{}\t{}", group.id, group.name);
                    }
                }
                GroupCommands::Create { name } => println!("{}", service.create_group(name)?),
                GroupCommands::Rename { id, name } => service.rename_group(id, name)?,
                GroupCommands::Delete { id } => service.delete_group(id)?,
            }
        }
    }

    Ok(())
}

fn run_selection(
    screen: &mut PadListScreen<SqlitePadRepository<'_>, SqliteGroupRepository<'_>>,
    action: BulkAction,
    rows: &[String],
    group: Option<GroupId>,
    yes: bool,
) -> Result<()> {
    let mut positions = rows.iter().map(|row| parse_row(row));
    if let Some(first) = positions.next() {
        screen.handle(SelectionEvent::LongPress(first?))?;
    }
    for position in positions {
        screen.handle(SelectionEvent::Tap(position?))?;
    }
    if !screen.selection().is_selecting() {
        bail!("no pad rows selected");
    }

    for effect in screen.handle(SelectionEvent::Commit(action))? {
        match effect {
            ScreenEffect::AskDelete(ids) => {
                if !yes {
                    bail!("refusing to delete {} pad(s) without --yes", ids.len());
                }
                print_effects(&screen.confirm_delete(&ids)?);
            }
            ScreenEffect::ChooseGroup { pad_ids, .. } => {
                print_effects(&screen.assign_group(&pad_ids, group)?);
            }
            ScreenEffect::Share { text } => println!("{text}"),
            ScreenEffect::Notice(notice) => println!("{}", describe(&notice)),
            _ => {}
        }
    }
    Ok(())
}

fn parse_row(raw: &str) -> Result<RowPosition> {
    let (group, child) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("row `{raw}` must look like group:child"))?;
    Ok(RowPosition::Child {
        group: group.trim().parse().context("group index")?,
        child: child.trim().parse().context("child index")?,
    })
}

fn print_projection(projection: &Projection) {
    for (index, group) in projection.groups().iter().enumerate() {
        println!("[{index}] {}", group.name);
        for (child, id) in group.children.iter().enumerate() {
            if let Some(pad) = projection.pad(*id) {
                println!("  {index}:{child}\t#{}\t{}\t{}", pad.id, pad.name, pad.url);
            }
        }
    }
}

fn print_effects(effects: &[ScreenEffect]) {
    for effect in effects {
        match effect {
            ScreenEffect::CopyToClipboard(text) => println!("clipboard: {text}"),
            ScreenEffect::Notice(notice) => println!("{}", describe(notice)),
            _ => {}
        }
    }
}

fn describe(notice: &Notice) -> String {
    match notice {
        Notice::PadDeleted(id) => format!("pad #{id} deleted"),
        Notice::TextCopied => "text copied to clipboard".to_string(),
        Notice::GroupCreated(id) => format!("group #{id} created"),
        Notice::GroupDeleted(id) => format!("group #{id} deleted"),
        Notice::PadsGrouped { count } => format!("{count} pad(s) grouped"),
        Notice::ActionFailed(action) => format!("{action:?} failed; nothing was changed"),
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
