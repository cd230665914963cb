mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Configure {
            set_user,
            set_db,
            show,
        } => {
            commands::configure::handle(set_user, set_db, show)?;
        }

        Commands::Catalog { command } => {
            let db = commands::open_db(cli.db.as_ref())?;
            commands::catalog::handle(&db, command)?;
        }

        Commands::Roll => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::play::roll(&db, &user)?;
        }

        Commands::Daily => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::play::daily(&db, &user)?;
        }

        Commands::Sell { id, count } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::play::sell(&db, &user, &id, count)?;
        }

        Commands::Craft { id } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::play::craft(&db, &user, &id)?;
        }

        Commands::Inventory => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::play::inventory(&db, &user)?;
        }

        Commands::Profile => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::play::profile(&db, &user)?;
        }

        Commands::Bonus => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::loadout::bonus(&db, &user)?;
        }

        Commands::Equip { id } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::loadout::equip(&db, &user, &id)?;
        }

        Commands::Unequip { id } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::loadout::unequip(&db, &user, &id)?;
        }

        Commands::Title { command } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::loadout::title(&db, &user, command)?;
        }

        Commands::Potion { command } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::loadout::potion(&db, &user, command)?;
        }

        Commands::Hunt { command } => {
            let db = commands::open_db(cli.db.as_ref())?;
            let user = commands::resolve_user(cli.user.as_deref())?;
            commands::loadout::hunt(&db, &user, command)?;
        }
    }

    Ok(())
}
