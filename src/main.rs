mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use auction_admin::api::Resource;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Configuration file, by default ~/.config/auction-admin/config.toml
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override api.base_url from the configuration file
    #[clap(long, global = true)]
    base_url: Option<String>,

    /// Print debug logs to stderr (one-shot commands only)
    #[clap(long, global = true)]
    debug: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the terminal console (default)
    Tui {
        /// Start at this path instead of the dashboard, e.g. /admin/users or /admin/view/vehicle/<id>
        #[clap(long)]
        route: Option<String>,
    },

    /// Sign in as an admin and store the session
    Login {
        #[clap(short, long)]
        email: String,

        /// Read from AUCTION_ADMIN_PASSWORD or prompted for when omitted
        #[clap(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in admin's profile
    Whoami,

    /// List one page of a resource
    List {
        /// users, vehicles, auctions, bids, transactions or queries
        resource: Resource,

        #[clap(long, default_value_t = 1)]
        page: u32,

        /// 5, 10 or 15; the configured default when omitted
        #[clap(long)]
        page_size: Option<u32>,

        /// Free-text search
        #[clap(short, long)]
        keyword: Option<String>,

        /// Select filter as key=value, e.g. status=PENDING
        #[clap(short, long)]
        filter: Vec<String>,

        /// Print the raw items as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show one entity with its related records
    Show {
        resource: Resource,
        id: String,

        /// Print the raw entity as JSON
        #[clap(long)]
        json: bool,
    },

    /// Delete one entity
    Delete {
        resource: Resource,
        id: String,

        /// Do not ask for confirmation
        #[clap(short, long)]
        yes: bool,
    },

    /// Unlock a locked user account
    Unlock {
        id: String,

        #[clap(short, long)]
        yes: bool,
    },

    /// Refund the deposit of a confirmed auction
    Refund {
        id: String,

        #[clap(short, long)]
        yes: bool,
    },

    /// Dashboard statistics
    Stats {
        /// all, daily, weekly or monthly
        #[clap(long, default_value = "all")]
        range: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui { route: None });

    if matches!(command, Commands::Tui { .. }) {
        auction_admin::logging::init_file_tracing();
    } else {
        auction_admin::logging::init_stderr_tracing(cli.debug);
    }

    let context = cli::Context::load(cli.config, cli.base_url)?;

    match command {
        Commands::Tui { route } => cli::tui(context, route),
        Commands::Login { email, password } => cli::login(context, email, password),
        Commands::Logout => cli::logout(context),
        Commands::Whoami => cli::whoami(context),
        Commands::List {
            resource,
            page,
            page_size,
            keyword,
            filter,
            json,
        } => cli::list(
            context,
            cli::ListArgs {
                resource,
                page,
                page_size,
                keyword,
                filters: filter,
                json,
            },
        ),
        Commands::Show { resource, id, json } => cli::show(context, resource, id, json),
        Commands::Delete { resource, id, yes } => cli::delete(context, resource, id, yes),
        Commands::Unlock { id, yes } => {
            cli::action(context, auction_admin::controller::DetailAction::Unlock, id, yes)
        }
        Commands::Refund { id, yes } => {
            cli::action(context, auction_admin::controller::DetailAction::Refund, id, yes)
        }
        Commands::Stats { range } => cli::stats(context, range),
    }
}
