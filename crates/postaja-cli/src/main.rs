use clap::{Parser, Subcommand};

use postaja_core::{Capability, Role};

mod commands;

#[derive(Parser)]
#[command(
    name = "postaja",
    about = "PostaJá — autopilot post planning for your product catalog",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Role to act as (admin, manager, operator)
    #[arg(long, global = true, default_value = "admin")]
    role: Role,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default autopilot.toml
    Init {
        #[arg(short, long, default_value = "autopilot.toml")]
        path: String,
        /// Rule name shown in the app
        #[arg(short, long, default_value = "Configuração Principal")]
        name: String,
    },
    /// List the post slots a config generates
    Slots {
        #[command(flatten)]
        horizon: commands::HorizonArgs,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Show how slots split across objectives
    Allocate {
        #[command(flatten)]
        horizon: commands::HorizonArgs,
        /// Override the slot count instead of generating slots
        #[arg(long)]
        slots: Option<u32>,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Plan every slot in the horizon.
    ///
    /// Reads the catalog as a JSON product list (or a paginated
    /// `{ "data": [...] }` page) and an optional history map of
    /// product id → last post timestamp.
    Plan {
        #[command(flatten)]
        inputs: commands::PlanArgs,
        /// Plan even if the autopilot is disabled
        #[arg(long)]
        force: bool,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Preview the next posts the autopilot would schedule
    Simulate {
        #[command(flatten)]
        inputs: commands::PlanArgs,
        /// Number of posts to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("postaja=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    require(cli.role, cli.command.capability())?;

    match cli.command {
        Commands::Init { path, name } => commands::init::init(&path, &name),
        Commands::Slots { horizon, format } => commands::inspect::slots(&horizon, &format),
        Commands::Allocate {
            horizon,
            slots,
            format,
        } => commands::inspect::allocate(&horizon, slots, &format),
        Commands::Plan {
            inputs,
            force,
            format,
        } => commands::plan::plan(&inputs, force, &format),
        Commands::Simulate {
            inputs,
            limit,
            format,
        } => commands::plan::simulate(&inputs, limit, &format),
    }
}

impl Commands {
    /// Permission a role needs to run this command.
    fn capability(&self) -> Capability {
        match self {
            Commands::Init { .. } => Capability::EditAutopilot,
            Commands::Slots { .. }
            | Commands::Allocate { .. }
            | Commands::Plan { .. }
            | Commands::Simulate { .. } => Capability::ViewAutopilot,
        }
    }
}

fn require(role: Role, capability: Capability) -> anyhow::Result<()> {
    if role.can(capability) {
        Ok(())
    } else {
        anyhow::bail!("role {role} lacks the {capability} permission")
    }
}
