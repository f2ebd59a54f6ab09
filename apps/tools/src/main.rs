use anyhow::{bail, Result};
use bot::config::{load_settings, Settings};
use bot_core::COMMANDS;
use clap::{Args, Parser, Subcommand};
use discord::DiscordRest;
use flavortown_client::{FlavortownClient, TrackerApi};
use shared::{
    domain::ProjectId,
    protocol::{ProjectDraft, ProjectUpdate},
};
use tracing_subscriber::EnvFilter;

/// Maintenance commands for the Flavortown bot.
#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish the slash command set, globally or to one guild.
    RegisterCommands {
        #[arg(long)]
        guild_id: Option<String>,
    },
    CreateProject {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[command(flatten)]
        links: ProjectLinks,
    },
    UpdateProject {
        project_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        links: ProjectLinks,
    },
}

#[derive(Args, Debug, Default)]
struct ProjectLinks {
    #[arg(long)]
    repo_url: Option<String>,
    #[arg(long)]
    demo_url: Option<String>,
    #[arg(long)]
    readme_url: Option<String>,
    #[arg(long)]
    ai_declaration: Option<String>,
}

fn tracker(settings: &Settings) -> Result<FlavortownClient> {
    Ok(FlavortownClient::with_base_url(
        settings.flavortown_base_url.clone(),
        settings.flavortown_api_key()?,
    ))
}

fn draft(title: String, description: String, links: ProjectLinks) -> ProjectDraft {
    ProjectDraft {
        repo_url: links.repo_url,
        demo_url: links.demo_url,
        readme_url: links.readme_url,
        ai_declaration: links.ai_declaration,
        ..ProjectDraft::new(title, description)
    }
}

fn update(title: Option<String>, description: Option<String>, links: ProjectLinks) -> ProjectUpdate {
    ProjectUpdate {
        title,
        description,
        repo_url: links.repo_url,
        demo_url: links.demo_url,
        readme_url: links.readme_url,
        ai_declaration: links.ai_declaration,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let cli = Cli::parse();
    let settings = load_settings();

    match cli.command {
        Command::RegisterCommands { guild_id } => {
            let rest = DiscordRest::with_api_base(
                settings.discord_api_base.clone(),
                settings.discord_token()?,
            );
            let application_id = rest.application_id().await?;
            let count = rest
                .register_commands(&application_id, guild_id.as_deref(), COMMANDS)
                .await?;
            println!("registered {count} commands for application {application_id}");
        }
        Command::CreateProject {
            title,
            description,
            links,
        } => {
            let created = tracker(&settings)?
                .create_project(&draft(title, description, links))
                .await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Command::UpdateProject {
            project_id,
            title,
            description,
            links,
        } => {
            let changes = update(title, description, links);
            if changes.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            let updated = tracker(&settings)?
                .update_project(ProjectId(project_id), &changes)
                .await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
    }

    Ok(())
}
