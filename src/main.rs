use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use module_release::cli::orchestration::{self, PublishWorkflowArgs};
use module_release::cli::{Args, Command};
use module_release::config::{self, ReleaseConfig};
use module_release::dist;
use module_release::git::Git2Repository;
use module_release::ui;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(&args.project, args.config.as_deref())?;

    match args.command {
        Command::Build => {
            let copied = dist::build(&config)?;
            ui::display_success(&format!(
                "Built {} ({} static entries)",
                config.dist_path().display(),
                copied
            ));
        }
        Command::Clean => {
            let removed = dist::clean(&config)?;
            ui::display_success(&format!("Removed {} stale entries", removed.len()));
        }
        Command::Watch => {
            ui::display_status(&format!(
                "Watching {} (Ctrl-C to stop)",
                config.manifest_path().display()
            ));
            dist::watch(&config)?;
        }
        Command::Link { remove } => {
            let outcome = dist::link(&config, remove)?;
            ui::display_link_outcome(&outcome);
        }
        Command::Update { version, dry_run } => {
            let outcome = orchestration::update_manifest(&config, version.as_deref(), dry_run)?;
            ui::display_version_change(&outcome);
            if dry_run {
                ui::display_status("Dry run: manifest not written");
            } else {
                ui::display_success(&format!("Updated version number to '{}'", outcome.version));
            }
        }
        Command::Publish {
            version,
            dry_run,
            yes,
        } => publish(&config, version, dry_run, yes)?,
    }

    Ok(())
}

fn publish(config: &ReleaseConfig, version: Option<String>, dry_run: bool, yes: bool) -> Result<()> {
    let repo = Git2Repository::open(&config.project_root)?;

    let preview_args = PublishWorkflowArgs {
        version: version.clone(),
        dry_run: true,
    };
    let preview = orchestration::run_publish_workflow(config, &preview_args, &repo)?;
    ui::display_version_change(&preview.update);

    if dry_run {
        ui::display_publish_plan(&preview.update);
        return Ok(());
    }

    if !yes && !ui::confirm_action(&format!("Commit and tag {}?", preview.tag))? {
        println!("Publish cancelled by user.");
        return Ok(());
    }

    let args = PublishWorkflowArgs {
        version,
        dry_run: false,
    };
    let result = orchestration::run_publish_workflow(config, &args, &repo)?;

    if let Some(commit) = &result.commit {
        ui::display_success(&format!(
            "Committed {} as '{}'",
            &commit[..commit.len().min(7)],
            result.update.commit_message()
        ));
    }
    ui::display_success(&format!("Created tag: {}", result.tag));
    println!(
        "\n{} Published {}\n",
        console::style("✓").green(),
        result.tag
    );

    Ok(())
}
