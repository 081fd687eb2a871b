use anyhow::{Context, Result};
use pipeline_composer::cli::commands::{RenderCommand, ValidateCommand};
use pipeline_composer::cli::output::*;
use pipeline_composer::cli::{Cli, Command};
use pipeline_composer::core::config::GeneratorConfig;
use pipeline_composer::render::build_document;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Logs go to stderr so a rendered document can be piped from stdout
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Render(cmd) => render_pipeline(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
    }

    Ok(())
}

fn render_pipeline(cmd: &RenderCommand) -> Result<()> {
    let config = GeneratorConfig::from_file(&cmd.file)
        .context("Failed to load generator config")?;

    let document = match build_document(&config, cmd.strict) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{} {} {}", CROSS, style(&config.name).bold(), style("failed").red());
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let rendered = document
        .render(cmd.format.into())
        .context("Failed to encode pipeline document")?;

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path))?;
            eprintln!(
                "{} Wrote {} to {}",
                CHECK,
                style(&config.name).bold(),
                style(path).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating generator config...", INFO);

    let result = GeneratorConfig::from_file(&cmd.file)
        .and_then(|config| Ok((build_document(&config, false)?, config)));

    match result {
        Ok((document, config)) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("{}", format_document_summary(&document));
            for job in document.jobs() {
                println!("    {}", format_job(job));
            }

            if cmd.json {
                let data = serde_json::json!({
                    "name": config.name,
                    "version": config.version,
                    "resource_types": document.resource_types().len(),
                    "resources": document.resources().len(),
                    "jobs": document.jobs().iter().map(|j| j.name.as_str()).collect::<Vec<_>>(),
                });
                println!("\n{}", serde_json::to_string_pretty(&data)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}
