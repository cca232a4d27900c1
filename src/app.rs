use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

use crate::cli::{Cli, Commands, CreateArgs, InitArgs, TransferArgs};
use crate::config::ProjectConfig;
use crate::error::{AppError, TransferError};
use crate::names::validate::{CheckMode, validate_project_names};
use crate::names::{Level, WildcardPolicy, format_names, suggest_next_number};
use crate::project::transfer::{TransferDirection, TransferOptions};
use crate::project::{folders, index, transfer};
use crate::utils::SystemClock;

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Init(args) => run_init(cli, args),
        Commands::Create(args) => run_create(cli, args),
        Commands::Format { level, names } => run_format(cli, *level, names),
        Commands::Validate { strict } => run_validate(cli, *strict),
        Commands::NextSub => run_next(cli, Level::Sub, None),
        Commands::NextSes { sub } => run_next(cli, Level::Ses, Some(sub)),
        Commands::Upload(args) => run_transfer(cli, TransferDirection::Upload, args),
        Commands::Download(args) => run_transfer(cli, TransferDirection::Download, args),
    }
}

fn run_init(cli: &Cli, args: &InitArgs) -> Result<(), AppError> {
    let config = ProjectConfig {
        project_name: cli.project.clone(),
        local_path: args.local_path.clone(),
        central_path: args.central_path.clone(),
        connection_method: args.connection_method,
        central_host_id: args.central_host_id.clone(),
        central_host_username: args.central_host_username.clone(),
        overwrite_old_files: args.overwrite_old_files,
        transfer_verbosity: args.transfer_verbosity,
        show_transfer_progress: args.show_transfer_progress,
        default_digits: args.default_digits,
    };

    let path = config.save()?;

    // The project stays usable without rclone until a transfer is needed.
    match transfer::setup_central_as_rclone_target(&config) {
        Ok(()) => {}
        Err(err @ TransferError::RcloneNotFound) => eprintln!("Warning: {err}"),
        Err(err) => return Err(err.into()),
    }

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "config_path": path.display().to_string() })
        );
    } else {
        println!("Project config written to {}", path.display());
    }
    Ok(())
}

fn run_create(cli: &Cli, args: &CreateArgs) -> Result<(), AppError> {
    let config = ProjectConfig::load(&cli.project)?;
    let clock = SystemClock;

    let sub_names = format_names(&args.sub_names, Level::Sub, &clock, WildcardPolicy::Reject)?;
    let ses_names = format_names(&args.ses_names, Level::Ses, &clock, WildcardPolicy::Reject)?;

    let tree = folders::make_folder_trees(&config, &sub_names, &ses_names, &args.datatypes)?;
    for warning in &tree.warnings {
        eprintln!("Warning: {warning}");
    }

    if cli.json {
        let made: Vec<String> = tree
            .made
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        println!(
            "{}",
            serde_json::json!({ "made": made, "warnings": tree.warnings })
        );
    } else if tree.made.is_empty() {
        println!("All requested folders already exist.");
    } else {
        for path in &tree.made {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn run_format(cli: &Cli, level: Level, names: &[String]) -> Result<(), AppError> {
    let formatted = format_names(names, level, &SystemClock, WildcardPolicy::Reject)?;

    if cli.json {
        println!("{}", serde_json::json!(formatted));
    } else {
        for name in &formatted {
            println!("{name}");
        }
    }
    Ok(())
}

fn run_next(cli: &Cli, level: Level, sub: Option<&str>) -> Result<(), AppError> {
    let config = ProjectConfig::load(&cli.project)?;
    let existing = index::union_of_local_and_central(&config, level, sub)?;
    let next = suggest_next_number(&existing, level, config.default_digits)?;

    if next.skipped {
        eprintln!(
            "Warning: A {level} number has been skipped, currently used {level} numbers are: {:?}",
            next.used
        );
    }

    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "name": next.name,
                "value": next.value,
                "width": next.width,
                "used": next.used,
            })
        );
    } else {
        println!("{}", next.name);
    }
    Ok(())
}

fn run_validate(cli: &Cli, strict: bool) -> Result<(), AppError> {
    let config = ProjectConfig::load(&cli.project)?;

    let sub_names = index::union_of_local_and_central(&config, Level::Sub, None)?;
    let mut ses_names_by_sub = Vec::with_capacity(sub_names.len());
    for sub in &sub_names {
        let ses_names = index::union_of_local_and_central(&config, Level::Ses, Some(sub))?;
        ses_names_by_sub.push((sub.clone(), ses_names));
    }

    let mode = if strict {
        CheckMode::Error
    } else {
        CheckMode::Warn
    };
    let issues = validate_project_names(&sub_names, &ses_names_by_sub, mode)?;

    if cli.json {
        println!("{}", serde_json::json!({ "issues": issues }));
    } else if issues.is_empty() {
        println!("No issues found.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Issue"]);
        for issue in &issues {
            table.add_row(vec![issue.as_str()]);
        }
        println!("{table}");
    }
    Ok(())
}

fn run_transfer(
    cli: &Cli,
    direction: TransferDirection,
    args: &TransferArgs,
) -> Result<(), AppError> {
    let config = ProjectConfig::load(&cli.project)?;
    let clock = SystemClock;

    let sub_names = format_names(&args.sub_names, Level::Sub, &clock, WildcardPolicy::Allow)?;
    let ses_names = format_names(&args.ses_names, Level::Ses, &clock, WildcardPolicy::Allow)?;

    // "all" selects everything below the session level, expressed as an
    // absent datatype filter.
    let datatypes: Vec<String> = if args.datatypes.iter().any(|name| name == "all") {
        Vec::new()
    } else {
        folders::resolve_datatypes(&args.datatypes)?
            .iter()
            .map(|folder| folder.name.to_string())
            .collect()
    };

    let options = TransferOptions::from_config(&config, args.dry_run);
    transfer::transfer_data(
        &config,
        direction,
        &sub_names,
        &ses_names,
        &datatypes,
        options,
    )?;
    Ok(())
}
