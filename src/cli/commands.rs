//! Command dispatch: maps parsed arguments onto services

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{ExportFormat, GuestListSession, Persisted};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, FormatArg, FriendCommands, PersonCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Document;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::FileStore;
use crate::infrastructure::InfraError;

/// Which top-level collection a person command targets.
#[derive(Debug, Clone, Copy)]
enum Group {
    Students,
    Teachers,
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::List => list(&container),
        Commands::Student { command } => person(&container, Group::Students, command),
        Commands::Teacher { command } => person(&container, Group::Teachers, command),
        Commands::Friend { command } => friend(&container, command),
        Commands::Export {
            format,
            dir,
            stdout,
        } => export(&container, *format, dir.as_deref(), *stdout),
        Commands::Import { file } => import(&container, file.as_deref()),
        Commands::Validate { file } => validate_file(&container, file),
        Commands::Reset => reset(&container),
        Commands::Config { command } => config(&container, command, cli),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Settings from files and env, then command-line overrides on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = match &cli.dir {
        Some(d) => d.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("determine cwd", e))?,
    };
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = data_dir.clone();
    }
    if cli.strict {
        settings.validation.strict = true;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Open the session, surfacing a corrupt or unreadable store as a warning.
fn open_session(container: &ServiceContainer) -> GuestListSession {
    let (session, warning) = container.open_session();
    if let Some(e) = warning {
        output::warning(&format!("{e}; starting with an empty guest list"));
    }
    session
}

fn report(persisted: Persisted, what: &str) {
    match persisted {
        Persisted::Saved => output::success(what),
        Persisted::MemoryOnly(e) => {
            output::success(what);
            output::warning(&format!("{e}; change was not saved"));
        }
    }
}

#[instrument(skip(container))]
fn list(container: &ServiceContainer) -> CliResult<()> {
    let session = open_session(container);
    print_document(session.document());
    Ok(())
}

fn print_document(doc: &Document) {
    output::header(&format!("Students ({})", doc.students.len()));
    for (i, student) in doc.students.iter().enumerate() {
        output::person(1, i, &student.name, student.state);
        for (j, friend) in student.friends.iter().enumerate() {
            output::person(3, j, &friend.name, friend.state);
        }
    }
    output::header(&format!("Teachers ({})", doc.teachers.len()));
    for (i, teacher) in doc.teachers.iter().enumerate() {
        output::person(1, i, &teacher.name, teacher.state);
    }
}

#[instrument(skip(container))]
fn person(container: &ServiceContainer, group: Group, command: &PersonCommands) -> CliResult<()> {
    let mut session = open_session(container);
    let label = match group {
        Group::Students => "student",
        Group::Teachers => "teacher",
    };

    let (persisted, what) = match command {
        PersonCommands::Add { name, state } => {
            let mut added = 0;
            let persisted = session.edit(|doc| {
                added = match group {
                    Group::Students => doc.add_student(name.clone(), *state),
                    Group::Teachers => doc.add_teacher(name.clone(), *state),
                };
                Ok(())
            })?;
            (persisted, format!("added {label} [{added}]"))
        }
        PersonCommands::Remove { index } => {
            let index = *index;
            let persisted = session.edit(|doc| match group {
                Group::Students => doc.remove_student(index).map(drop),
                Group::Teachers => doc.remove_teacher(index).map(drop),
            })?;
            (persisted, format!("removed {label} [{index}]"))
        }
        PersonCommands::Set { index, name, state } => {
            if name.is_none() && state.is_none() {
                return Err(CliError::Usage("nothing to change: pass --name and/or --state".into()));
            }
            let index = *index;
            let persisted = session.edit(|doc| match group {
                Group::Students => doc.update_student(index, name.clone(), *state),
                Group::Teachers => doc.update_teacher(index, name.clone(), *state),
            })?;
            (persisted, format!("updated {label} [{index}]"))
        }
    };

    report(persisted, &what);
    Ok(())
}

#[instrument(skip(container))]
fn friend(container: &ServiceContainer, command: &FriendCommands) -> CliResult<()> {
    let mut session = open_session(container);

    let (persisted, what) = match command {
        FriendCommands::Add {
            student,
            name,
            state,
        } => {
            let mut added = 0;
            let persisted = session.edit(|doc| {
                added = doc.add_friend(*student, name.clone(), *state)?;
                Ok(())
            })?;
            (persisted, format!("added friend [{added}] of student [{student}]"))
        }
        FriendCommands::Remove { student, index } => {
            let persisted = session.edit(|doc| doc.remove_friend(*student, *index).map(drop))?;
            (persisted, format!("removed friend [{index}] of student [{student}]"))
        }
        FriendCommands::Set {
            student,
            index,
            name,
            state,
        } => {
            if name.is_none() && state.is_none() {
                return Err(CliError::Usage("nothing to change: pass --name and/or --state".into()));
            }
            let persisted =
                session.edit(|doc| doc.update_friend(*student, *index, name.clone(), *state))?;
            (persisted, format!("updated friend [{index}] of student [{student}]"))
        }
    };

    report(persisted, &what);
    Ok(())
}

#[instrument(skip(container))]
fn export(
    container: &ServiceContainer,
    format: FormatArg,
    dir: Option<&Path>,
    stdout: bool,
) -> CliResult<()> {
    let session = open_session(container);
    let exchange = container.exchange();
    let format = ExportFormat::from(format);

    if stdout {
        let content = exchange.render(session.document(), format)?;
        output::info(content.trim_end());
        return Ok(());
    }

    let dir = dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.export.dir.clone());
    let path = exchange.export(session.document(), format, &dir)?;
    output::success(&format!("exported to {}", path.display()));
    Ok(())
}

#[instrument(skip(container))]
fn import(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let exchange = container.exchange();
    let document = match exchange.import(file) {
        Ok(doc) => doc,
        Err(ApplicationError::NoFileSelected) => {
            output::warning("no file selected, nothing imported");
            return Ok(());
        }
        Err(e) => {
            if let Some(v) = e.validation() {
                output::field_errors(&v.errors);
            }
            return Err(e.into());
        }
    };

    let mut session = open_session(container);
    let summary = format!(
        "imported {} students, {} teachers",
        document.students.len(),
        document.teachers.len()
    );
    let persisted = session.replace(document)?;
    report(persisted, &summary);
    Ok(())
}

#[instrument(skip(container))]
fn validate_file(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    match container.exchange().import(Some(file)) {
        Ok(doc) => {
            output::success(&format!(
                "{} is valid ({} people)",
                file.display(),
                doc.headcount()
            ));
            Ok(())
        }
        Err(e) => match e.validation() {
            Some(v) => {
                output::field_errors(&v.errors);
                Err(CliError::ValidationFailed {
                    count: v.errors.len(),
                })
            }
            None => Err(e.into()),
        },
    }
}

#[instrument(skip(container))]
fn reset(container: &ServiceContainer) -> CliResult<()> {
    let mut session = open_session(container);
    session.reset()?;
    output::success("guest list cleared");
    Ok(())
}

#[instrument(skip(container, cli))]
fn config(container: &ServiceContainer, command: &ConfigCommands, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".into());
            output::detail(&format!("global: {global}"));
            output::detail(&format!("local:  {}", local_target(cli)?.display()));
            let store = FileStore::new(container.settings.data_dir.clone(), container.fs.clone());
            let data = store
                .slot_path(&container.settings.storage_key)
                .map_err(|e| InfraError::io("resolve storage slot", e))?;
            output::detail(&format!("data:   {}", data.display()));
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("no global config directory".into()))?
            } else {
                local_target(cli)?
            };
            if container.fs.exists(&target) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    target.display()
                )));
            }
            container
                .fs
                .ensure_parent(&target)
                .map_err(|e| InfraError::io(format!("create {}", target.display()), e))?;
            container
                .fs
                .write(&target, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::success(&format!("created {}", target.display()));
        }
    }
    Ok(())
}

fn local_target(cli: &Cli) -> CliResult<PathBuf> {
    let dir = match &cli.dir {
        Some(d) => d.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("determine cwd", e))?,
    };
    Ok(local_config_path(&dir))
}
