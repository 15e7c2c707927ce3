use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::cli::Command;
use crate::config::Config;
use crate::datetime::{parse_iso_date, today_local};
use crate::render::Renderer;
use crate::store::TaskStore;
use crate::task::{Priority, TodoPatch};
use crate::view::{DateFilter, ViewSelector};

#[instrument(skip(store, cfg, renderer, command))]
pub fn dispatch(
    store: &mut TaskStore,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
) -> anyhow::Result<()> {
    let today = today_local();
    debug!(?command, %today, "dispatching command");

    match command {
        Command::Add {
            title,
            description,
            due,
            priority,
            project,
        } => cmd_add(store, title, description, due, priority, project),
        Command::List { project, filter } => {
            cmd_list(store, cfg, renderer, project, filter, today)
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            priority,
            project,
            clear_project,
        } => cmd_edit(
            store,
            id,
            title,
            description,
            due,
            clear_due,
            priority,
            project,
            clear_project,
        ),
        Command::Done { id } => cmd_done(store, id),
        Command::Delete { id } => cmd_delete(store, id),
        Command::Project { name } => cmd_project(store, name),
        Command::Projects => cmd_projects(store, renderer),
    }
}

#[instrument(skip_all)]
fn cmd_add(
    store: &mut TaskStore,
    title: String,
    description: Option<String>,
    due: Option<String>,
    priority: Priority,
    project: Option<String>,
) -> anyhow::Result<()> {
    info!("command add");

    // Validation lives here, not in the store: an empty title never
    // reaches it.
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(anyhow!("todo title cannot be empty"));
    }

    let due = due.as_deref().map(parse_iso_date).transpose()?;

    let todo = store.add_todo(
        title,
        description.unwrap_or_default(),
        due,
        priority,
        project,
    )?;

    println!("Created todo {}.", todo.id);
    Ok(())
}

#[instrument(skip_all)]
fn cmd_list(
    store: &mut TaskStore,
    cfg: &Config,
    renderer: &mut Renderer,
    project: Option<String>,
    filter: Option<String>,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command list");

    let filter_word = filter
        .or_else(|| cfg.get("default.filter"))
        .unwrap_or_else(|| "all".to_string());

    let mut view = ViewSelector::new();
    view.set_project(project);
    view.set_filter(DateFilter::parse(&filter_word));

    let visible = view.visible(store.todos(), today);
    debug!(
        total = store.todos().len(),
        visible = visible.len(),
        filter = ?view.filter(),
        project = ?view.project(),
        "computed visible list"
    );

    renderer.print_todo_table(&visible, today)
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip_all)]
fn cmd_edit(
    store: &mut TaskStore,
    id: u64,
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
    project: Option<String>,
    clear_project: bool,
) -> anyhow::Result<()> {
    info!("command edit");

    if let Some(title) = &title
        && title.trim().is_empty()
    {
        return Err(anyhow!("todo title cannot be empty"));
    }

    let due = match (due, clear_due) {
        (Some(raw), _) => Some(Some(parse_iso_date(&raw)?)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let project = match (project, clear_project) {
        (Some(name), _) => Some(Some(name)),
        (None, true) => Some(None),
        (None, false) => None,
    };

    let patch = TodoPatch {
        title,
        description,
        due,
        priority,
        project,
        completed: None,
    };

    if patch.is_empty() {
        return Err(anyhow!("edit requires at least one field to change"));
    }

    store.edit_todo(id, patch)?;
    println!("Edited todo {id}.");
    Ok(())
}

#[instrument(skip(store))]
fn cmd_done(store: &mut TaskStore, id: u64) -> anyhow::Result<()> {
    info!("command done");
    store.toggle_completed(id)?;
    println!("Toggled todo {id}.");
    Ok(())
}

#[instrument(skip(store))]
fn cmd_delete(store: &mut TaskStore, id: u64) -> anyhow::Result<()> {
    info!("command delete");
    store.delete_todo(id)?;
    println!("Deleted todo {id}.");
    Ok(())
}

#[instrument(skip_all)]
fn cmd_project(store: &mut TaskStore, name: String) -> anyhow::Result<()> {
    info!("command project");

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(anyhow!("project name cannot be empty"));
    }

    let project = store.add_project(name)?;
    println!("Created project {}.", project.name);
    Ok(())
}

#[instrument(skip_all)]
fn cmd_projects(store: &mut TaskStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command projects");
    renderer.print_project_list(store.projects())
}
