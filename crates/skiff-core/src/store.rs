use chrono::NaiveDate;
use tracing::{debug, info};

use crate::datastore::DataStore;
use crate::task::{Priority, Project, Todo, TodoPatch};

/// Authoritative in-memory collections with durable persistence. Both
/// collections are loaded once at open; every mutation applies in memory
/// first, then writes the full affected collection back. A failed write
/// surfaces as an error but leaves the in-memory state intact.
///
/// Titles and project names are expected non-empty; that is the caller's
/// contract to enforce, the store does not validate. Not-found ids on
/// edit/delete/toggle are silent no-ops.
#[derive(Debug)]
pub struct TaskStore {
    datastore: DataStore,
    todos: Vec<Todo>,
    projects: Vec<Project>,
    next_id: u64,
}

impl TaskStore {
    #[tracing::instrument(skip(datastore))]
    pub fn open(datastore: DataStore) -> anyhow::Result<Self> {
        let todos = datastore.load_todos()?;
        let projects = datastore.load_projects()?;

        // Seeded past every persisted id and never decremented, so an id is
        // never reused within a process lifetime even after deletes.
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;

        info!(
            todos = todos.len(),
            projects = projects.len(),
            next_id,
            "task store loaded"
        );

        Ok(Self {
            datastore,
            todos,
            projects,
            next_id,
        })
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[tracing::instrument(skip(self, title, description, project))]
    pub fn add_todo(
        &mut self,
        title: String,
        description: String,
        due: Option<NaiveDate>,
        priority: Priority,
        project: Option<String>,
    ) -> anyhow::Result<&Todo> {
        let id = self.next_id;
        self.next_id += 1;

        let todo = Todo::new(id, title, description, due, priority, project);
        self.todos.push(todo);
        self.datastore.save_todos(&self.todos)?;

        debug!(id, count = self.todos.len(), "todo added");
        Ok(&self.todos[self.todos.len() - 1])
    }

    #[tracing::instrument(skip(self, patch))]
    pub fn edit_todo(&mut self, id: u64, patch: TodoPatch) -> anyhow::Result<()> {
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            debug!(id, "edit on unknown id, ignoring");
            return Ok(());
        };

        patch.apply(todo);
        self.datastore.save_todos(&self.todos)?;
        debug!(id, "todo edited");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_todo(&mut self, id: u64) -> anyhow::Result<()> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        if self.todos.len() == before {
            debug!(id, "delete on unknown id, ignoring");
            return Ok(());
        }

        self.datastore.save_todos(&self.todos)?;
        debug!(id, count = self.todos.len(), "todo deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle_completed(&mut self, id: u64) -> anyhow::Result<()> {
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            debug!(id, "toggle on unknown id, ignoring");
            return Ok(());
        };

        todo.completed = !todo.completed;
        let completed = todo.completed;
        self.datastore.save_todos(&self.todos)?;
        debug!(id, completed, "todo toggled");
        Ok(())
    }

    #[tracing::instrument(skip(self, name))]
    pub fn add_project(&mut self, name: String) -> anyhow::Result<&Project> {
        // No duplicate check: projects are unique by convention only.
        self.projects.push(Project { name });
        self.datastore.save_projects(&self.projects)?;

        debug!(count = self.projects.len(), "project added");
        Ok(&self.projects[self.projects.len() - 1])
    }
}
