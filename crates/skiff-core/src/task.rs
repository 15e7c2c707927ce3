use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Calendar date with no time component, serialized as `YYYY-MM-DD`.
    #[serde(default)]
    pub due: Option<NaiveDate>,

    pub priority: Priority,

    /// Weak reference to a project by name; never integrity-checked, so a
    /// removed or renamed project leaves this dangling.
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(
        id: u64,
        title: String,
        description: String,
        due: Option<NaiveDate>,
        priority: Priority,
        project: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            due,
            priority,
            project,
            completed: false,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
}

/// Partial update for a single todo. Only supplied fields are applied;
/// `due` and `project` carry a nested Option so a patch can distinguish
/// "leave alone" from "clear".
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub project: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due.is_none()
            && self.priority.is_none()
            && self.project.is_none()
            && self.completed.is_none()
    }

    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(due) = self.due {
            todo.due = due;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(project) = &self.project {
            todo.project = project.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}
