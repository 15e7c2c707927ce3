use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::datetime::human_date_label;
use crate::task::{Project, Todo};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, todos, today))]
    pub fn print_todo_table(&mut self, todos: &[&Todo], today: NaiveDate) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if todos.is_empty() {
            writeln!(out, "No matching todos.")?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            " ".to_string(),
            "Due".to_string(),
            "Pri".to_string(),
            "Project".to_string(),
            "Title".to_string(),
        ];

        let mut rows = Vec::with_capacity(todos.len());

        for todo in todos {
            let id = self.paint(&todo.id.to_string(), "33");
            let mark = if todo.completed { "x" } else { " " }.to_string();

            let due = todo.due.map(human_date_label).unwrap_or_default();
            let due = if todo.is_overdue(today) {
                self.paint(&due, "31")
            } else {
                due
            };

            let project = todo.project.clone().unwrap_or_default();

            rows.push(vec![
                id,
                mark,
                due,
                todo.priority.label().to_string(),
                project,
                todo.title.clone(),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, projects))]
    pub fn print_project_list(&mut self, projects: &[Project]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if projects.is_empty() {
            writeln!(out, "No projects.")?;
            return Ok(());
        }

        for project in projects {
            writeln!(out, "{}", project.name)?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
