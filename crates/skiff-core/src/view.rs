use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::task::Todo;

/// Due-date window applied to the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Tomorrow,
    Week,
}

impl DateFilter {
    /// Unrecognized words fall through to `All`. The original behavior is
    /// no validation at all, so an unknown filter must behave exactly like
    /// no date filter rather than fail.
    pub fn parse(word: &str) -> Self {
        match word.trim().to_ascii_lowercase().as_str() {
            "today" => DateFilter::Today,
            "tomorrow" => DateFilter::Tomorrow,
            "week" => DateFilter::Week,
            "all" => DateFilter::All,
            other => {
                warn!(filter = %other, "unknown filter word, treating as 'all'");
                DateFilter::All
            }
        }
    }

    /// Whether a due date (or its absence) falls inside this window.
    /// Todos without a due date never match a date window.
    pub fn matches(self, due: Option<NaiveDate>, today: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::Today => due == Some(today),
            DateFilter::Tomorrow => due == today.checked_add_days(Days::new(1)),
            DateFilter::Week => {
                let Some(due) = due else {
                    return false;
                };
                let Some(week_end) = today.checked_add_days(Days::new(7)) else {
                    return false;
                };
                today <= due && due <= week_end
            }
        }
    }
}

/// The two pieces of selection state, and the derived visible list. Both
/// selectors are hard filters and combine by simple AND; neither sorts,
/// so the result keeps storage order.
#[derive(Debug, Clone, Default)]
pub struct ViewSelector {
    current_project: Option<String>,
    current_filter: DateFilter,
}

impl ViewSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_project(&mut self, name: Option<String>) {
        self.current_project = name;
    }

    pub fn project(&self) -> Option<&str> {
        self.current_project.as_deref()
    }

    pub fn set_filter(&mut self, filter: DateFilter) {
        self.current_filter = filter;
    }

    pub fn filter(&self) -> DateFilter {
        self.current_filter
    }

    pub fn visible<'a>(&self, todos: &'a [Todo], today: NaiveDate) -> Vec<&'a Todo> {
        todos
            .iter()
            .filter(|todo| match &self.current_project {
                // Exact, case-sensitive match.
                Some(name) => todo.project.as_deref() == Some(name.as_str()),
                None => true,
            })
            .filter(|todo| self.current_filter.matches(todo.due, today))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DateFilter, ViewSelector};
    use crate::task::{Priority, Todo};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn todo(id: u64, title: &str, due: Option<NaiveDate>, project: Option<&str>) -> Todo {
        Todo::new(
            id,
            title.to_string(),
            String::new(),
            due,
            Priority::Medium,
            project.map(str::to_string),
        )
    }

    #[test]
    fn unknown_filter_word_behaves_as_all() {
        assert_eq!(DateFilter::parse("today"), DateFilter::Today);
        assert_eq!(DateFilter::parse("Tomorrow"), DateFilter::Tomorrow);
        assert_eq!(DateFilter::parse("week"), DateFilter::Week);
        assert_eq!(DateFilter::parse("all"), DateFilter::All);
        assert_eq!(DateFilter::parse("fortnight"), DateFilter::All);
        assert_eq!(DateFilter::parse(""), DateFilter::All);
    }

    #[test]
    fn week_window_is_inclusive_of_both_ends() {
        let today = date(2026, 3, 10);
        assert!(DateFilter::Week.matches(Some(date(2026, 3, 10)), today));
        assert!(DateFilter::Week.matches(Some(date(2026, 3, 11)), today));
        assert!(DateFilter::Week.matches(Some(date(2026, 3, 17)), today));
        assert!(!DateFilter::Week.matches(Some(date(2026, 3, 18)), today));
        assert!(!DateFilter::Week.matches(Some(date(2026, 3, 9)), today));
    }

    #[test]
    fn todos_without_due_date_skip_date_windows() {
        let today = date(2026, 3, 10);
        assert!(DateFilter::All.matches(None, today));
        assert!(!DateFilter::Today.matches(None, today));
        assert!(!DateFilter::Tomorrow.matches(None, today));
        assert!(!DateFilter::Week.matches(None, today));
    }

    #[test]
    fn tomorrow_matches_exactly_the_next_day() {
        let today = date(2026, 12, 31);
        assert!(DateFilter::Tomorrow.matches(Some(date(2027, 1, 1)), today));
        assert!(!DateFilter::Tomorrow.matches(Some(date(2026, 12, 31)), today));
        assert!(!DateFilter::Tomorrow.matches(Some(date(2027, 1, 2)), today));
    }

    #[test]
    fn project_filter_is_case_sensitive_and_keeps_order() {
        let today = date(2026, 3, 10);
        let todos = vec![
            todo(1, "first", None, Some("Work")),
            todo(2, "second", None, Some("work")),
            todo(3, "third", None, Some("Work")),
            todo(4, "fourth", None, None),
        ];

        let mut view = ViewSelector::new();
        view.set_project(Some("Work".to_string()));

        let visible = view.visible(&todos, today);
        let ids: Vec<u64> = visible.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn project_and_date_filters_compose_by_and() {
        let today = date(2026, 3, 10);
        let todos = vec![
            todo(1, "due today, work", Some(today), Some("Work")),
            todo(2, "due today, home", Some(today), Some("Home")),
            todo(3, "due in eight days, work", Some(date(2026, 3, 18)), Some("Work")),
            todo(4, "no due date, work", None, Some("Work")),
        ];

        let mut view = ViewSelector::new();
        view.set_project(Some("Work".to_string()));
        view.set_filter(DateFilter::Week);

        let visible = view.visible(&todos, today);
        let ids: Vec<u64> = visible.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn default_view_passes_everything_through() {
        let today = date(2026, 3, 10);
        let todos = vec![
            todo(1, "a", Some(date(2020, 1, 1)), None),
            todo(2, "b", None, Some("Work")),
        ];

        let view = ViewSelector::new();
        assert_eq!(view.project(), None);
        assert_eq!(view.filter(), DateFilter::All);
        assert_eq!(view.visible(&todos, today).len(), 2);
    }
}
