use chrono::{DateTime, Local, Utc};
use prioritask_core::Task;
use tabled::settings::object::{Cell, Rows};
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

const PRIORITY_COLUMN: usize = 4;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Pri")]
    priority: String,
    #[tabled(rename = "Score")]
    score: String,
}

/// Prints tasks in the order given, which callers pass most urgent first.
pub fn show_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks. Add one with `prioritask add <name> due:<when> pri:<0-1>`.");
        return;
    }

    let now = Utc::now();
    let rows = build_rows(tasks, now);

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    for (i, task) in tasks.iter().enumerate() {
        // +1 skips the header row
        table.with(Modify::new(Cell::new(i + 1, PRIORITY_COLUMN)).with(hue_color(task.urgency_hue())));
    }

    println!("{}", table);
}

fn build_rows(tasks: &[&Task], now: DateTime<Utc>) -> Vec<TaskRow> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let local_due: DateTime<Local> = DateTime::from(task.due_date);
            TaskRow {
                rank: i + 1,
                id: task.id().short().to_string(),
                name: if task.name.is_empty() { "(untitled)".to_string() } else { task.name.clone() },
                due: format!(
                    "{} ({})",
                    local_due.format("%a %Y-%m-%d %H:%M"),
                    format_relative(task.due_date, now)
                ),
                priority: format!("{:.2}", task.priority),
                score: format!("{:.0}", task.weighted_score_at(now)),
            }
        })
        .collect()
}

/// 0° (priority 1.0) is red, 60° (priority 0.0) is yellow.
fn hue_color(hue: f32) -> Color {
    if hue < 20.0 {
        Color::FG_RED
    } else if hue < 40.0 {
        Color::FG_BRIGHT_RED
    } else {
        Color::FG_YELLOW
    }
}

fn format_relative(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = due - now;
    let overdue = delta.num_seconds() < 0;
    let delta = delta.abs();

    let amount = if delta.num_minutes() < 60 {
        format!("{}m", delta.num_minutes())
    } else if delta.num_hours() < 48 {
        format!("{}h", delta.num_hours())
    } else {
        format!("{}d", delta.num_days())
    };

    if overdue {
        format!("overdue {}", amount)
    } else {
        format!("in {}", amount)
    }
}
