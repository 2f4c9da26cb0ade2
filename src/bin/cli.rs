use chrono::NaiveDate;
use planner_recurrence::calculations::maintenance::MAX_MONTHS_AHEAD;
use planner_recurrence::{
    Completion, Frequency, JsonFileStore, Planner, PlannerConfig, RecurrencePattern, Task,
    TaskStore, load_tasks_from_csv, load_tasks_from_json, save_tasks_to_csv, save_tasks_to_json,
};
use std::io::{self, Write};
use std::str::FromStr;

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(ci) {
                *width = (*width).max(cell.len());
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers.to_vec()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_tasks(planner: &Planner, today: NaiveDate) -> String {
    let calculator = planner.config().calculator();
    let rows = planner
        .tasks()
        .iter()
        .map(|task| {
            let next = calculator
                .next_for_task(task, today)
                .map(|d| d.to_string())
                .unwrap_or_default();
            vec![
                task.id.clone(),
                task.title.clone(),
                task.due_date.to_string(),
                task.recurring
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "once".to_string()),
                task.category.clone(),
                if task.completed { "yes" } else { "" }.to_string(),
                next,
            ]
        })
        .collect::<Vec<_>>();
    render_text_table(
        &["id", "title", "due", "repeats", "category", "done", "next"],
        &rows,
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  list                               Show all tasks\n  add <id> <YYYY-MM-DD> <category|-> <title...>\n                                     Upsert a task\n  recur <id> <frequency> [every=N] [days=1,3] [months=3,9] [month=6] [until=YYYY-MM-DD]\n                                     Make a task repeat\n  once <id>                          Remove a task's recurrence\n  next <id>                          Next occurrence after the reference date\n  preview <id> [count]               Upcoming occurrences (default 5)\n  upcoming [days]                    Recurring tasks due within the horizon\n  plan [months]                      Maintenance board by month\n  done <id>                          Complete the current occurrence\n  delete <id>                        Delete a task\n  today <YYYY-MM-DD>                 Set the reference date\n  save <json|csv> <path>             Persist tasks to disk\n  load <json|csv> <path>             Load tasks from disk\n  quit|exit                          Exit"
    );
    let frequencies = Frequency::ALL
        .iter()
        .map(Frequency::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    println!("Frequencies: {frequencies}");
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn parse_list(input: &str) -> Result<Vec<u32>, String> {
    input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid number '{part}'"))
        })
        .collect()
}

fn parse_pattern<'a>(
    frequency: &str,
    options: impl Iterator<Item = &'a str>,
) -> Result<RecurrencePattern, String> {
    let frequency = Frequency::from_str(frequency).map_err(|e| e.to_string())?;
    let mut pattern = RecurrencePattern::new(frequency);
    for option in options {
        let Some((key, value)) = option.split_once('=') else {
            return Err(format!("Expected key=value, got '{option}'"));
        };
        match key {
            "every" => {
                pattern.interval = value
                    .parse()
                    .map_err(|_| format!("Invalid interval '{value}'"))?
            }
            "days" => pattern.days_of_week = Some(parse_list(value)?),
            "months" => pattern.seasonal_months = Some(parse_list(value)?),
            "month" => {
                pattern.specific_month = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid month '{value}'"))?,
                )
            }
            "until" => {
                pattern.end_date =
                    Some(parse_date(value).ok_or("Invalid date (YYYY-MM-DD)".to_string())?)
            }
            other => return Err(format!("Unknown option '{other}'")),
        }
    }
    pattern.validate().map_err(|e| e.to_string())?;
    Ok(pattern)
}

fn print_upcoming(planner: &Planner, horizon_days: u32, today: NaiveDate) {
    let upcoming = planner.upcoming_within(horizon_days, today);
    if upcoming.is_empty() {
        println!("Nothing due in the next {horizon_days} days.");
        return;
    }
    let rows = upcoming
        .iter()
        .map(|item| {
            vec![
                item.next_occurrence.to_string(),
                item.task.id.clone(),
                item.task.title.clone(),
            ]
        })
        .collect::<Vec<_>>();
    println!("{}", render_text_table(&["date", "id", "title"], &rows));
}

fn print_board(planner: &Planner, months_ahead: u32, today: NaiveDate) {
    for bucket in planner.maintenance_board_for(months_ahead, today) {
        let month = planner_recurrence::calendar::month_name(bucket.month).unwrap_or("?");
        println!("== {} ({} {}) ==", bucket.label, month, bucket.year);
        if bucket.tasks.is_empty() {
            println!("  (nothing scheduled)");
        }
        for item in &bucket.tasks {
            println!(
                "  {}  {}  {}",
                item.next_occurrence, item.task.id, item.task.title
            );
        }
    }
}

fn with_task(planner: &Planner, id: &str) -> Option<Task> {
    let task = planner.find_task(id).cloned();
    if task.is_none() {
        println!("Task {id} not found.");
    }
    task
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = PlannerConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default configuration");
        PlannerConfig::default()
    });

    let mut planner = match config.store_path.clone() {
        Some(path) => {
            let loaded = JsonFileStore::new(&path)
                .load_tasks()
                .map_err(|e| e.to_string())
                .and_then(|tasks| {
                    Planner::from_tasks(tasks.unwrap_or_default(), config.clone())
                        .map_err(|e| e.to_string())
                });
            match loaded {
                Ok(planner) => planner,
                Err(e) => {
                    println!("Could not load {}: {}", path.display(), e);
                    Planner::with_config(config)
                }
            }
        }
        None => Planner::with_config(config),
    };
    let mut today = chrono::Local::now().date_naive();

    println!("Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" | "show" => println!("{}", render_tasks(&planner, today)),
            "today" => match parts.next().map(parse_date) {
                Some(Some(date)) => {
                    today = date;
                    println!("Reference date set to {today}.");
                }
                Some(None) => println!("Invalid date (YYYY-MM-DD)"),
                None => println!("Reference date is {today}."),
            },
            "add" => {
                let id = parts.next();
                let due = parts.next();
                let category = parts.next();
                let title = parts.collect::<Vec<_>>().join(" ");
                match (id, due, category) {
                    (Some(id), Some(due), Some(category)) if !title.is_empty() => {
                        let Some(due_date) = parse_date(due) else {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        };
                        let mut task = Task::new(id, title, due_date);
                        if category != "-" {
                            task.category = category.to_string();
                        }
                        if let Some(existing) = planner.find_task(id) {
                            task.recurring = existing.recurring.clone();
                        }
                        match planner.upsert_task(task) {
                            Ok(true) => println!("Task {id} added."),
                            Ok(false) => println!("Task {id} updated."),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: add <id> <YYYY-MM-DD> <category|-> <title...>"),
                }
            }
            "recur" => {
                let (Some(id), Some(frequency)) = (parts.next(), parts.next()) else {
                    println!("Usage: recur <id> <frequency> [every=N] [days=..] [months=..] [month=M] [until=YYYY-MM-DD]");
                    continue;
                };
                let Some(mut task) = with_task(&planner, id) else {
                    continue;
                };
                match parse_pattern(frequency, parts) {
                    Ok(pattern) => {
                        println!("Task {id} repeats {pattern}.");
                        task.recurring = Some(pattern);
                        if let Err(e) = planner.upsert_task(task) {
                            println!("Error: {e}");
                        }
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "once" => match parts.next() {
                Some(id) => {
                    let Some(mut task) = with_task(&planner, id) else {
                        continue;
                    };
                    task.recurring = None;
                    match planner.upsert_task(task) {
                        Ok(_) => println!("Task {id} no longer repeats."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                None => println!("Usage: once <id>"),
            },
            "next" => match parts.next() {
                Some(id) => match planner.next_occurrence_for(id, today) {
                    Ok(Some(date)) => println!("Next occurrence of {id}: {date}"),
                    Ok(None) => println!("Task {id} has no upcoming occurrence."),
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: next <id>"),
            },
            "preview" => {
                let Some(id) = parts.next() else {
                    println!("Usage: preview <id> [count]");
                    continue;
                };
                let count = match parts.next().map(str::parse::<usize>) {
                    Some(Ok(count)) => count,
                    Some(Err(_)) => {
                        println!("Invalid count");
                        continue;
                    }
                    None => 5,
                };
                let Some(task) = with_task(&planner, id) else {
                    continue;
                };
                let Some(pattern) = &task.recurring else {
                    println!("Task {id} does not repeat.");
                    continue;
                };
                let dates = planner
                    .config()
                    .calculator()
                    .occurrences(pattern, task.due_date, today)
                    .take(count)
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>();
                if dates.is_empty() {
                    println!("Task {id} has no upcoming occurrence.");
                } else {
                    println!("Upcoming for {id}: {}", dates.join(", "));
                }
            }
            "upcoming" => {
                let horizon_days = match parts.next().map(str::parse::<u32>) {
                    Some(Ok(days)) => days,
                    Some(Err(_)) => {
                        println!("Invalid number of days");
                        continue;
                    }
                    None => planner.config().horizon_days,
                };
                print_upcoming(&planner, horizon_days, today);
            }
            "plan" => {
                let months_ahead = match parts.next().map(str::parse::<u32>) {
                    Some(Ok(months)) if months <= MAX_MONTHS_AHEAD => months,
                    Some(Ok(_)) => {
                        println!("At most {MAX_MONTHS_AHEAD} months can be planned");
                        continue;
                    }
                    Some(Err(_)) => {
                        println!("Invalid number of months");
                        continue;
                    }
                    None => planner.config().months_ahead,
                };
                print_board(&planner, months_ahead, today);
            }
            "done" => match parts.next() {
                Some(id) => match planner.complete_occurrence(id, today) {
                    Ok(Completion::Rescheduled { due_date }) => {
                        println!("Task {id} rescheduled to {due_date}.")
                    }
                    Ok(Completion::Completed) => println!("Task {id} completed."),
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: done <id>"),
            },
            "delete" => match parts.next() {
                Some(id) => {
                    if planner.delete_task(id) {
                        println!("Deleted task {id}.");
                    } else {
                        println!("Task {id} not found.");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match save_tasks_to_json(planner.tasks(), path) {
                        Ok(()) => println!("Tasks saved to {path}"),
                        Err(e) => println!("Error saving tasks: {e}"),
                    },
                    (Some("csv"), Some(path)) => match save_tasks_to_csv(planner.tasks(), path) {
                        Ok(()) => println!("Tasks saved to {path}"),
                        Err(e) => println!("Error saving tasks: {e}"),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                let loaded = match (fmt, path) {
                    (Some("json"), Some(path)) => load_tasks_from_json(path),
                    (Some("csv"), Some(path)) => load_tasks_from_csv(path),
                    _ => {
                        println!("Usage: load <json|csv> <path>");
                        continue;
                    }
                };
                match loaded.map_err(|e| e.to_string()).and_then(|tasks| {
                    planner.replace_tasks(tasks).map_err(|e| e.to_string())
                }) {
                    Ok(()) => println!("Tasks loaded from {}", path.unwrap_or_default()),
                    Err(e) => println!("Error loading tasks: {e}"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
