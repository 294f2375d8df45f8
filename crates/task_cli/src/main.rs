use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use task_cli::api::{ClientError, HttpTaskApi};
use task_cli::cli::{Cli, Command, Settings, normalize_parse_error, split_command_line};
use task_cli::ui::{Dashboard, FormView, ItemView};
use task_core::{AppError, Task};

type Page = Dashboard<HttpTaskApi>;

fn report(err: &ClientError) {
    eprintln!("ERROR: {} - {}", err.code(), err);
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), ClientError> {
    let json = serde_json::to_string(value).map_err(AppError::from)?;
    println!("{json}");
    Ok(())
}

fn print_task(
    task: &Task,
    json: bool,
    settings: &Settings,
    verb: &str,
) -> Result<(), ClientError> {
    if json {
        return print_json(task);
    }
    println!("{verb} task: {} ({})", task.title, task.id);
    println!("{}", ItemView::new(task.clone()).render(&settings.palette));
    Ok(())
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn open_page(settings: &Settings) -> Result<Page, ClientError> {
    let api = HttpTaskApi::new(&settings.api_url, &settings.user)?;
    Ok(Dashboard::new(api))
}

fn run_command(
    page: &mut Page,
    settings: &Settings,
    command: Command,
    json: bool,
) -> Result<(), ClientError> {
    page.mount()?;

    match command {
        Command::Add { title, description } => {
            let mut form = FormView::new();
            form.set_title(title.as_deref().unwrap_or_default());
            if let Some(description) = description.as_deref() {
                form.set_description(description);
            }
            let task = page.create(&mut form)?;
            print_task(&task, json, settings, "Added")?;
        }
        Command::List { filter } => {
            page.set_filter(filter);
            let view = page.view();
            if json {
                print_json(&view.visible())?;
            } else {
                println!("{}", view.render(&settings.palette));
            }
        }
        Command::Toggle { task } => {
            let item = ItemView::new(page.resolve(&task)?.clone());
            let updated = page.update(&item.task().id, &item.toggle())?;
            let verb = if updated.completed {
                "Completed"
            } else {
                "Reopened"
            };
            print_task(&updated, json, settings, verb)?;
        }
        Command::Edit {
            task,
            title,
            description,
        } => {
            if title.is_none() && description.is_none() {
                return Err(
                    AppError::validation("nothing to edit: pass --title or --description").into(),
                );
            }
            let mut item = ItemView::new(page.resolve(&task)?.clone());
            item.begin_edit();
            if let Some(title) = title.as_deref() {
                item.set_title(title);
            }
            if let Some(description) = description.as_deref() {
                item.set_description(description);
            }
            let patch = item.save().unwrap_or_default();
            let updated = page.update(&item.task().id, &patch)?;
            print_task(&updated, json, settings, "Updated")?;
        }
        Command::Delete { task } => {
            let target = page.resolve(&task)?.clone();
            let message = page.delete(&target.id)?;
            if json {
                print_json(&serde_json::json!({ "message": message, "_id": target.id }))?;
            } else {
                println!("{message}: {} ({})", target.title, target.id);
            }
        }
    }

    Ok(())
}

fn run_interactive(settings: &Settings) -> Result<(), ClientError> {
    let mut page = open_page(settings)?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(AppError::from)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                report(&ClientError::from(err));
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("task_cli".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                print!("{err}");
                continue;
            }
            Err(err) => {
                report(&ClientError::from(normalize_parse_error(err)));
                continue;
            }
        };

        let Some(command) = cli.command else {
            print_help();
            continue;
        };

        if let Err(err) = run_command(&mut page, settings, command, cli.json) {
            report(&err);
        }
    }

    Ok(())
}

fn run(mut cli: Cli) -> Result<(), ClientError> {
    let settings = Settings::resolve(&cli)?;
    match cli.command.take() {
        Some(command) => {
            let mut page = open_page(&settings)?;
            run_command(&mut page, &settings, command, cli.json)
        }
        None => run_interactive(&settings),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            report(&ClientError::from(normalize_parse_error(err)));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        report(&err);
        std::process::exit(1);
    }
}
