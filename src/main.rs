use std::io::Write;
use std::path::PathBuf;

use student_register::app::records::{FormField, LoadTicket, Record, RecordInput, RecordService};
use student_register::config::{self, load_config};
use student_register::infrastructure::Logger;
use student_register::{FetchError, RegisterPage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};

/// 后台请求完成事件
enum Event {
    Loaded(LoadTicket, Result<Vec<Record>, FetchError>),
    Created(Result<Record, FetchError>),
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().skip(1).any(|a| a == "-h" || a == "--help") {
        print_usage(&args[0]);
        return Ok(());
    }

    let explicit = args.get(1).map(PathBuf::from);
    let (config, source) = load_config(explicit.as_deref())?;
    let config = config::init_config(config)?;
    let _guard = Logger::init(&config.logging)?;

    match &source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let service = RecordService::from_config(&config.api)?;
    info!("Backend endpoint: {}", service.endpoint());

    let mut page = RegisterPage::new(config.display.formatter()?);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let ticket = page.mount();
    spawn_load(&service, &tx, ticket);
    print_page(&page);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    // stdin 已关闭
                    Ok(None) => break,
                    // 非 UTF-8 输入行已被读走，跳过即可
                    Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                        warn!("忽略无法解码的输入行: {}", e);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                if let Flow::Quit = handle_command(line.trim(), &mut page, &service, &tx) {
                    break;
                }
            }
            Some(event) = rx.recv() => {
                apply_event(event, &mut page, &service, &tx);
                print_page(&page);
            }
        }
    }

    info!("Exiting");
    Ok(())
}

fn handle_command(
    line: &str,
    page: &mut RegisterPage,
    service: &RecordService,
    tx: &UnboundedSender<Event>,
) -> Flow {
    let (command, value) = line
        .split_once(char::is_whitespace)
        .map(|(c, v)| (c, v.trim()))
        .unwrap_or((line, ""));

    match command {
        "" => return Flow::Continue,
        "quit" | "exit" => return Flow::Quit,
        "help" => {
            print_help();
            return Flow::Continue;
        }
        "show" => {}
        "refresh" => {
            let ticket = page.table_mut().begin_load();
            spawn_load(service, tx, ticket);
        }
        "submit" => match page.form_mut().begin_submit() {
            Ok(input) => spawn_create(service, tx, input),
            Err(rejected) => warn!("Submit rejected: {}", rejected),
        },
        other => match FormField::parse(other) {
            Some(field) => page.form_mut().set_field(field, value),
            None => {
                println!("Unknown command: {other}. Type `help` for the list.");
                return Flow::Continue;
            }
        },
    }

    print_page(page);
    Flow::Continue
}

fn apply_event(
    event: Event,
    page: &mut RegisterPage,
    service: &RecordService,
    tx: &UnboundedSender<Event>,
) {
    match event {
        Event::Loaded(ticket, result) => {
            page.table_mut().finish_load(ticket, result);
        }
        Event::Created(result) => {
            let Some(record) = page.form_mut().finish_submit(result) else {
                return;
            };
            if let Some(ticket) = page.record_created(&record) {
                spawn_load(service, tx, ticket);
            }
        }
    }
}

fn spawn_load(service: &RecordService, tx: &UnboundedSender<Event>, ticket: LoadTicket) {
    let service = service.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.list().await;
        let _ = tx.send(Event::Loaded(ticket, result));
    });
}

fn spawn_create(service: &RecordService, tx: &UnboundedSender<Event>, input: RecordInput) {
    let service = service.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = service.create(&input).await;
        let _ = tx.send(Event::Created(result));
    });
}

fn print_page(page: &RegisterPage) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "\n{}\n> ", page.render());
    let _ = stdout.flush();
}

fn print_help() {
    println!("Commands:");
    println!("  name <text>            set the student's name");
    println!("  email <text>           set the email");
    println!("  birthdate <YYYY-MM-DD> set the birthdate");
    println!("  program <text>         set the academic program");
    println!("  submit                 register the student");
    println!("  refresh                reload the table");
    println!("  show                   print the page again");
    println!("  quit                   exit");
}

fn print_usage(program: &str) {
    println!("Usage: {program} [config.toml]");
    println!();
    println!("Without an argument the config is read from ${}", config::CONFIG_ENV);
    println!("or ./config.toml, falling back to built-in defaults.");
    println!();
    print_help();
}
