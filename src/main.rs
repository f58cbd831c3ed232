mod api;
mod models;
mod operations;
mod session_store;

use clap::Parser;

use api::{auth as api_auth, expenses as api_expenses, ApiClient, ApiError};
use models::expense::{ExpenseFilter, CATEGORIES};
use models::session::Session;
use operations::add::read_user_input_and_create_draft;
use operations::auth::{read_login_input, read_register_input};
use operations::browse::{parse_iso_date, run_browse};
use operations::list::{format_expense_table, format_filter, format_summary};
use std::io;

#[derive(Parser)]
#[command(name = "expenso", about = "Terminal client for a personal expense tracker API")]
struct Args {
    /// Base URL of the expense API
    #[arg(
        long,
        env = "EXPENSO_API_URL",
        default_value = "http://localhost:8000/api"
    )]
    api_url: String,
}

pub enum UserCommands {
    Register,
    Login,
    Logout,
    Add,
    List,
    Filter,
    Browse,
    Summary,
    Delete,
    Exit,
    Unknown,
}

fn main() {
    let args = Args::parse();
    let api = ApiClient::new(&args.api_url);

    println!("Welcome to the expense tracker!");

    // Rehydrate any persisted session before the first prompt.
    let mut session = match session_store::load_session() {
        Ok(session) => session,
        Err(e) => {
            println!("Warning: {}", e);
            None
        }
    };
    if let Some(ref s) = session {
        println!("Welcome back, {}!", s.username);
    }

    let mut filter = ExpenseFilter::default();

    loop {
        match session {
            Some(_) => println!(
                "Please enter a command (add, list, filter, browse, summary, delete, logout, exit):"
            ),
            None => println!("Please enter a command (register, login, exit):"),
        }

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(_) => break,
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let command = check_for_command(parts[0]);

        match command {
            UserCommands::Register => {
                if let Some(ref s) = session {
                    println!("Already logged in as {}. Use logout first.", s.username);
                } else {
                    handle_register(&api);
                }
            }
            UserCommands::Login => {
                if let Some(ref s) = session {
                    println!("Already logged in as {}. Use logout first.", s.username);
                } else {
                    session = handle_login(&api, &filter);
                }
            }
            UserCommands::Logout => {
                if session.is_none() {
                    println!("Please login first.");
                } else {
                    if let Err(e) = session_store::clear_session() {
                        println!("Warning: {}", e);
                    }
                    session = None;
                    filter = ExpenseFilter::default();
                    println!("Logged out.");
                }
            }
            UserCommands::Add => {
                if let Some(s) = require_session(&session) {
                    handle_add(&api, s, &filter);
                }
            }
            UserCommands::List => {
                if let Some(s) = require_session(&session) {
                    println!("{}", format_filter(&filter));
                    show_expenses(&api, s, &filter);
                }
            }
            UserCommands::Filter => {
                if session.is_none() {
                    println!("Please login first.");
                } else if handle_filter(&mut filter) {
                    if let Some(ref s) = session {
                        show_expenses(&api, s, &filter);
                    }
                }
            }
            UserCommands::Browse => {
                if let Some(s) = require_session(&session) {
                    if let Err(e) = run_browse(&api, s, &mut filter) {
                        println!("Error: {}", e);
                    }
                }
            }
            UserCommands::Summary => {
                if let Some(s) = require_session(&session) {
                    show_summary(&api, s);
                }
            }
            UserCommands::Delete => {
                if let Some(s) = require_session(&session) {
                    handle_delete(&api, s, &filter);
                }
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
            UserCommands::Unknown => {
                println!("No valid command found. Please try again.");
            }
        }
    }
}

fn require_session(session: &Option<Session>) -> Option<&Session> {
    match session {
        Some(s) => Some(s),
        None => {
            println!("Please login first.");
            None
        }
    }
}

fn handle_register(api: &ApiClient) {
    println!("Register command selected.");
    let input = match read_register_input() {
        Ok(input) => input,
        Err(e) => {
            println!("Error reading input: {}", e);
            return;
        }
    };

    match api_auth::register(api, &input.username, &input.email, &input.password) {
        Ok(()) => println!("Registration successful! Please login."),
        Err(e @ ApiError::Status { .. }) => println!("Registration error: {}", e),
        Err(_) => println!("Registration failed. Please try again."),
    }
}

fn handle_login(api: &ApiClient, filter: &ExpenseFilter) -> Option<Session> {
    println!("Login command selected.");
    let input = match read_login_input() {
        Ok(input) => input,
        Err(e) => {
            println!("Error reading input: {}", e);
            return None;
        }
    };

    match api_auth::login(api, &input.username, &input.password) {
        Ok(session) => {
            if let Err(e) = session_store::save_session(&session) {
                println!("Warning: failed to persist session: {}", e);
            }
            println!("Logged in as {}.", session.username);

            // Initial load of the expense list and the summary.
            show_expenses(api, &session, filter);
            show_summary(api, &session);

            Some(session)
        }
        Err(_) => {
            println!("Invalid credentials. Please try again.");
            None
        }
    }
}

fn handle_add(api: &ApiClient, session: &Session, filter: &ExpenseFilter) {
    println!(
        "Add command selected. Please enter expense details in the format:\namount, category, date(YYYY-MM-DD), description(optional)"
    );
    println!("Known categories: {}", CATEGORIES.join(", "));

    let draft = match read_user_input_and_create_draft() {
        Ok(draft) => draft,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    match api_expenses::add_expense(api, session, &draft) {
        Ok(_) => {
            println!("Expense added!");
            show_expenses(api, session, filter);
            show_summary(api, session);
        }
        Err(e @ ApiError::Status { .. }) => println!("Error adding expense: {}", e),
        Err(e) => println!("Failed to add expense: {}", e),
    }
}

fn handle_filter(filter: &mut ExpenseFilter) -> bool {
    println!("Filter category (empty for all):");
    let category = match read_user_input() {
        Ok(input) => input,
        Err(_) => return false,
    };

    println!("Start date YYYY-MM-DD (empty for none):");
    let start = match read_user_input() {
        Ok(input) => input,
        Err(_) => return false,
    };
    let start_date = if start.is_empty() {
        None
    } else {
        match parse_iso_date(&start) {
            Ok(date) => Some(date),
            Err(e) => {
                println!("{}", e);
                return false;
            }
        }
    };

    println!("End date YYYY-MM-DD (empty for none):");
    let end = match read_user_input() {
        Ok(input) => input,
        Err(_) => return false,
    };
    let end_date = if end.is_empty() {
        None
    } else {
        match parse_iso_date(&end) {
            Ok(date) => Some(date),
            Err(e) => {
                println!("{}", e);
                return false;
            }
        }
    };

    filter.category = if category.is_empty() {
        None
    } else {
        Some(category)
    };
    filter.start_date = start_date;
    filter.end_date = end_date;

    println!("{}", format_filter(filter));
    true
}

fn handle_delete(api: &ApiClient, session: &Session, filter: &ExpenseFilter) {
    println!("Delete command selected. Provide the expense ID to remove:");
    let input = match read_user_input() {
        Ok(input) => input,
        Err(_) => return,
    };

    let id: i64 = match input.parse() {
        Ok(id) => id,
        Err(_) => {
            println!("Invalid expense ID '{}'. Please provide a number.", input);
            return;
        }
    };

    println!("Delete this expense? (y/n)");
    let confirmation = match read_user_input() {
        Ok(input) => input,
        Err(_) => return,
    };
    if !matches!(confirmation.as_str(), "y" | "Y" | "yes") {
        println!("Delete cancelled.");
        return;
    }

    match api_expenses::delete_expense(api, session, id) {
        Ok(()) => println!("Expense deleted."),
        Err(e @ ApiError::Transport(_)) => {
            // The request never completed; skip the refresh.
            println!("Failed to delete expense: {}", e);
            return;
        }
        Err(e) => println!("Error: {}", e),
    }

    show_expenses(api, session, filter);
    show_summary(api, session);
}

fn show_expenses(api: &ApiClient, session: &Session, filter: &ExpenseFilter) {
    match api_expenses::list_expenses(api, session, filter) {
        Ok(expenses) => println!("{}", format_expense_table(&expenses)),
        Err(e) => println!("Failed to load expenses: {}", e),
    }
}

fn show_summary(api: &ApiClient, session: &Session) {
    match api_expenses::get_summary(api, session) {
        Ok(summary) => println!("{}", format_summary(&summary)),
        Err(e) => println!("Failed to load summary: {}", e),
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    let bytes = io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if bytes == 0 {
        return Err("End of input".to_string());
    }
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> UserCommands {
    match input {
        "register" => UserCommands::Register,
        "login" => UserCommands::Login,
        "logout" => UserCommands::Logout,
        "add" => UserCommands::Add,
        "list" => UserCommands::List,
        "filter" => UserCommands::Filter,
        "browse" => UserCommands::Browse,
        "summary" => UserCommands::Summary,
        "delete" => UserCommands::Delete,
        "exit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}
