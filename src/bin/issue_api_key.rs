//! CLI tool to issue an API key for an existing user.
//!
//! Usage:
//!   cargo run --bin issue-api-key -- --email sam@example.org --name "Laptop" --expires-in 365d

use std::env;

use court_reports_lib::config::Config;
use court_reports_lib::db::DbPool;
use court_reports_lib::services::api_key;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut email: Option<String> = None;
    let mut name: Option<String> = None;
    let mut expires_in: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--email" | "-u" => {
                i += 1;
                email = args.get(i).cloned();
            }
            "--name" | "-n" => {
                i += 1;
                name = args.get(i).cloned();
            }
            "--expires-in" | "-e" => {
                i += 1;
                expires_in = args.get(i).cloned();
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let (Some(email), Some(name)) = (email, name) else {
        eprintln!("Error: --email and --name are required");
        print_usage();
        std::process::exit(1);
    };

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    let user = match pool.find_user_by_email(&email).await {
        Ok(Some(user)) if user.active => user,
        Ok(Some(_)) => {
            eprintln!("Error: user {} is inactive", email);
            std::process::exit(1);
        }
        Ok(None) => {
            eprintln!("Error: no user with email {}", email);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error looking up user: {}", e);
            std::process::exit(1);
        }
    };

    let (full_key, api_key) =
        match api_key::create_key(&pool, user.id, &name, expires_in.as_deref()).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error issuing key: {}", e);
                std::process::exit(1);
            }
        };

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  API Key Issued");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  User:    {} <{}> ({})", user.display_name, user.email, user.role);
    println!("  Name:    {}", api_key.name);
    println!("  Prefix:  {}", api_key.key_prefix);
    match api_key.expires_at {
        Some(expires) => println!("  Expires: {}", expires.to_rfc3339()),
        None => println!("  Expires: Never"),
    }
    println!();
    println!("  Key:     {}", full_key);
    println!();
    println!("  Save this key! It cannot be retrieved later.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: issue-api-key --email <email> --name <name> [--expires-in <duration>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --email, -u       Email of the user the key belongs to (required)");
    eprintln!("  --name, -n        Label for the key (required)");
    eprintln!("  --expires-in, -e  Expiration: 30d, 2w, 6m, 1y (default: never)");
    eprintln!("  --help, -h        Show this help");
    eprintln!();
}
