use log::{error, info, warn};
use scrum_point::app::{PokerApp, Route};
use scrum_point::commands::{parse_command, Command, HELP};
use scrum_point::config::Config;
use scrum_point::db::Database;
use scrum_point::handlers::handle_command;
use scrum_point::storage::Storage;
use scrum_point::tasks;
use scrum_point::view;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    info!("Starting tab {} on {}", config.tab_id, config.database_url);

    // Initialize storage
    let database = match Database::new(&config.database_url).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    // Relay writes from other running tabs
    let watcher_db = Arc::clone(&database);
    let watch_interval = config.watch_interval;
    tokio::spawn(async move {
        tasks::storage_watcher::watch_foreign_changes(watcher_db, watch_interval).await;
    });

    let storage: Arc<dyn Storage> = database;
    let mut app = PokerApp::new(storage, config.tab_id.clone());
    let mut updates = app.subscribe();

    if let Err(e) = app.start().await {
        error!("Failed to restore session: {}", e);
        return;
    }
    println!("{}", view::render(&app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("!! {}", e);
                        continue;
                    }
                };

                match command {
                    Command::Quit => break,
                    Command::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    command => match handle_command(&mut app, command).await {
                        Ok(notices) => {
                            for notice in &notices {
                                println!("{}", view::render_notice(notice));
                            }
                        }
                        Err(e) => error!("Command failed: {}", e),
                    },
                }
                println!("{}", view::render(&app));
            }
            event = updates.recv() => {
                let Some(event) = event else {
                    warn!("Storage notifications stopped");
                    break;
                };
                if app.apply_storage_event(&event) && app.route() == Route::Room {
                    println!("{}", view::render(&app));
                }
            }
        }
    }

    info!("Tab {} closed", config.tab_id);
}
