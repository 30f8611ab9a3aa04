use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./paydesk.db?mode=rwc";

enum Action {
    Up,
    Down,
    Fresh,
    Status,
}

fn action(arg: Option<&str>) -> Option<Action> {
    Some(match arg.unwrap_or("up") {
        "up" => Action::Up,
        "down" => Action::Down,
        "fresh" => Action::Fresh,
        "status" => Action::Status,
        _ => return None,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let arg = std::env::args().nth(1);
    let Some(action) = action(arg.as_deref()) else {
        eprintln!("usage: migration [up|down|fresh|status]  (DATABASE_URL, default {DEFAULT_DATABASE_URL})");
        std::process::exit(2);
    };

    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&url).await?;
    match action {
        Action::Up => migration::Migrator::up(&db, None).await?,
        Action::Down => migration::Migrator::down(&db, Some(1)).await?,
        Action::Fresh => migration::Migrator::fresh(&db).await?,
        Action::Status => migration::Migrator::status(&db).await?,
    }
    Ok(())
}
