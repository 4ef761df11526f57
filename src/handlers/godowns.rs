// src/handlers/godowns.rs

use tabled::{Table, Tabled, settings::Style};

use crate::{common::error::AppError, config::AppState};

#[derive(Tabled)]
struct GodownRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
}

pub async fn list(state: &AppState) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let godowns = state.godowns_api.list(jwt).await?;
    if godowns.is_empty() {
        println!("No godowns.");
        return Ok(());
    }

    let rows: Vec<GodownRow> = godowns
        .into_iter()
        .map(|godown| GodownRow {
            id: godown.id,
            name: godown.name,
            location: godown.location.unwrap_or_else(|| "-".into()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}

pub async fn create(
    state: &AppState,
    name: String,
    location: Option<String>,
) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let godown = state
        .godowns_api
        .create(jwt, &name, location.as_deref())
        .await?;
    println!("Created godown #{} {}", godown.id, godown.name);
    Ok(())
}

pub async fn update(
    state: &AppState,
    id: i64,
    name: String,
    location: Option<String>,
) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let godown = state
        .godowns_api
        .update(jwt, id, &name, location.as_deref())
        .await?;
    println!("Updated godown #{} {}", godown.id, godown.name);
    Ok(())
}
