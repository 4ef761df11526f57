// src/handlers/categories.rs

use tabled::{Table, Tabled, settings::Style};

use crate::{common::error::AppError, config::AppState};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Image")]
    image: String,
}

pub async fn list(state: &AppState, godown_id: Option<i64>) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let categories = state.categories_api.list(jwt, godown_id).await?;
    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }

    let rows: Vec<CategoryRow> = categories
        .into_iter()
        .map(|category| CategoryRow {
            id: category.id,
            name: category.name,
            image: category.image_url.unwrap_or_else(|| "-".into()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}

pub async fn create(
    state: &AppState,
    name: String,
    image_id: Option<i64>,
) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let category = state.categories_api.create(jwt, &name, image_id).await?;
    println!("Created category #{} {}", category.id, category.name);
    Ok(())
}

pub async fn update(
    state: &AppState,
    id: i64,
    name: String,
    image_id: Option<i64>,
) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let category = state.categories_api.update(jwt, id, &name, image_id).await?;
    println!("Updated category #{} {}", category.id, category.name);
    Ok(())
}
