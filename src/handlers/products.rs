// src/handlers/products.rs
//
// Terminal front end of the product table: rendering, the bulk commands
// with their all-or-nothing surface, and the two export formats.

use anyhow::anyhow;
use tabled::{Table, Tabled, settings::Style};

use crate::{
    cli::{
        CreateProductArgs, EditProductArgs, ExportArgs, FilterArgs, RemoveGodownArgs,
        SelectionArgs, SetStockArgs,
    },
    common::error::AppError,
    config::AppState,
    models::catalog::InventoryUpdate,
    services::{
        ProductForm, ProductTable, export,
        product_table::{CatalogStats, ProductFilter},
    },
};

#[derive(Debug, Clone, Copy)]
pub enum ExportKind {
    Xlsx,
    Pdf,
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "Stock")]
    stock: i64,
    #[tabled(rename = "Min Price")]
    min_price: String,
}

fn filter_from_args(args: &FilterArgs) -> ProductFilter {
    ProductFilter {
        search: args.search.clone().unwrap_or_default(),
        category_id: args.category,
        godown_id: args.godown,
    }
}

// Every product command starts from a freshly loaded table; the client
// keeps no cache between invocations.
async fn loaded_table(state: &AppState, filter: &FilterArgs) -> Result<ProductTable, AppError> {
    let jwt = state.session.require_token()?;
    let mut table = ProductTable::new();
    table
        .load(jwt, &state.products_api, &state.categories_api, &state.godowns_api)
        .await?;
    table.filter = filter_from_args(filter);
    Ok(table)
}

fn print_table(table: &ProductTable) {
    let rows: Vec<ProductRow> = table
        .filtered()
        .iter()
        .map(|product| ProductRow {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone().unwrap_or_else(|| "N/A".into()),
            categories: product
                .categories
                .iter()
                .map(|cat| cat.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            stock: product.total_quantity(),
            min_price: product
                .minimum_selling_price
                .map(|price| format!("{price:.2}"))
                .unwrap_or_else(|| "N/A".into()),
        })
        .collect();

    if rows.is_empty() {
        if table.filter.is_empty() {
            println!("No products.");
        } else {
            println!("No products match the current filters.");
        }
    } else {
        println!("{}", Table::new(rows).with(Style::sharp()));
    }
}

fn print_stats(stats: &CatalogStats) {
    println!("Total Products:  {}", stats.total_products);
    println!("Total Inventory: {} units", stats.total_inventory_units);
    println!("Total Value:     {:.2}", stats.total_inventory_value);
    println!("Avg. Min Price:  {:.2}", stats.average_minimum_price.round_dp(2));
}

pub async fn list(state: &AppState, filter: FilterArgs) -> Result<(), AppError> {
    let table = loaded_table(state, &filter).await?;
    print_table(&table);
    println!();
    // Stats always describe the whole catalog, not the filtered view.
    print_stats(&table.stats());
    Ok(())
}

pub async fn stats(state: &AppState) -> Result<(), AppError> {
    let table = loaded_table(state, &FilterArgs::default()).await?;
    print_stats(&table.stats());
    Ok(())
}

pub async fn show(state: &AppState, id: i64) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let product = state.products_api.detail(jwt, id).await?;

    println!("#{} {}", product.id, product.name);
    if let Some(brand) = &product.brand {
        println!("Brand:       {brand}");
    }
    if let Some(description) = &product.description {
        println!("Description: {description}");
    }
    if let Some(price) = product.minimum_selling_price {
        println!("Min Price:   {price:.2}");
    }
    if let Some(price) = product.purchase_price {
        println!("Purchase:    {price:.2}");
    }
    if !product.categories.is_empty() {
        let names: Vec<&str> = product
            .categories
            .iter()
            .map(|cat| cat.name.as_str())
            .collect();
        println!("Categories:  {}", names.join(", "));
    }
    if product.inventory.is_empty() {
        println!("Inventory:   none");
    } else {
        println!("Inventory:");
        for line in &product.inventory {
            println!("  {} ({}): {}", line.godown.name, line.godown.id, line.quantity);
        }
    }
    if !product.images.is_empty() {
        println!("Images:      {}", product.images.len());
    }
    Ok(())
}

pub async fn create(state: &AppState, args: CreateProductArgs) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;

    let mut form = ProductForm::blank();
    form.name = args.name;
    form.description = args.description;
    form.brand = args.brand;
    form.car_name = args.car_name;
    form.part_no = args.part_no;
    form.minimum_selling_price = args.min_price;
    form.purchase_price = args.purchase_price;
    for category_id in args.categories {
        form.toggle_category(category_id);
    }
    for line in args.stock {
        form.set_quantity(line.godown_id, line.quantity);
    }
    form.image_ids = args.image_ids;

    let product = form.submit(jwt, &state.products_api).await?;
    println!("Created product #{} {}", product.id, product.name);
    Ok(())
}

pub async fn edit(state: &AppState, args: EditProductArgs) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let existing = state.products_api.detail(jwt, args.id).await?;

    let mut form = ProductForm::seeded_from(&existing);
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(brand) = args.brand {
        form.brand = brand;
    }
    if let Some(car_name) = args.car_name {
        form.car_name = car_name;
    }
    if let Some(part_no) = args.part_no {
        form.part_no = part_no;
    }
    if let Some(price) = args.min_price {
        form.minimum_selling_price = price;
    }
    if let Some(price) = args.purchase_price {
        form.purchase_price = price;
    }
    if !args.categories.is_empty() {
        form.categories = args.categories;
    }
    for line in args.stock {
        form.set_quantity(line.godown_id, line.quantity);
    }
    form.image_ids.extend(args.image_ids);

    let product = form.submit(jwt, &state.products_api).await?;
    println!("Updated product #{} {}", product.id, product.name);
    Ok(())
}

// Applies the selection arguments to the table. Returns false when nothing
// ends up selected.
fn apply_selection(table: &mut ProductTable, args: &SelectionArgs) -> bool {
    if args.all_filtered {
        table.select_all_filtered();
    } else {
        for id in &args.ids {
            table.select(*id);
        }
    }
    !table.selected_ids().is_empty()
}

pub async fn delete(state: &AppState, args: SelectionArgs) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let mut table = loaded_table(state, &args.filter).await?;
    if !apply_selection(&mut table, &args) {
        println!("Nothing selected.");
        return Ok(());
    }

    let count = table.selected_ids().len();
    let report = table.bulk_delete(jwt, &state.products_api).await?;
    if report.all_succeeded() {
        println!("Deleted {count} product(s).");
        return Ok(());
    }

    for (id, error) in &report.failed {
        tracing::error!("delete product {id}: {error}");
    }
    Err(AppError::Internal(anyhow!(
        "failed to delete {} of {} products",
        report.failed.len(),
        count
    )))
}

pub async fn remove_godown(state: &AppState, args: RemoveGodownArgs) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;
    let mut table = loaded_table(state, &args.selection.filter).await?;
    if !apply_selection(&mut table, &args.selection) {
        println!("Nothing selected.");
        return Ok(());
    }

    // Only godowns actually holding stock across the selection are offered
    // for removal.
    let removable = table.removable_godowns();
    for godown_id in &args.godowns {
        if !removable.iter().any(|entry| entry.godown.id == *godown_id) {
            let offered: Vec<String> = removable
                .iter()
                .map(|entry| {
                    format!(
                        "{} ({}, {} units)",
                        entry.godown.name, entry.godown.id, entry.total_quantity
                    )
                })
                .collect();
            return Err(AppError::Internal(anyhow!(
                "godown {godown_id} holds no stock across the selected products; removable: {}",
                if offered.is_empty() {
                    "none".to_string()
                } else {
                    offered.join(", ")
                }
            )));
        }
    }

    let report = table
        .bulk_remove_godowns(jwt, &state.products_api, &args.godowns)
        .await?;
    if report.all_succeeded() {
        println!(
            "Removed {} godown(s) from {} product(s).",
            args.godowns.len(),
            report.succeeded.len() / args.godowns.len().max(1)
        );
        return Ok(());
    }

    for ((product_id, godown_id), error) in &report.failed {
        tracing::error!("detach godown {godown_id} from product {product_id}: {error}");
    }
    Err(AppError::Internal(anyhow!(
        "failed to detach {} association(s)",
        report.failed.len()
    )))
}

pub async fn set_stock(state: &AppState, args: SetStockArgs) -> Result<(), AppError> {
    let jwt = state.session.require_token()?;

    // Lines go out one at a time, in the order given. A failed line is
    // logged and stops the run without failing the process; earlier lines
    // stay applied.
    for line in &args.lines {
        let update = InventoryUpdate {
            product_id: args.id,
            godown_id: line.godown_id,
            quantity: line.quantity,
        };
        if let Err(error) = state.products_api.update_inventory(jwt, &update).await {
            tracing::error!(
                "update inventory of product {} at godown {}: {error}",
                args.id,
                line.godown_id
            );
            return Ok(());
        }
        println!(
            "Product {}: godown {} set to {}",
            args.id, line.godown_id, line.quantity
        );
    }
    Ok(())
}

pub async fn export(state: &AppState, kind: ExportKind, args: ExportArgs) -> Result<(), AppError> {
    let table = loaded_table(state, &args.filter).await?;
    let rows = export::flatten(&table.filtered());

    let path = match kind {
        ExportKind::Xlsx => export::write_xlsx(&rows, &args.out_dir)?,
        ExportKind::Pdf => {
            let header = export_header(&table, &args.filter);
            export::write_pdf(&rows, &header, &state.fonts_dir, &args.out_dir)?
        }
    };
    println!("Wrote {}", path.display());
    Ok(())
}

// Resolves the filter ids to display names for the document header; an id
// without a matching entry falls back to the raw number.
fn export_header(table: &ProductTable, filter: &FilterArgs) -> export::ExportHeader {
    export::ExportHeader {
        search: filter.search.clone().filter(|s| !s.is_empty()),
        category: filter.category.map(|id| {
            table
                .categories()
                .iter()
                .find(|cat| cat.id == id)
                .map(|cat| cat.name.clone())
                .unwrap_or_else(|| id.to_string())
        }),
        godown: filter.godown.map(|id| {
            table
                .godowns()
                .iter()
                .find(|g| g.id == id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| id.to_string())
        }),
    }
}
