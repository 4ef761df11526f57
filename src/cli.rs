// src/cli.rs

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::{common::error::AppError, config::AppState, handlers};

#[derive(Debug, Parser)]
#[command(name = "rm-admin", about = "Rahul Motors inventory admin client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Authenticate against the backend and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the persisted session (client-side only)
    Logout,
    /// Show the current session subject
    Whoami,
    /// Aggregate statistics over the whole catalog
    Stats,
    /// Product table operations
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Export the filtered product table
    #[command(subcommand)]
    Export(ExportCommand),
    /// Category management
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Godown management
    #[command(subcommand)]
    Godowns(GodownsCommand),
}

// The three client-side filter criteria shared by listing, bulk selection
// and export commands.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring over product name or brand
    #[arg(long)]
    pub search: Option<String>,
    /// Only products carrying this category id
    #[arg(long)]
    pub category: Option<i64>,
    /// Only products with an inventory line at this godown id
    #[arg(long)]
    pub godown: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products and stats, applying the filters client-side
    List(FilterArgs),
    /// Show one product in full
    Show { id: i64 },
    /// Create a product
    Create(CreateProductArgs),
    /// Edit an existing product
    Edit(EditProductArgs),
    /// Delete products: explicit ids, or everything under the filter
    Delete(SelectionArgs),
    /// Detach godowns from the selected products
    RemoveGodown(RemoveGodownArgs),
    /// Update inventory quantities of one product, line by line
    SetStock(SetStockArgs),
}

// Which products a bulk operation applies to: explicit ids, or the whole
// filtered view (select-all).
#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Product ids to operate on
    pub ids: Vec<i64>,
    /// Select every product visible under the filters instead
    #[arg(long, conflicts_with = "ids")]
    pub all_filtered: bool,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct RemoveGodownArgs {
    /// Godown id to detach (repeatable)
    #[arg(long = "detach", required = true)]
    pub godowns: Vec<i64>,
    #[command(flatten)]
    pub selection: SelectionArgs,
}

// An inventory line given on the command line as <GODOWN_ID>=<QTY>.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLine {
    pub godown_id: i64,
    pub quantity: i64,
}

fn parse_stock_line(s: &str) -> Result<StockLine, String> {
    let (godown, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <GODOWN_ID>=<QTY>, got {s:?}"))?;
    Ok(StockLine {
        godown_id: godown
            .trim()
            .parse()
            .map_err(|e| format!("invalid godown id {godown:?}: {e}"))?,
        quantity: quantity
            .trim()
            .parse()
            .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?,
    })
}

#[derive(Debug, Args)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub brand: String,
    #[arg(long, default_value = "")]
    pub car_name: String,
    #[arg(long, default_value = "")]
    pub part_no: String,
    #[arg(long, default_value = "0")]
    pub min_price: Decimal,
    #[arg(long, default_value = "0")]
    pub purchase_price: Decimal,
    /// Category id (repeatable; at least one is required to submit)
    #[arg(long = "category")]
    pub categories: Vec<i64>,
    /// Inventory line as <GODOWN_ID>=<QTY> (repeatable)
    #[arg(long = "stock", value_parser = parse_stock_line)]
    pub stock: Vec<StockLine>,
    /// Previously uploaded image id (repeatable)
    #[arg(long = "image-id")]
    pub image_ids: Vec<i64>,
}

#[derive(Debug, Args)]
pub struct EditProductArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub car_name: Option<String>,
    #[arg(long)]
    pub part_no: Option<String>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub purchase_price: Option<Decimal>,
    /// Replace the category set (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<i64>,
    /// Upsert an inventory line as <GODOWN_ID>=<QTY> (repeatable)
    #[arg(long = "stock", value_parser = parse_stock_line)]
    pub stock: Vec<StockLine>,
    /// Attach a previously uploaded image id (repeatable)
    #[arg(long = "image-id")]
    pub image_ids: Vec<i64>,
}

#[derive(Debug, Args)]
pub struct SetStockArgs {
    pub id: i64,
    /// Inventory line as <GODOWN_ID>=<QTY> (repeatable)
    #[arg(long = "line", value_parser = parse_stock_line, required = true)]
    pub lines: Vec<StockLine>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Directory the export file is written into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Spreadsheet export of the filtered table
    Xlsx(ExportArgs),
    /// Landscape document export of the filtered table
    Pdf(ExportArgs),
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories, optionally narrowed to one godown
    List {
        #[arg(long)]
        godown: Option<i64>,
    },
    /// Create a category
    Create {
        name: String,
        #[arg(long)]
        image_id: Option<i64>,
    },
    /// Rename a category or change its image
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        image_id: Option<i64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GodownsCommand {
    /// List godowns
    List,
    /// Create a godown
    Create {
        name: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// Rename a godown or change its location
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self, state: &mut AppState) -> Result<(), AppError> {
        match self.command {
            Commands::Login { email, password } => {
                handlers::auth::login(state, email, password).await
            }
            Commands::Logout => handlers::auth::logout(state),
            Commands::Whoami => handlers::auth::whoami(state),
            Commands::Stats => handlers::products::stats(state).await,
            Commands::Products(command) => match command {
                ProductsCommand::List(filter) => handlers::products::list(state, filter).await,
                ProductsCommand::Show { id } => handlers::products::show(state, id).await,
                ProductsCommand::Create(args) => handlers::products::create(state, args).await,
                ProductsCommand::Edit(args) => handlers::products::edit(state, args).await,
                ProductsCommand::Delete(args) => handlers::products::delete(state, args).await,
                ProductsCommand::RemoveGodown(args) => {
                    handlers::products::remove_godown(state, args).await
                }
                ProductsCommand::SetStock(args) => {
                    handlers::products::set_stock(state, args).await
                }
            },
            Commands::Export(command) => match command {
                ExportCommand::Xlsx(args) => {
                    handlers::products::export(state, handlers::products::ExportKind::Xlsx, args)
                        .await
                }
                ExportCommand::Pdf(args) => {
                    handlers::products::export(state, handlers::products::ExportKind::Pdf, args)
                        .await
                }
            },
            Commands::Categories(command) => match command {
                CategoriesCommand::List { godown } => {
                    handlers::categories::list(state, godown).await
                }
                CategoriesCommand::Create { name, image_id } => {
                    handlers::categories::create(state, name, image_id).await
                }
                CategoriesCommand::Update { id, name, image_id } => {
                    handlers::categories::update(state, id, name, image_id).await
                }
            },
            Commands::Godowns(command) => match command {
                GodownsCommand::List => handlers::godowns::list(state).await,
                GodownsCommand::Create { name, location } => {
                    handlers::godowns::create(state, name, location).await
                }
                GodownsCommand::Update { id, name, location } => {
                    handlers::godowns::update(state, id, name, location).await
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_line_parses_id_and_quantity() {
        let line = parse_stock_line("12=40").unwrap();
        assert_eq!(
            line,
            StockLine {
                godown_id: 12,
                quantity: 40
            }
        );
        assert_eq!(parse_stock_line(" 3 = 0 ").unwrap().quantity, 0);
    }

    #[test]
    fn stock_line_rejects_malformed_input() {
        assert!(parse_stock_line("12").is_err());
        assert!(parse_stock_line("a=1").is_err());
        assert!(parse_stock_line("1=b").is_err());
    }

    #[test]
    fn cli_parses_a_filtered_bulk_delete() {
        let cli = Cli::parse_from([
            "rm-admin",
            "products",
            "delete",
            "--all-filtered",
            "--search",
            "clutch",
        ]);
        match cli.command {
            Commands::Products(ProductsCommand::Delete(args)) => {
                assert!(args.all_filtered);
                assert!(args.ids.is_empty());
                assert_eq!(args.filter.search.as_deref(), Some("clutch"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
