// src/services/export.rs
//
// Flattens the filtered product list into rows and writes the two export
// artifacts: a spreadsheet and a landscape document with a fixed 8-column
// table. Both refuse to produce a file for an empty row set.

use std::fs;
use std::path::{Path, PathBuf};

use genpdf::{Element, elements, style};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use crate::{common::error::AppError, models::catalog::Product};

// One export row per product, with the display defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub categories: String,
    pub inventory: String,
    pub total_quantity: i64,
    pub minimum_price: Decimal,
    pub purchase_price: Decimal,
    pub image_count: usize,
}

// Active-filter description printed in the document header.
#[derive(Debug, Clone, Default)]
pub struct ExportHeader {
    pub search: Option<String>,
    pub category: Option<String>,
    pub godown: Option<String>,
}

impl ExportHeader {
    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(search) = &self.search {
            lines.push(format!("Search: {search}"));
        }
        if let Some(category) = &self.category {
            lines.push(format!("Category: {category}"));
        }
        if let Some(godown) = &self.godown {
            lines.push(format!("Godown: {godown}"));
        }
        if lines.is_empty() {
            lines.push("Filters: none".to_string());
        }
        lines
    }
}

fn non_empty_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn flatten(products: &[&Product]) -> Vec<ExportRow> {
    products
        .iter()
        .map(|product| {
            let categories = if product.categories.is_empty() {
                "N/A".to_string()
            } else {
                product
                    .categories
                    .iter()
                    .map(|cat| cat.name.clone())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let inventory = if product.inventory.is_empty() {
                "No inventory".to_string()
            } else {
                product
                    .inventory
                    .iter()
                    .map(|line| format!("{}: {}", line.godown.name, line.quantity))
                    .collect::<Vec<_>>()
                    .join("; ")
            };

            ExportRow {
                id: product.id,
                name: product.name.clone(),
                brand: non_empty_or_na(product.brand.as_deref()),
                description: non_empty_or_na(product.description.as_deref()),
                categories,
                inventory,
                total_quantity: product.total_quantity(),
                minimum_price: product.minimum_selling_price.unwrap_or_default(),
                purchase_price: product.purchase_price.unwrap_or_default(),
                image_count: product.images.len(),
            }
        })
        .collect()
}

// Output filenames embed the current date: products_export_YYYY-MM-DD.<ext>
pub fn export_file_name(extension: &str) -> String {
    format!(
        "products_export_{}.{extension}",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

const XLSX_HEADERS: [&str; 10] = [
    "ID",
    "Name",
    "Brand",
    "Description",
    "Categories",
    "Inventory",
    "Total Qty",
    "Min Price",
    "Purchase Price",
    "Images",
];

pub fn write_xlsx(rows: &[ExportRow], out_dir: &Path) -> Result<PathBuf, AppError> {
    if rows.is_empty() {
        return Err(AppError::EmptyExport);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in XLSX_HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write(r, 0, row.id)?;
        worksheet.write(r, 1, row.name.as_str())?;
        worksheet.write(r, 2, row.brand.as_str())?;
        worksheet.write(r, 3, row.description.as_str())?;
        worksheet.write(r, 4, row.categories.as_str())?;
        worksheet.write(r, 5, row.inventory.as_str())?;
        worksheet.write(r, 6, row.total_quantity)?;
        worksheet.write(r, 7, row.minimum_price.to_f64().unwrap_or(0.0))?;
        worksheet.write(r, 8, row.purchase_price.to_f64().unwrap_or(0.0))?;
        worksheet.write(r, 9, row.image_count as u32)?;
    }

    // Widen the free-text columns so the sheet opens readable.
    worksheet.set_column_width(1, 28)?;
    worksheet.set_column_width(4, 28)?;
    worksheet.set_column_width(5, 36)?;

    let path = out_dir.join(export_file_name("xlsx"));
    workbook.save(&path)?;
    Ok(path)
}

pub fn write_pdf(
    rows: &[ExportRow],
    header: &ExportHeader,
    fonts_dir: &Path,
    out_dir: &Path,
) -> Result<PathBuf, AppError> {
    if rows.is_empty() {
        return Err(AppError::EmptyExport);
    }

    let font_family = genpdf::fonts::from_files(fonts_dir, "Roboto", None)
        .map_err(|_| AppError::FontNotFound(fonts_dir.display().to_string()))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title("Products Export");
    // A4 landscape; the 8-column table does not fit portrait.
    doc.set_paper_size(genpdf::Size::new(297.0, 210.0));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new("Rahul Motors")
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(
        elements::Paragraph::new(format!(
            "Products Export ({})",
            chrono::Local::now().format("%Y-%m-%d")
        ))
        .styled(style::Style::new().with_font_size(12)),
    );
    for line in header.lines() {
        doc.push(elements::Paragraph::new(line).styled(style::Style::new().with_font_size(9)));
    }
    doc.push(elements::Break::new(1.5));

    // Fixed 8-column layout; description and image count stay
    // spreadsheet-only.
    let mut table = elements::TableLayout::new(vec![1, 3, 2, 3, 4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold().with_font_size(9);
    let cell = style::Style::new().with_font_size(8);

    table
        .row()
        .element(elements::Paragraph::new("ID").styled(bold))
        .element(elements::Paragraph::new("Name").styled(bold))
        .element(elements::Paragraph::new("Brand").styled(bold))
        .element(elements::Paragraph::new("Categories").styled(bold))
        .element(elements::Paragraph::new("Inventory").styled(bold))
        .element(elements::Paragraph::new("Qty").styled(bold))
        .element(elements::Paragraph::new("Min Price").styled(bold))
        .element(elements::Paragraph::new("Purchase").styled(bold))
        .push()
        .map_err(|e| AppError::DocumentRender(e.to_string()))?;

    for row in rows {
        table
            .row()
            .element(elements::Paragraph::new(row.id.to_string()).styled(cell))
            .element(elements::Paragraph::new(row.name.clone()).styled(cell))
            .element(elements::Paragraph::new(row.brand.clone()).styled(cell))
            .element(elements::Paragraph::new(row.categories.clone()).styled(cell))
            .element(elements::Paragraph::new(row.inventory.clone()).styled(cell))
            .element(elements::Paragraph::new(row.total_quantity.to_string()).styled(cell))
            .element(elements::Paragraph::new(format!("{:.2}", row.minimum_price)).styled(cell))
            .element(elements::Paragraph::new(format!("{:.2}", row.purchase_price)).styled(cell))
            .push()
            .map_err(|e| AppError::DocumentRender(e.to_string()))?;
    }

    doc.push(table);

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::DocumentRender(e.to_string()))?;

    let path = out_dir.join(export_file_name("pdf"));
    fs::write(&path, buffer)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Category, Godown, InventoryLine, ProductImage};
    use std::str::FromStr;

    fn bare_product() -> Product {
        Product {
            id: 9,
            name: "Wiper Blade".into(),
            description: None,
            brand: None,
            minimum_selling_price: None,
            purchase_price: None,
            images: Vec::new(),
            inventory: Vec::new(),
            categories: Vec::new(),
        }
    }

    fn full_product() -> Product {
        Product {
            id: 1,
            name: "Clutch Plate".into(),
            description: Some("For hatchbacks".into()),
            brand: Some("Valeo".into()),
            minimum_selling_price: Some(Decimal::from_str("1500").unwrap()),
            purchase_price: Some(Decimal::from_str("1000").unwrap()),
            images: vec![ProductImage {
                url: "/u/1.jpg".into(),
                thumbnail_url: None,
            }],
            inventory: vec![
                InventoryLine {
                    id: 1,
                    quantity: 5,
                    godown: Godown {
                        id: 100,
                        name: "Central".into(),
                        location: None,
                    },
                },
                InventoryLine {
                    id: 2,
                    quantity: 2,
                    godown: Godown {
                        id: 200,
                        name: "Annex".into(),
                        location: None,
                    },
                },
            ],
            categories: vec![
                Category {
                    id: 10,
                    document_id: "a".into(),
                    name: "Transmission".into(),
                    image_url: None,
                },
                Category {
                    id: 20,
                    document_id: "b".into(),
                    name: "Clutches".into(),
                    image_url: None,
                },
            ],
        }
    }

    #[test]
    fn flatten_applies_the_display_defaults() {
        let product = bare_product();
        let rows = flatten(&[&product]);

        assert_eq!(rows[0].brand, "N/A");
        assert_eq!(rows[0].description, "N/A");
        assert_eq!(rows[0].categories, "N/A");
        assert_eq!(rows[0].inventory, "No inventory");
        assert_eq!(rows[0].total_quantity, 0);
        assert_eq!(rows[0].minimum_price, Decimal::ZERO);
        assert_eq!(rows[0].image_count, 0);
    }

    #[test]
    fn flatten_joins_categories_and_inventory_breakdown() {
        let product = full_product();
        let rows = flatten(&[&product]);

        assert_eq!(rows[0].categories, "Transmission, Clutches");
        assert_eq!(rows[0].inventory, "Central: 5; Annex: 2");
        assert_eq!(rows[0].total_quantity, 7);
        assert_eq!(rows[0].image_count, 1);
    }

    #[test]
    fn file_name_embeds_the_current_date() {
        let name = export_file_name("xlsx");
        let expected = format!(
            "products_export_{}.xlsx",
            chrono::Local::now().format("%Y-%m-%d")
        );
        assert_eq!(name, expected);
    }

    #[test]
    fn empty_rows_abort_before_any_file_is_written() {
        let dir = tempfile::tempdir().unwrap();

        let result = write_xlsx(&[], dir.path());
        assert!(matches!(result, Err(AppError::EmptyExport)));

        let result = write_pdf(&[], &ExportHeader::default(), dir.path(), dir.path());
        assert!(matches!(result, Err(AppError::EmptyExport)));

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn xlsx_export_writes_the_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let product = full_product();
        let rows = flatten(&[&product]);

        let path = write_xlsx(&rows, dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            export_file_name("xlsx")
        );
    }

    #[test]
    fn pdf_export_without_fonts_reports_the_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let product = full_product();
        let rows = flatten(&[&product]);

        let result = write_pdf(
            &rows,
            &ExportHeader::default(),
            &dir.path().join("no-fonts-here"),
            dir.path(),
        );
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }

    #[test]
    fn header_lists_only_the_active_filters() {
        let header = ExportHeader {
            search: Some("clutch".into()),
            category: None,
            godown: Some("Central".into()),
        };
        assert_eq!(header.lines(), vec!["Search: clutch", "Godown: Central"]);

        assert_eq!(ExportHeader::default().lines(), vec!["Filters: none"]);
    }
}
