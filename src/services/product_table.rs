// src/services/product_table.rs
//
// View-model behind the product listing: derives the filtered view,
// aggregate statistics, the multi-select set and the bulk-operation
// payloads from the raw fetched lists. This is deliberately the only place
// in the client where those derivations live; handlers render the results
// and never re-implement them.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use rust_decimal::Decimal;

use crate::{
    api::{CategoryApi, GodownApi, ProductApi, ProductSearchParams},
    common::error::AppError,
    models::catalog::{Category, Godown, Product},
};

// The three filter criteria, combined conjunctively. Matching is
// case-insensitive: the text filter is a substring match over name or
// brand, the other two are id equality over the embedded associations.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: String,
    pub category_id: Option<i64>,
    pub godown_id: Option<i64>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = term.is_empty()
            || product.name.to_lowercase().contains(&term)
            || product
                .brand
                .as_ref()
                .is_some_and(|brand| brand.to_lowercase().contains(&term));
        let matches_category = self
            .category_id
            .is_none_or(|id| product.has_category(id));
        let matches_godown = self.godown_id.is_none_or(|id| product.stocked_in(id));

        matches_search && matches_category && matches_godown
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category_id.is_none() && self.godown_id.is_none()
    }
}

// Aggregates over the UNFILTERED product list; the filter never changes
// these numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_inventory_units: i64,
    pub total_inventory_value: Decimal,
    pub average_minimum_price: Decimal,
}

// A godown offered for bulk removal, with the summed quantity it holds
// across the selected products.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovableGodown {
    pub godown: Godown,
    pub total_quantity: i64,
}

// Per-item outcome of a bulk fan-out. The service reports every item
// instead of collapsing the batch into one error; callers that want the
// original all-or-nothing behavior check `all_succeeded`.
#[derive(Debug, Default)]
pub struct BulkReport<K> {
    pub succeeded: Vec<K>,
    pub failed: Vec<(K, AppError)>,
}

impl<K> BulkReport<K> {
    fn collect(keys: Vec<K>, results: Vec<Result<(), AppError>>) -> Self {
        let mut report = Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        };
        for (key, result) in keys.into_iter().zip(results) {
            match result {
                Ok(()) => report.succeeded.push(key),
                Err(e) => report.failed.push((key, e)),
            }
        }
        report
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ProductTable {
    products: Vec<Product>,
    categories: Vec<Category>,
    godowns: Vec<Godown>,
    pub filter: ProductFilter,
    selected: HashSet<i64>,
}

impl ProductTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    // Fetches products, categories and godowns in parallel and replaces the
    // local copies. Each CLI invocation starts from a fresh load; nothing is
    // cached between runs.
    pub async fn load(
        &mut self,
        jwt: &str,
        products_api: &ProductApi,
        categories_api: &CategoryApi,
        godowns_api: &GodownApi,
    ) -> Result<(), AppError> {
        let params = ProductSearchParams::default();
        let (products, categories, godowns) = tokio::try_join!(
            products_api.search(jwt, &params),
            categories_api.list(jwt, None),
            godowns_api.list(jwt),
        )?;
        self.products = products;
        self.categories = categories;
        self.godowns = godowns;
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn godowns(&self) -> &[Godown] {
        &self.godowns
    }

    // The visible subset under the current filter, in fetch order.
    pub fn filtered(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| self.filter.matches(product))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let total_products = self.products.len();
        let total_inventory_units = self
            .products
            .iter()
            .map(Product::total_quantity)
            .sum();
        let total_inventory_value = self
            .products
            .iter()
            .map(|product| {
                product.purchase_price.unwrap_or_default()
                    * Decimal::from(product.total_quantity())
            })
            .sum();
        // Guard the division explicitly: an empty catalog averages to zero.
        let average_minimum_price = if self.products.is_empty() {
            Decimal::ZERO
        } else {
            let sum: Decimal = self
                .products
                .iter()
                .map(|product| product.minimum_selling_price.unwrap_or_default())
                .sum();
            sum / Decimal::from(self.products.len() as i64)
        };

        CatalogStats {
            total_products,
            total_inventory_units,
            total_inventory_value,
            average_minimum_price,
        }
    }

    // --- Multi-select ---

    pub fn toggle_selected(&mut self, product_id: i64) {
        if !self.selected.remove(&product_id) {
            self.selected.insert(product_id);
        }
    }

    pub fn select(&mut self, product_id: i64) {
        self.selected.insert(product_id);
    }

    // Replaces the selection with exactly the currently filtered ids. A
    // later filter change does NOT recompute the selection; it stays as
    // captured here.
    pub fn select_all_filtered(&mut self) {
        self.selected = self.filtered().iter().map(|product| product.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    // --- Bulk operations ---

    // One delete call per selected id, all in parallel, no concurrency
    // limit. Selection is cleared only when every call succeeded.
    pub async fn bulk_delete(
        &mut self,
        jwt: &str,
        products_api: &ProductApi,
    ) -> Result<BulkReport<i64>, AppError> {
        let ids = self.selected_ids();
        let results = join_all(ids.iter().map(|id| products_api.delete(jwt, *id))).await;

        let report = BulkReport::collect(ids, results);
        if report.all_succeeded() {
            self.selected.clear();
        }
        Ok(report)
    }

    // One detach call per (selected product, godown) pair: a full cross
    // product, issued in parallel. Not atomic and not resumable; a partial
    // failure leaves the remaining associations in place and shows up in
    // the report.
    pub async fn bulk_remove_godowns(
        &mut self,
        jwt: &str,
        products_api: &ProductApi,
        godown_ids: &[i64],
    ) -> Result<BulkReport<(i64, i64)>, AppError> {
        let pairs: Vec<(i64, i64)> = self
            .selected_ids()
            .into_iter()
            .flat_map(|product_id| {
                godown_ids
                    .iter()
                    .map(move |godown_id| (product_id, *godown_id))
            })
            .collect();

        let results = join_all(
            pairs
                .iter()
                .map(|(product_id, godown_id)| {
                    products_api.detach_godown(jwt, *product_id, *godown_id)
                }),
        )
        .await;

        let report = BulkReport::collect(pairs, results);
        if report.all_succeeded() {
            self.selected.clear();
        }
        Ok(report)
    }

    // Godowns offered for bulk removal: scan the filtered view restricted
    // to the selected ids, sum each godown's quantity across those
    // products, and keep only godowns actually holding stock, sorted by
    // name (case-insensitive).
    pub fn removable_godowns(&self) -> Vec<RemovableGodown> {
        let mut sums: HashMap<i64, RemovableGodown> = HashMap::new();
        for product in self.filtered() {
            if !self.selected.contains(&product.id) {
                continue;
            }
            for line in &product.inventory {
                sums.entry(line.godown.id)
                    .and_modify(|entry| entry.total_quantity += line.quantity)
                    .or_insert_with(|| RemovableGodown {
                        godown: line.godown.clone(),
                        total_quantity: line.quantity,
                    });
            }
        }

        let mut removable: Vec<RemovableGodown> = sums
            .into_values()
            .filter(|entry| entry.total_quantity > 0)
            .collect();
        removable.sort_by_key(|entry| entry.godown.name.to_lowercase());
        removable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::InventoryLine;
    use std::str::FromStr;

    fn godown(id: i64, name: &str) -> Godown {
        Godown {
            id,
            name: name.into(),
            location: None,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            document_id: format!("doc-{id}"),
            name: name.into(),
            image_url: None,
        }
    }

    fn product(id: i64, name: &str, brand: Option<&str>) -> Product {
        Product {
            id,
            name: name.into(),
            description: None,
            brand: brand.map(Into::into),
            minimum_selling_price: None,
            purchase_price: None,
            images: Vec::new(),
            inventory: Vec::new(),
            categories: Vec::new(),
        }
    }

    fn stocked(mut p: Product, lines: &[(i64, &str, i64)]) -> Product {
        p.inventory = lines
            .iter()
            .enumerate()
            .map(|(i, (gid, gname, qty))| InventoryLine {
                id: i as i64 + 1,
                quantity: *qty,
                godown: godown(*gid, gname),
            })
            .collect();
        p
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_table() -> ProductTable {
        let mut clutch = product(1, "Clutch Plate", Some("Valeo"));
        clutch.categories = vec![category(10, "Transmission")];
        clutch.minimum_selling_price = Some(dec("1500"));
        clutch.purchase_price = Some(dec("1000"));
        let clutch = stocked(clutch, &[(100, "Central", 5), (200, "Annex", 2)]);

        let mut pad = product(2, "Brake Pad", Some("Bosch"));
        pad.categories = vec![category(20, "Brakes")];
        pad.minimum_selling_price = Some(dec("500"));
        let pad = stocked(pad, &[(200, "Annex", 3)]);

        let lamp = stocked(product(3, "Head Lamp", None), &[(100, "Central", 0)]);

        ProductTable::with_products(vec![clutch, pad, lamp])
    }

    #[test]
    fn text_filter_matches_name_or_brand_case_insensitively() {
        let mut table = sample_table();

        table.filter.search = "bRaKe".into();
        let visible: Vec<i64> = table.filtered().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![2]);

        table.filter.search = "VALEO".into();
        let visible: Vec<i64> = table.filtered().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1]);

        // A product without a brand never matches through the brand side.
        table.filter.search = "lamp".into();
        let visible: Vec<i64> = table.filtered().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![3]);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let mut table = sample_table();
        table.filter.search = "a".into(); // matches all three names
        table.filter.category_id = Some(10);
        table.filter.godown_id = Some(200);

        let visible: Vec<i64> = table.filtered().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn godown_filter_matches_inventory_membership() {
        let mut table = sample_table();
        table.filter.godown_id = Some(100);
        let visible: Vec<i64> = table.filtered().iter().map(|p| p.id).collect();
        // Membership, not quantity: the zero-quantity lamp line still counts.
        assert_eq!(visible, vec![1, 3]);
    }

    #[test]
    fn stats_ignore_the_active_filter() {
        let mut table = sample_table();
        table.filter.search = "no such product".into();
        assert!(table.filtered().is_empty());

        let stats = table.stats();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.total_inventory_units, 10);
        // Only the clutch has a purchase price: 1000 * 7 units.
        assert_eq!(stats.total_inventory_value, dec("7000"));
        // (1500 + 500 + 0) / 3
        assert_eq!(stats.average_minimum_price.round_dp(2), dec("666.67"));
    }

    #[test]
    fn average_minimum_price_of_empty_catalog_is_zero() {
        let table = ProductTable::with_products(Vec::new());
        assert_eq!(table.stats().average_minimum_price, Decimal::ZERO);
        assert_eq!(table.stats().total_inventory_units, 0);
    }

    #[test]
    fn toggle_flips_one_id_without_touching_others() {
        let mut table = sample_table();
        table.toggle_selected(1);
        table.toggle_selected(2);
        assert_eq!(table.selected_ids(), vec![1, 2]);

        table.toggle_selected(1);
        assert_eq!(table.selected_ids(), vec![2]);
    }

    #[test]
    fn select_all_captures_exactly_the_filtered_view() {
        let mut table = sample_table();
        table.filter.godown_id = Some(200);
        table.select_all_filtered();
        assert_eq!(table.selected_ids(), vec![1, 2]);
    }

    #[test]
    fn narrowing_the_filter_after_select_all_keeps_the_captured_set() {
        let mut table = sample_table();
        table.select_all_filtered();
        assert_eq!(table.selected_ids(), vec![1, 2, 3]);

        // The selection is not derived state; it stays as captured even
        // though only one product remains visible.
        table.filter.search = "brake".into();
        assert_eq!(table.selected_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn removable_godowns_sum_selected_quantities_and_sort_by_name() {
        let mut table = sample_table();
        table.select(1);
        table.select(2);
        table.select(3);

        let removable = table.removable_godowns();
        let names: Vec<&str> = removable
            .iter()
            .map(|entry| entry.godown.name.as_str())
            .collect();
        assert_eq!(names, vec!["Annex", "Central"]);
        assert_eq!(removable[0].total_quantity, 5); // 2 + 3 at Annex
        assert_eq!(removable[1].total_quantity, 5); // clutch only; lamp line is zero
    }

    #[test]
    fn removable_godowns_exclude_zero_stock_and_unselected_products() {
        let mut table = sample_table();
        table.select(3); // only the lamp, whose single line holds zero units
        assert!(table.removable_godowns().is_empty());

        table.clear_selection();
        table.select(2);
        let removable = table.removable_godowns();
        assert_eq!(removable.len(), 1);
        assert_eq!(removable[0].godown.name, "Annex");
        assert_eq!(removable[0].total_quantity, 3);
    }

    #[test]
    fn removable_godowns_respect_the_active_filter() {
        let mut table = sample_table();
        table.select(1);
        table.select(2);
        // Filter hides the clutch; only the pad's stock should be offered.
        table.filter.search = "brake".into();

        let removable = table.removable_godowns();
        assert_eq!(removable.len(), 1);
        assert_eq!(removable[0].total_quantity, 3);
    }

    #[test]
    fn filter_is_empty_only_without_criteria() {
        assert!(ProductFilter::default().is_empty());

        let mut filter = ProductFilter::default();
        filter.search = "clutch".into();
        assert!(!filter.is_empty());

        let filter = ProductFilter {
            category_id: Some(10),
            ..ProductFilter::default()
        };
        assert!(!filter.is_empty());
    }

    #[tokio::test]
    async fn load_propagates_transport_errors() {
        use crate::api::ApiClient;

        // Nothing listens on this address; all three joined fetches fail and
        // the first error surfaces as a Request error.
        let client = ApiClient::new("http://127.0.0.1:9");
        let products_api = ProductApi::new(client.clone());
        let categories_api = CategoryApi::new(client.clone());
        let godowns_api = GodownApi::new(client);

        let mut table = ProductTable::new();
        let result = table
            .load("token", &products_api, &categories_api, &godowns_api)
            .await;

        assert!(matches!(result, Err(AppError::Request(_))));
        assert!(table.filtered().is_empty());
    }

    #[test]
    fn bulk_report_partitions_results_per_item() {
        let report = BulkReport::collect(
            vec![1, 2, 3],
            vec![
                Ok(()),
                Err(AppError::NotLoggedIn),
                Ok(()),
            ],
        );
        assert_eq!(report.succeeded, vec![1, 3]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, 2);
        assert!(!report.all_succeeded());
    }
}
