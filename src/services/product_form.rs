// src/services/product_form.rs
//
// Local state of the create/edit product form: field values, the two
// submit-time validation rules, and the create-vs-update dispatch. The
// rules are deliberately hand-rolled (not validator-derived) because their
// ordering, field scoping and error-clearing behavior are part of the
// contract.

use rust_decimal::Decimal;

use crate::{
    api::ProductApi,
    common::error::AppError,
    models::catalog::{Category, InventoryWrite, Product, ProductWrite},
};

const CATEGORIES_REQUIRED: &str = "Please select at least one category";
const GODOWN_REQUIRED: &str = "Please set quantity for at least one godown";

// Field-scoped error messages currently displayed next to the form. A
// failed rule replaces the whole set, so at most one message shows at a
// time, matching the submit flow below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub categories: Option<&'static str>,
    pub godown: Option<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    product_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub car_name: String,
    pub part_no: String,
    pub minimum_selling_price: Decimal,
    pub purchase_price: Decimal,
    pub categories: Vec<i64>,
    pub inventory: Vec<InventoryWrite>,
    pub image_ids: Vec<i64>,
    pub errors: FormErrors,
    saving: bool,
}

impl ProductForm {
    pub fn blank() -> Self {
        Self::default()
    }

    // Seeds the form from an existing product for editing. `car_name` and
    // `part_no` are collected and submitted but never round-tripped from
    // the read model, which has no such fields; they start empty on every
    // edit.
    pub fn seeded_from(product: &Product) -> Self {
        Self {
            product_id: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            car_name: String::new(),
            part_no: String::new(),
            minimum_selling_price: product.minimum_selling_price.unwrap_or_default(),
            purchase_price: product.purchase_price.unwrap_or_default(),
            categories: product.categories.iter().map(|cat| cat.id).collect(),
            inventory: product
                .inventory
                .iter()
                .map(|line| InventoryWrite {
                    godown_id: line.godown.id,
                    quantity: line.quantity,
                })
                .collect(),
            image_ids: Vec::new(),
            errors: FormErrors::default(),
            saving: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.product_id.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    // Adds or removes a category. Selecting one immediately clears a
    // displayed categories error; the godown rule is not re-evaluated.
    pub fn toggle_category(&mut self, category_id: i64) {
        if let Some(pos) = self.categories.iter().position(|id| *id == category_id) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category_id);
            self.errors.categories = None;
        }
    }

    // Upserts the quantity for one godown, keyed by godown id; the form can
    // therefore never produce duplicate godown entries in a submission. A
    // positive quantity clears a displayed godown error.
    pub fn set_quantity(&mut self, godown_id: i64, quantity: i64) {
        match self
            .inventory
            .iter_mut()
            .find(|line| line.godown_id == godown_id)
        {
            Some(line) => line.quantity = quantity,
            None => self.inventory.push(InventoryWrite { godown_id, quantity }),
        }
        if quantity > 0 {
            self.errors.godown = None;
        }
    }

    // Case-insensitive substring filter over category names, for the
    // searchable dropdown.
    pub fn category_options<'a>(
        &self,
        categories: &'a [Category],
        query: &str,
    ) -> Vec<&'a Category> {
        let query = query.to_lowercase();
        categories
            .iter()
            .filter(|cat| cat.name.to_lowercase().contains(&query))
            .collect()
    }

    // The two client-side rules, evaluated in order at submit time. The
    // first failure replaces the error set and blocks submission; passing
    // both clears every displayed error.
    pub fn validate(&mut self) -> Result<(), AppError> {
        if self.categories.is_empty() {
            self.errors = FormErrors {
                categories: Some(CATEGORIES_REQUIRED),
                godown: None,
            };
            return Err(AppError::FormValidation {
                field: "categories",
                message: CATEGORIES_REQUIRED,
            });
        }

        if !self.inventory.iter().any(|line| line.quantity > 0) {
            self.errors = FormErrors {
                categories: None,
                godown: Some(GODOWN_REQUIRED),
            };
            return Err(AppError::FormValidation {
                field: "godown",
                message: GODOWN_REQUIRED,
            });
        }

        self.errors = FormErrors::default();
        Ok(())
    }

    fn write_shape(&self) -> ProductWrite {
        ProductWrite {
            name: self.name.clone(),
            minimum_selling_price: self.minimum_selling_price,
            purchase_price: self.purchase_price,
            description: self.description.clone(),
            brand: self.brand.clone(),
            car_name: self.car_name.clone(),
            part_no: self.part_no.clone(),
            categories: self.categories.clone(),
            inventory: self.inventory.clone(),
            image_ids: self.image_ids.clone(),
        }
    }

    // Validates, then dispatches create or update depending on whether the
    // form was seeded from an existing product. A validation failure
    // returns before any network activity. `saving` is set for the duration
    // of the call; callers use it to block re-submission.
    pub async fn submit(&mut self, jwt: &str, api: &ProductApi) -> Result<Product, AppError> {
        self.validate()?;

        let data = self.write_shape();
        self.saving = true;
        let result = match self.product_id {
            Some(id) => api.update(jwt, id, &data).await,
            None => api.create(jwt, &data).await,
        };
        self.saving = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::models::catalog::{Godown, InventoryLine};

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            document_id: format!("doc-{id}"),
            name: name.into(),
            image_url: None,
        }
    }

    fn existing_product() -> Product {
        Product {
            id: 42,
            name: "Clutch Plate".into(),
            description: Some("For hatchbacks".into()),
            brand: Some("Valeo".into()),
            minimum_selling_price: Some(Decimal::new(1500, 0)),
            purchase_price: Some(Decimal::new(1000, 0)),
            images: Vec::new(),
            inventory: vec![InventoryLine {
                id: 1,
                quantity: 5,
                godown: Godown {
                    id: 100,
                    name: "Central".into(),
                    location: None,
                },
            }],
            categories: vec![category(10, "Transmission")],
        }
    }

    #[test]
    fn empty_categories_block_submission_with_a_categories_error() {
        let mut form = ProductForm::blank();
        form.set_quantity(100, 5);

        let result = form.validate();
        assert!(matches!(
            result,
            Err(AppError::FormValidation { field: "categories", .. })
        ));
        assert_eq!(form.errors.categories, Some(CATEGORIES_REQUIRED));
        assert_eq!(form.errors.godown, None);
    }

    #[test]
    fn all_zero_quantities_block_submission_with_a_godown_error() {
        let mut form = ProductForm::blank();
        form.toggle_category(10);
        form.set_quantity(100, 0);
        form.set_quantity(200, 0);

        let result = form.validate();
        assert!(matches!(
            result,
            Err(AppError::FormValidation { field: "godown", .. })
        ));
        assert_eq!(form.errors.godown, Some(GODOWN_REQUIRED));
        assert_eq!(form.errors.categories, None);
    }

    #[test]
    fn passing_both_rules_clears_all_errors() {
        let mut form = ProductForm::blank();
        let _ = form.validate(); // leaves a categories error behind
        form.categories = vec![10];
        form.inventory = vec![InventoryWrite {
            godown_id: 100,
            quantity: 3,
        }];

        assert!(form.validate().is_ok());
        assert_eq!(form.errors, FormErrors::default());
    }

    #[test]
    fn selecting_a_category_clears_the_categories_error() {
        let mut form = ProductForm::blank();
        let _ = form.validate();
        assert!(form.errors.categories.is_some());

        form.toggle_category(10);
        assert_eq!(form.errors.categories, None);

        // Deselecting does not bring the error back.
        form.toggle_category(10);
        assert_eq!(form.errors.categories, None);
    }

    #[test]
    fn positive_quantity_clears_the_godown_error() {
        let mut form = ProductForm::blank();
        form.toggle_category(10);
        let _ = form.validate();
        assert!(form.errors.godown.is_some());

        form.set_quantity(100, 0);
        assert!(form.errors.godown.is_some());
        form.set_quantity(100, 2);
        assert_eq!(form.errors.godown, None);
    }

    #[test]
    fn set_quantity_upserts_by_godown_id() {
        let mut form = ProductForm::blank();
        form.set_quantity(100, 2);
        form.set_quantity(100, 7);
        form.set_quantity(200, 1);

        assert_eq!(form.inventory.len(), 2);
        assert_eq!(form.inventory[0].quantity, 7);
    }

    #[test]
    fn seeding_never_prefills_car_name_or_part_no() {
        let form = ProductForm::seeded_from(&existing_product());
        assert!(form.is_editing());
        assert_eq!(form.name, "Clutch Plate");
        assert_eq!(form.categories, vec![10]);
        assert_eq!(form.inventory[0].quantity, 5);
        assert_eq!(form.car_name, "");
        assert_eq!(form.part_no, "");
    }

    #[test]
    fn category_options_filter_is_a_case_insensitive_substring() {
        let form = ProductForm::blank();
        let categories = vec![
            category(1, "Brakes"),
            category(2, "Transmission"),
            category(3, "Brake Fluids"),
        ];

        let options = form.category_options(&categories, "bRaK");
        let names: Vec<&str> = options.iter().map(|cat| cat.name.as_str()).collect();
        assert_eq!(names, vec!["Brakes", "Brake Fluids"]);

        assert_eq!(form.category_options(&categories, "").len(), 3);
    }

    #[tokio::test]
    async fn submit_with_invalid_form_makes_no_network_call() {
        // Nothing listens on this address; a network attempt would surface
        // as a Request error, not a FormValidation one.
        let api = ProductApi::new(ApiClient::new("http://127.0.0.1:9"));
        let mut form = ProductForm::blank();

        let result = form.submit("token", &api).await;
        assert!(matches!(
            result,
            Err(AppError::FormValidation { field: "categories", .. })
        ));
        assert!(!form.is_saving());
    }
}
