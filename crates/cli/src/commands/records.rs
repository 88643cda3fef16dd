//! `showcase product` and `showcase case`.

use showcase_core::{CaseStudy, CaseStudyId, Product, ProductId};
use showcase_sync::{FileStore, SyncOrchestrator};
use tracing::info;

use super::prompt::confirm_or_assume;
use super::{CommandError, open_editing_session};
use crate::{CaseArgs, ProductArgs};

/// Fill a placeholder product from the arguments that were given.
fn product_from_args(args: ProductArgs) -> Product {
    let mut product = SyncOrchestrator::<FileStore>::new_product();
    product.name = args.name;
    if let Some(model) = args.model {
        product.model = model;
    }
    if let Some(category) = args.category {
        product.category = category;
    }
    if let Some(sub_category) = args.sub_category {
        product.sub_category = sub_category;
    }
    if let Some(price) = args.price {
        product.price = price;
    }
    if let Some(description) = args.description {
        product.description = description;
    }
    if !args.features.is_empty() {
        product.features = args.features;
    }
    if !args.specs.is_empty() {
        product.specs = args.specs;
    }
    if let Some(image_url) = args.image_url {
        product.image_url = image_url;
    }
    product.brochure_url = args.brochure_url;
    // `--brochure-url ""` clears the link.
    product.brochure_url = product.brochure().map(str::to_string);
    product
}

fn case_from_args(args: CaseArgs) -> CaseStudy {
    let mut case = SyncOrchestrator::<FileStore>::new_case_study();
    case.title = args.title;
    if let Some(description) = args.description {
        case.description = description;
    }
    if let Some(image_url) = args.image_url {
        case.image_url = image_url;
    }
    case.link_url = args.link_url;
    case
}

/// Add a product to the local catalog.
///
/// # Errors
///
/// Returns error if the cache cannot be written.
#[allow(clippy::print_stdout)]
pub fn add_product(args: ProductArgs) -> Result<(), CommandError> {
    let mut sync = open_editing_session()?;
    let product = product_from_args(args);
    let id = product.id.clone();
    sync.add_product(product)?;
    info!(id = %id, "Added product");
    println!("{id}");
    Ok(())
}

/// Delete a product from the local catalog after confirmation.
///
/// # Errors
///
/// Returns error if no product has that id or the cache cannot be written.
pub fn delete_product(id: &str, assume_yes: bool) -> Result<(), CommandError> {
    let mut sync = open_editing_session()?;
    let id = ProductId::new(id);
    let Some(product) = sync.products().iter().find(|p| p.id == id) else {
        return Err(showcase_sync::SyncError::ProductNotFound(id).into());
    };

    let question = format!("Delete product \"{}\" ({id})?", product.name);
    if !confirm_or_assume(&question, assume_yes)? {
        info!("Delete cancelled");
        return Ok(());
    }

    let removed = sync.delete_product(&id)?;
    info!(id = %removed.id, name = %removed.name, "Deleted product");
    Ok(())
}

/// Add a case study to the local catalog.
///
/// # Errors
///
/// Returns error if the cache cannot be written.
#[allow(clippy::print_stdout)]
pub fn add_case(args: CaseArgs) -> Result<(), CommandError> {
    let mut sync = open_editing_session()?;
    let case = case_from_args(args);
    let id = case.id.clone();
    sync.add_case_study(case)?;
    info!(id = %id, "Added case study");
    println!("{id}");
    Ok(())
}

/// Delete a case study from the local catalog after confirmation.
///
/// # Errors
///
/// Returns error if no case study has that id or the cache cannot be written.
pub fn delete_case(id: &str, assume_yes: bool) -> Result<(), CommandError> {
    let mut sync = open_editing_session()?;
    let id = CaseStudyId::new(id);
    let Some(case) = sync.cases().iter().find(|c| c.id == id) else {
        return Err(showcase_sync::SyncError::CaseStudyNotFound(id).into());
    };

    let question = format!("Delete case study \"{}\" ({id})?", case.title);
    if !confirm_or_assume(&question, assume_yes)? {
        info!("Delete cancelled");
        return Ok(());
    }

    let removed = sync.delete_case_study(&id)?;
    info!(id = %removed.id, title = %removed.title, "Deleted case study");
    Ok(())
}

#[cfg(test)]
mod tests {
    use showcase_core::ProductCategory;

    use super::*;

    fn product_args(name: &str) -> ProductArgs {
        ProductArgs {
            name: name.to_string(),
            model: None,
            category: None,
            sub_category: None,
            price: None,
            description: None,
            features: Vec::new(),
            specs: Vec::new(),
            image_url: None,
            brochure_url: None,
        }
    }

    #[test]
    fn test_unset_fields_keep_placeholders() {
        let product = product_from_args(product_args("Edge NVR"));
        assert_eq!(product.name, "Edge NVR");
        assert_eq!(product.model, "NEW-MODEL-001");
        assert_eq!(product.features.len(), 2);
        assert!(product.brochure_url.is_none());
    }

    #[test]
    fn test_given_fields_override_placeholders() {
        let mut args = product_args("Edge NVR");
        args.category = Some(ProductCategory::Service);
        args.features = vec!["24/7 recording".to_string()];
        args.brochure_url = Some("https://example.com/nvr.pdf".to_string());

        let product = product_from_args(args);
        assert_eq!(product.category, ProductCategory::Service);
        assert_eq!(product.features, ["24/7 recording"]);
        assert_eq!(product.brochure(), Some("https://example.com/nvr.pdf"));
    }

    #[test]
    fn test_blank_brochure_is_dropped() {
        let mut args = product_args("Edge NVR");
        args.brochure_url = Some("  ".to_string());
        assert!(product_from_args(args).brochure_url.is_none());
    }

    #[test]
    fn test_case_from_args() {
        let case = case_from_args(CaseArgs {
            title: "Airport".to_string(),
            description: None,
            image_url: None,
            link_url: Some("https://example.com/airport".to_string()),
        });
        assert_eq!(case.title, "Airport");
        assert!(!case.id.is_blank());
        assert_eq!(case.link_url.as_deref(), Some("https://example.com/airport"));
    }
}
