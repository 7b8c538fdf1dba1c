mod common;

use common::{image, TestCatalog};
use eshop_catalog::catalog::requests::{ProductImageCreateRequest, ProductImageUpdateRequest};
use eshop_catalog::error::CatalogError;

fn add_request(file_name: &str, is_default: bool, sort_order: i32) -> ProductImageCreateRequest {
    ProductImageCreateRequest {
        caption: Some(format!("caption for {file_name}")),
        is_default,
        sort_order,
        image_file: image(file_name),
    }
}

#[tokio::test]
async fn test_add_and_get_image() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let service = &catalog.state.manage_products;

    let image_id = service
        .add_image(product_id, add_request("side.png", false, 2))
        .await
        .expect("Failed to add image");

    let view = service.get_image_by_id(image_id).await.expect("get image");
    assert_eq!(view.product_id, product_id);
    assert_eq!(view.caption.as_deref(), Some("caption for side.png"));
    assert_eq!(view.sort_order, 2);
    assert!(!view.is_default);
    assert_eq!(view.file_size, image("side.png").len());
    assert_eq!(catalog.stored_files(), vec![view.image_path.clone()]);
}

#[tokio::test]
async fn test_add_image_to_missing_product_stores_nothing() {
    let catalog = TestCatalog::new().await;
    let err = catalog
        .state
        .manage_products
        .add_image(5, add_request("side.png", false, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    assert!(catalog.stored_files().is_empty());
}

#[tokio::test]
async fn test_add_then_remove_leaves_nothing() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let service = &catalog.state.manage_products;

    let image_id = service
        .add_image(product_id, add_request("side.png", true, 1))
        .await
        .expect("Failed to add image");
    service.remove_image(image_id).await.expect("Failed to remove image");

    assert!(catalog.stored_files().is_empty());
    assert!(service
        .get_list_images(product_id)
        .await
        .expect("list")
        .is_empty());

    let err = service.remove_image(image_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    let err = service.get_image_by_id(image_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_only_one_default_image() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let service = &catalog.state.manage_products;

    let first = service
        .add_image(product_id, add_request("a.png", true, 1))
        .await
        .expect("add");
    let second = service
        .add_image(product_id, add_request("b.png", true, 2))
        .await
        .expect("add");
    let third = service
        .add_image(product_id, add_request("c.png", false, 3))
        .await
        .expect("add");

    let defaults: Vec<i32> = service
        .get_list_images(product_id)
        .await
        .expect("list")
        .into_iter()
        .filter(|image| image.is_default)
        .map(|image| image.id)
        .collect();
    assert_eq!(defaults, vec![second]);

    service
        .update_image(
            third,
            ProductImageUpdateRequest {
                caption: None,
                is_default: true,
                sort_order: 3,
                image_file: None,
            },
        )
        .await
        .expect("update");

    let images = service.get_list_images(product_id).await.expect("list");
    let defaults: Vec<i32> = images
        .iter()
        .filter(|image| image.is_default)
        .map(|image| image.id)
        .collect();
    assert_eq!(defaults, vec![third]);
    assert!(images.iter().any(|image| image.id == first));

    let view = service.get_by_id(product_id, "en-US").await.expect("get");
    let third_path = images
        .iter()
        .find(|image| image.id == third)
        .map(|image| image.image_path.clone());
    assert_eq!(view.thumbnail_image, third_path);
}

#[tokio::test]
async fn test_update_image_replaces_file() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let service = &catalog.state.manage_products;

    let image_id = service
        .add_image(product_id, add_request("a.png", false, 1))
        .await
        .expect("add");

    service
        .update_image(
            image_id,
            ProductImageUpdateRequest {
                caption: Some("renamed".to_owned()),
                is_default: false,
                sort_order: 4,
                image_file: Some(image("b.webp")),
            },
        )
        .await
        .expect("update");

    let view = service.get_image_by_id(image_id).await.expect("get");
    assert_eq!(view.caption.as_deref(), Some("renamed"));
    assert_eq!(view.sort_order, 4);
    assert!(view.image_path.ends_with(".webp"));
    assert_eq!(catalog.stored_files(), vec![view.image_path]);

    let err = service
        .update_image(
            image_id + 1,
            ProductImageUpdateRequest {
                caption: None,
                is_default: false,
                sort_order: 0,
                image_file: Some(image("c.png")),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    assert_eq!(catalog.stored_files().len(), 1);
}

#[tokio::test]
async fn test_list_images_is_ordered() {
    let catalog = TestCatalog::new().await;
    let product_id = catalog.create_product("Bagel", "en-US").await;
    let other_id = catalog.create_product("Bread", "en-US").await;
    let service = &catalog.state.manage_products;

    let late = service
        .add_image(product_id, add_request("late.png", false, 9))
        .await
        .expect("add");
    let early = service
        .add_image(product_id, add_request("early.png", false, 1))
        .await
        .expect("add");
    service
        .add_image(other_id, add_request("other.png", false, 1))
        .await
        .expect("add");

    let ids: Vec<i32> = service
        .get_list_images(product_id)
        .await
        .expect("list")
        .into_iter()
        .map(|image| image.id)
        .collect();
    assert_eq!(ids, vec![early, late]);
}
