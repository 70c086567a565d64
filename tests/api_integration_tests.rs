use smart_fridge::api_connection::{
    endpoints::{ImageGenerationRequest, ImageProvider, DEFAULT_IMAGE_MODEL},
    ImageGenerator,
};
use smart_fridge::errors::ImageApiError;
use smart_fridge::recipe_engine::RecommendationEngine;
use smart_fridge::store::MemoryStore;
use smart_fridge::models::{Category, Compartment, InventoryItem};
use dotenv::dotenv;
use std::env;
use std::time::Duration;

const TEST_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

fn setup_test_environment() {
    dotenv().ok();
}

#[tokio::test]
async fn test_missing_api_key_error() {
    setup_test_environment();
    let provider = ImageProvider::openai("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let request = ImageGenerationRequest::dish_photo(DEFAULT_IMAGE_MODEL, "scrambled eggs".to_string());
    let result = provider.call_image_generation(request).await;
    assert!(matches!(result, Err(ImageApiError::MissingApiKey(_))));
    if let Err(ImageApiError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
async fn test_missing_api_key_does_not_fail_suggestions() {
    setup_test_environment();
    let store = MemoryStore::new();
    store
        .create(
            InventoryItem::new(
                "雞蛋",
                Category::Dairy,
                Compartment::LeftDoorUpper,
                chrono::Local::now().date_naive(),
            ),
            None,
        )
        .unwrap();

    let provider = ImageProvider::openai("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let engine = RecommendationEngine::new(Some(provider), Duration::from_secs(5));
    let response = engine
        .suggest(&store, chrono::Local::now().date_naive())
        .await
        .unwrap();

    assert_eq!(response.suggestions.len(), 3);
    assert!(response.suggestions.iter().all(|s| s.image_url.is_none()));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    setup_test_environment();
    const KEY_ENV_NAME_FOR_THIS_TEST: &str = "SMART_FRIDGE_UNREACHABLE_TEST_KEY";
    unsafe {
        std::env::set_var(KEY_ENV_NAME_FOR_THIS_TEST, "not-a-real-key");
    }

    // Port 9 (discard) on localhost is expected to refuse connections.
    let provider = ImageProvider::openai(KEY_ENV_NAME_FOR_THIS_TEST).with_base_url("http://127.0.0.1:9/v1/");
    let result = provider.generate_image("eggs").await;
    assert!(matches!(result, Err(ImageApiError::Network(_))), "Expected network error, got {:?}", result);

    unsafe {
        std::env::remove_var(KEY_ENV_NAME_FOR_THIS_TEST);
    }
}

#[tokio::test]
#[ignore]
async fn test_successful_image_generation() {
    setup_test_environment();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!(
            "Skipping test_successful_image_generation: {} not set.",
            TEST_API_KEY_ENV_VAR
        );
        return;
    }

    let provider = ImageProvider::openai(TEST_API_KEY_ENV_VAR);
    let result = provider
        .generate_image("A beautiful, appetizing photo of 蔥花炒蛋 (經典家常菜).")
        .await;
    assert!(result.is_ok(), "API call failed: {:?}", result.err());
    assert!(result.unwrap().starts_with("http"));
}

#[tokio::test]
#[ignore]
async fn test_api_error_with_invalid_key() {
    setup_test_environment();

    const INVALID_KEY_ENV_NAME_FOR_THIS_TEST: &str = "ENV_VAR_WITH_BAD_IMAGE_KEY_VALUE";
    unsafe {
        std::env::set_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST, "this_is_a_deliberately_bad_api_key_string_for_testing");
    }

    let provider = ImageProvider::openai(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    let result = provider.generate_image("This call should fail due to invalid key.").await;
    assert!(matches!(result, Err(ImageApiError::Api { .. })), "Expected Api error, got {:?}", result);
    if let Err(ImageApiError::Api { status, .. }) = result {
        assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
    }

    unsafe {
        std::env::remove_var(INVALID_KEY_ENV_NAME_FOR_THIS_TEST);
    }
}
