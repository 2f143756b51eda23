use meal_recognition::ai_client::ChatMessage;
use meal_recognition::calorie_target::{calculate_target, ActivityLevel, Goal, Sex, UserProfile};
use meal_recognition::config::{AiConfig, RecoveryConfig};
use meal_recognition::daily_summary::{summarize, MealEntry};
use meal_recognition::food_model::Source;
use meal_recognition::mock_recognition::mock_image_recognition;
use meal_recognition::RecognitionService;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tempfile::NamedTempFile;

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";

fn offline_service() -> RecognitionService {
    RecognitionService::new(AiConfig::default())
}

fn assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn test_text_recognition_without_api_key() {
    let service = offline_service();

    let result = service
        .recognize_text("100 g chicken breast with 100 g rice")
        .await;
    assert_eq!(result.source, Source::MockMultiComponent);
    assert_eq!(result.calories, 295);

    let unknown = service.recognize_text("xyzfood").await;
    assert_eq!(unknown.source, Source::Fallback);
}

#[tokio::test]
async fn test_image_recognition_without_api_key_is_seeded_mock() {
    let service = offline_service();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PNG_HEADER).unwrap();

    let result = service
        .recognize_image_with(file.path(), &mut StdRng::seed_from_u64(11))
        .await
        .unwrap();

    assert_eq!(result.source, Source::MockSingle);
    assert_eq!(result, mock_image_recognition(&mut StdRng::seed_from_u64(11)));
}

#[test]
fn test_service_futures_can_move_between_threads() {
    let service = offline_service();
    let path = std::path::Path::new("lunch.jpg");

    assert_send(&service.recognize_text("2 rotis"));
    assert_send(&service.recognize_image(path));
    assert_send(&service.coach_reply(None, None, &[], "hi"));
}

#[tokio::test]
async fn test_image_recognition_runs_on_spawned_task() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PNG_HEADER).unwrap();
    let path = file.path().to_path_buf();

    let handle = tokio::spawn(async move {
        let service = offline_service();
        service.recognize_image(&path).await
    });

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.source, Source::MockSingle);
    assert!((60..=80).contains(&result.confidence));
}

#[tokio::test]
async fn test_invalid_image_is_an_error() {
    let service = offline_service();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"definitely not a photo").unwrap();

    assert!(service.recognize_image(file.path()).await.is_err());
    assert!(service
        .recognize_image(std::path::Path::new("/nonexistent/lunch.jpg"))
        .await
        .is_err());
}

#[tokio::test]
async fn test_unreachable_provider_falls_back_and_opens_breaker() {
    let config = AiConfig {
        api_key: Some("sk-test".to_string()),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        recovery: RecoveryConfig {
            max_retries: 0,
            circuit_breaker_threshold: 1,
            ..RecoveryConfig::default()
        },
        ..AiConfig::default()
    };
    let service = RecognitionService::new(config);
    assert!(service.is_ai_available());

    let result = service.recognize_text("2 rotis").await;
    assert_eq!(result.source, Source::MockSingle);
    assert_eq!(result.calories, 240);

    assert!(service.breaker().is_open());
    assert!(!service.is_ai_available());

    let again = service.recognize_text("2 rotis").await;
    assert_eq!(again, result);
}

#[tokio::test]
async fn test_day_of_logging_with_coach_reply() {
    let service = offline_service();
    let profile = UserProfile {
        weight_kg: 70.0,
        height_cm: 175.0,
        age: 30,
        sex: Sex::Male,
        activity: ActivityLevel::Moderate,
        goal: Goal::Lose,
    };
    let target = calculate_target(&profile).unwrap();

    let breakfast = service.recognize_text("3 eggs").await;
    let lunch = service.recognize_text("dal with 2 rotis").await;
    let meals = vec![
        MealEntry::from_result(&breakfast, Utc.with_ymd_and_hms(2026, 3, 10, 8, 30, 0).unwrap()),
        MealEntry::from_result(&lunch, Utc.with_ymd_and_hms(2026, 3, 10, 13, 0, 0).unwrap()),
    ];

    let date = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap().date_naive();
    let today = summarize(&meals, date, Some(&target));
    assert_eq!(today.meal_count, 2);
    assert_eq!(today.totals.calories, 234 + 356);
    assert_eq!(today.remaining_calories, Some(2056 - 590));

    let history = [ChatMessage::user("hi"), ChatMessage::assistant("Hello!")];
    let reply = service
        .coach_reply(Some(&target), Some(&today), &history, "what should I eat for dinner?")
        .await;
    assert!(reply.contains("1466 kcal left"));
}
