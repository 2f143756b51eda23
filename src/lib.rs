//! # Meal Recognition
//!
//! Turns free-text food descriptions, AI replies and meal photos into one
//! nutrition record with absolute calories and macros for the logged portion.
//!
//! The pipeline runs quantity parsing, unit conversion, nutrition normalization
//! and scaling, then reconciles whatever the AI provider returned. Every path
//! ends in a [`food_model::RecognitionResult`] tagged with its source.

pub mod ai_client;
pub mod ai_errors;
pub mod calorie_target;
pub mod circuit_breaker;
pub mod config;
pub mod daily_summary;
pub mod food_model;
pub mod image_input;
pub mod measurement_patterns;
pub mod mock_recognition;
pub mod nutrition_normalizer;
pub mod nutrition_scaler;
pub mod nutrition_tables;
pub mod prompt;
pub mod quantity_parser;
pub mod recognition_service;
pub mod response_reconciler;
pub mod unit_converter;

pub use food_model::{RecognitionResult, Source};
pub use recognition_service::RecognitionService;
pub use response_reconciler::{reconcile, reconcile_value};
