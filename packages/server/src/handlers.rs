//! HTTP handler functions for the rent predictor API.

use actix_web::{HttpResponse, web};
use rent_predictor_analytics::aggregate::{MAP_TITLE, map_points};
use rent_predictor_analytics::importance::{CHART_TITLE, feature_importance_ranking};
use rent_predictor_inference::{InferenceError, predict_rent};
use rent_predictor_property::{RawPropertyForm, form_fields};
use rent_predictor_server_models::{
    ApiCityRents, ApiError, ApiFeatureImportance, ApiForm, ApiHealth, ApiPrediction, ApiRentMap,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/form`
///
/// Describes the form inputs, their defaults and option labels.
pub async fn form() -> HttpResponse {
    HttpResponse::Ok().json(ApiForm::new(form_fields()))
}

/// `POST /api/predict`
///
/// Predicts the monthly rent for the submitted form.
pub async fn predict(state: web::Data<AppState>, form: web::Json<RawPropertyForm>) -> HttpResponse {
    match predict_rent(state.model.as_ref(), &form) {
        Ok(prediction) => HttpResponse::Ok().json(ApiPrediction::from(prediction)),
        Err(InferenceError::Validation(e)) => {
            log::debug!("Rejected form: {e}");
            HttpResponse::UnprocessableEntity().json(ApiError::from(&e))
        }
        Err(InferenceError::Model(e)) => {
            log::error!("Failed to predict rent: {e}");
            HttpResponse::InternalServerError().json(ApiError::internal("Failed to predict rent"))
        }
    }
}

/// `GET /api/feature-importance`
///
/// Returns the importance ranking, or why it is unavailable.
pub async fn feature_importance(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiFeatureImportance {
        title: CHART_TITLE,
        outcome: feature_importance_ranking(state.model.as_ref()),
    })
}

/// `GET /api/city-rents`
///
/// Lists the average rent of every city in the dataset.
pub async fn city_rents(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiCityRents {
        cities: state.city_summaries.as_ref().clone(),
    })
}

/// `GET /api/map`
///
/// Returns markers for the cities with known coordinates.
pub async fn rent_map(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiRentMap {
        title: MAP_TITLE,
        points: map_points(&state.city_summaries),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rent_predictor_analytics_models::CityRentSummary;
    use rent_predictor_geography_models::Coordinates;
    use rent_predictor_model::{ModelError, ModelHandle, RentOracle};
    use rent_predictor_property_models::{
        FEATURE_SCHEMA, FeatureKind, FeatureRow, FeatureValue, column,
    };
    use serde_json::{Value, json};

    use crate::{AppState, configure_api};

    /// Predicts `10 * area` and has no importances.
    struct AreaOracle;

    impl RentOracle for AreaOracle {
        fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError> {
            if !row.matches_schema(FEATURE_SCHEMA) {
                return Err(ModelError::SchemaMismatch {
                    message: "unexpected row".to_string(),
                });
            }
            match row.get(column::AREA) {
                Some(FeatureValue::Number(area)) => Ok(area * 10.0),
                _ => Err(ModelError::SchemaMismatch {
                    message: "no area".to_string(),
                }),
            }
        }

        fn feature_importance(&self) -> Result<Vec<(String, f64)>, ModelError> {
            Err(ModelError::InsufficientData)
        }
    }

    struct BrokenOracle;

    impl RentOracle for BrokenOracle {
        fn predict(&self, _row: &FeatureRow) -> Result<f64, ModelError> {
            Err(ModelError::SchemaMismatch {
                message: "trained on other columns".to_string(),
            })
        }

        fn feature_importance(&self) -> Result<Vec<(String, f64)>, ModelError> {
            Ok(vec![("area".to_string(), 0.7), ("city".to_string(), 0.2)])
        }
    }

    fn state(model: Arc<dyn RentOracle>) -> web::Data<AppState> {
        web::Data::new(AppState {
            model,
            city_summaries: Arc::new(vec![
                CityRentSummary {
                    city: "São Paulo".to_string(),
                    average_rent: 1500.0,
                    listings: 2,
                    coordinates: Some(Coordinates {
                        latitude: -23.5505,
                        longitude: -46.6333,
                    }),
                },
                CityRentSummary {
                    city: "Unknown".to_string(),
                    average_rent: 500.0,
                    listings: 1,
                    coordinates: None,
                },
            ]),
        })
    }

    #[actix_web::test]
    async fn predicts_rent_for_valid_form() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(AreaOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "city": "São Paulo",
                "area": "123.4",
                "rooms": 2,
                "animal": "Sí",
                "furniture": "No amueblado"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["formatted"], "1234.00");
        assert_eq!(body["currency"], "R$");
        assert_eq!(body["record"]["furniture"], "not furnished");
        assert_eq!(body["record"]["parking spaces"], 0);
    }

    #[actix_web::test]
    async fn invalid_form_is_unprocessable() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(AreaOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({ "city": "Campinas", "rooms": "two" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["field"], "rooms");
    }

    #[actix_web::test]
    async fn malformed_body_is_a_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(AreaOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn model_errors_are_internal() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(BrokenOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({ "city": "Campinas" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "internal");
    }

    /// A model over the full schema whose output overflows to infinity.
    fn overflowing_model() -> ModelHandle {
        let features: Vec<Value> = FEATURE_SCHEMA
            .iter()
            .map(|c| match c.kind {
                FeatureKind::Numeric => json!({ "name": c.name, "kind": "numeric" }),
                FeatureKind::Categorical => {
                    json!({ "name": c.name, "kind": "categorical", "categories": ["x"] })
                }
            })
            .collect();
        let artifact = json!({
            "format_version": 1,
            "features": features,
            "base_score": 1e308,
            "trees": [{ "nodes": [{ "leaf": 1e308 }] }]
        });
        ModelHandle::from_json_str(&artifact.to_string()).unwrap()
    }

    #[actix_web::test]
    async fn non_finite_predictions_are_internal() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(overflowing_model())))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({ "city": "Campinas", "area": 80 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "internal");
        assert!(body.get("field").is_none());
    }

    #[actix_web::test]
    async fn importance_degrades_without_failing() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(AreaOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/feature-importance")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "unavailable");
    }

    #[actix_web::test]
    async fn importance_is_ranked_ascending() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(BrokenOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/feature-importance")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "available");
        assert_eq!(body["features"][0]["feature"], "city");
        assert_eq!(body["features"][1]["feature"], "area");
    }

    #[actix_web::test]
    async fn map_excludes_cities_without_coordinates() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(AreaOracle)))
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/map").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let points = body["points"].as_array().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["label"], "São Paulo: 1500.00 R$");

        let req = test::TestRequest::get().uri("/api/city-rents").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["cities"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn serves_form_description() {
        let app = test::init_service(App::new().configure(configure_api)).await;

        let req = test::TestRequest::get().uri("/api/form").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["fields"].as_array().unwrap().len(), FEATURE_SCHEMA.len());
        assert_eq!(body["fields"][0]["column"], "city");
    }
}
