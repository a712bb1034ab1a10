//! HTTP handler functions for the safety score API.

use actix_web::{HttpRequest, HttpResponse, error, web};
use safety_score_server_models::{
    ApiBreakdown, ApiError, ApiHealth, ApiHotspots, ApiSafeZones, ApiScore, ReviewRequest,
};

use crate::AppState;
use crate::review::ReviewValues;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /sentiment_score`
///
/// Scores the hour/latitude/longitude of a comma-separated review and
/// echoes the parsed values back with the score rounded to two decimals.
pub async fn sentiment_score(
    state: web::Data<AppState>,
    body: web::Json<ReviewRequest>,
) -> HttpResponse {
    let values = match ReviewValues::parse(&body.review) {
        Ok(values) => values,
        Err(e) => {
            log::warn!("Rejected review '{}': {e}", body.review);
            return HttpResponse::BadRequest().json(ApiError::new(e.to_string()));
        }
    };

    let inputs = values.risk_inputs(state.environment());
    let score = state.engine.score(&inputs);

    if !score.is_finite() {
        log::error!("Engine produced non-finite score for {inputs:?}");
        return HttpResponse::InternalServerError()
            .json(ApiError::new("Failed to compute safety score"));
    }

    let response = ApiScore {
        review: values.to_vec(),
        score: round_to_hundredths(score),
    };

    log::info!("response is: {response:?}");

    HttpResponse::Created().json(response)
}

/// `POST /api/safety/breakdown`
///
/// Same input as [`sentiment_score`], returning every scoring component.
pub async fn breakdown(
    state: web::Data<AppState>,
    body: web::Json<ReviewRequest>,
) -> HttpResponse {
    let values = match ReviewValues::parse(&body.review) {
        Ok(values) => values,
        Err(e) => {
            log::warn!("Rejected review '{}': {e}", body.review);
            return HttpResponse::BadRequest().json(ApiError::new(e.to_string()));
        }
    };

    let inputs = values.risk_inputs(state.environment());
    let breakdown = state.engine.assess(&inputs);

    if !breakdown.score.is_finite() {
        log::error!("Engine produced non-finite score for {inputs:?}");
        return HttpResponse::InternalServerError()
            .json(ApiError::new("Failed to compute safety score"));
    }

    HttpResponse::Ok().json(ApiBreakdown {
        review: values.to_vec(),
        inputs,
        breakdown,
    })
}

/// `GET /api/hotspots`
pub async fn hotspots(state: web::Data<AppState>) -> HttpResponse {
    let tables = state.engine.tables();
    HttpResponse::Ok().json(ApiHotspots {
        table: tables.name.clone(),
        hotspot_radius_m: tables.hotspot_radius_m,
        max_risk_distance_m: tables.max_risk_distance_m,
        hotspots: tables.hotspots.clone(),
    })
}

/// `GET /api/safe-zones`
pub async fn safe_zones(state: web::Data<AppState>) -> HttpResponse {
    let tables = state.engine.tables();
    HttpResponse::Ok().json(ApiSafeZones {
        table: tables.name.clone(),
        safe_zones: tables.safe_zones.clone(),
    })
}

/// Turns JSON extraction failures (wrong content type, malformed body,
/// missing `review`) into a 400 with an [`ApiError`] body.
pub fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected body for {}: {err}", req.path());
    let response =
        HttpResponse::BadRequest().json(ApiError::new(format!("Invalid request body: {err}")));
    error::InternalError::from_response(err, response).into()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use actix_web::test as actix_test;
    use actix_web::{App, http::StatusCode};
    use safety_score::{RiskEngine, RiskTables};
    use safety_score_models::{CompositionPolicy, EnvironmentalFlags, SafetyBand};
    use serde_json::json;

    use super::*;
    use crate::config::ScoringDefaults;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(
            RiskEngine::embedded(),
            ScoringDefaults::default(),
        ))
    }

    fn additive_state(environment: EnvironmentalFlags) -> web::Data<AppState> {
        let mut tables = RiskTables::embedded();
        tables.composition = CompositionPolicy::EnvironmentalAdditive;
        web::Data::new(AppState::new(
            RiskEngine::new(tables).unwrap(),
            ScoringDefaults { environment },
        ))
    }

    async fn night_score(state: web::Data<AppState>) -> f64 {
        let app =
            actix_test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_json(json!({ "review": "23,0,28.6469,77.3164,12,5" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: ApiScore = actix_test::read_body_json(resp).await;
        body.score
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert!((round_to_hundredths(92.004) - 92.0).abs() < f64::EPSILON);
        assert!((round_to_hundredths(6.005_1) - 6.01).abs() < 1e-12);
        assert!((round_to_hundredths(100.0) - 100.0).abs() < f64::EPSILON);
    }

    #[actix_web::test]
    async fn scores_hotspot_at_night() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_json(json!({ "review": "23,0,28.6469,77.3164,12,5" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: ApiScore = actix_test::read_body_json(resp).await;
        assert_eq!(body.review, vec![23.0, 0.0, 28.6469, 77.3164, 12.0, 5.0]);
        assert!((body.score - 6.0).abs() < f64::EPSILON, "score {}", body.score);
    }

    #[actix_web::test]
    async fn scores_remote_point_in_daytime() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_json(json!({ "review": "10,30,28.40,76.95,1,1" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: ApiScore = actix_test::read_body_json(resp).await;
        assert!(body.score > 80.0, "score {}", body.score);
    }

    #[actix_web::test]
    async fn rejects_wrong_value_count() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_json(json!({ "review": "23,0,28.6469,77.3164" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ApiError = actix_test::read_body_json(resp).await;
        assert!(body.error.contains("exactly 6 values"), "{}", body.error);
    }

    #[actix_web::test]
    async fn rejects_non_numeric_values() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_json(json!({ "review": "23,0,north,77.3164,12,5" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn rejects_missing_review_field() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_json(json!({ "text": "23,0,28.6469,77.3164,12,5" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ApiError = actix_test::read_body_json(resp).await;
        assert!(body.error.starts_with("Invalid request body"), "{}", body.error);
    }

    #[actix_web::test]
    async fn rejects_non_json_body() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/sentiment_score")
            .set_payload("23,0,28.6469,77.3164,12,5")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn breakdown_reports_components() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/safety/breakdown")
            .set_json(json!({ "review": "23,0,28.6469,77.3164,12,5" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: ApiBreakdown = actix_test::read_body_json(resp).await;
        assert!((body.breakdown.location_risk - 0.9).abs() < 1e-12);
        assert!((body.breakdown.time_risk - 1.0).abs() < f64::EPSILON);
        assert_eq!(body.breakdown.band, SafetyBand::Unsafe);
        assert_eq!(
            body.breakdown.dominant_hotspot.as_deref(),
            Some("Anand_Vihar")
        );
        assert_eq!(body.inputs.environment, None);
        assert!(body.breakdown.environmental_adjustment.abs() < f64::EPSILON);
    }

    #[actix_web::test]
    async fn default_flags_apply_under_additive_tables() {
        let safe = EnvironmentalFlags {
            is_crowded: false,
            has_streetlights: true,
            is_near_police: true,
            is_public_transport: false,
        };
        let risky = EnvironmentalFlags {
            is_crowded: true,
            has_streetlights: false,
            is_near_police: false,
            is_public_transport: true,
        };

        let safe_score = night_score(additive_state(safe)).await;
        let risky_score = night_score(additive_state(risky)).await;
        assert!(
            safe_score > risky_score,
            "police+lit = {safe_score}, crowded+unlit = {risky_score}"
        );
    }

    #[actix_web::test]
    async fn breakdown_attaches_flags_under_additive_tables() {
        let flags = ScoringDefaults::default().environment;
        let app = actix_test::init_service(
            App::new()
                .app_data(additive_state(flags))
                .configure(crate::configure),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/safety/breakdown")
            .set_json(json!({ "review": "23,0,28.6469,77.3164,12,5" }))
            .to_request();
        let body: ApiBreakdown = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.inputs.environment, Some(flags));
        assert!((body.breakdown.environmental_adjustment - 0.3).abs() < 1e-12);
    }

    #[actix_web::test]
    async fn serves_tables_and_health() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/hotspots").to_request();
        let body: ApiHotspots = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.table, "delhi");
        assert_eq!(body.hotspots.len(), 10);

        let req = actix_test::TestRequest::get().uri("/api/safe-zones").to_request();
        let body: ApiSafeZones = actix_test::call_and_read_body_json(&app, req).await;
        assert!(!body.safe_zones.is_empty());

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: ApiHealth = actix_test::call_and_read_body_json(&app, req).await;
        assert!(body.healthy);
    }
}
