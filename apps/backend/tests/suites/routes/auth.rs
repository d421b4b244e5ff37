use actix_web::{test, web};

use crate::common::assert_problem_details_structure;
use crate::support::auth::{bearer, mint_expired_token, test_security};
use crate::support::{build_test_state, create_test_app};
use wizz_backend::auth::jwt::mint_access_token;
use wizz_backend::state::security_config::SecurityConfig;

#[actix_web::test]
async fn missing_bearer_is_401() {
    let app = create_test_app(web::Data::new(build_test_state())).await;

    let req = test::TestRequest::get().uri("/api/rooms").to_request();
    let resp = test::call_service(&app, req).await;

    let problem =
        assert_problem_details_structure(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;
    assert_eq!(problem["detail"], "Missing or malformed Bearer token");
}

#[actix_web::test]
async fn token_signed_with_another_secret_is_401() {
    let app = create_test_app(web::Data::new(build_test_state())).await;
    let foreign = SecurityConfig::new("some_other_secret".as_bytes());
    let token = mint_access_token(1, "mallory", std::time::SystemTime::now(), &foreign).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/rooms")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_structure(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;
}

#[actix_web::test]
async fn expired_token_is_401() {
    let app = create_test_app(web::Data::new(build_test_state())).await;
    let token = mint_expired_token(1, "old", &test_security());

    let req = test::TestRequest::get()
        .uri("/api/rooms/current")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_structure(resp, 401, "UNAUTHORIZED_EXPIRED_JWT").await;
}
