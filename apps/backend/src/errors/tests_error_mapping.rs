// Unit tests for error mapping - pure domain errors to boundary errors
use actix_web::body::to_bytes;
use actix_web::ResponseError;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_role_rejections_to_403() {
    for kind in [
        ValidationKind::NotJudge,
        ValidationKind::NotEligible,
        ValidationKind::NotHost,
    ] {
        let app: AppError = DomainError::validation(kind, "nope").into();
        assert_eq!(app.status().as_u16(), 403);
    }
}

#[test]
fn maps_phase_mismatch_to_409() {
    let app: AppError = DomainError::phase_mismatch("not voting").into();
    assert_eq!(app.code(), ErrorCode::PhaseMismatch);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_duplicate_actions_to_422() {
    let app: AppError = DomainError::validation(ValidationKind::AlreadyPlayed, "twice").into();
    assert_eq!(app.code().as_str(), "ALREADY_PLAYED");
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::DeckExhausted, "empty").into();
    assert_eq!(app.code().as_str(), "DECK_EXHAUSTED");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::conflict(ConflictKind::AlreadyInRoom, "elsewhere").into();
    assert_eq!(app.code(), ErrorCode::AlreadyInRoom);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Room, "no room").into();
    assert_eq!(app.code().as_str(), "ROOM_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_infra() {
    let corr: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad deck").into();
    assert_eq!(corr.code().as_str(), "DATA_CORRUPTION");
    assert_eq!(corr.status().as_u16(), 500);

    let other: AppError =
        DomainError::infra(InfraErrorKind::Other("lock".into()), "poisoned").into();
    assert_eq!(other.code(), ErrorCode::InternalError);
    assert_eq!(other.public_detail(), "Something went wrong on our side");
}

#[actix_web::test]
async fn problem_details_body() {
    let app: AppError = DomainError::validation(ValidationKind::NotJudge, "judge only").into();
    let resp = app.error_response();
    assert_eq!(resp.status().as_u16(), 403);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let body = to_bytes(resp.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "NOT_JUDGE");
    assert_eq!(json["title"], "Not Judge");
    assert_eq!(json["detail"], "judge only");
    assert_eq!(json["trace_id"], "unknown");
}
