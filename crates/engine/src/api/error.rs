//! HTTP error mapping.
//!
//! Every failure leaves the engine as `{ "errors": [ { "message": ... } ] }`
//! with the status chosen here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use delver_domain::DomainError;
use delver_shared::ErrorResponse;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::combat::CombatError;
use crate::use_cases::creature::CreatureError;
use crate::use_cases::game::GameError;
use crate::use_cases::treasure::TreasureError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request.";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg,
            ApiError::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(ErrorResponse::single(message))).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            RepoError::ConstraintViolation(_) => ApiError::BadRequest(e.to_string()),
            RepoError::Conflict(_) => ApiError::Conflict(e.to_string()),
            RepoError::Database { .. } | RepoError::Serialization(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<CreatureError> for ApiError {
    fn from(e: CreatureError) -> Self {
        match e {
            CreatureError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            CreatureError::InCombat(_) => ApiError::Conflict(e.to_string()),
            CreatureError::Validation(msg) => ApiError::BadRequest(msg),
            CreatureError::Domain(e) => e.into(),
            CreatureError::Repo(e) => e.into(),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::NotFound(_) | GameError::CharacterNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            GameError::DungeonMasterTaken(_) | GameError::RoleConflict(_) => {
                ApiError::Conflict(e.to_string())
            }
            GameError::Validation(msg) => ApiError::BadRequest(msg),
            GameError::Domain(e) => e.into(),
            GameError::Repo(e) => e.into(),
        }
    }
}

impl From<TreasureError> for ApiError {
    fn from(e: TreasureError) -> Self {
        match e {
            TreasureError::TypeNotFound(_)
            | TreasureError::TreasureNotFound(_)
            | TreasureError::PartyNotFound(_) => ApiError::NotFound(e.to_string()),
            TreasureError::AlreadyOpened(_) => ApiError::Conflict(e.to_string()),
            TreasureError::TypeInUse(_) => ApiError::BadRequest(e.to_string()),
            TreasureError::Validation(msg) => ApiError::BadRequest(msg),
            TreasureError::Domain(e) => e.into(),
            TreasureError::Repo(e) => e.into(),
        }
    }
}

impl From<CombatError> for ApiError {
    fn from(e: CombatError) -> Self {
        match e {
            CombatError::GameNotFound(_) | CombatError::CombatNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            CombatError::AlreadyInCombat(_) => ApiError::Conflict(e.to_string()),
            CombatError::GameInactive(_) | CombatError::NoMonsters(_) => {
                ApiError::BadRequest(e.to_string())
            }
            CombatError::Validation(msg) => ApiError::BadRequest(msg),
            CombatError::Domain(e) => e.into(),
            CombatError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delver_domain::{GameId, TreasureId};

    #[test]
    fn repo_errors_map_to_statuses() {
        let cases = [
            (RepoError::not_found("Game", 1), StatusCode::NOT_FOUND),
            (RepoError::constraint("in use"), StatusCode::BAD_REQUEST),
            (RepoError::conflict("opened"), StatusCode::CONFLICT),
            (
                RepoError::database("insert", "disk full"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn domain_not_found_is_404_and_everything_else_400() {
        let missing = ApiError::from(DomainError::not_found("Creature", 3));
        let invalid = ApiError::from(DomainError::validation("bad"));

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn use_case_conflicts_are_409() {
        assert_eq!(
            ApiError::from(TreasureError::AlreadyOpened(TreasureId::new(1))).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(GameError::DungeonMasterTaken(GameId::new(1))).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(CombatError::AlreadyInCombat(GameId::new(1))).status(),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let response = ApiError::Internal("connection reset".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, ErrorResponse::single("Internal server error"));
    }
}
