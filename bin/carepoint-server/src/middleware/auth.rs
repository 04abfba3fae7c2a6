use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::{verify_token, Claims};
use crate::error::ServerError;
use crate::state::AppState;

/// Identity of the caller, inserted into request extensions by
/// [`require_bearer`]. `None` when token enforcement is off.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<Claims>);

impl Caller {
    /// Reject a request that names a user other than the token's subject.
    pub fn ensure_owner(&self, username: &str) -> Result<(), ServerError> {
        match &self.0 {
            Some(claims) if claims.sub != username => Err(ServerError::Unauthorized(
                "token does not belong to this user".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Verify `Authorization: Bearer <jwt>` when `CAREPOINT_REQUIRE_AUTH` is on.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let caller = if state.config.require_auth {
        let provided = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let Some(token) = provided else {
            return ServerError::Unauthorized("missing bearer token".into()).into_response();
        };
        match verify_token(&state.config, token) {
            Ok(claims) => Caller(Some(claims)),
            Err(e) => return ServerError::from(e).into_response(),
        }
    } else {
        Caller(None)
    };
    req.extensions_mut().insert(caller);
    next.run(req).await
}

#[cfg(test)]
mod test {
    use super::*;

    fn caller(sub: &str) -> Caller {
        Caller(Some(Claims {
            sub: sub.into(),
            iat: 0,
            exp: 0,
        }))
    }

    #[test]
    fn owner_check_matches_subject() {
        assert!(caller("a@example.com").ensure_owner("a@example.com").is_ok());
        assert!(matches!(
            caller("a@example.com").ensure_owner("b@example.com"),
            Err(ServerError::Unauthorized(_))
        ));
        assert!(Caller(None).ensure_owner("anyone").is_ok());
    }
}
