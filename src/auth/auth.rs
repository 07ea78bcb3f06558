use crate::{model::role::Role, models::Claims};
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};
use crate::config::Config;
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,

    /// Present only if this user is linked to a teacher profile
    pub teacher_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ))
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            email: data.claims.sub,
            role,
            teacher_id: data.claims.teacher_id,
        }))
    }
}

impl AuthUser {
    /// Single role gate used by every protected handler.
    pub fn require_any(&self, allowed: &[Role]) -> actix_web::Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden(
                "Insufficient role for this operation",
            ))
        }
    }

    pub fn require_admin(&self) -> actix_web::Result<()> {
        self.require_any(&[Role::Admin])
    }

    pub fn require_admin_or_school(&self) -> actix_web::Result<()> {
        self.require_any(&[Role::Admin, Role::School])
    }

    pub fn require_teacher(&self) -> actix_web::Result<()> {
        self.require_any(&[Role::Teacher])
    }

    /// Teacher-only operations that need the linked profile row.
    pub fn require_teacher_profile(&self) -> actix_web::Result<u64> {
        self.require_teacher()?;
        self.teacher_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No teacher profile"))
    }
}
