/*!
 * 基于角色的访问控制中间件
 *
 * 必须挂在 RequireJWT 之后，否则请求中取不到当前用户。
 *
 * ```rust,ignore
 * web::scope("/api/v1/finance")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::scope("")
 *             .wrap(RequireRole::new_any(UserRole::finance_roles()))
 *             .route("/payments", web::get().to(list_payments)),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, users::entities::UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 只允许某一个角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![*role],
        }
    }

    /// 允许其中任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
        }
    }

    fn permits(required: &[UserRole], role: Option<UserRole>) -> bool {
        role.is_some_and(|r| required.contains(&r))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let user_id = RequireJWT::extract_user_id(req.request());
            let user_role = RequireJWT::extract_user_role(req.request());

            match user_id {
                Some(user_id) => {
                    if RequireRole::permits(&required_roles, user_role) {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (role: {:?}). Required roles: {:?}",
                            user_id, user_role, required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Access denied.",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check failed: no authenticated user in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserStatus};
    use actix_web::{App, HttpMessage, HttpResponse, test, web};

    fn signed_in(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: "gate".into(),
            email: "gate@campus.local".into(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            first_name: "Gate".into(),
            last_name: "Keeper".into(),
            phone: None,
            address: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 以给定身份访问受财务角色保护的路由
    async fn finance_status(role: Option<UserRole>) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::scope("/finance")
                    .wrap(RequireRole::new_any(UserRole::finance_roles()))
                    .wrap_fn(move |req, srv| {
                        if let Some(role) = role {
                            req.extensions_mut().insert(signed_in(role));
                        }
                        srv.call(req)
                    })
                    .route("/summary", web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/finance/summary").to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_gate_admits_finance_roles() {
        assert_eq!(finance_status(Some(UserRole::Accountant)).await, StatusCode::OK);
        assert_eq!(finance_status(Some(UserRole::Admin)).await, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_gate_rejects_other_roles() {
        assert_eq!(finance_status(Some(UserRole::Student)).await, StatusCode::FORBIDDEN);
        assert_eq!(finance_status(Some(UserRole::Teacher)).await, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_gate_requires_signed_in_user() {
        assert_eq!(finance_status(None).await, StatusCode::UNAUTHORIZED);
    }

    #[core::prelude::v1::test]
    fn test_role_groups() {
        let finance = RequireRole::new_any(UserRole::finance_roles());
        assert!(RequireRole::permits(
            &finance.required_roles,
            Some(UserRole::Accountant)
        ));
        assert!(RequireRole::permits(
            &finance.required_roles,
            Some(UserRole::Admin)
        ));
        assert!(!RequireRole::permits(
            &finance.required_roles,
            Some(UserRole::Teacher)
        ));
        assert!(!RequireRole::permits(&finance.required_roles, None));

        let student = RequireRole::new(&UserRole::Student);
        assert!(RequireRole::permits(
            &student.required_roles,
            Some(UserRole::Student)
        ));
    }
}
