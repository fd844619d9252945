use actix_session::SessionExt;
use actix_web::{dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, error::ErrorForbidden};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Instrument;

use crate::models::CustomerRole;
use crate::session_state::TypedSession;

// Gate for admin-only routes
pub struct AdminMiddlewareFactory;

impl<S> Transform<S, ServiceRequest> for AdminMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static
{
    type Response = ServiceResponse;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AdminMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminMiddleware{service}))
    }
}

pub struct AdminMiddleware<S>{
    service: S
}

impl<S> Service<ServiceRequest> for AdminMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future : 'static
{
    type Response = S::Response;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    #[tracing::instrument(
        "Checking if customer has the admin role",
        skip(self, req)
    )]
    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = TypedSession(req.get_session());
        let role = session.get_role().ok().flatten();

        let current_span = tracing::Span::current();

        if role != Some(CustomerRole::Admin){
            return Box::pin(
                ready(Err(ErrorForbidden("Not authorized")))
                    .instrument(current_span)
            )
        }

        let fut = self.service.call(req);

        Box::pin(
            async move {
                let res = fut.await?;
                Ok(res)
            }
            .instrument(current_span)
        )
    }
}

// Gate for routes open to admin and maintenance staff
pub struct StaffMiddlewareFactory;

impl<S> Transform<S, ServiceRequest> for StaffMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static
{
    type Response = ServiceResponse;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = StaffMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StaffMiddleware{service}))
    }
}

pub struct StaffMiddleware<S>{
    service: S
}

impl<S> Service<ServiceRequest> for StaffMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future : 'static
{
    type Response = S::Response;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    #[tracing::instrument(
        "Checking if customer has a staff role",
        skip(self, req)
    )]
    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = TypedSession(req.get_session());
        let role = session.get_role().ok().flatten();

        let current_span = tracing::Span::current();

        if !role.map(|r| r.is_staff()).unwrap_or(false){
            return Box::pin(
                ready(Err(ErrorForbidden("Not authorized")))
                    .instrument(current_span)
            )
        }

        let fut = self.service.call(req);

        Box::pin(
            async move {
                let res = fut.await?;
                Ok(res)
            }
            .instrument(current_span)
        )
    }
}
