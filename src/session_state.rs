use actix_session::{Session, SessionExt, SessionGetError, SessionInsertError};
use actix_web::{dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, error::ErrorForbidden, FromRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Instrument;

use crate::models::CustomerRole;

pub struct TypedSession(pub Session);

impl TypedSession {
    const CUSTOMER_ID_KEY: &'static str = "customer_id";
    const ROLE_KEY: &'static str = "role";

    pub fn get_customer_id(&self) -> Result<Option<i32>, SessionGetError>{
        self.0.get(Self::CUSTOMER_ID_KEY)
    }

    pub fn insert_customer_id(&self, customer_id: i32) -> Result<(), SessionInsertError>{
        self.0.insert(Self::CUSTOMER_ID_KEY, customer_id)
    }

    pub fn get_role(&self) -> Result<Option<CustomerRole>, SessionGetError>{
        self.0.get(Self::ROLE_KEY)
    }

    pub fn insert_role(&self, role: CustomerRole) -> Result<(), SessionInsertError>{
        self.0.insert(Self::ROLE_KEY, role)
    }

    pub fn renew(&self){
        self.0.renew();
    }

    pub fn purge(&self){
        self.0.purge();
    }
}

impl FromRequest for TypedSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let session = req.get_session();
        ready(Ok(TypedSession(session)))
    }
}

pub struct SessionMiddlewareFactory;

impl<S> Transform<S, ServiceRequest> for SessionMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RouteSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteSessionMiddleware{service}))
    }
}

pub struct RouteSessionMiddleware<S>{
    service: S
}

impl<S> Service<ServiceRequest> for RouteSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static
{
        type Error = actix_web::Error;
        type Response = S::Response;
        type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

        forward_ready!(service);

        #[tracing::instrument(
            "Checking if a customer is logged in to access service",
            skip(self, req)
        )]
        fn call(&self, req: ServiceRequest) -> Self::Future {
            let session = TypedSession(req.get_session());
            let customer_id = session.get_customer_id().ok().flatten();

            let current_span = tracing::Span::current();

            if customer_id.is_none(){
                return Box::pin(ready(
                    Err(ErrorForbidden("Not logged in"))
                ).instrument(current_span))
            }

            let fut = self.service.call(req);

            Box::pin(async move {
                let res = fut.await?;
                Ok(res)
            }
            .instrument(current_span))
        }
}
