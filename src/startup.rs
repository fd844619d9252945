use std::net::TcpListener;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, dev::Server, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use secrecy::{ExposeSecret, SecretString};
use tracing_actix_web::TracingLogger;

use crate::configuration::{DatabaseSettings, Settings};
use crate::role_middleware::{AdminMiddlewareFactory, StaffMiddlewareFactory};
use crate::routes::{
    admin::{dashboard, delete_user, get_users, update_user},
    authentication::{forgot_password, login, logout, register},
    booking::{availability, booked_dates, post_booking, quote},
    cars::{car_details, delete_car_listing, get_cars, post_car, update_car_listing},
    contact::contact,
    health_check,
    home::home,
    profile::{get_profile, update_profile},
};
use crate::session_state::SessionMiddlewareFactory;
use crate::utils::DbPool;

pub struct Application{
    port: u16,
    server: Server
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        let pool = get_connection_pool(&settings.database);

        let address = format!(
            "{}:{}",
            settings.application.host,
            settings.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, pool, settings.session.hmac_secret)?;

        Ok(Application{port, server})
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

// Connections are established lazily so the binary can start before the
// database is reachable
pub fn get_connection_pool(settings: &DatabaseSettings) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(settings.get_database_table_url());
    Pool::builder().build_unchecked(manager)
}

pub fn run(
    listener: TcpListener,
    pool: DbPool,
    hmac_secret: SecretString
) -> Result<Server, anyhow::Error> {
    let pool = web::Data::new(pool);
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone()
            ))
            .route("/health", web::get().to(health_check))
            .route("/home", web::get().to(home))
            .route("/contact", web::post().to(contact))
            .route("/signup", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/forgot-password", web::post().to(forgot_password))
            .route("/cars", web::get().to(get_cars))
            .route("/cars/{car_id}", web::get().to(car_details))
            .route("/cars/{car_id}/availability", web::get().to(availability))
            .route("/cars/{car_id}/quote", web::get().to(quote))
            .route("/cars/{car_id}/booked-dates", web::get().to(booked_dates))
            .service(
                web::scope("/bookings")
                    .wrap(SessionMiddlewareFactory)
                    .route("", web::post().to(post_booking))
            )
            .service(
                web::scope("/profile")
                    .wrap(SessionMiddlewareFactory)
                    .route("", web::get().to(get_profile))
                    .route("", web::post().to(update_profile))
            )
            .service(
                web::scope("/admin")
                    .service(
                        web::scope("/dashboard")
                            .wrap(AdminMiddlewareFactory)
                            .route("", web::get().to(dashboard))
                    )
                    .service(
                        web::scope("/cars")
                            .wrap(AdminMiddlewareFactory)
                            .route("", web::post().to(post_car))
                            .route("/{car_id}", web::put().to(update_car_listing))
                            .route("/{car_id}", web::delete().to(delete_car_listing))
                    )
                    .service(
                        web::scope("/users")
                            .wrap(StaffMiddlewareFactory)
                            .route("", web::get().to(get_users))
                            .route("/{customer_id}", web::put().to(update_user))
                            .route("/{customer_id}", web::delete().to(delete_user))
                    )
            )
            .app_data(pool.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
