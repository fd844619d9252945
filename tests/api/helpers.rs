use std::{error::Error, net::TcpListener};

use bigdecimal::BigDecimal;
use car_agency::{
    configuration::{DatabaseSettings, Settings},
    models::NewCar,
    schema::{cars, customers},
    startup::{get_connection_pool, run},
    telemetry::{get_subscriber, init_subscriber},
    utils::DbPool,
};
use diesel::{pg::Pg, Connection, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use once_cell::sync::Lazy;
use reqwest::redirect::Policy;
use uuid::Uuid;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "car-agency-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub api_client: reqwest::Client
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&settings.get_database_url())
            .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = get_connection_pool(settings);

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let mut settings = Settings::get();
        settings.database.name = Uuid::new_v4().to_string();

        let pool = TestApp::create_db(&settings.database);
        let host = settings.application.host.clone();

        let listener = TcpListener::bind(format!("{}:0", host))
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();

        let server = run(listener, pool.clone(), settings.session.hmac_secret)
            .expect("Failed to build test server");
        tokio::task::spawn(server);

        let api_client = reqwest::Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .build()
            .unwrap();

        TestApp{
            host,
            port,
            pool,
            api_client
        }
    }
}

pub struct TestCustomer{
    pub customer_id: i32,
    pub email: String,
    pub password: String,
    pub phone_number: String
}

pub async fn signup_customer(app: &TestApp) -> TestCustomer{
    let email = format!("{}@example.com", Uuid::new_v4());
    let password = "correct-horse-battery".to_string();
    let phone_number = "+201001234567".to_string();

    let response = app.api_client
        .post(format!("{}/signup", app.get_app_url()))
        .form(&serde_json::json!({
            "first_name": "Test",
            "last_name": "Customer",
            "email": email,
            "phone_number": phone_number,
            "address": "12 Tahrir Square, Cairo",
            "password": password,
            "confirm_password": password
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<serde_json::Value>().await.unwrap();
    let customer_id = body["customer_id"].as_i64().unwrap() as i32;

    TestCustomer{customer_id, email, password, phone_number}
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> serde_json::Value{
    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    response.json::<serde_json::Value>().await.unwrap()
}

pub async fn create_customer_and_login(app: &TestApp) -> TestCustomer{
    let customer = signup_customer(app).await;
    login(app, &customer.email, &customer.password).await;
    customer
}

pub fn set_role(app: &TestApp, customer_id: i32, role: &str){
    let mut conn = app.pool.get().unwrap();
    diesel::update(customers::table.find(customer_id))
        .set(customers::role.eq(role))
        .execute(&mut conn)
        .unwrap();
}

pub async fn create_staff_and_login(app: &TestApp, role: &str) -> TestCustomer{
    let customer = signup_customer(app).await;
    set_role(app, customer.customer_id, role);
    login(app, &customer.email, &customer.password).await;
    customer
}

pub fn seed_car(app: &TestApp, name: &str, brand: &str, price: i64, installment: i64) -> i32{
    let mut conn = app.pool.get().unwrap();

    diesel::insert_into(cars::table)
        .values(NewCar{
            car_name: name.to_string(),
            brand: brand.to_string(),
            year: 2023,
            price: BigDecimal::from(price),
            color: Some("Black".to_string()),
            transmission: Some("Automatic".to_string()),
            fuel_type: Some("Petrol".to_string()),
            engine: Some("2.0L".to_string()),
            seats: Some(5),
            mileage: Some(15000),
            main_image: Some(format!("{}.png", name)),
            min_deposit: BigDecimal::from(price / 10),
            monthly_installment: BigDecimal::from(installment),
            description: None
        })
        .returning(cars::car_id)
        .get_result::<i32>(&mut conn)
        .unwrap()
}
