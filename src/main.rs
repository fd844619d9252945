use car_agency::configuration::Settings;
use car_agency::startup::Application;
use car_agency::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("car-agency".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = Settings::get();
    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;

    Ok(())
}
