use crate::helpers::{create_staff_and_login, login, signup_customer, TestApp};

#[actix_web::test]
pub async fn login_returns_customer_id_and_role(){
    let app = TestApp::spawn_app().await;

    let customer = signup_customer(&app).await;
    let body = login(&app, &customer.email, &customer.password).await;

    assert_eq!(body["customer_id"].as_i64().unwrap() as i32, customer.customer_id);
    assert_eq!(body["role"].as_str().unwrap(), "user");
}

#[actix_web::test]
pub async fn login_with_wrong_password_is_unauthorized(){
    let app = TestApp::spawn_app().await;

    let customer = signup_customer(&app).await;

    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&serde_json::json!({
            "email": customer.email,
            "password": "wrong-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
pub async fn login_with_unknown_email_is_unauthorized(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&serde_json::json!({
            "email": "nobody@example.com",
            "password": "whatever"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
pub async fn promoted_account_logs_in_with_its_role(){
    let app = TestApp::spawn_app().await;

    let admin = create_staff_and_login(&app, "admin").await;
    let body = login(&app, &admin.email, &admin.password).await;

    assert_eq!(body["role"].as_str().unwrap(), "admin");
}

#[actix_web::test]
pub async fn logout_ends_the_session(){
    let app = TestApp::spawn_app().await;

    let customer = signup_customer(&app).await;
    login(&app, &customer.email, &customer.password).await;

    let response = app.api_client
        .post(format!("{}/logout", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.api_client
        .get(format!("{}/profile", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}
