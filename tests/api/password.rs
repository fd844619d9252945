use crate::helpers::{login, signup_customer, TestApp};

#[actix_web::test]
pub async fn forgot_password_resets_with_matching_phone_digits(){
    let app = TestApp::spawn_app().await;
    let customer = signup_customer(&app).await;

    let response = app.api_client
        .post(format!("{}/forgot-password", app.get_app_url()))
        .form(&serde_json::json!({
            "email": customer.email,
            "phone_last4": "4567",
            "new_password": "a-fresh-password",
            "confirm_password": "a-fresh-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Old credentials are dead
    let response = app.api_client
        .post(format!("{}/login", app.get_app_url()))
        .form(&serde_json::json!({
            "email": customer.email,
            "password": customer.password
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    login(&app, &customer.email, "a-fresh-password").await;
}

#[actix_web::test]
pub async fn wrong_phone_digits_leave_the_password_untouched(){
    let app = TestApp::spawn_app().await;
    let customer = signup_customer(&app).await;

    let response = app.api_client
        .post(format!("{}/forgot-password", app.get_app_url()))
        .form(&serde_json::json!({
            "email": customer.email,
            "phone_last4": "0000",
            "new_password": "a-fresh-password",
            "confirm_password": "a-fresh-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    login(&app, &customer.email, &customer.password).await;
}

#[actix_web::test]
pub async fn unknown_email_gets_the_same_rejection(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .post(format!("{}/forgot-password", app.get_app_url()))
        .form(&serde_json::json!({
            "email": "nobody@example.com",
            "phone_last4": "4567",
            "new_password": "a-fresh-password",
            "confirm_password": "a-fresh-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Could not verify identity");
}

#[actix_web::test]
pub async fn mismatched_confirmation_is_rejected(){
    let app = TestApp::spawn_app().await;
    let customer = signup_customer(&app).await;

    let response = app.api_client
        .post(format!("{}/forgot-password", app.get_app_url()))
        .form(&serde_json::json!({
            "email": customer.email,
            "phone_last4": "4567",
            "new_password": "a-fresh-password",
            "confirm_password": "something-else"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    login(&app, &customer.email, &customer.password).await;
}
