use car_agency::schema::{customer_phone_numbers, customers};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};

use crate::helpers::{signup_customer, TestApp};

#[actix_web::test]
pub async fn signup_persists_customer_and_phone_number(){
    let app = TestApp::spawn_app().await;

    let customer = signup_customer(&app).await;

    let mut conn = app.pool.get().unwrap();
    let (stored_email, stored_hash, stored_role) = customers::table
        .find(customer.customer_id)
        .select((customers::email, customers::password_hash, customers::role))
        .get_result::<(String, String, String)>(&mut conn)
        .unwrap();

    assert_eq!(stored_email, customer.email);
    assert_eq!(stored_role, "user");
    // The password never lands in the database as plaintext
    assert_ne!(stored_hash, customer.password);
    assert!(stored_hash.starts_with("$argon2"));

    let phones = customer_phone_numbers::table
        .filter(customer_phone_numbers::customer_id.eq(customer.customer_id))
        .select(customer_phone_numbers::phone_number)
        .load::<String>(&mut conn)
        .unwrap();
    assert_eq!(phones, vec![customer.phone_number.clone()]);
}

#[actix_web::test]
pub async fn signup_with_taken_email_returns_conflict(){
    let app = TestApp::spawn_app().await;

    let customer = signup_customer(&app).await;

    let response = app.api_client
        .post(format!("{}/signup", app.get_app_url()))
        .form(&serde_json::json!({
            "first_name": "Other",
            "last_name": "Person",
            "email": customer.email,
            "phone_number": "+201007654321",
            "password": "another-password",
            "confirm_password": "another-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);

    let mut conn = app.pool.get().unwrap();
    let count = customers::table
        .filter(customers::email.eq(customer.email))
        .count()
        .get_result::<i64>(&mut conn)
        .unwrap();
    assert_eq!(count, 1);
}

#[actix_web::test]
pub async fn signup_with_mismatched_passwords_is_rejected(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .post(format!("{}/signup", app.get_app_url()))
        .form(&serde_json::json!({
            "first_name": "Test",
            "last_name": "Customer",
            "email": "mismatch@example.com",
            "phone_number": "+201001234567",
            "password": "one-password",
            "confirm_password": "a-different-password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
pub async fn signup_with_invalid_email_or_phone_is_rejected(){
    let app = TestApp::spawn_app().await;

    for (email, phone) in [
        ("definitely-not-an-email", "+201001234567"),
        ("valid@example.com", "not-a-phone-number")
    ]{
        let response = app.api_client
            .post(format!("{}/signup", app.get_app_url()))
            .form(&serde_json::json!({
                "first_name": "Test",
                "last_name": "Customer",
                "email": email,
                "phone_number": phone,
                "password": "some-password",
                "confirm_password": "some-password"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
    }

    let mut conn = app.pool.get().unwrap();
    let count = customers::table
        .count()
        .get_result::<i64>(&mut conn)
        .unwrap();
    assert_eq!(count, 0);
}
