use car_agency::schema::customer_phone_numbers;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};

use crate::helpers::{create_customer_and_login, seed_car, TestApp};

#[actix_web::test]
pub async fn profile_requires_login(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .get(format!("{}/profile", app.get_app_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
pub async fn profile_shows_account_details_and_transactions(){
    let app = TestApp::spawn_app().await;
    let car_id = seed_car(&app, "Corolla", "Toyota", 25000, 3000);
    let customer = create_customer_and_login(&app).await;

    let response = app.api_client
        .post(format!("{}/bookings", app.get_app_url()))
        .json(&serde_json::json!({
            "car_id": car_id,
            "start_date": "2030-06-01",
            "end_date": "2030-06-10",
            "transaction_type": "Rent",
            "payment_method": "Cash",
            "amount": 900
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.api_client
        .get(format!("{}/profile", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["profile"]["email"].as_str().unwrap(), customer.email);
    assert_eq!(
        body["profile"]["phone_numbers"][0].as_str().unwrap(),
        customer.phone_number
    );

    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["car_name"].as_str().unwrap(), "Corolla");
    assert_eq!(transactions[0]["transaction_type"].as_str().unwrap(), "Rent");
    assert_eq!(transactions[0]["method"].as_str().unwrap(), "Cash");
}

#[actix_web::test]
pub async fn customer_can_update_their_own_details(){
    let app = TestApp::spawn_app().await;
    let customer = create_customer_and_login(&app).await;

    let response = app.api_client
        .post(format!("{}/profile", app.get_app_url()))
        .form(&serde_json::json!({
            "first_name": "Renamed",
            "last_name": "Person",
            "address": "99 New Street",
            "phone_number": "+201009998877"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.api_client
        .get(format!("{}/profile", app.get_app_url()))
        .send()
        .await
        .unwrap();
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["profile"]["first_name"].as_str().unwrap(), "Renamed");
    assert_eq!(body["profile"]["address"].as_str().unwrap(), "99 New Street");

    // The old phone number is gone, not shadowed
    let mut conn = app.pool.get().unwrap();
    let phones = customer_phone_numbers::table
        .filter(customer_phone_numbers::customer_id.eq(customer.customer_id))
        .select(customer_phone_numbers::phone_number)
        .load::<String>(&mut conn)
        .unwrap();
    assert_eq!(phones, vec!["+201009998877".to_string()]);
}

#[actix_web::test]
pub async fn invalid_phone_number_is_rejected_on_update(){
    let app = TestApp::spawn_app().await;
    create_customer_and_login(&app).await;

    let response = app.api_client
        .post(format!("{}/profile", app.get_app_url()))
        .form(&serde_json::json!({
            "first_name": "Renamed",
            "last_name": "Person",
            "phone_number": "nope"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
