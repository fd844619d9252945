use car_agency::schema::{customers, payments};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};

use crate::helpers::{create_customer_and_login, create_staff_and_login, login, seed_car, signup_customer, TestApp};

#[actix_web::test]
pub async fn dashboard_is_admin_only(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .get(format!("{}/admin/dashboard", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    create_customer_and_login(&app).await;
    let response = app.api_client
        .get(format!("{}/admin/dashboard", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
pub async fn maintenance_staff_can_manage_users_but_not_the_dashboard(){
    let app = TestApp::spawn_app().await;
    create_staff_and_login(&app, "maintenance").await;

    let response = app.api_client
        .get(format!("{}/admin/users", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.api_client
        .get(format!("{}/admin/dashboard", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
pub async fn dashboard_reflects_bookings(){
    let app = TestApp::spawn_app().await;
    let car_id = seed_car(&app, "Corolla", "Toyota", 25000, 3000);

    create_customer_and_login(&app).await;
    let response = app.api_client
        .post(format!("{}/bookings", app.get_app_url()))
        .json(&serde_json::json!({
            "car_id": car_id,
            "start_date": "2030-06-01",
            "end_date": "2030-06-10",
            "transaction_type": "Rent",
            "payment_method": "Credit Card",
            "amount": 900
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let admin = create_staff_and_login(&app, "admin").await;
    login(&app, &admin.email, &admin.password).await;

    let response = app.api_client
        .get(format!("{}/admin/dashboard", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    let stats = &body["stats"];
    assert_eq!(stats["total_cars"].as_i64().unwrap(), 1);
    assert_eq!(stats["total_users"].as_i64().unwrap(), 2);
    assert_eq!(stats["active_rentals"].as_i64().unwrap(), 1);
    assert_eq!(stats["total_sales"].as_i64().unwrap(), 0);

    let total_revenue: f64 = stats["total_revenue"].as_str().unwrap().parse().unwrap();
    assert_eq!(total_revenue, 900.0);
    let monthly_revenue: f64 = stats["monthly_revenue"].as_str().unwrap().parse().unwrap();
    assert_eq!(monthly_revenue, 900.0);

    assert_eq!(body["revenue_by_month"].as_array().unwrap().len(), 1);
    assert_eq!(body["top_cars"][0]["car_name"].as_str().unwrap(), "Corolla");

    // Post-commit audit rows feed the recents panels
    assert_eq!(body["recent_transactions"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["recent_activities"][0]["action"].as_str().unwrap(),
        "Rental Started"
    );
}

#[actix_web::test]
pub async fn staff_can_list_and_update_customers(){
    let app = TestApp::spawn_app().await;
    let customer = signup_customer(&app).await;
    create_staff_and_login(&app, "admin").await;

    let response = app.api_client
        .get(format!("{}/admin/users", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().any(|entry| entry["email"].as_str().unwrap() == customer.email));

    let response = app.api_client
        .put(format!("{}/admin/users/{}", app.get_app_url(), customer.customer_id))
        .form(&serde_json::json!({
            "first_name": "Corrected",
            "last_name": "Name",
            "address": "New Address",
            "phone_number": "+201002223344"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let mut conn = app.pool.get().unwrap();
    let first_name = customers::table
        .find(customer.customer_id)
        .select(customers::first_name)
        .get_result::<String>(&mut conn)
        .unwrap();
    assert_eq!(first_name, "Corrected");

    let response = app.api_client
        .put(format!("{}/admin/users/99999", app.get_app_url()))
        .form(&serde_json::json!({
            "first_name": "Ghost",
            "last_name": "User",
            "phone_number": "+201002223344"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
pub async fn deleting_a_customer_removes_their_rows(){
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
            "payment_method": "Credit Card",
            "amount": 900
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    create_staff_and_login(&app, "admin").await;

    let response = app.api_client
        .delete(format!("{}/admin/users/{}", app.get_app_url(), customer.customer_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let mut conn = app.pool.get().unwrap();
    let remaining = customers::table
        .filter(customers::email.eq(customer.email))
        .count()
        .get_result::<i64>(&mut conn)
        .unwrap();
    assert_eq!(remaining, 0);

    let remaining_payments = payments::table.count().get_result::<i64>(&mut conn).unwrap();
    assert_eq!(remaining_payments, 0);
}
