use car_agency::schema::complaints;
use diesel::{QueryDsl, RunQueryDsl};

use crate::helpers::{create_customer_and_login, TestApp};

#[actix_web::test]
pub async fn anonymous_visitor_can_leave_a_message(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .post(format!("{}/contact", app.get_app_url()))
        .form(&serde_json::json!({
            "message": "The site is down every Friday"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let complaint_id = response.json::<serde_json::Value>().await.unwrap()["complaint_id"]
        .as_i64()
        .unwrap() as i32;

    let mut conn = app.pool.get().unwrap();
    let (customer_id, description) = complaints::table
        .find(complaint_id)
        .select((complaints::customer_id, complaints::description))
        .get_result::<(Option<i32>, String)>(&mut conn)
        .unwrap();

    assert_eq!(customer_id, None);
    assert_eq!(description, "The site is down every Friday");
}

#[actix_web::test]
pub async fn logged_in_message_is_attached_to_the_account(){
    let app = TestApp::spawn_app().await;
    let customer = create_customer_and_login(&app).await;

    let response = app.api_client
        .post(format!("{}/contact", app.get_app_url()))
        .form(&serde_json::json!({
            "message": "My rental started late"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let complaint_id = response.json::<serde_json::Value>().await.unwrap()["complaint_id"]
        .as_i64()
        .unwrap() as i32;

    let mut conn = app.pool.get().unwrap();
    let stored_customer = complaints::table
        .find(complaint_id)
        .select(complaints::customer_id)
        .get_result::<Option<i32>>(&mut conn)
        .unwrap();

    assert_eq!(stored_customer, Some(customer.customer_id));
}

#[actix_web::test]
pub async fn empty_message_is_rejected(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .post(format!("{}/contact", app.get_app_url()))
        .form(&serde_json::json!({
            "message": "   "
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    let mut conn = app.pool.get().unwrap();
    let count = complaints::table.count().get_result::<i64>(&mut conn).unwrap();
    assert_eq!(count, 0);
}
