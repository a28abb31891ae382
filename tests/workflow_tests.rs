//! Tests de flujo contra PostgreSQL
//!
//! Cada test recibe una base limpia con las migraciones aplicadas y
//! ejercita el flujo completo por HTTP: registro, transición de rol,
//! gate de perfil y autorización sobre camiones.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use repair_shop_backend::config::environment::EnvironmentConfig;
use repair_shop_backend::routes::create_router;
use repair_shop_backend::state::AppState;

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 3000,
        host: "127.0.0.1".to_string(),
        jwt_secret: "secreto-de-prueba".to_string(),
        jwt_expiration: 3600,
        cors_origins: vec![],
        rate_limit_requests: 5,
        rate_limit_window: 86400,
    }
}

fn app(pool: PgPool) -> Router {
    create_router(AppState::new(pool, test_config()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registrar un usuario y devolver (id, token)
async fn register(
    app: &Router,
    name: &str,
    email: &str,
    phone: &str,
    role: Option<&str>,
    company_name: Option<&str>,
) -> (Uuid, String) {
    let mut body = json!({
        "name": name,
        "email": email,
        "phone": phone,
        "password": "Passw0rd!",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    if let Some(company_name) = company_name {
        body["companyName"] = json!(company_name);
    }

    let (status, body) = send(app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (id, token)
}

fn driver_info(phone: &str) -> Value {
    json!({ "name": "Ahmed", "phoneNumber": phone })
}

fn license_details() -> Value {
    json!([{
        "companyFullName": "Gate Repairs LLC",
        "companyLicenseNumber": "LIC-1234",
        "licenseType": "commercial",
        "issuingAuthority": "DED",
        "TRN": "100000000000003",
        "creationDate": "2020-01-01T00:00:00Z",
        "expiryDate": "2030-01-01T00:00:00Z"
    }])
}

fn owner_details() -> Value {
    json!([{
        "ownerFullName": "Huda",
        "ownerIdNumber": "784-5678",
        "ownerPhone": "+971504444444",
        "ownerEmail": "huda@gate.ae"
    }])
}

fn bank_details() -> Value {
    json!([{
        "bankName": "Emirates NBD",
        "accountName": "Gate Repairs LLC",
        "currencyType": "AED",
        "iban": "AE070331234567890123456",
        "swiftCode": "EBILAEAD"
    }])
}

#[sqlx::test(migrations = "./migrations")]
async fn transicion_a_company_crea_empresa_inicial(pool: PgPool) {
    let app = app(pool.clone());
    let (_, token) = register(&app, "Omar", "omar@taller.ae", "+971501111111", None, None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/role-transition",
        Some(&token),
        Some(json!({ "role": "company", "companyName": "Acme Repairs" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["user"]["role"], "company");
    assert_eq!(body["company"]["profile_status"], "initial");
    assert_eq!(body["needsProfileCompletion"], true);

    let companies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(companies, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn segunda_transicion_a_company_no_persiste_otra_empresa(pool: PgPool) {
    let app = app(pool.clone());
    let (user_id, token) =
        register(&app, "Omar", "omar@taller.ae", "+971501111111", None, None).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/role-transition",
        Some(&token),
        Some(json!({ "role": "company", "companyName": "Alfa Taller" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // El segundo intento se rechaza y la empresa nueva no sobrevive
    let (status, _) = send(
        &app,
        "POST",
        "/api/role-transition",
        Some(&token),
        Some(json!({ "role": "company", "companyName": "Beta Taller" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let companies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(companies, 1);

    let betas: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE company_name = 'Beta Taller'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(betas, 0);

    let role: String = sqlx::query_scalar("SELECT role::text FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "company");
}

#[sqlx::test(migrations = "./migrations")]
async fn transicion_truck_owner_sin_datos_no_crea_camion(pool: PgPool) {
    let app = app(pool.clone());
    let (user_id, token) =
        register(&app, "Omar", "omar@taller.ae", "+971501111111", None, None).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/role-transition",
        Some(&token),
        Some(json!({ "role": "truck_owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let trucks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trucks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(trucks, 0);

    let role: String = sqlx::query_scalar("SELECT role::text FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "general");
}

#[sqlx::test(migrations = "./migrations")]
async fn transicion_truck_owner_crea_y_asocia_camion(pool: PgPool) {
    let app = app(pool.clone());
    let (user_id, token) =
        register(&app, "Omar", "omar@taller.ae", "+971501111111", None, None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/role-transition",
        Some(&token),
        Some(json!({ "role": "truck_owner", "licensePlate": "TRK-100", "brand": "Volvo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let owner: Uuid =
        sqlx::query_scalar("SELECT owner FROM trucks WHERE license_plate = 'TRK-100'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(owner, user_id);

    let (role, trucks): (String, i32) = sqlx::query_as(
        "SELECT role::text, cardinality(associated_trucks) FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(role, "truck_owner");
    assert_eq!(trucks, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn company_driver_con_empresa_inexistente_es_recuperable(pool: PgPool) {
    let app = app(pool.clone());
    let (user_id, token) =
        register(&app, "Omar", "omar@taller.ae", "+971501111111", None, None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/role-transition",
        Some(&token),
        Some(json!({
            "role": "company_driver",
            "companyId": Uuid::new_v4(),
            "driverInfo": driver_info("+971500000000"),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["canRegisterAsUnregistered"], true);

    let drivers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drivers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(drivers, 0);

    let role: String = sqlx::query_scalar("SELECT role::text FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "general");
}

#[sqlx::test(migrations = "./migrations")]
async fn repetir_unregistered_driver_crea_un_segundo_conductor(pool: PgPool) {
    let app = app(pool.clone());
    let (user_id, token) =
        register(&app, "Omar", "omar@taller.ae", "+971501111111", None, None).await;

    let payload = json!({
        "role": "unregistered_driver",
        "driverInfo": driver_info("+971500000002"),
        "companyDetails": { "companyName": "Desert Logistics", "contactPerson": "Sara" },
    });

    // La operación no es idempotente: cada envío crea un registro
    for _ in 0..2 {
        let (status, body) = send(
            &app,
            "POST",
            "/api/role-transition",
            Some(&token),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    let drivers: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM drivers WHERE user_id = $1 AND NOT is_registered_company_driver",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(drivers, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn el_gate_de_perfil_exige_los_campos_que_faltan(pool: PgPool) {
    let app = app(pool.clone());
    let (user_id, token) = register(
        &app,
        "Huda",
        "huda@gate.ae",
        "+971502222222",
        Some("company"),
        Some("Gate Repairs"),
    )
    .await;

    let company_id: Uuid = sqlx::query_scalar("SELECT company_id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();

    let gated_uri = format!("/api/companies/{}/add-associations", company_id);
    let completion = format!("/api/companies/{}/complete-profile", company_id);

    // Perfil inicial: el gate lista los tres bloques pendientes
    let (status, body) = send(&app, "PUT", &gated_uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let required = body["requiredFields"].as_array().unwrap();
    assert!(required.contains(&json!("licenseDetails")));
    assert!(required.contains(&json!("ownerDetails")));
    assert!(required.contains(&json!("bankDetails")));
    assert_eq!(body["completionEndpoint"], json!(completion));

    // Licencia + propietario sin banco: el perfil queda en basic
    let (status, body) = send(
        &app,
        "PUT",
        &completion,
        Some(&token),
        Some(json!({
            "licenseDetails": license_details(),
            "ownerDetails": owner_details(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["company"]["profile_status"], "basic");

    // En basic el gate sigue cerrado y solo reclama el banco
    let (status, body) = send(&app, "PUT", &gated_uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["requiredFields"], json!(["bankDetails"]));
    assert_eq!(body["completionEndpoint"], json!(completion));

    // Con el banco el perfil se completa y el gate se abre
    let (status, body) = send(
        &app,
        "PUT",
        &completion,
        Some(&token),
        Some(json!({
            "licenseDetails": license_details(),
            "ownerDetails": owner_details(),
            "bankDetails": bank_details(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["company"]["profile_status"], "complete");

    let (status, body) = send(
        &app,
        "POST",
        "/api/drivers",
        Some(&token),
        Some(json!({
            "driverName": "Ali",
            "driverPhone": "+971503333333",
            "driverIdNumber": "784-1111",
            "associatedCompany": company_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let driver_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &gated_uri,
        Some(&token),
        Some(json!({ "drivers": [driver_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["data"]["drivers"]
        .as_array()
        .unwrap()
        .contains(&json!(driver_id)));
}

#[sqlx::test(migrations = "./migrations")]
async fn registro_company_con_email_de_empresa_ocupado_no_deja_usuario(pool: PgPool) {
    sqlx::query("INSERT INTO companies (company_name, contact_email) VALUES ($1, $2)")
        .bind("Taller Ocupado")
        .bind("dup@taller.ae")
        .execute(&pool)
        .await
        .unwrap();

    let app = app(pool.clone());
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Omar",
            "email": "dup@taller.ae",
            "phone": "+971501111111",
            "password": "Passw0rd!",
            "role": "company",
            "companyName": "Taller Nuevo",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // La empresa falló dentro de la transacción: el usuario tampoco existe
    let users: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = 'dup@taller.ae'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(users, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn un_admin_que_no_es_dueno_no_puede_borrar_un_camion(pool: PgPool) {
    let app = app(pool.clone());
    let (_, admin_token) = register(
        &app,
        "Root",
        "admin@taller.ae",
        "+971505555555",
        Some("admin"),
        None,
    )
    .await;
    let (owner_id, owner_token) = register(
        &app,
        "Omar",
        "omar@taller.ae",
        "+971501111111",
        Some("company"),
        Some("Taller Omar"),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/trucks",
        Some(&owner_token),
        Some(json!({ "licensePlate": "TRK-200", "brand": "Scania" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let truck_id = Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/trucks/{}", truck_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let trucks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trucks WHERE id = $1")
        .bind(truck_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(trucks, 1);

    // El dueño sí puede borrarlo
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/trucks/{}", truck_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let owner_trucks: i32 =
        sqlx::query_scalar("SELECT cardinality(associated_trucks) FROM users WHERE id = $1")
            .bind(owner_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(owner_trucks, 0);
}
