//! Controller de autenticación
//!
//! Registro, login y reset de contraseña por código de un solo uso.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use rand::Rng;

use crate::dto::auth_dto::{
    AuthResponse, LoginRequest, RegisterRequest, RequestResetCodeRequest, ResetPasswordRequest,
};
use crate::dto::ApiResponse;
use crate::models::company::Company;
use crate::models::user::{User, UserRole};
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::generate_token;
use crate::utils::validation;

/// Minutos de validez del código de reset
const RESET_CODE_TTL_MINUTES: i64 = 5;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, ResponseJson<AuthResponse>)> {
    let role = payload.role.unwrap_or(UserRole::General);

    // Validar todos los campos y devolver la lista completa de errores
    let mut errors = Vec::new();
    if validation::validate_email(&payload.email).is_err() {
        errors.push("A valid email is required.".to_string());
    }
    if validation::validate_password_strength(&payload.password).is_err() {
        errors.push(
            "Password must be at least 8 characters and include upper, lower, a digit and a special character."
                .to_string(),
        );
    }
    if role.requires_name() && payload.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        errors.push("Name is required for this role.".to_string());
    }
    match payload.phone.as_deref() {
        None if role.requires_phone() => {
            errors.push("Phone number is required for this role.".to_string())
        }
        Some(phone) if validation::validate_phone(phone).is_err() => {
            errors.push("Phone must be a valid international number.".to_string())
        }
        _ => {}
    }
    if role == UserRole::Company
        && payload
            .company_name
            .as_deref()
            .map_or(true, |n| n.trim().is_empty())
    {
        errors.push("Company name is required for the company role.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationList(errors));
    }

    // Duplicados de email/teléfono como lista de conflictos
    let repo = UserRepository::new(state.pool.clone());
    if let Some(existing) = repo
        .find_by_email_or_phone(Some(&payload.email), payload.phone.as_deref())
        .await?
    {
        let mut conflicts = Vec::new();
        if existing.email == payload.email {
            conflicts.push("email".to_string());
        }
        if existing.phone.is_some() && existing.phone == payload.phone {
            conflicts.push("phone".to_string());
        }
        return Err(AppError::Conflict(conflicts));
    }

    let password_hash =
        hash(&payload.password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

    // Usuario y empresa se crean en la misma transacción: si la empresa
    // falla (p. ej. contactEmail duplicado), el usuario tampoco se persiste
    let mut tx = state.pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, phone, password_hash, role, license_plate)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(payload.name.as_deref())
    .bind(&payload.email)
    .bind(payload.phone.as_deref())
    .bind(&password_hash)
    .bind(role)
    .bind(payload.license_plate.as_deref())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_unique_violation(e, "email"))?;

    let user = if role == UserRole::Company {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (company_name, contact_email)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(payload.company_name.as_deref().unwrap_or_default())
        .bind(&payload.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "contactEmail"))?;

        sqlx::query_as::<_, User>(
            "UPDATE users SET company_id = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .bind(company.id)
        .fetch_one(&mut *tx)
        .await?
    } else {
        user
    };

    tx.commit().await?;

    let token = generate_token(user.id, user.role, &user.email, &state.config)?;

    log::info!("👤 Usuario registrado: {} ({:?})", user.email, user.role);

    Ok((
        StatusCode::CREATED,
        ResponseJson(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
            message: Some("User registered successfully.".to_string()),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<ResponseJson<AuthResponse>> {
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    let valid = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Hash(e.to_string()))?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "User account is deactivated.".to_string(),
        ));
    }

    let token = generate_token(user.id, user.role, &user.email, &state.config)?;

    log::info!("🔑 Login: {}", user.email);

    Ok(ResponseJson(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
        message: None,
    }))
}

/// POST /api/auth/password-reset/request
pub async fn request_reset_code(
    State(state): State<AppState>,
    Json(payload): Json<RequestResetCodeRequest>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    if payload.email.is_none() && payload.phone.is_none() {
        return Err(AppError::BadRequest(
            "Email or phone number is required.".to_string(),
        ));
    }

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_email_or_phone(payload.email.as_deref(), payload.phone.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let reset_code: String = {
        let mut rng = rand::thread_rng();
        (0..6).map(|_| rng.gen_range(0..10).to_string()).collect()
    };
    let expires = chrono::Utc::now() + chrono::Duration::minutes(RESET_CODE_TTL_MINUTES);

    repo.set_reset_code(user.id, &reset_code, expires).await?;

    // El envío real (SMS/email) queda fuera; en desarrollo el código va al log
    if state.config.is_development() {
        log::info!("🔐 Código de reset para {}: {}", user.email, reset_code);
    }

    Ok(ResponseJson(ApiResponse::message_only(
        "Reset code sent. It expires in 5 minutes.".to_string(),
    )))
}

/// POST /api/auth/password-reset/verify
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<ResponseJson<ApiResponse<()>>> {
    if validation::validate_password_strength(&payload.new_password).is_err() {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters and include upper, lower, a digit and a special character."
                .to_string(),
        ));
    }

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_email_or_phone(payload.email.as_deref(), payload.phone.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let code_valid = user.reset_code.as_deref() == Some(payload.reset_code.as_str())
        && user
            .reset_code_expires
            .map_or(false, |expires| expires > chrono::Utc::now());
    if !code_valid {
        return Err(AppError::BadRequest(
            "Invalid or expired reset code.".to_string(),
        ));
    }

    let password_hash =
        hash(&payload.new_password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;
    repo.reset_password(user.id, &password_hash).await?;

    log::info!("🔐 Contraseña restablecida: {}", user.email);

    Ok(ResponseJson(ApiResponse::message_only(
        "Password has been reset successfully.".to_string(),
    )))
}
