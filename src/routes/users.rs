use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthSettings, AuthenticatedUser,
        LoginRequest, TokenResponse,
    },
    error::{AppError, Issue},
    models::{PatchUser, RegisterUser, User, UserResponse},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

const USER_COLUMNS: &str = "id, nom, email, password, created_at";

/// Hashes the password and inserts the user, returning the stored row.
async fn insert_user(
    pool: &SqlitePool,
    settings: &AuthSettings,
    input: RegisterUser,
) -> Result<UserResponse, AppError> {
    input.validate()?;

    let password_hash = hash_password(&input.password, settings.bcrypt_cost).await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (nom, email, password, created_at) VALUES (?, ?, ?, ?) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&input.nom)
    .bind(&input.email)
    .bind(&password_hash)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::UnprocessableEntity("Registration failed".into()))?;

    log::info!("created user {}", user.id);
    Ok(user.into())
}

/// Register a new user
///
/// Stores the user with a hashed password and returns it without the password.
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body(content = RegisterUser, description = "User registration data"),
    responses(
        (status = 200, description = "The registered user", body = UserResponse),
        (status = 422, description = "The validation error(s)", body = ErrorBody),
    )
)]
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    register_data: web::Json<RegisterUser>,
) -> Result<impl Responder, AppError> {
    let user = insert_user(&pool, &settings, register_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Login user
///
/// Checks the credentials and returns a signed bearer token. An unknown email
/// and a wrong password yield the same response.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body(content = LoginRequest, description = "User login data"),
    responses(
        (status = 200, description = "JWT token on successful login", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 422, description = "The validation error(s)", body = ErrorBody),
    )
)]
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => {
            log::warn!("login attempt for unknown email");
            // Spend the same bcrypt work as a real check so response time
            // does not reveal which emails are registered.
            hash_password(&login_data.password, settings.bcrypt_cost).await?;
            return Err(AppError::invalid_credentials());
        }
    };
    if !verify_password(&login_data.password, &user.password).await? {
        log::warn!("login attempt with wrong password for user {}", user.id);
        return Err(AppError::invalid_credentials());
    }

    let token = generate_token(
        user.id,
        &user.email,
        &settings.jwt_secret,
        settings.token_ttl_hours,
    )?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Current user
///
/// Returns the user identified by the bearer token.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    )
)]
#[get("/me")]
pub async fn me(
    pool: web::Data<SqlitePool>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = find_user(&pool, caller.id()).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn find_user(pool: &SqlitePool, id: i64) -> Result<UserResponse, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(UserResponse::from)
        .ok_or_else(AppError::not_found)
}

/// Get one user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The requested user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 422, description = "Invalid id error", body = ErrorBody),
    )
)]
#[get("/{id}")]
pub async fn get_one(
    pool: web::Data<SqlitePool>,
    user_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let user = find_user(&pool, user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses((status = 200, description = "The list of users", body = [UserResponse]))
)]
#[get("")]
pub async fn list(pool: web::Data<SqlitePool>) -> Result<impl Responder, AppError> {
    let users: Vec<UserResponse> = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY id",
        USER_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?
    .into_iter()
    .map(UserResponse::from)
    .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body(content = RegisterUser, description = "The user to create"),
    responses(
        (status = 200, description = "The created user", body = UserResponse),
        (status = 422, description = "The validation error(s)", body = ErrorBody),
    )
)]
#[post("")]
pub async fn create(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    user_data: web::Json<RegisterUser>,
) -> Result<impl Responder, AppError> {
    let user = insert_user(&pool, &settings, user_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update a user
///
/// Applies a partial update. A new password is hashed before it is stored.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body(content = PatchUser, description = "The user updates"),
    responses(
        (status = 200, description = "The updated user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 422, description = "The validation error(s)", body = ErrorBody),
    )
)]
#[patch("/{id}")]
pub async fn update(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    user_id: web::Path<i64>,
    updates: web::Json<PatchUser>,
) -> Result<impl Responder, AppError> {
    let updates = updates.into_inner();
    if updates.is_empty() {
        return Err(AppError::Validation(vec![Issue::no_updates()]));
    }
    updates.validate()?;

    let password_hash = match &updates.password {
        Some(password) => Some(hash_password(password, settings.bcrypt_cost).await?),
        None => None,
    };

    let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
    {
        let mut sets = query.separated(", ");
        if let Some(nom) = updates.nom {
            sets.push("nom = ").push_bind_unseparated(nom);
        }
        if let Some(email) = updates.email {
            sets.push("email = ").push_bind_unseparated(email);
        }
        if let Some(password_hash) = password_hash {
            sets.push("password = ").push_bind_unseparated(password_hash);
        }
    }
    query
        .push(" WHERE id = ")
        .push_bind(user_id.into_inner())
        .push(format!(" RETURNING {}", USER_COLUMNS));

    let user = query
        .build_query_as::<User>()
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 422, description = "Invalid id error", body = ErrorBody),
    )
)]
#[delete("/{id}")]
pub async fn remove(
    pool: web::Data<SqlitePool>,
    user_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found());
    }

    log::info!("deleted user {}", user_id);
    Ok(HttpResponse::NoContent().finish())
}
