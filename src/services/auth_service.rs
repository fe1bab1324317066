//! Authentication service - registration, login, and bearer tokens.
//!
//! Token issuance and verification are stateless: validity is purely a
//! function of the signature and the embedded expiry. There is no
//! server-side session store and no revocation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Hash verified in place of a real one when the email is unknown, so both
/// failure paths cost one argon2 verification. Matches no password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$ORiYSbT1ZzSPhB1Tht8zdC1sDiSWVSNpFdUI1JSiZ6c";

/// JWT claims payload.
///
/// Wire names follow the token contract: the subject user id is carried
/// under `id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "id")]
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Validated registration details, as accepted by the flow.
///
/// `role` is the caller-supplied role string, still unparsed; whether it is
/// honored at all depends on configuration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Option<String>,
}

/// Successful login: a fresh token plus the authenticated user.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: TokenResponse,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, details: Registration) -> AppResult<User>;

    /// Verify credentials and issue a bearer token
    async fn login(
        &self,
        email: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<LoginOutcome>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Issue a signed bearer token scoped to a user's id and role.
///
/// Expiry is issuance time plus the configured TTL; the signing secret is
/// process-wide configuration.
pub fn issue_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.token_ttl_hours);

    let claims = Claims {
        sub: user.id,
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.token_ttl_hours * SECONDS_PER_HOUR,
    })
}

/// Decode a bearer token, checking signature and expiry.
///
/// Expiry uses zero leeway and is exclusive: a token is still accepted at
/// its `exp` second and rejected strictly after it. Bad signature,
/// malformed payload and expired token all come back as controlled errors.
pub fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService backed by the user store.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }

    /// Resolve the role a new account gets.
    fn registration_role(&self, requested: Option<&str>) -> AppResult<UserRole> {
        if self.config.allow_client_role {
            let role = requested.ok_or_else(|| AppError::validation("All fields are required"))?;
            UserRole::try_from(role)
        } else {
            // Validated at startup; a failure here means config drifted
            UserRole::try_from(self.config.default_role.as_str())
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, details: Registration) -> AppResult<User> {
        let role = self.registration_role(details.role.as_deref())?;

        // Advisory lookup for a friendly conflict message; the unique index
        // in the store decides races.
        if self.users.find_by_email(&details.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&details.password)?.into_string();

        let user = self
            .users
            .create(NewUser {
                name: details.name,
                email: details.email,
                phone: details.phone,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    async fn login(
        &self,
        email: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<LoginOutcome> {
        let user_result = self.users.find_by_email(&email).await?;

        // Verify even when the email is unknown so the two failure paths
        // cost the same.
        let stored = match &user_result {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::from_hash(DUMMY_HASH.to_string()),
        };
        let password_valid = stored.verify(&password);

        let Some(user) = user_result else {
            return Err(AppError::InvalidCredentials);
        };

        // A role mismatch answers with the same generic error; a distinct
        // message would confirm that the email exists.
        if let Some(requested) = role.as_deref() {
            if UserRole::try_from(requested).ok() != Some(user.role) {
                return Err(AppError::InvalidCredentials);
            }
        }

        if !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.users.record_login(user.id).await?;

        let token = issue_token(&user, &self.config)?;
        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(LoginOutcome { token, user })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;

    const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn test_user(role: UserRole) -> User {
        let hash = Password::new("pw123456").unwrap().into_string();
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            password_hash: hash,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login: None,
        }
    }

    fn registration(role: Option<&str>) -> Registration {
        Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            password: "pw123456".to_string(),
            role: role.map(String::from),
        }
    }

    fn authenticator(repo: MockUserRepository) -> Authenticator {
        Authenticator::new(Arc::new(repo), Config::for_tests(TEST_SECRET))
    }

    #[tokio::test]
    async fn register_persists_hashed_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("ada@example.com"))
            .returning(|_| Ok(None));
        repo.expect_create().returning(|new_user| {
            // The flow must hand the store a verifiable hash, never the
            // plaintext.
            assert_ne!(new_user.password_hash, "pw123456");
            assert!(Password::from_hash(new_user.password_hash.clone()).verify("pw123456"));
            Ok(User {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email,
                phone: new_user.phone,
                password_hash: new_user.password_hash,
                role: new_user.role,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                last_login: None,
            })
        });

        let user = authenticator(repo)
            .register(registration(Some("student")))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert!(user.last_login.is_none());
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(test_user(UserRole::Student))));

        let err = authenticator(repo)
            .register(registration(Some("student")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Email already exists");
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let repo = MockUserRepository::new();
        let err = authenticator(repo)
            .register(registration(Some("admin")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_requires_role_when_client_roles_allowed() {
        let repo = MockUserRepository::new();
        let err = authenticator(repo)
            .register(registration(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_assigns_default_role_when_client_roles_disabled() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|new_user| {
            Ok(User {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email,
                phone: new_user.phone,
                password_hash: new_user.password_hash,
                role: new_user.role,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                last_login: None,
            })
        });

        let mut config = Config::for_tests(TEST_SECRET);
        config.allow_client_role = false;
        let service = Authenticator::new(Arc::new(repo), config);

        // Caller asks for driver; configuration says ignore it
        let user = service.register(registration(Some("driver"))).await.unwrap();
        assert_eq!(user.role, UserRole::Student);
    }

    #[tokio::test]
    async fn login_issues_matching_token_and_records_login() {
        let user = test_user(UserRole::Driver);
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        let found = user.clone();
        repo.expect_find_by_email()
            .with(eq("ada@example.com"))
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_record_login()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(()));

        let service = authenticator(repo);
        let outcome = service
            .login("ada@example.com".to_string(), "pw123456".to_string(), None)
            .await
            .unwrap();

        let claims = service.verify_token(&outcome.token.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "driver");
        assert!(claims.exp > claims.iat);
        assert_eq!(outcome.token.token_type, "Bearer");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        // Unknown email
        let mut missing = MockUserRepository::new();
        missing.expect_find_by_email().returning(|_| Ok(None));
        let err_missing = authenticator(missing)
            .login("ghost@example.com".to_string(), "pw123456".to_string(), None)
            .await
            .unwrap_err();

        // Wrong password
        let mut wrong_pw = MockUserRepository::new();
        wrong_pw
            .expect_find_by_email()
            .returning(|_| Ok(Some(test_user(UserRole::Student))));
        let err_wrong = authenticator(wrong_pw)
            .login("ada@example.com".to_string(), "wrong".to_string(), None)
            .await
            .unwrap_err();

        // Role mismatch
        let mut wrong_role = MockUserRepository::new();
        wrong_role
            .expect_find_by_email()
            .returning(|_| Ok(Some(test_user(UserRole::Student))));
        let err_role = authenticator(wrong_role)
            .login(
                "ada@example.com".to_string(),
                "pw123456".to_string(),
                Some("driver".to_string()),
            )
            .await
            .unwrap_err();

        assert_eq!(err_missing.to_string(), err_wrong.to_string());
        assert_eq!(err_wrong.to_string(), err_role.to_string());
    }

    #[tokio::test]
    async fn login_accepts_matching_role() {
        let user = test_user(UserRole::Student);
        let mut repo = MockUserRepository::new();
        let found = user.clone();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_record_login().returning(|_| Ok(()));

        let outcome = authenticator(repo)
            .login(
                "ada@example.com".to_string(),
                "pw123456".to_string(),
                Some("student".to_string()),
            )
            .await
            .unwrap();
        assert!(!outcome.token.access_token.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = Config::for_tests(TEST_SECRET);
        let now = Utc::now().timestamp();

        // One second past expiry: rejected
        let expired = Claims {
            sub: Uuid::new_v4(),
            role: "student".to_string(),
            exp: now - 1,
            iat: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(config.jwt_secret_bytes()),
        )
        .unwrap();
        assert!(decode_token(&token, &config).is_err());

        // Comfortably before expiry: accepted
        let live = Claims {
            sub: Uuid::new_v4(),
            role: "student".to_string(),
            exp: now + 60,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &live,
            &EncodingKey::from_secret(config.jwt_secret_bytes()),
        )
        .unwrap();
        assert!(decode_token(&token, &config).is_ok());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = Config::for_tests(TEST_SECRET);
        let user = test_user(UserRole::Student);
        let token = issue_token(&user, &config).unwrap().access_token;

        // Signed with a different secret
        let other = Config::for_tests("another-secret-key-also-32-chars-min!");
        assert!(decode_token(&token, &other).is_err());

        // Corrupted payload
        let mut corrupted = token.clone();
        corrupted.insert(10, 'x');
        assert!(decode_token(&corrupted, &config).is_err());

        // Not a JWT at all
        assert!(decode_token("garbage", &config).is_err());
    }

    #[test]
    fn token_claims_use_wire_names() {
        let config = Config::for_tests(TEST_SECRET);
        let user = test_user(UserRole::Driver);
        let token = issue_token(&user, &config).unwrap().access_token;

        // Decode the payload segment by hand and check the field names
        use base64::Engine as _;
        let payload = token.split('.').nth(1).unwrap();
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], serde_json::json!(user.id.to_string()));
        assert_eq!(value["role"], "driver");
        assert!(value["exp"].is_i64());
    }
}
