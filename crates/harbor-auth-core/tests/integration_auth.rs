//! End-to-end auth flows against an in-memory account repository.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockAccountRepository;
use harbor_auth_core::{
    AuthConfig, AuthError, AuthService, LoginCredentials, NewAccount, PasswordHasher,
    TokenVerifier,
};
use harbor_types::AccountId;

fn test_config() -> AuthConfig {
    AuthConfig::try_new("a".repeat(48), "b".repeat(48))
        .unwrap()
        .with_access_token_ttl(Duration::from_secs(300))
        .with_refresh_token_ttl(Duration::from_secs(3600))
}

fn test_service(repo: Arc<MockAccountRepository>) -> AuthService<MockAccountRepository> {
    // Cheap Argon2 parameters keep the suite fast
    AuthService::new(&test_config(), repo)
        .with_hasher(PasswordHasher::with_params(8, 1, 1).unwrap())
}

fn nova() -> NewAccount {
    NewAccount {
        full_name: "Nova Example".to_string(),
        email: "nova@x.io".to_string(),
        username: "nova".to_string(),
        password: "p@ss1".to_string(),
        avatar_url: "https://media.example.com/nova.png".to_string(),
        cover_image_url: None,
    }
}

async fn register_and_login(
    service: &AuthService<MockAccountRepository>,
) -> (AccountId, harbor_types::TokenPair) {
    let profile = service.register(nova()).await.unwrap();
    let outcome = service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap();
    (profile.id, outcome.tokens)
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_returns_sanitized_projection() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let profile = service.register(nova()).await.unwrap();
    assert_eq!(profile.username, "nova");
    assert_eq!(profile.email, "nova@x.io");

    let json = serde_json::to_string(&profile).unwrap();
    assert!(!json.contains("password"));
    assert!(!json.contains("refresh"));
}

#[tokio::test]
async fn test_register_lowercases_username() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let mut input = nova();
    input.username = "  NoVa  ".to_string();
    let profile = service.register(input).await.unwrap();
    assert_eq!(profile.username, "nova");
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    service.register(nova()).await.unwrap();

    let mut dup = nova();
    dup.email = "other@x.io".to_string();
    let err = service.register(dup).await.unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    service.register(nova()).await.unwrap();

    let mut dup = nova();
    dup.username = "other".to_string();
    let err = service.register(dup).await.unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_register_fresh_identity_succeeds_after_conflict() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    service.register(nova()).await.unwrap();

    let mut fresh = nova();
    fresh.username = "lyra".to_string();
    fresh.email = "lyra@x.io".to_string();
    assert!(service.register(fresh).await.is_ok());
}

#[tokio::test]
async fn test_register_rejects_blank_fields() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let mut input = nova();
    input.full_name = "   ".to_string();
    let err = service.register(input).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_password_with_surrounding_whitespace_is_stored_verbatim() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let mut input = nova();
    input.password = "  p@ss1  ".to_string();
    service.register(input).await.unwrap();

    // The exact string the user registered with logs in
    assert!(service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "  p@ss1  ".to_string(),
        })
        .await
        .is_ok());

    // The trimmed variant is a different password
    let err = service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_register_requires_avatar() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let mut input = nova();
    input.avatar_url = String::new();
    let err = service.register(input).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_access_token_recovers_account_id() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, tokens) = register_and_login(&service).await;

    let verifier = TokenVerifier::new(&test_config());
    let claims = verifier.verify_access(&tokens.access_token).unwrap();
    assert_eq!(claims.account_id(), Some(account_id));
    assert_eq!(claims.username, "nova");
}

#[tokio::test]
async fn test_login_by_email_works() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    service.register(nova()).await.unwrap();

    let outcome = service
        .login(LoginCredentials {
            username: None,
            email: Some("nova@x.io".to_string()),
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.account.username, "nova");
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    service.register(nova()).await.unwrap();

    let err = service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_login_unknown_account_is_not_found() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let err = service
        .login(LoginCredentials {
            username: Some("ghost".to_string()),
            email: None,
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AccountNotFound));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_login_requires_an_identifier() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let err = service
        .login(LoginCredentials {
            username: None,
            email: Some("   ".to_string()),
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn test_login_persists_refresh_token() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, tokens) = register_and_login(&service).await;

    assert_eq!(
        repo.stored_refresh_token(account_id.0),
        Some(tokens.refresh_token)
    );
}

#[tokio::test]
async fn test_second_login_invalidates_first_sessions_refresh_token() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (_, first) = register_and_login(&service).await;

    // Second device logs in; last write wins on the stored token
    service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap();

    let err = service.refresh(&first.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenReused));
    assert_eq!(err.status_code(), 401);
}

// ============================================================================
// Refresh rotation
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_the_stored_token() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, tokens) = register_and_login(&service).await;

    let rotated = service.refresh(&tokens.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);
    assert_eq!(
        repo.stored_refresh_token(account_id.0),
        Some(rotated.refresh_token.clone())
    );

    // The new pair is immediately usable
    assert!(service.refresh(&rotated.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_reuse_after_rotation_fails() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (_, tokens) = register_and_login(&service).await;

    service.refresh(&tokens.refresh_token).await.unwrap();

    let err = service.refresh(&tokens.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenReused));
    // Collapsed to the same boundary code as any other token failure
    assert_eq!(err.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_refresh_after_logout_fails() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, tokens) = register_and_login(&service).await;

    service.logout(account_id).await.unwrap();
    assert_eq!(repo.stored_refresh_token(account_id.0), None);

    let err = service.refresh(&tokens.refresh_token).await.unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    service.logout(account_id).await.unwrap();
    assert!(service.logout(account_id).await.is_ok());
}

#[tokio::test]
async fn test_refresh_rejects_garbage_and_empty_tokens() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    register_and_login(&service).await;

    assert!(matches!(
        service.refresh("").await.unwrap_err(),
        AuthError::InvalidToken
    ));
    assert!(matches!(
        service.refresh("not-a-jwt").await.unwrap_err(),
        AuthError::InvalidToken
    ));
}

// ============================================================================
// Password change
// ============================================================================

#[tokio::test]
async fn test_change_password_swaps_which_password_logs_in() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    service
        .change_password(account_id, "p@ss1", "n3w-pass")
        .await
        .unwrap();

    // New password works
    assert!(service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "n3w-pass".to_string(),
        })
        .await
        .is_ok());

    // Old password no longer does
    let err = service
        .login(LoginCredentials {
            username: Some("nova".to_string()),
            email: None,
            password: "p@ss1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_change_password_wrong_old_password_is_bad_request() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    let err = service
        .change_password(account_id, "wrong", "n3w-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_change_password_new_password_kept_verbatim() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    service
        .change_password(account_id, "p@ss1", " n3w-pass ")
        .await
        .unwrap();

    // Only the exact new string, whitespace included, verifies
    assert!(service
        .change_password(account_id, " n3w-pass ", "another")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_change_password_keeps_existing_refresh_token() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, tokens) = register_and_login(&service).await;

    service
        .change_password(account_id, "p@ss1", "n3w-pass")
        .await
        .unwrap();

    // Scope choice: the stored refresh token survives a password change
    assert!(service.refresh(&tokens.refresh_token).await.is_ok());
}

// ============================================================================
// Authenticated reads and profile updates
// ============================================================================

#[tokio::test]
async fn test_authenticate_loads_the_account() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, tokens) = register_and_login(&service).await;

    let profile = service.authenticate(&tokens.access_token).await.unwrap();
    assert_eq!(profile.id, account_id);
    assert_eq!(profile.username, "nova");
}

#[tokio::test]
async fn test_authenticate_rejects_refresh_token_as_access_token() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (_, tokens) = register_and_login(&service).await;

    let err = service
        .authenticate(&tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}

#[tokio::test]
async fn test_update_details_changes_profile() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    let profile = service
        .update_details(account_id, Some("Nova Renamed"), None)
        .await
        .unwrap();
    assert_eq!(profile.full_name, "Nova Renamed");
    assert_eq!(profile.email, "nova@x.io");
}

#[tokio::test]
async fn test_update_details_duplicate_email_conflicts() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    service.register(nova()).await.unwrap();

    let mut other = nova();
    other.username = "lyra".to_string();
    other.email = "lyra@x.io".to_string();
    let lyra = service.register(other).await.unwrap();

    let err = service
        .update_details(lyra.id, None, Some("nova@x.io"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_update_details_requires_some_field() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    let err = service
        .update_details(account_id, None, Some("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn test_update_avatar_and_cover_image() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));
    let (account_id, _) = register_and_login(&service).await;

    let profile = service
        .update_avatar(account_id, "https://media.example.com/new.png")
        .await
        .unwrap();
    assert_eq!(profile.avatar_url, "https://media.example.com/new.png");

    let profile = service
        .update_cover_image(account_id, "https://media.example.com/cover.png")
        .await
        .unwrap();
    assert_eq!(
        profile.cover_image_url.as_deref(),
        Some("https://media.example.com/cover.png")
    );
}

#[tokio::test]
async fn test_current_account_unknown_id_is_not_found() {
    let repo = Arc::new(MockAccountRepository::new());
    let service = test_service(Arc::clone(&repo));

    let err = service.current_account(AccountId::new()).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountNotFound));
}
