//! Typed authentication operations.

use medica_model::auth::{LoginPayload, RegisterPayload};
use serde_json::json;

use crate::cache::ProfileCache;
use crate::client::GraphqlClient;
use crate::error::Result;
use crate::ops::{Operation, documents};
use crate::store::TokenStoreExt;

impl GraphqlClient {
    /// Authenticates with email and password. On success both tokens are
    /// persisted and the identity fields are cached for offline display.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginPayload> {
        let payload: LoginPayload = self
            .execute(&Operation::new(
                "Login",
                "login",
                documents::LOGIN,
                json!({ "email": email, "password": password }),
            ))
            .await?;

        self.store.save_credentials(&payload.credentials());
        self.profile_cache()
            .remember_identity(&payload.id, &payload.email);
        log::info!("[GraphqlClient] logged in as {}", payload.email);
        Ok(payload)
    }

    /// Requests an email verification code for registration.
    pub async fn send_code(&self, email: &str) -> Result<bool> {
        self.execute(&Operation::new(
            "SendCode",
            "sendCode",
            documents::SEND_CODE,
            json!({ "email": email }),
        ))
        .await
    }

    /// Completes registration with the emailed code. Persists the issued
    /// credential pair like a login does.
    pub async fn verify_code_and_register(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<RegisterPayload> {
        let payload: RegisterPayload = self
            .execute(&Operation::new(
                "VerifyCodeAndRegister",
                "verifyCodeAndRegister",
                documents::VERIFY_CODE_AND_REGISTER,
                json!({ "email": email, "code": code, "password": password }),
            ))
            .await?;

        self.store.save_credentials(&payload.credentials());
        self.profile_cache()
            .remember_identity(&payload.id, &payload.email);
        log::info!("[GraphqlClient] registered {}", payload.email);
        Ok(payload)
    }

    /// Changes the account email, confirmed by a verification code. Updates
    /// the cached email on success.
    pub async fn change_email(
        &self,
        new_email: &str,
        current_email: &str,
        code: &str,
    ) -> Result<bool> {
        let changed: bool = self
            .execute(&Operation::new(
                "ChangeEmail",
                "changeEmail",
                documents::CHANGE_EMAIL,
                json!({
                    "newEmail": new_email,
                    "currentEmail": current_email,
                    "code": code,
                }),
            ))
            .await?;

        if changed {
            self.profile_cache().remember_email(new_email);
        }
        Ok(changed)
    }

    pub async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        self.execute(&Operation::new(
            "ChangePassword",
            "changePassword",
            documents::CHANGE_PASSWORD,
            json!({
                "email": email,
                "currentPassword": current_password,
                "newPassword": new_password,
            }),
        ))
        .await
    }

    /// Explicitly rotates the credential pair through the refresh endpoint,
    /// sharing the interceptor's in-flight gate. On failure the stored
    /// credentials are cleared and the caller should route to login.
    pub async fn refresh_session(&self) -> Result<()> {
        self.refresh_gated().await
    }

    /// Local logout: removes the credential pair and every cached profile
    /// field. No server call is involved.
    pub fn logout(&self) {
        self.store.clear_credentials();
        self.profile_cache().clear();
        log::info!("[GraphqlClient] logged out, local session cleared");
    }

    /// Whether a session appears to exist locally (an access token is
    /// stored). The token may still be expired; the pipeline handles that
    /// on the next request.
    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some()
    }

    /// Profile cache bound to this client's store.
    pub fn profile_cache(&self) -> ProfileCache {
        ProfileCache::new(self.store.clone())
    }
}
