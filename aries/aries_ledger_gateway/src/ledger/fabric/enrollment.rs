//! Identity bootstrap against the organization's CA: enroll the admin once,
//! then register and enroll application users with the admin's authority.
use log::{debug, info, warn};

use super::{
    ca_client::{CaClient, EnrollmentRequest, RegistrationRequest},
    identity::{Identity, IdentityStore},
};
use crate::errors::error::{LedgerError, LedgerResult};

/// Result of a successful enrollment step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// The identity was already in the store; nothing was sent to the CA.
    AlreadyEnrolled,
    /// The CA issued a new identity and it was stored.
    Enrolled,
}

pub async fn enroll_admin(
    ca_client: &impl CaClient,
    identity_store: &impl IdentityStore,
    msp_org: &str,
    admin_user_id: &str,
    admin_secret: &str,
) -> LedgerResult<EnrollmentOutcome> {
    debug!("enroll_admin >> msp_org: {msp_org}, admin_user_id: {admin_user_id}");
    if identity_store.get(admin_user_id).await?.is_some() {
        info!("An identity for the admin user {admin_user_id} already exists in the store");
        return Ok(EnrollmentOutcome::AlreadyEnrolled);
    }

    let enrollment = ca_client
        .enroll(&EnrollmentRequest {
            enrollment_id: admin_user_id.to_string(),
            enrollment_secret: admin_secret.to_string(),
        })
        .await
        .map_err(|err| {
            warn!("enroll_admin << failed to enroll admin user {admin_user_id}: {err}");
            err
        })?;

    let identity = Identity::new_x509(
        admin_user_id,
        msp_org,
        enrollment.certificate,
        enrollment.private_key,
    );
    identity_store.put(admin_user_id, identity).await?;
    info!("Successfully enrolled admin user {admin_user_id} and imported it into the store");
    Ok(EnrollmentOutcome::Enrolled)
}

pub async fn register_and_enroll_user(
    ca_client: &impl CaClient,
    identity_store: &impl IdentityStore,
    msp_org: &str,
    user_id: &str,
    affiliation: &str,
    admin_user_id: &str,
) -> LedgerResult<EnrollmentOutcome> {
    debug!(
        "register_and_enroll_user >> msp_org: {msp_org}, user_id: {user_id}, affiliation: \
         {affiliation}"
    );
    if identity_store.get(user_id).await?.is_some() {
        info!("An identity for the user {user_id} already exists in the store");
        return Ok(EnrollmentOutcome::AlreadyEnrolled);
    }

    let admin_identity = identity_store
        .get(admin_user_id)
        .await?
        .ok_or_else(|| LedgerError::AdminNotEnrolled(admin_user_id.to_string()))?;
    let admin_context = admin_identity.user_context()?;

    let secret = ca_client
        .register(
            &RegistrationRequest::client(user_id, affiliation),
            &admin_context,
        )
        .await
        .map_err(|err| {
            warn!("register_and_enroll_user << failed to register user {user_id}: {err}");
            err
        })?;
    let enrollment = ca_client
        .enroll(&EnrollmentRequest {
            enrollment_id: user_id.to_string(),
            enrollment_secret: secret,
        })
        .await
        .map_err(|err| {
            warn!("register_and_enroll_user << failed to enroll user {user_id}: {err}");
            err
        })?;

    let identity = Identity::new_x509(
        user_id,
        msp_org,
        enrollment.certificate,
        enrollment.private_key,
    );
    identity_store.put(user_id, identity).await?;
    info!("Successfully registered and enrolled user {user_id} and imported it into the store");
    Ok(EnrollmentOutcome::Enrolled)
}
