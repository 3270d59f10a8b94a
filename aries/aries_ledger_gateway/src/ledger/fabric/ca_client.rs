use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use log::warn;

use super::{connection_profile::CertificateAuthority, identity::UserContext};
use crate::errors::error::{LedgerError, LedgerResult};

/// Role assigned to every user registered through the gateway.
pub const CLIENT_ROLE: &str = "client";

#[derive(Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub enrollment_id: String,
    pub enrollment_secret: String,
}

impl Debug for EnrollmentRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentRequest")
            .field("enrollment_id", &self.enrollment_id)
            .field("enrollment_secret", &"*****")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub enrollment_id: String,
    pub affiliation: String,
    pub role: String,
}

impl RegistrationRequest {
    pub fn client(enrollment_id: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            enrollment_id: enrollment_id.into(),
            affiliation: affiliation.into(),
            role: CLIENT_ROLE.to_string(),
        }
    }
}

/// Certificate and PEM-encoded private key issued by the CA.
#[derive(Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub certificate: String,
    pub private_key: String,
}

impl Debug for Enrollment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enrollment")
            .field("certificate", &self.certificate)
            .field("private_key", &"*****")
            .finish()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaClient: Debug + Send + Sync {
    async fn enroll(&self, request: &EnrollmentRequest) -> LedgerResult<Enrollment>;

    /// Registers a new identity on behalf of `registrar`, returning its
    /// enrollment secret.
    async fn register(
        &self,
        request: &RegistrationRequest,
        registrar: &UserContext,
    ) -> LedgerResult<String>;
}

/// Builds a CA client from the CA entry of a connection profile.
pub trait CaClientFactory: Debug + Send + Sync {
    type Client: CaClient;

    fn build_ca_client(&self, ca: &CertificateAuthority) -> LedgerResult<Self::Client>;
}

/// Bounds every CA call with a deadline. Calls are never retried.
#[derive(Debug)]
pub struct TimeoutCaClient<C>
where
    C: CaClient,
{
    inner: C,
    timeout: Duration,
}

impl<C> TimeoutCaClient<C>
where
    C: CaClient,
{
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C> CaClient for TimeoutCaClient<C>
where
    C: CaClient,
{
    async fn enroll(&self, request: &EnrollmentRequest) -> LedgerResult<Enrollment> {
        tokio::time::timeout(self.timeout, self.inner.enroll(request))
            .await
            .map_err(|_| {
                warn!("enroll << CA timed out for {}", request.enrollment_id);
                LedgerError::CertificateAuthorityTimeout(self.timeout)
            })?
    }

    async fn register(
        &self,
        request: &RegistrationRequest,
        registrar: &UserContext,
    ) -> LedgerResult<String> {
        tokio::time::timeout(self.timeout, self.inner.register(request, registrar))
            .await
            .map_err(|_| {
                warn!("register << CA timed out for {}", request.enrollment_id);
                LedgerError::CertificateAuthorityTimeout(self.timeout)
            })?
    }
}
